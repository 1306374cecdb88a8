use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Stored collection is corrupt: {0}")]
    Corrupt(String),

    #[error("Failed to write stored collection: {0}")]
    Write(#[source] std::io::Error),

    #[error("Stored collection changed (expected revision {expected}, found {found})")]
    Conflict { expected: u64, found: u64 },
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}
