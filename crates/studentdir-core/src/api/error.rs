use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Student not found: {0}")]
    NotFound(String),

    #[error("Storage corrupt: {0}")]
    StorageCorrupt(String),

    #[error("Storage write failed: {0}")]
    Storage(String),

    #[error("Student data was modified elsewhere (expected revision {expected}, found {found})")]
    Conflict { expected: u64, found: u64 },
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Corrupt(msg) => ServiceError::StorageCorrupt(msg),
            StoreError::Write(e) => ServiceError::Storage(e.to_string()),
            StoreError::Conflict { expected, found } => ServiceError::Conflict { expected, found },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_store_error() {
        let err: ServiceError = StoreError::Corrupt("unparseable: eof".to_string()).into();
        assert_eq!(err, ServiceError::StorageCorrupt("unparseable: eof".to_string()));

        let err: ServiceError = StoreError::Conflict { expected: 3, found: 4 }.into();
        assert_eq!(err, ServiceError::Conflict { expected: 3, found: 4 });
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_message() {
        let err = ServiceError::NotFound("abc".to_string());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Student not found: abc");
    }
}
