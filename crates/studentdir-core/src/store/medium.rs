use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Name of the single durable entry holding the collection
pub const COLLECTION_FILE: &str = "students.json";

/// A place that holds one blob and can only be read or overwritten whole.
pub trait StorageMedium: Send + Sync {
    /// `Ok(None)` when nothing has ever been written.
    fn read(&self) -> io::Result<Option<String>>;

    fn write(&self, contents: &str) -> io::Result<()>;

    /// Human-readable location, used in log fields.
    fn describe(&self) -> String;
}

// ============================================================================
// File
// ============================================================================

/// One JSON file inside a data directory.
pub struct FileMedium {
    path: PathBuf,
}

impl FileMedium {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(COLLECTION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl StorageMedium for FileMedium {
    fn read(&self) -> io::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&self.path).map(Some)
    }

    fn write(&self, contents: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash never leaves a half-written blob
        let tmp = self.temp_path();
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}

// ============================================================================
// Memory
// ============================================================================

/// In-process medium; contents vanish with the value.
#[derive(Default)]
pub struct MemoryMedium {
    slot: Mutex<Option<String>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with pre-existing contents, as if written by an earlier run.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(contents.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl StorageMedium for MemoryMedium {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> io::Result<()> {
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(contents.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
