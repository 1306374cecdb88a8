use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::medium::{FileMedium, MemoryMedium, StorageMedium};
use super::seed::seed_students;
use super::StoreError;
use crate::models::Student;

/// The serialized form of the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEnvelope {
    revision: u64,
    saved_at: DateTime<Utc>,
    students: Vec<Student>,
}

/// Blobs written before revisions were tracked are a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredBlob {
    Versioned(StoredEnvelope),
    Legacy(Vec<Student>),
}

/// A loaded collection together with the revision it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCollection {
    pub revision: u64,
    pub saved_at: Option<DateTime<Utc>>,
    pub students: Vec<Student>,
}

pub struct StudentStore {
    medium: Box<dyn StorageMedium>,
    // Held across each read-compare-write so in-process writers cannot interleave
    guard: Mutex<()>,
}

impl StudentStore {
    /// Store backed by `students.json` in `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir).map_err(StoreError::Write)?;
        Ok(Self::with_medium(Box::new(FileMedium::new(data_dir))))
    }

    pub fn in_memory() -> Self {
        Self::with_medium(Box::new(MemoryMedium::new()))
    }

    pub fn with_medium(medium: Box<dyn StorageMedium>) -> Self {
        Self {
            medium,
            guard: Mutex::new(()),
        }
    }

    pub fn location(&self) -> String {
        self.medium.describe()
    }

    fn read(&self) -> Result<Option<StoredCollection>, StoreError> {
        let contents = self
            .medium
            .read()
            .map_err(|e| StoreError::Corrupt(format!("unreadable: {}", e)))?;

        let Some(contents) = contents else {
            return Ok(None);
        };

        let blob: StoredBlob = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Corrupt(format!("unparseable: {}", e)))?;

        Ok(Some(match blob {
            StoredBlob::Versioned(env) => StoredCollection {
                revision: env.revision,
                saved_at: Some(env.saved_at),
                students: env.students,
            },
            StoredBlob::Legacy(students) => StoredCollection {
                revision: 0,
                saved_at: None,
                students,
            },
        }))
    }

    fn write(&self, revision: u64, students: &[Student]) -> Result<(), StoreError> {
        let envelope = StoredEnvelope {
            revision,
            saved_at: Utc::now(),
            students: students.to_vec(),
        };
        let contents = serde_json::to_string_pretty(&envelope)
            .map_err(|e| StoreError::Write(std::io::Error::other(e)))?;
        self.medium.write(&contents).map_err(StoreError::Write)?;
        debug!(
            revision,
            count = students.len(),
            location = %self.medium.describe(),
            "Collection written"
        );
        Ok(())
    }

    // ===== Load =====

    /// Load the collection with its revision, seeding an empty medium.
    pub fn load_versioned(&self) -> Result<StoredCollection, StoreError> {
        let _guard = self.guard.lock().unwrap_or_else(|p| p.into_inner());

        if let Some(existing) = self.read()? {
            return Ok(existing);
        }

        let students = seed_students();
        info!(
            count = students.len(),
            location = %self.medium.describe(),
            "Seeding empty student store"
        );
        self.write(1, &students)?;
        Ok(StoredCollection {
            revision: 1,
            saved_at: Some(Utc::now()),
            students,
        })
    }

    pub fn load(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.load_versioned()?.students)
    }

    // ===== Save =====

    /// Overwrite the collection unconditionally. Returns the new revision.
    pub fn save(&self, students: &[Student]) -> Result<u64, StoreError> {
        let _guard = self.guard.lock().unwrap_or_else(|p| p.into_inner());

        // An unreadable blob is simply replaced
        let current = self.read().ok().flatten().map(|c| c.revision).unwrap_or(0);
        let next = next_revision(current)?;
        self.write(next, students)?;
        Ok(next)
    }

    /// Overwrite only if the stored revision is still `expected`.
    /// Returns the new revision.
    pub fn save_if(&self, expected: u64, students: &[Student]) -> Result<u64, StoreError> {
        let _guard = self.guard.lock().unwrap_or_else(|p| p.into_inner());

        let found = self.read()?.map(|c| c.revision).unwrap_or(0);
        if found != expected {
            return Err(StoreError::Conflict { expected, found });
        }
        let next = next_revision(expected)?;
        self.write(next, students)?;
        Ok(next)
    }
}

fn next_revision(current: u64) -> Result<u64, StoreError> {
    current
        .checked_add(1)
        .ok_or_else(|| StoreError::Corrupt("revision overflow".to_string()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    /// Medium shared between two stores, as two processes would share a file.
    #[derive(Clone, Default)]
    struct SharedMedium(Arc<MemoryMedium>);

    impl StorageMedium for SharedMedium {
        fn read(&self) -> std::io::Result<Option<String>> {
            self.0.read()
        }
        fn write(&self, contents: &str) -> std::io::Result<()> {
            self.0.write(contents)
        }
        fn describe(&self) -> String {
            "shared".to_string()
        }
    }

    #[test]
    fn test_first_load_seeds() {
        let store = StudentStore::in_memory();
        let loaded = store.load_versioned().unwrap();
        assert_eq!(loaded.revision, 1);
        assert_eq!(loaded.students, seed_students());
    }

    #[test]
    fn test_second_load_does_not_reseed() {
        let store = StudentStore::in_memory();
        store.load().unwrap();
        store.save(&[]).unwrap();

        let loaded = store.load_versioned().unwrap();
        assert!(loaded.students.is_empty());
        assert_eq!(loaded.revision, 2);
    }

    #[test]
    fn test_corrupt_blob_is_reported() {
        let store = StudentStore::with_medium(Box::new(MemoryMedium::with_contents("{not json")));
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn test_wrong_schema_is_corrupt() {
        let store = StudentStore::with_medium(Box::new(MemoryMedium::with_contents(
            r#"[{"id":"1","name":"A"}]"#,
        )));
        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_legacy_array_reads_as_revision_zero() {
        let legacy = serde_json::to_string(&seed_students()[..2]).unwrap();
        let store = StudentStore::with_medium(Box::new(MemoryMedium::with_contents(legacy)));
        let loaded = store.load_versioned().unwrap();
        assert_eq!(loaded.revision, 0);
        assert_eq!(loaded.saved_at, None);
        assert_eq!(loaded.students.len(), 2);

        assert_eq!(store.save_if(0, &loaded.students).unwrap(), 1);
    }

    #[test]
    fn test_save_overwrites_whole_collection() {
        let store = StudentStore::in_memory();
        let mut students = store.load().unwrap();
        students.truncate(1);
        store.save(&students).unwrap();
        assert_eq!(store.load().unwrap(), students);
    }

    #[test]
    fn test_save_replaces_corrupt_blob() {
        let store = StudentStore::with_medium(Box::new(MemoryMedium::with_contents("garbage")));
        assert_eq!(store.save(&seed_students()).unwrap(), 1);
        assert_eq!(store.load().unwrap().len(), 6);
    }

    #[test]
    fn test_save_if_rejects_stale_revision() {
        let shared = SharedMedium::default();
        let a = StudentStore::with_medium(Box::new(shared.clone()));
        let b = StudentStore::with_medium(Box::new(shared));

        let seen_by_a = a.load_versioned().unwrap();
        let seen_by_b = b.load_versioned().unwrap();
        assert_eq!(seen_by_a.revision, seen_by_b.revision);

        let mut a_students = seen_by_a.students.clone();
        a_students.pop();
        let new_rev = a.save_if(seen_by_a.revision, &a_students).unwrap();
        assert_eq!(new_rev, 2);

        let err = b.save_if(seen_by_b.revision, &seen_by_b.students).unwrap_err();
        assert!(err.is_conflict());
        match err {
            StoreError::Conflict { expected, found } => {
                assert_eq!(expected, 1);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(b.load().unwrap(), a_students);
    }

    #[test]
    fn test_exhausted_revision_is_corrupt() {
        let blob = serde_json::json!({
            "revision": u64::MAX,
            "saved_at": Utc::now(),
            "students": seed_students(),
        })
        .to_string();
        let store = StudentStore::with_medium(Box::new(MemoryMedium::with_contents(blob)));

        let loaded = store.load_versioned().unwrap();
        assert_eq!(loaded.revision, u64::MAX);
        assert!(matches!(
            store.save_if(loaded.revision, &loaded.students),
            Err(StoreError::Corrupt(_))
        ));
        assert!(matches!(store.save(&[]), Err(StoreError::Corrupt(_))));
        assert_eq!(store.load().unwrap().len(), 6);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = StudentStore::open(dir.path()).unwrap();
            let mut students = store.load().unwrap();
            students.retain(|s| s.course == "Arts");
            store.save(&students).unwrap();
        }

        let reopened = StudentStore::open(dir.path()).unwrap();
        let loaded = reopened.load_versioned().unwrap();
        assert_eq!(loaded.revision, 2);
        assert_eq!(loaded.students.len(), 2);
        assert!(loaded.students.iter().all(|s| s.course == "Arts"));
    }

    #[test]
    fn test_unreadable_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the blob should be cannot be read as a string
        std::fs::create_dir_all(dir.path().join(crate::store::medium::COLLECTION_FILE)).unwrap();
        let store = StudentStore::open(dir.path()).unwrap();
        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
    }
}
