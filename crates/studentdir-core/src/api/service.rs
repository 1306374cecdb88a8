//! Simulated remote record service backed by the local student store.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ServiceError;
use crate::models::{NewStudent, Student, StudentFilter, StudentPatch};
use crate::store::StudentStore;

// ============================================================================
// Constants
// ============================================================================

/// Latency for list queries and mutations, in milliseconds.
const STANDARD_LATENCY_MS: u64 = 500;

/// Latency for single-record lookups (half of standard).
const LOOKUP_LATENCY_MS: u64 = 250;

/// Latency for the course index (a third of standard).
const INDEX_LATENCY_MS: u64 = 166;

// ============================================================================
// Latency
// ============================================================================

/// Artificial delay applied before each call, tiered by call kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub standard: Duration,
    pub lookup: Duration,
    pub index: Duration,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            standard: Duration::from_millis(STANDARD_LATENCY_MS),
            lookup: Duration::from_millis(LOOKUP_LATENCY_MS),
            index: Duration::from_millis(INDEX_LATENCY_MS),
        }
    }
}

impl LatencyProfile {
    pub fn none() -> Self {
        Self {
            standard: Duration::ZERO,
            lookup: Duration::ZERO,
            index: Duration::ZERO,
        }
    }
}

// ============================================================================
// Service Contract
// ============================================================================

/// Record operations as a remote backend would expose them.
pub trait StudentApi: Send + Sync {
    /// All students matching `filter`, in storage order.
    fn list(
        &self,
        filter: &StudentFilter,
    ) -> impl Future<Output = Result<Vec<Student>, ServiceError>> + Send;

    fn get_by_id(&self, id: &str) -> impl Future<Output = Result<Student, ServiceError>> + Send;

    fn create(
        &self,
        input: NewStudent,
    ) -> impl Future<Output = Result<Student, ServiceError>> + Send;

    fn update(
        &self,
        id: &str,
        patch: StudentPatch,
    ) -> impl Future<Output = Result<Student, ServiceError>> + Send;

    /// Removing an id that is not present succeeds.
    fn delete(&self, id: &str) -> impl Future<Output = Result<(), ServiceError>> + Send;

    /// Distinct course names across the whole collection, ascending.
    fn list_courses(&self) -> impl Future<Output = Result<Vec<String>, ServiceError>> + Send;
}

// ============================================================================
// Record Service
// ============================================================================

/// Record service over a `StudentStore`.
/// Clone is cheap - clones share the store handle and the writer lock.
#[derive(Clone)]
pub struct RecordService {
    store: Arc<StudentStore>,
    latency: LatencyProfile,
    // Serializes read-modify-write sequences against the store
    writer: Arc<Mutex<()>>,
}

impl RecordService {
    pub fn new(store: Arc<StudentStore>) -> Self {
        Self::with_latency(store, LatencyProfile::default())
    }

    pub fn with_latency(store: Arc<StudentStore>, latency: LatencyProfile) -> Self {
        Self {
            store,
            latency,
            writer: Arc::new(Mutex::new(())),
        }
    }

    pub fn latency(&self) -> LatencyProfile {
        self.latency
    }

    async fn delay(duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }

    /// Load, let `mutate` edit the collection, and write it back at the
    /// revision that was read. `mutate` also reports whether it changed
    /// anything; an unchanged collection is not written.
    async fn modify<T, F>(&self, mutate: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut Vec<Student>) -> Result<(T, bool), ServiceError>,
    {
        let _writer = self.writer.lock().await;

        let mut current = self.store.load_versioned()?;
        let (result, changed) = mutate(&mut current.students)?;
        if changed {
            let revision = self
                .store
                .save_if(current.revision, &current.students)
                .map_err(|e| {
                    if e.is_conflict() {
                        warn!(error = %e, "Collection changed by another writer");
                    }
                    e
                })?;
            debug!(revision, count = current.students.len(), "Student collection saved");
        }
        Ok(result)
    }
}

impl StudentApi for RecordService {
    async fn list(&self, filter: &StudentFilter) -> Result<Vec<Student>, ServiceError> {
        Self::delay(self.latency.standard).await;

        let mut students = self.store.load()?;
        if !filter.is_empty() {
            students.retain(|s| filter.matches(s));
        }
        debug!(?filter, count = students.len(), "Listed students");
        Ok(students)
    }

    async fn get_by_id(&self, id: &str) -> Result<Student, ServiceError> {
        Self::delay(self.latency.lookup).await;

        self.store
            .load()?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    async fn create(&self, input: NewStudent) -> Result<Student, ServiceError> {
        Self::delay(self.latency.standard).await;

        let student = input.into_student(Uuid::new_v4().to_string());
        let created = self
            .modify(|students| {
                students.push(student.clone());
                Ok((student, true))
            })
            .await?;

        info!(id = %created.id, course = %created.course, "Student created");
        Ok(created)
    }

    async fn update(&self, id: &str, patch: StudentPatch) -> Result<Student, ServiceError> {
        Self::delay(self.latency.standard).await;

        let updated = self
            .modify(|students| {
                let student = students
                    .iter_mut()
                    .find(|s| s.id == id)
                    .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
                patch.apply_to(student);
                Ok((student.clone(), true))
            })
            .await?;

        info!(id = %updated.id, "Student updated");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        Self::delay(self.latency.standard).await;

        let removed = self
            .modify(|students| {
                let before = students.len();
                students.retain(|s| s.id != id);
                let removed = students.len() != before;
                Ok((removed, removed))
            })
            .await?;

        if removed {
            info!(id, "Student deleted");
        } else {
            debug!(id, "Delete of absent student ignored");
        }
        Ok(())
    }

    async fn list_courses(&self) -> Result<Vec<String>, ServiceError> {
        Self::delay(self.latency.index).await;

        let courses: BTreeSet<String> = self
            .store
            .load()?
            .into_iter()
            .map(|s| s.course)
            .collect();
        Ok(courses.into_iter().collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
