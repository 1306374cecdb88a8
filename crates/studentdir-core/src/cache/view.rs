use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::{ServiceError, StudentApi};
use crate::models::{
    FilterField, NewStudent, SortColumn, SortDirection, SortSpec, Student, StudentFilter,
    StudentPatch,
};

// ============================================================================
// Published State
// ============================================================================

/// Lifecycle of the student list: `Idle → Fetching → Ready | Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewStatus {
    #[default]
    Idle,
    Fetching,
    Ready,
    Failed(String),
}

/// Everything a front end needs to render the directory.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewSnapshot {
    /// Matching students in display order
    pub students: Vec<Student>,
    /// Course index for populating the course filter
    pub courses: Vec<String>,
    pub filter: StudentFilter,
    pub sort: SortSpec,
    pub status: ViewStatus,
}

impl ViewSnapshot {
    pub fn is_loading(&self) -> bool {
        self.status == ViewStatus::Fetching
    }

    pub fn is_ready(&self) -> bool {
        self.status == ViewStatus::Ready
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            ViewStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

// ============================================================================
// Internal State
// ============================================================================

/// A list result in service order, with the filter it was fetched for.
struct Fetched {
    filter: StudentFilter,
    students: Vec<Student>,
}

#[derive(Default)]
struct ViewState {
    filter: StudentFilter,
    sort: SortSpec,
    status: ViewStatus,
    fetched: Option<Fetched>,
    courses: Vec<String>,
    /// Epoch of the most recently issued list fetch
    list_epoch: u64,
    /// Epoch of the most recently issued course fetch
    course_epoch: u64,
}

impl ViewState {
    fn snapshot(&self) -> ViewSnapshot {
        let mut students = self
            .fetched
            .as_ref()
            .map(|f| f.students.clone())
            .unwrap_or_default();
        self.sort.sort(&mut students);

        ViewSnapshot {
            students,
            courses: self.courses.clone(),
            filter: self.filter.clone(),
            sort: self.sort,
            status: self.status.clone(),
        }
    }

    /// Ready data that was fetched for the active filter can be re-sorted
    /// without another service call.
    fn can_resort_locally(&self) -> bool {
        self.status == ViewStatus::Ready
            && self
                .fetched
                .as_ref()
                .is_some_and(|f| f.filter == self.filter)
    }
}

// ============================================================================
// View Cache
// ============================================================================

pub struct ViewCache<S> {
    api: S,
    // Never held across an await
    state: Mutex<ViewState>,
    tx: watch::Sender<ViewSnapshot>,
}

impl<S: StudentApi> ViewCache<S> {
    /// Create an idle view sorted by name, ascending. Nothing is fetched
    /// until `refresh` or a filter/sort change.
    pub fn new(api: S) -> Self {
        Self::with_sort(api, SortSpec::default())
    }

    pub fn with_sort(api: S, sort: SortSpec) -> Self {
        let state = ViewState {
            sort,
            ..Default::default()
        };
        let (tx, _rx) = watch::channel(state.snapshot());
        Self {
            api,
            state: Mutex::new(state),
            tx,
        }
    }

    pub fn api(&self) -> &S {
        &self.api
    }

    fn lock_state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Publish while the state lock is held so snapshots go out in the order
    /// the state changed.
    fn publish(&self, state: &ViewState) {
        self.tx.send_replace(state.snapshot());
    }

    // =========================================================================
    // Reactive Surface
    // =========================================================================

    pub fn snapshot(&self) -> ViewSnapshot {
        self.tx.borrow().clone()
    }

    /// Receiver that is notified on every published change.
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.tx.subscribe()
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Refetch the student list and the course index.
    pub async fn refresh(&self) {
        tokio::join!(self.fetch_students(), self.fetch_courses());
    }

    async fn fetch_students(&self) {
        let (epoch, filter) = {
            let mut state = self.lock_state();
            state.list_epoch += 1;
            state.status = ViewStatus::Fetching;
            self.publish(&state);
            (state.list_epoch, state.filter.clone())
        };
        debug!(epoch, ?filter, "Fetching students");

        let result = self.api.list(&filter).await;

        let mut state = self.lock_state();
        if epoch != state.list_epoch {
            debug!(epoch, latest = state.list_epoch, "Discarding stale student list");
            return;
        }
        match result {
            Ok(students) => {
                debug!(epoch, count = students.len(), "Student list ready");
                state.fetched = Some(Fetched { filter, students });
                state.status = ViewStatus::Ready;
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch students");
                state.fetched = None;
                state.status = ViewStatus::Failed(e.to_string());
            }
        }
        self.publish(&state);
    }

    async fn fetch_courses(&self) {
        let epoch = {
            let mut state = self.lock_state();
            state.course_epoch += 1;
            state.course_epoch
        };

        let result = self.api.list_courses().await;

        let mut state = self.lock_state();
        if epoch != state.course_epoch {
            debug!(epoch, latest = state.course_epoch, "Discarding stale course index");
            return;
        }
        match result {
            Ok(courses) => {
                state.courses = courses;
                self.publish(&state);
            }
            Err(e) => {
                // Keep the previous index; the list status carries the failure
                warn!(error = %e, "Failed to fetch courses");
            }
        }
    }

    // =========================================================================
    // Filter and Sort
    // =========================================================================

    /// Set one filter field (empty clears it) and refetch.
    pub async fn apply_filter(&self, field: FilterField, value: impl Into<String>) {
        {
            let mut state = self.lock_state();
            state.filter.set(field, value);
        }
        self.fetch_students().await;
    }

    /// Replace the whole filter and refetch.
    pub async fn set_filter(&self, filter: StudentFilter) {
        {
            let mut state = self.lock_state();
            state.filter = filter;
        }
        self.fetch_students().await;
    }

    /// Sort by `column`. Without an explicit direction, re-requesting the
    /// active column flips direction and a new column starts ascending.
    pub async fn request_sort(&self, column: SortColumn, direction: Option<SortDirection>) {
        let resorted = {
            let mut state = self.lock_state();
            state.sort = state.sort.request(column, direction);
            let local = state.can_resort_locally();
            if local {
                debug!(sort = ?state.sort, "Re-sorting fetched students");
                self.publish(&state);
            }
            local
        };

        if !resorted {
            self.fetch_students().await;
        }
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Fetch one student. Published state is not touched.
    pub async fn get_by_id(&self, id: &str) -> Result<Student, ServiceError> {
        self.api.get_by_id(id).await
    }

    /// Create a student; on success the view is refetched before returning.
    pub async fn create(&self, input: NewStudent) -> Result<Student, ServiceError> {
        let created = self.api.create(input).await.map_err(|e| {
            warn!(error = %e, "Failed to create student");
            e
        })?;
        self.refresh().await;
        Ok(created)
    }

    pub async fn update(&self, id: &str, patch: StudentPatch) -> Result<Student, ServiceError> {
        let updated = self.api.update(id, patch).await.map_err(|e| {
            warn!(id, error = %e, "Failed to update student");
            e
        })?;
        self.refresh().await;
        Ok(updated)
    }

    pub async fn remove(&self, id: &str) -> Result<(), ServiceError> {
        self.api.delete(id).await.map_err(|e| {
            warn!(id, error = %e, "Failed to delete student");
            e
        })?;
        self.refresh().await;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
