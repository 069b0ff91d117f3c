//! Error types for schedule operations.
//!
//! Validation and authentication failures are detected before any state is
//! touched. Remote failures during an optimistic mutation are not errors at
//! this level: they surface as [`SyncOutcome::RolledBack`].

/// Input rejected before any mutation is attempted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a project first")]
    NoProjectSelected,
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Role cannot be empty")]
    EmptyRole,
    #[error("Color cannot be empty")]
    EmptyColor,
    #[error("Email cannot be empty")]
    EmptyEmail,
    #[error("Password cannot be empty")]
    EmptyPassword,
    #[error("Start date must not be after end date")]
    InvalidDateRange,
    #[error("Invalid percentage: {0}. Must be 50 or 100")]
    InvalidPercentage(u8),
}

/// Failure of a schedule operation
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Not signed in")]
    NotAuthenticated,
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Remote store error: {0}")]
    Remote(#[source] anyhow::Error),
    #[error("Identity provider error: {0}")]
    Identity(#[source] anyhow::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Result of an optimistic mutation that made it past validation
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome<T> {
    /// Applied locally and persisted remotely
    Committed(T),
    /// The remote write failed and the local change was undone
    RolledBack { reason: String },
}

impl<T> SyncOutcome<T> {
    pub fn is_committed(&self) -> bool {
        matches!(self, SyncOutcome::Committed(_))
    }

    pub fn committed(self) -> Option<T> {
        match self {
            SyncOutcome::Committed(value) => Some(value),
            SyncOutcome::RolledBack { .. } => None,
        }
    }
}
