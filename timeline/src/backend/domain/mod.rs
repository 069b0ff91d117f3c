//! # Domain Module
//!
//! Scheduling logic for the team allocation timeline, independent of any UI
//! toolkit or storage backend.
//!
//! ## Module Organization
//!
//! - **models**: team members, projects, allocations and their patches
//! - **holiday_calendar**: holiday and weekend classification for shading
//! - **date_window**: the forward-growing window of visible days
//! - **timeline_header**: month, week and day header bands
//! - **allocation_index**: drag-aware (member, day) lookup
//! - **drag**: the drag/resize state machine and preview computation
//! - **schedule_store**: committed state with optimistic remote sync
//! - **auth_service**: sign-in, sign-out and password reset
//!
//! ## Business Rules
//!
//! - An allocation's start date never comes after its end date
//! - Percentage is either 50 or 100
//! - Overlapping allocations are allowed; lookup returns the first in storage order
//! - Deleting a member or project leaves its allocations in place

pub mod allocation_index;
pub mod auth_service;
pub mod commands;
pub mod date_window;
pub mod drag;
pub mod error;
pub mod holiday_calendar;
pub mod models;
pub mod schedule_store;
pub mod timeline_header;

pub use allocation_index::AllocationIndex;
pub use auth_service::AuthService;
pub use date_window::{DateWindow, ScrollMetrics};
pub use drag::{CellGeometry, DragKind, DragSession, DragState, PendingCommit, PointerPosition};
pub use error::{ScheduleError, ScheduleResult, SyncOutcome, ValidationError};
pub use holiday_calendar::DayKind;
pub use schedule_store::{CommittedState, ScheduleStore};
