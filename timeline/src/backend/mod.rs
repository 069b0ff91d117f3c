//! # Backend Module
//!
//! All non-UI logic of the timeline.
//!
//! ## Architecture
//!
//! ```text
//! UI Layer (TimelineApp, grid view-model)
//!     ↓
//! Domain Layer (drag state machine, lookup index, schedule store)
//!     ↓
//! Storage Layer (RowStore, IdentityProvider, mappers)
//! ```
//!
//! The domain never talks to a concrete store; both collaborators are
//! injected, which lets tests run against the in-memory implementations.

pub mod config;
pub mod domain;
pub mod storage;

use std::sync::Arc;

use tracing::info;

use crate::backend::config::TimelineConfig;
use crate::backend::domain::{AuthService, ScheduleStore};
use crate::backend::storage::{IdentityProvider, RowStore};

/// Services shared by the UI layer
pub struct Backend<S: RowStore, I: IdentityProvider> {
    pub schedule: Arc<ScheduleStore<S, I>>,
    pub auth: AuthService<S, I>,
}

/// Wire the schedule store and auth service to their collaborators
pub fn initialize_backend<S: RowStore, I: IdentityProvider>(
    config: TimelineConfig,
    store: Arc<S>,
    identity: Arc<I>,
) -> Backend<S, I> {
    info!("Setting up schedule store");
    let schedule = Arc::new(ScheduleStore::new(config, store, identity.clone()));

    info!("Setting up auth service");
    let auth = AuthService::new(identity, schedule.clone());

    Backend { schedule, auth }
}
