//! # Storage Layer
//!
//! Remote persistence for the schedule. The schedule store only sees the
//! [`RowStore`] and [`IdentityProvider`] traits; [`RemoteRepository`] adds
//! typed, user-scoped access with field-name translation from [`mappers`].

pub mod mappers;
pub mod memory;
pub mod remote_repository;
pub mod traits;

pub use memory::{InMemoryRowStore, StaticIdentity};
pub use remote_repository::{Loaded, RemoteEntity, RemoteRepository};
pub use traits::{IdentityProvider, RowStore};
