//! # Storage Traits
//!
//! Seams between the schedule store and the outside world: the remote row
//! store that persists entities per user, and the identity provider that
//! says who that user is. Both are injected so tests can substitute fakes.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use shared::Table;

/// Remote table store keyed by owner identity
///
/// Rows are JSON objects using the remote (separate-word) field names. Every
/// operation is filtered by `user_id`; update and delete are additionally
/// filtered by record id.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// All rows of `table` owned by `user_id`, in storage order
    async fn select(&self, table: Table, user_id: &str) -> Result<Vec<Value>>;

    /// Insert one row; the row carries its own `id` and `user_id`
    async fn insert(&self, table: Table, row: Value) -> Result<()>;

    /// Overwrite only the given fields of one row
    async fn update(&self, table: Table, user_id: &str, id: &str, fields: Map<String, Value>) -> Result<()>;

    async fn delete(&self, table: Table, user_id: &str, id: &str) -> Result<()>;
}

/// Source of the authenticated user
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Id of the signed-in user, if any. Never touches the network.
    fn current_user(&self) -> Option<String>;

    /// Returns the signed-in user id
    async fn sign_in(&self, email: &str, password: &str) -> Result<String>;

    async fn sign_out(&self) -> Result<()>;

    async fn request_password_reset(&self, email: &str) -> Result<()>;
}
