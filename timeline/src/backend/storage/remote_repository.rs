//! # Remote Repository
//!
//! Typed access to the remote row store. Each entity knows its table and how
//! to translate itself to and from rows (see [`super::mappers`]); the
//! repository adds user scoping and logging on top of a [`RowStore`].
//!
//! Rows that fail to map are left out of a listing rather than failing it.
//! They are counted in [`Loaded::skipped`] so callers can tell the user that
//! some saved records are hidden.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use shared::Table;
use tracing::{debug, warn};

use super::traits::RowStore;
use crate::backend::domain::models::Entity;

/// An entity persisted in one remote table
pub trait RemoteEntity: Entity {
    const TABLE: Table;

    /// Full row including the owner id
    fn to_row(&self, user_id: &str) -> Result<Value>;

    fn from_row(row: Value) -> Result<Self>;

    /// Remote fields present in `patch`, nothing else
    fn patch_fields(patch: &Self::Patch) -> Result<Map<String, Value>>;
}

/// Unwrap a serialized update row into its field map
pub(crate) fn into_fields(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(anyhow!("Expected an object for update fields, got {}", other)),
    }
}

/// Entities read from one table
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<E> {
    pub entities: Vec<E>,
    /// Rows that could not be mapped
    pub skipped: usize,
}

pub struct RemoteRepository<S: RowStore> {
    store: Arc<S>,
}

impl<S: RowStore> RemoteRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Every row of `E`'s table owned by `user_id`. Rows that fail to map are
    /// skipped with a warning and counted.
    pub async fn list<E: RemoteEntity>(&self, user_id: &str) -> Result<Loaded<E>> {
        let rows = self.store.select(E::TABLE, user_id).await?;
        let total = rows.len();

        let entities: Vec<E> = rows
            .into_iter()
            .filter_map(|row| match E::from_row(row) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    warn!("Skipping unreadable {} row: {}", E::TABLE, e);
                    None
                }
            })
            .collect();

        debug!("Loaded {}/{} rows from {}", entities.len(), total, E::TABLE);
        Ok(Loaded {
            skipped: total - entities.len(),
            entities,
        })
    }

    pub async fn insert<E: RemoteEntity>(&self, user_id: &str, entity: &E) -> Result<()> {
        let row = entity.to_row(user_id)?;
        self.store.insert(E::TABLE, row).await?;
        debug!("Inserted {} {} into {}", E::KIND, entity.id(), E::TABLE);
        Ok(())
    }

    /// Sends only the fields present in `patch`
    pub async fn update<E: RemoteEntity>(&self, user_id: &str, id: &str, patch: &E::Patch) -> Result<()> {
        let fields = E::patch_fields(patch)?;
        if fields.is_empty() {
            debug!("Empty {} patch for {}, skipping remote update", E::KIND, id);
            return Ok(());
        }
        self.store.update(E::TABLE, user_id, id, fields).await?;
        debug!("Updated {} {} in {}", E::KIND, id, E::TABLE);
        Ok(())
    }

    pub async fn delete<E: RemoteEntity>(&self, user_id: &str, id: &str) -> Result<()> {
        self.store.delete(E::TABLE, user_id, id).await?;
        debug!("Deleted {} {} from {}", E::KIND, id, E::TABLE);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::backend::domain::models::{Allocation, Percentage, Project, ProjectPatch};
    use crate::backend::storage::InMemoryRowStore;

    fn setup_test_repository() -> (RemoteRepository<InMemoryRowStore>, Arc<InMemoryRowStore>) {
        let store = Arc::new(InMemoryRowStore::new());
        (RemoteRepository::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_list_skips_unreadable_rows() {
        let (repository, store) = setup_test_repository();
        store
            .seed(
                Table::Allocations,
                vec![
                    json!({"id": "a1", "user_id": "u1", "team_member_id": "m1", "project_id": "p1",
                           "start_date": "2024-03-10", "end_date": "2024-03-20", "percentage": 75}),
                    json!({"id": "a2", "user_id": "u1", "team_member_id": "m1", "project_id": "p1",
                           "start_date": "2024-03-12", "end_date": "2024-03-14", "percentage": 50}),
                ],
            )
            .unwrap();

        let loaded = repository.list::<Allocation>("u1").await.unwrap();
        assert_eq!(loaded.skipped, 1);
        assert_eq!(loaded.entities.len(), 1);
        assert_eq!(loaded.entities[0].id, "a2");
        assert_eq!(loaded.entities[0].percentage, Percentage::Half);
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_user() {
        let (repository, store) = setup_test_repository();
        store
            .seed(
                Table::Projects,
                vec![
                    json!({"id": "p1", "user_id": "u1", "name": "Apollo", "color": "#ef4444"}),
                    json!({"id": "p2", "user_id": "u2", "name": "Gemini", "color": "#3b82f6"}),
                ],
            )
            .unwrap();

        let loaded = repository.list::<Project>("u1").await.unwrap();
        assert_eq!(loaded.skipped, 0);
        assert_eq!(loaded.entities.len(), 1);
        assert_eq!(loaded.entities[0].name, "Apollo");
    }

    #[tokio::test]
    async fn test_empty_patch_makes_no_remote_call() {
        let (repository, store) = setup_test_repository();
        store
            .seed(
                Table::Projects,
                vec![json!({"id": "p1", "user_id": "u1", "name": "Apollo", "color": "#ef4444"})],
            )
            .unwrap();
        store.fail_next_writes(1);

        repository
            .update::<Project>("u1", "p1", &ProjectPatch::default())
            .await
            .unwrap();
        assert_eq!(store.write_count(), 0);

        // The armed failure is still pending for the next real write
        let patch = ProjectPatch {
            color: Some("#000000".to_string()),
            ..Default::default()
        };
        assert!(repository.update::<Project>("u1", "p1", &patch).await.is_err());
    }
}
