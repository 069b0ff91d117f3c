//! # In-Memory Storage
//!
//! Process-local [`RowStore`] and [`IdentityProvider`] implementations. Used
//! by the demo binary and by tests, which can make the next writes or all
//! reads fail to exercise rollback paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use shared::Table;
use tracing::{debug, info};

use super::traits::{IdentityProvider, RowStore};

fn field<'a>(row: &'a Value, name: &str) -> Option<&'a str> {
    row.get(name).and_then(Value::as_str)
}

fn matches(row: &Value, user_id: &str, id: &str) -> bool {
    field(row, "user_id") == Some(user_id) && field(row, "id") == Some(id)
}

#[derive(Debug, Default)]
pub struct InMemoryRowStore {
    tables: Mutex<HashMap<Table, Vec<Value>>>,
    failing_writes: AtomicUsize,
    failing_reads: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, HashMap<Table, Vec<Value>>>> {
        self.tables
            .lock()
            .map_err(|_| anyhow!("In-memory store lock poisoned"))
    }

    /// Make the next `count` inserts, updates or deletes fail
    pub fn fail_next_writes(&self, count: usize) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, failing: bool) {
        self.failing_reads.store(failing, Ordering::SeqCst);
    }

    /// Writes that reached the store, failed ones included
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Snapshot of a table regardless of owner
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.tables()
            .map(|tables| tables.get(&table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Insert rows directly, bypassing failure injection
    pub fn seed(&self, table: Table, rows: Vec<Value>) -> Result<()> {
        self.tables()?.entry(table).or_default().extend(rows);
        Ok(())
    }

    fn begin_write(&self) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let injected = self
            .failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            bail!("Simulated remote write failure");
        }
        Ok(())
    }
}

#[async_trait]
impl RowStore for InMemoryRowStore {
    async fn select(&self, table: Table, user_id: &str) -> Result<Vec<Value>> {
        if self.failing_reads.load(Ordering::SeqCst) {
            bail!("Simulated remote read failure");
        }
        let tables = self.tables()?;
        Ok(tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| field(row, "user_id") == Some(user_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, table: Table, row: Value) -> Result<()> {
        self.begin_write()?;
        let id = field(&row, "id")
            .ok_or_else(|| anyhow!("Row for {} has no id", table))?
            .to_string();

        let mut tables = self.tables()?;
        let rows = tables.entry(table).or_default();
        if rows.iter().any(|existing| field(existing, "id") == Some(id.as_str())) {
            bail!("Duplicate id {} in {}", id, table);
        }
        rows.push(row);
        debug!("Stored row {} in {}", id, table);
        Ok(())
    }

    async fn update(&self, table: Table, user_id: &str, id: &str, fields: Map<String, Value>) -> Result<()> {
        self.begin_write()?;
        let mut tables = self.tables()?;
        let row = tables
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|row| matches(row, user_id, id)))
            .ok_or_else(|| anyhow!("No row {} in {}", id, table))?;

        if let Value::Object(existing) = row {
            existing.extend(fields);
        }
        Ok(())
    }

    async fn delete(&self, table: Table, user_id: &str, id: &str) -> Result<()> {
        self.begin_write()?;
        let mut tables = self.tables()?;
        if let Some(rows) = tables.get_mut(&table) {
            rows.retain(|row| !matches(row, user_id, id));
        }
        Ok(())
    }
}

/// Identity provider with a fixed account list
#[derive(Debug, Default)]
pub struct StaticIdentity {
    current: Mutex<Option<String>>,
    /// email -> (password, user id)
    accounts: HashMap<String, (String, String)>,
    reset_requests: Mutex<Vec<String>>,
}

impl StaticIdentity {
    pub fn signed_in(user_id: &str) -> Self {
        Self {
            current: Mutex::new(Some(user_id.to_string())),
            ..Default::default()
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, email: &str, password: &str, user_id: &str) -> Self {
        self.accounts
            .insert(email.to_string(), (password.to_string(), user_id.to_string()));
        self
    }

    /// Emails a reset was requested for, in order
    pub fn reset_requests(&self) -> Vec<String> {
        self.reset_requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn set_current(&self, user_id: Option<String>) -> Result<()> {
        let mut current = self
            .current
            .lock()
            .map_err(|_| anyhow!("Identity lock poisoned"))?;
        *current = user_id;
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<String> {
        self.current.lock().ok().and_then(|current| current.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<String> {
        let user_id = match self.accounts.get(email) {
            Some((expected, user_id)) if expected == password => user_id.clone(),
            _ => bail!("Invalid login credentials"),
        };
        self.set_current(Some(user_id.clone()))?;
        info!("🔑 Signed in as {}", user_id);
        Ok(user_id)
    }

    async fn sign_out(&self) -> Result<()> {
        self.set_current(None)?;
        info!("🔑 Signed out");
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> Result<()> {
        self.reset_requests
            .lock()
            .map_err(|_| anyhow!("Identity lock poisoned"))?
            .push(email.to_string());
        info!("Password reset requested for {}", email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_rows_are_scoped_by_user() {
        let store = InMemoryRowStore::new();
        store
            .insert(Table::Projects, json!({"id": "p1", "user_id": "u1", "name": "A", "color": "#fff"}))
            .await
            .unwrap();
        store
            .insert(Table::Projects, json!({"id": "p2", "user_id": "u2", "name": "B", "color": "#000"}))
            .await
            .unwrap();

        let rows = store.select(Table::Projects, "u1").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "p1");

        // Another user's id does not match
        store.delete(Table::Projects, "u1", "p2").await.unwrap();
        assert_eq!(store.rows(Table::Projects).len(), 2);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = InMemoryRowStore::new();
        store
            .seed(Table::Projects, vec![json!({"id": "p1", "user_id": "u1", "name": "A", "color": "#fff"})])
            .unwrap();

        let mut fields = Map::new();
        fields.insert("name".to_string(), json!("Renamed"));
        store.update(Table::Projects, "u1", "p1", fields).await.unwrap();

        let rows = store.rows(Table::Projects);
        assert_eq!(rows[0]["name"], "Renamed");
        assert_eq!(rows[0]["color"], "#fff");
    }

    #[tokio::test]
    async fn test_fail_next_writes_counts_down() {
        let store = InMemoryRowStore::new();
        store.fail_next_writes(1);

        let row = json!({"id": "p1", "user_id": "u1", "name": "A", "color": "#fff"});
        assert!(store.insert(Table::Projects, row.clone()).await.is_err());
        assert!(store.insert(Table::Projects, row).await.is_ok());
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_insert_fails() {
        let store = InMemoryRowStore::new();
        let row = json!({"id": "p1", "user_id": "u1", "name": "A", "color": "#fff"});
        store.insert(Table::Projects, row.clone()).await.unwrap();
        assert!(store.insert(Table::Projects, row).await.is_err());
    }

    #[tokio::test]
    async fn test_static_identity_sign_in_flow() {
        let identity = StaticIdentity::anonymous().with_account("ana@example.com", "secret", "u1");
        assert!(identity.current_user().is_none());

        assert!(identity.sign_in("ana@example.com", "wrong").await.is_err());
        assert_eq!(identity.sign_in("ana@example.com", "secret").await.unwrap(), "u1");
        assert_eq!(identity.current_user().as_deref(), Some("u1"));

        identity.sign_out().await.unwrap();
        assert!(identity.current_user().is_none());
    }
}
