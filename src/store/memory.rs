//! In-memory record store.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::ClusterRecord;
use crate::store::{RecordStore, StoreError, StoreResult};

/// A thread-safe record store backed by a `DashMap`.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, ClusterRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create(&self, record: &ClusterRecord) -> StoreResult<()> {
        match self.inner.entry(record.id().to_string()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(record.id().to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &str) -> StoreResult<ClusterRecord> {
        self.inner
            .get(id)
            .map(|r| r.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list(&self) -> StoreResult<Vec<ClusterRecord>> {
        let mut records: Vec<ClusterRecord> =
            self.inner.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(records)
    }

    async fn update(&self, record: &ClusterRecord) -> StoreResult<()> {
        match self.inner.get_mut(record.id()) {
            Some(mut existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(record.id().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, ClusterStatus};
    use chrono::Utc;
    use serde_json::Value;

    fn record(id: &str) -> ClusterRecord {
        ClusterRecord::new(
            id,
            "c1",
            Address::parse_all(&["10.0.0.1:6789"]).unwrap(),
            "k",
            ClusterStatus::Unknown,
            Utc::now(),
            Value::Null,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_get_update_list() {
        let store = MemoryStore::new();
        assert!(store.list().await.unwrap().is_empty());

        store.create(&record("b")).await.unwrap();
        store.create(&record("a")).await.unwrap();

        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);

        let updated = record("a")
            .set_status(ClusterStatus::Ok, Value::Null, Utc::now())
            .unwrap()
            .into_owned();
        store.update(&updated).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().status(), ClusterStatus::Ok);
    }

    #[tokio::test]
    async fn conflicts_are_reported() {
        let store = MemoryStore::new();
        store.create(&record("a")).await.unwrap();

        assert!(matches!(
            store.create(&record("a")).await,
            Err(StoreError::AlreadyExists(id)) if id == "a"
        ));
        assert!(matches!(store.get("zz").await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update(&record("zz")).await,
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(store.len(), 1);
    }
}
