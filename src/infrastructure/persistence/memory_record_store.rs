//! In-process record store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;

use crate::domain::entities::Record;
use crate::domain::repositories::{RecordStore, StoreError, StoreResult};

/// Record store backed by a `HashMap` behind a `RwLock`.
///
/// The conditional insert happens under the write lock, which gives the same
/// at-most-one-writer guarantee as the database's conditional put. Records
/// live for the lifetime of the process.
///
/// # Use Cases
///
/// - Local development without PostgreSQL (`STORE_BACKEND=memory`)
/// - Integration tests
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<String, Record>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert_if_absent(&self, record: &Record) -> StoreResult<()> {
        let mut records = self.records.write().await;

        match records.entry(record.short_code.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(record.short_code.clone())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, short_code: &str) -> StoreResult<Option<Record>> {
        Ok(self.records.read().await.get(short_code).cloned())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Target;
    use std::sync::Arc;

    fn record(code: &str, url: &str) -> Record {
        Record::new(code, vec![Target::new(url, 1u64)])
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = MemoryRecordStore::new();
        store
            .insert_if_absent(&record("abc12", "https://example.com"))
            .await
            .unwrap();

        let found = store.get("abc12").await.unwrap().unwrap();
        assert_eq!(found.targets[0].url, "https://example.com");
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = MemoryRecordStore::new();
        assert!(store.get("nope1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_insert_is_rejected_and_first_kept() {
        let store = MemoryRecordStore::new();
        store
            .insert_if_absent(&record("abc12", "https://first.com"))
            .await
            .unwrap();

        let result = store
            .insert_if_absent(&record("abc12", "https://second.com"))
            .await;

        assert!(matches!(result, Err(StoreError::AlreadyExists(code)) if code == "abc12"));
        let kept = store.get("abc12").await.unwrap().unwrap();
        assert_eq!(kept.targets[0].url, "https://first.com");
    }

    #[tokio::test]
    async fn test_concurrent_inserts_have_one_winner() {
        let store = Arc::new(MemoryRecordStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert_if_absent(&record("race1", &format!("https://{i}.com")))
                        .await
                        .is_ok()
                })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(store.len().await, 1);
    }
}
