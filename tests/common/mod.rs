#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use weighted_shortener::application::services::AllocationService;
use weighted_shortener::domain::entities::{Record, Target};
use weighted_shortener::domain::repositories::{RecordStore, StoreError, StoreResult};
use weighted_shortener::infrastructure::cache::NullCache;
use weighted_shortener::infrastructure::persistence::MemoryRecordStore;
use weighted_shortener::routes::router;
use weighted_shortener::state::AppState;
use weighted_shortener::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

/// Generator that hands out fixed codes in order, repeating the last one.
pub struct SequenceGenerator {
    codes: Mutex<VecDeque<String>>,
    last: Mutex<String>,
    calls: Mutex<usize>,
}

impl SequenceGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            last: Mutex::new(codes.last().map(|c| c.to_string()).unwrap_or_default()),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl CodeGenerator for SequenceGenerator {
    fn generate(&self) -> String {
        *self.calls.lock().unwrap() += 1;
        match self.codes.lock().unwrap().pop_front() {
            Some(code) => code,
            None => self.last.lock().unwrap().clone(),
        }
    }
}

/// Store whose every operation fails as if the database were down.
pub struct UnavailableStore;

#[async_trait]
impl RecordStore for UnavailableStore {
    async fn insert_if_absent(&self, _record: &Record) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn get(&self, _short_code: &str) -> StoreResult<Option<Record>> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

pub fn create_test_state(
    store: Arc<dyn RecordStore>,
    generator: Arc<dyn CodeGenerator>,
) -> AppState {
    let allocation_service = AllocationService::new(store.clone(), generator);
    AppState::new(store, Arc::new(NullCache::new()), allocation_service)
}

/// State over a fresh in-memory store with the random generator.
pub fn memory_state() -> (AppState, Arc<MemoryRecordStore>) {
    let store = Arc::new(MemoryRecordStore::new());
    let state = create_test_state(store.clone(), Arc::new(RandomCodeGenerator::default()));
    (state, store)
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

pub async fn insert_record(store: &dyn RecordStore, short_code: &str, targets: Vec<Target>) {
    store
        .insert_if_absent(&Record::new(short_code, targets))
        .await
        .unwrap();
}
