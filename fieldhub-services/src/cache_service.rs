use anyhow::{bail, Result};
use async_trait::async_trait;
use fieldhub::Service;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

pub const CACHE_SERVICE_ID: &str = "cache";

pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, Value>,
    /// Insertion order, oldest first.
    order: VecDeque<String>,
}

/// Bounded in-memory key/value cache. Oldest entries are evicted first.
pub struct CacheService {
    capacity: usize,
    active: AtomicBool,
    state: Mutex<CacheState>,
}

impl CacheService {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            active: AtomicBool::new(false),
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn put(&self, key: impl Into<String>, value: Value) -> Result<()> {
        if !self.active.load(Ordering::SeqCst) {
            bail!("cache is not running");
        }
        let key = key.into();
        let mut state = self.state.lock();
        if state.entries.insert(key.clone(), value).is_none() {
            state.order.push_back(key);
        }
        while state.entries.len() > self.capacity {
            let Some(oldest) = state.order.pop_front() else {
                break;
            };
            state.entries.remove(&oldest);
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.lock().entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CacheService {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[async_trait]
impl Service for CacheService {
    fn id(&self) -> &str {
        CACHE_SERVICE_ID
    }

    fn display_name(&self) -> &str {
        "Cache"
    }

    async fn start(&self) -> Result<()> {
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.active.store(false, Ordering::SeqCst);
        let mut state = self.state.lock();
        state.entries.clear();
        state.order.clear();
        Ok(())
    }
}
