// ABOUTME: Read-through cache for rendered pages
// ABOUTME: No-op default plus a short-lived in-memory map

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub trait PageCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

/// Cache that never stores anything
#[derive(Debug, Default, Clone)]
pub struct NoopCache;

impl PageCache for NoopCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: String) {}
}

/// In-memory cache whose entries expire `ttl` after they are set
pub struct MemoryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, String)>>,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl PageCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some((stored_at, value)) if stored_at.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, value: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), (Instant::now(), value));
        }
    }
}

/// Pick a cache for the configured TTL; zero disables caching
pub fn cache_for_ttl(ttl: Duration) -> Arc<dyn PageCache> {
    if ttl.is_zero() {
        Arc::new(NoopCache)
    } else {
        Arc::new(MemoryCache::new(ttl))
    }
}
