use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;

/**
An in-memory stand-in for a key-value datastore, initialized by the
testbed's `"init_store_stub"` initializer.

Records are json values keyed by string. This is a test stub: no
persistence, no queries, no transactional semantics.
*/
#[derive(Debug, Default)]
pub struct StoreStub {
    records: DashMap<String, Value>,
}

impl StoreStub {
    /// Stores `value` under `key`, replacing any existing record.
    pub fn put(&self, key: impl Into<String>, value: impl Serialize) {
        let value = serde_json::to_value(value).expect("could not serialize store record");
        self.records.insert(key.into(), value);
    }

    /// The record stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.records.get(key).map(|record| record.value().clone())
    }

    /// Removes the record stored under `key`, reporting whether one
    /// existed.
    pub fn delete(&self, key: &str) -> bool {
        self.records.remove(key).is_some()
    }

    /// The number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/**
An in-memory stand-in for a cache service, initialized by the testbed's
`"init_cache_stub"` initializer.

No expiry or eviction; [`CacheStub::flush`] empties it.
*/
#[derive(Debug, Default)]
pub struct CacheStub {
    entries: DashMap<String, Value>,
}

impl CacheStub {
    /// Caches `value` under `key`.
    pub fn set(&self, key: impl Into<String>, value: impl Serialize) {
        let value = serde_json::to_value(value).expect("could not serialize cache entry");
        self.entries.insert(key.into(), value);
    }

    /// The cached value under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Removes the cached value under `key`, reporting whether one
    /// existed.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Empties the cache.
    pub fn flush(&self) {
        self.entries.clear();
    }

    /// The number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
