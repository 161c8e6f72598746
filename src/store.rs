//! Key/value capability injected into the pipeline.
//!
//! The pipeline only needs `get`, `put` with an optional TTL and `delete`;
//! `put_if_absent` has a non-atomic default built from those. Anything
//! that can offer them (Redis, a database table, a process-local map)
//! plugs in behind [`KeyValueStore`]. [`InMemoryStore`] ships for tests
//! and single-process embedding.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Insert or replace. `None` means the entry never expires.
    fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Record `value` only if `key` holds no live entry. Returns the value
    /// already present, or `None` when this call inserted.
    ///
    /// The default is a plain `get` then `put` and is not atomic: two
    /// callers can both see the key missing. Backends with a native
    /// set-if-absent (Redis `SET NX`, an insert with a unique constraint)
    /// should override it.
    fn put_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<Option<String>, StoreError> {
        if let Some(existing) = self.get(key)? {
            return Ok(Some(existing));
        }
        self.put(key, value, ttl)?;
        Ok(None)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// `RwLock<HashMap>` store. Expired entries are dropped lazily on access.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, Entry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live entry count. Sweeps expired entries first.
    pub fn len(&self) -> Result<usize, StoreError> {
        let now = Instant::now();
        let mut guard = self
            .records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        guard.retain(|_, entry| entry.is_live(now));
        Ok(guard.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        {
            let guard = self
                .records
                .read()
                .map_err(|_| StoreError::backend("poisoned lock"))?;
            match guard.get(key) {
                None => return Ok(None),
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }
        // Expired: remove unless a writer refreshed it in the meantime.
        let mut guard = self
            .records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        if guard.get(key).is_some_and(|entry| !entry.is_live(now)) {
            guard.remove(key);
        }
        Ok(None)
    }

    fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        let expires_at = ttl.and_then(|ttl| Instant::now().checked_add(ttl));
        self.records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?
            .insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    expires_at,
                },
            );
        Ok(())
    }

    /// Check and insert under one write lock.
    fn put_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        let mut guard = self
            .records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        if let Some(entry) = guard.get(key).filter(|entry| entry.is_live(now)) {
            return Ok(Some(entry.value.clone()));
        }
        guard.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: ttl.and_then(|ttl| now.checked_add(ttl)),
            },
        );
        Ok(None)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?
            .remove(key);
        Ok(())
    }
}
