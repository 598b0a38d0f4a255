//! Кэш разрешенных экземпляров
//!
//! Резолверу нужны только `has`/`get`/`set`, `len` опционален и идет
//! в статистику. Eviction и TTL - забота конкретной реализации, core
//! никогда не инвалидирует записи.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::Instance;

/// Минимальный key-value контракт кэша
pub trait Cache: Send + Sync {
    fn has(&self, key: &str) -> bool;

    fn get(&self, key: &str) -> Option<Instance>;

    fn set(&self, key: &str, instance: Instance);

    /// Число записей для статистики; 0, если реализация его не знает
    fn len(&self) -> usize {
        0
    }
}

/// In-memory кэш на `parking_lot::RwLock`
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Instance>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Очистить все записи. Резолвер сам этот метод не вызывает.
    pub fn clear(&self) {
        self.entries.write().clear();
        debug!("Cleared all cache entries");
    }
}

impl Cache for MemoryCache {
    fn has(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Instance> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, instance: Instance) {
        self.entries.write().insert(key.to_string(), instance);
        debug!("Stored instance in cache: {}", key);
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("keys", &self.keys())
            .finish()
    }
}
