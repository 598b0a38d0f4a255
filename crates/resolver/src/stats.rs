use std::sync::atomic::{AtomicU64, Ordering};

/// Счетчики резолвера
#[derive(Debug, Default)]
pub(crate) struct ResolverMetrics {
    resolutions: AtomicU64,
    cache_hits: AtomicU64,
    failures: AtomicU64,
    implicit_definitions: AtomicU64,
}

impl ResolverMetrics {
    pub(crate) fn record_resolution(&self) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_implicit_definition(&self) {
        self.implicit_definitions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, name: &str, definitions: usize, cached: usize) -> ResolverStats {
        ResolverStats {
            name: name.to_string(),
            definitions,
            cached_instances: cached,
            resolutions: self.resolutions.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            implicit_definitions: self.implicit_definitions.load(Ordering::Relaxed),
        }
    }
}

/// Статистика резолвера для диагностики
///
/// `resolutions` считает каждый вызов разрешения ключа, включая вложенные
/// и попадания в кэш.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverStats {
    pub name: String,
    pub definitions: usize,
    pub cached_instances: usize,
    pub resolutions: u64,
    pub cache_hits: u64,
    pub failures: u64,
    pub implicit_definitions: u64,
}

impl ResolverStats {
    /// Процент попаданий в кэш
    pub fn cache_hit_rate(&self) -> f64 {
        if self.resolutions > 0 {
            (self.cache_hits as f64 / self.resolutions as f64) * 100.0
        } else {
            0.0
        }
    }
}
