//! Resolver: реестр definitions, кэш экземпляров и диспетчеризация
//!
//! ```text
//! resolve(key) -> cache hit? -> registry lookup -> implicit ClassDefinition(key)
//!                                    |
//!                          definition.resolve(ctx) -> cache.set(key) -> instance
//! ```

use common::OperationTimer;
use parking_lot::ReentrantMutex;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{Cache, MemoryCache};
use crate::config::ResolverConfig;
use crate::definition::{ClassDefinition, Definition, FactoryDefinition};
use crate::errors::{ResolverError, Result};
use crate::introspection::{type_key, TypeIntrospector};
use crate::stats::{ResolverMetrics, ResolverStats};
use crate::Instance;

pub struct Resolver {
    config: ResolverConfig,
    definitions: HashMap<String, Definition>,
    introspector: Arc<dyn TypeIntrospector>,
    cache: Arc<dyn Cache>,
    metrics: ResolverMetrics,
    resolution_lock: ReentrantMutex<()>,
}

impl Resolver {
    /// Резолвер с in-memory кэшем и конфигурацией по умолчанию
    pub fn new(introspector: Arc<dyn TypeIntrospector>) -> Self {
        Self::builder(introspector).build()
    }

    pub fn with_cache(introspector: Arc<dyn TypeIntrospector>, cache: Arc<dyn Cache>) -> Self {
        Self::builder(introspector).cache(cache).build()
    }

    /// Резолвер с заранее заданным набором definitions
    pub fn from_definitions<I, K, D>(introspector: Arc<dyn TypeIntrospector>, definitions: I) -> Self
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<String>,
        D: Into<Definition>,
    {
        let mut resolver = Self::new(introspector);
        for (key, definition) in definitions {
            resolver.register(key, definition);
        }
        resolver
    }

    pub fn builder(introspector: Arc<dyn TypeIntrospector>) -> ResolverBuilder {
        ResolverBuilder::new(introspector)
    }

    /// Зарегистрировать definition, вернув предыдущий для этого ключа
    pub fn register(
        &mut self,
        key: impl Into<String>,
        definition: impl Into<Definition>,
    ) -> Option<Definition> {
        let key = key.into();
        let definition = definition.into();
        debug!("📝 Resolver '{}': регистрация {} ({})", self.config.name, key, definition.kind());

        let previous = self.definitions.insert(key.clone(), definition);
        if previous.is_some() {
            warn!(
                "⚠️ Resolver '{}': definition для {} уже зарегистрирован, перезапись",
                self.config.name, key
            );
        }
        previous
    }

    pub fn unregister(&mut self, key: &str) -> Option<Definition> {
        self.definitions.remove(key)
    }

    pub fn has_definition(&self, key: &str) -> bool {
        self.definitions.contains_key(key)
    }

    pub fn definition(&self, key: &str) -> Option<&Definition> {
        self.definitions.get(key)
    }

    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Разрешить экземпляр для ключа
    pub fn resolve(&self, key: &str) -> Result<Instance> {
        let _guard = self
            .config
            .serialize_resolution
            .then(|| self.resolution_lock.lock());

        let timer = OperationTimer::new("resolve").with_subject(key);
        let result = ResolutionContext::for_resolve(self).resolve(key);
        timer.finish_with_result(&result);
        result
    }

    /// Разрешить и привести к конкретному типу
    pub fn resolve_as<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
        self.resolve(key)?
            .downcast::<T>()
            .map_err(|_| ResolverError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>().to_string(),
            })
    }

    /// Разрешить Rust тип по его каноническому ключу
    pub fn get<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
        self.resolve_as::<T>(&type_key::<T>())
    }

    /// Вызвать фабрику с автоматически разрешенными параметрами, без кэширования результата
    pub fn call(&self, definition: &FactoryDefinition) -> Result<Instance> {
        let _guard = self
            .config
            .serialize_resolution
            .then(|| self.resolution_lock.lock());

        let timer = OperationTimer::new("call").with_subject(definition.factory().name());
        // call не является top-level resolve: сбои не идут в stats().failures
        let result = definition.resolve(&mut ResolutionContext::for_call(self));
        timer.finish_with_result(&result);
        result
    }

    /// Есть ли способ получить экземпляр для ключа
    pub fn can_resolve(&self, key: &str) -> bool {
        self.cache.has(key) || self.definitions.contains_key(key) || self.introspector.contains(key)
    }

    pub fn stats(&self) -> ResolverStats {
        self.metrics
            .snapshot(&self.config.name, self.definitions.len(), self.cache.len())
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    pub fn introspector(&self) -> &Arc<dyn TypeIntrospector> {
        &self.introspector
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("definitions", &self.keys())
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

/// Состояние одного top-level вызова resolve
///
/// Хранит цепочку ключей, которые сейчас разрешаются, для обнаружения
/// циклов и ограничения глубины.
pub struct ResolutionContext<'r> {
    resolver: &'r Resolver,
    chain: Vec<String>,
    top_level: bool,
}

impl<'r> ResolutionContext<'r> {
    /// Контекст для `Resolver::resolve`: сбои считаются и логируются
    fn for_resolve(resolver: &'r Resolver) -> Self {
        Self {
            resolver,
            chain: Vec::new(),
            top_level: true,
        }
    }

    /// Контекст для `Resolver::call`
    fn for_call(resolver: &'r Resolver) -> Self {
        Self {
            resolver,
            chain: Vec::new(),
            top_level: false,
        }
    }

    pub fn resolve(&mut self, key: &str) -> Result<Instance> {
        let resolver = self.resolver;
        resolver.metrics.record_resolution();

        if let Some(instance) = resolver.cache.get(key) {
            resolver.metrics.record_cache_hit();
            debug!("Cache hit for key: {}", key);
            return Ok(instance);
        }

        if resolver.config.detect_cycles {
            if let Some(start) = self.chain.iter().position(|k| k == key) {
                let mut chain = self.chain[start..].to_vec();
                chain.push(key.to_string());
                return self.fail(ResolverError::CyclicDependency { chain });
            }
        }

        // при detect_cycles цепочка конечна, глубину ограничиваем только без него
        if !resolver.config.detect_cycles && self.chain.len() >= resolver.config.max_depth {
            return self.fail(ResolverError::DepthLimitExceeded {
                key: key.to_string(),
                depth: resolver.config.max_depth,
            });
        }

        let implicit;
        let definition = match resolver.definitions.get(key) {
            Some(definition) => {
                debug!("Cache miss for key: {} ({} definition)", key, definition.kind());
                definition
            }
            None => {
                resolver.metrics.record_implicit_definition();
                debug!("Cache miss for key: {} (implicit class definition)", key);
                implicit = Definition::Class(ClassDefinition::define(key));
                &implicit
            }
        };

        self.chain.push(key.to_string());
        let result = definition.resolve(self);
        self.chain.pop();

        match result {
            Ok(instance) => {
                resolver.cache.set(key, Arc::clone(&instance));
                Ok(instance)
            }
            Err(err) => self.fail(err),
        }
    }

    /// Ключ definition, который сейчас разрешается
    pub fn current_key(&self) -> Option<&str> {
        self.chain.last().map(String::as_str)
    }

    /// Цепочка ключей от top-level запроса до текущего
    pub fn chain(&self) -> &[String] {
        &self.chain
    }

    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    pub fn can_resolve(&self, key: &str) -> bool {
        self.resolver.can_resolve(key)
    }

    pub fn introspector(&self) -> &dyn TypeIntrospector {
        self.resolver.introspector.as_ref()
    }

    pub fn cache(&self) -> &dyn Cache {
        self.resolver.cache.as_ref()
    }

    fn fail(&self, err: ResolverError) -> Result<Instance> {
        // ошибка логируется и считается один раз, на уровне исходного запроса
        if self.top_level && self.chain.is_empty() {
            self.resolver.metrics.record_failure();
            warn!("❌ Resolver '{}': {}", self.resolver.config.name, err);
        } else {
            debug!("Resolution failed at depth {}: {}", self.chain.len(), err);
        }
        Err(err)
    }
}

pub struct ResolverBuilder {
    introspector: Arc<dyn TypeIntrospector>,
    cache: Option<Arc<dyn Cache>>,
    config: ResolverConfig,
    definitions: Vec<(String, Definition)>,
}

impl ResolverBuilder {
    fn new(introspector: Arc<dyn TypeIntrospector>) -> Self {
        Self {
            introspector,
            cache: None,
            config: ResolverConfig::default(),
            definitions: Vec::new(),
        }
    }

    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn definition(mut self, key: impl Into<String>, definition: impl Into<Definition>) -> Self {
        self.definitions.push((key.into(), definition.into()));
        self
    }

    pub fn build(self) -> Resolver {
        let mut resolver = Resolver {
            config: self.config,
            definitions: HashMap::with_capacity(self.definitions.len()),
            introspector: self.introspector,
            cache: self
                .cache
                .unwrap_or_else(|| Arc::new(MemoryCache::new()) as Arc<dyn Cache>),
            metrics: ResolverMetrics::default(),
            resolution_lock: ReentrantMutex::new(()),
        };

        for (key, definition) in self.definitions {
            resolver.register(key, definition);
        }

        info!(
            "🔧 Resolver '{}' создан: {} definitions",
            resolver.config.name,
            resolver.definitions.len()
        );
        resolver
    }
}
