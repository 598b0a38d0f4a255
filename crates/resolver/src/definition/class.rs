use std::any::Any;
use std::sync::Arc;
use tracing::debug;

use super::collect_arguments;
use crate::arguments::{ArgumentOverlay, Arguments};
use crate::errors::{ResolverError, Result};
use crate::introspection::type_key;
use crate::resolver::ResolutionContext;
use crate::Instance;

/// Создание экземпляра типа по его сигнатуре конструктора
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    type_name: String,
    overlay: ArgumentOverlay,
}

impl ClassDefinition {
    pub fn define(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            overlay: ArgumentOverlay::new(),
        }
    }

    /// Definition для Rust типа `T` (ключ `type_key::<T>()`)
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::define(type_key::<T>())
    }

    /// Зафиксировать значение параметра конструктора
    pub fn with_argument<V: Any + Send + Sync>(self, name: impl Into<String>, value: V) -> Self {
        self.with_instance(name, Arc::new(value))
    }

    /// Зафиксировать параметр уже разделяемым экземпляром
    pub fn with_instance(mut self, name: impl Into<String>, value: Instance) -> Self {
        self.overlay = self.overlay.with(name, value);
        self
    }

    pub fn with_arguments<I, K>(self, arguments: I) -> Self
    where
        I: IntoIterator<Item = (K, Instance)>,
        K: Into<String>,
    {
        arguments
            .into_iter()
            .fold(self, |definition, (name, value)| definition.with_instance(name, value))
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn overlay(&self) -> &ArgumentOverlay {
        &self.overlay
    }

    pub fn resolve(&self, ctx: &mut ResolutionContext<'_>) -> Result<Instance> {
        let info = ctx
            .introspector()
            .describe(&self.type_name)
            .ok_or_else(|| ResolverError::UnknownType {
                type_name: self.type_name.clone(),
            })?;

        let args = match info.signature() {
            None => {
                debug!("{}: конструктора нет, создание по умолчанию", self.type_name);
                Arguments::empty()
            }
            Some(signature) => {
                collect_arguments(&self.type_name, signature.parameters(), &self.overlay, ctx)?
            }
        };

        info.instantiate(&args).map_err(|err| {
            ResolverError::from_callable(err, |source| ResolverError::ConstructionFailed {
                type_name: self.type_name.clone(),
                source,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_argument_keeps_original_untouched() {
        let base = ClassDefinition::define("app::Database");
        let pinned = base.clone().with_argument("dsn", "sqlite::memory:".to_string());

        assert!(base.overlay().is_empty());
        assert!(pinned.overlay().contains("dsn"));
        assert_eq!(pinned.type_name(), "app::Database");
    }

    #[test]
    fn test_with_arguments_bulk() {
        let definition = ClassDefinition::define("app::Pool").with_arguments([
            ("min", Arc::new(1usize) as Instance),
            ("max", Arc::new(16usize) as Instance),
        ]);

        assert_eq!(definition.overlay().len(), 2);
    }

    #[test]
    fn test_of_uses_type_key() {
        struct Marker;
        assert_eq!(ClassDefinition::of::<Marker>().type_name(), type_key::<Marker>());
    }
}
