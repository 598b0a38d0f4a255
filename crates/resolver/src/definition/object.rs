use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::errors::{ResolverError, Result};
use crate::resolver::ResolutionContext;
use crate::Instance;

/// Готовый экземпляр или ключ, на который перенаправляется разрешение
#[derive(Clone)]
pub enum ObjectTarget {
    Value(Instance),
    Alias(String),
}

impl fmt::Debug for ObjectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectTarget::Value(_) => f.write_str("Value(..)"),
            ObjectTarget::Alias(key) => f.debug_tuple("Alias").field(key).finish(),
        }
    }
}

impl From<&str> for ObjectTarget {
    fn from(key: &str) -> Self {
        ObjectTarget::Alias(key.to_string())
    }
}

impl From<String> for ObjectTarget {
    fn from(key: String) -> Self {
        ObjectTarget::Alias(key)
    }
}

impl From<Instance> for ObjectTarget {
    fn from(instance: Instance) -> Self {
        ObjectTarget::Value(instance)
    }
}

/// Фиксированный экземпляр или alias на другой ключ
#[derive(Debug, Clone)]
pub struct ObjectDefinition {
    target: ObjectTarget,
}

impl ObjectDefinition {
    /// Строка и `String` - alias, [`Instance`] - готовое значение
    pub fn define(target: impl Into<ObjectTarget>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn value<V: Any + Send + Sync>(value: V) -> Self {
        Self::instance(Arc::new(value))
    }

    pub fn instance(instance: Instance) -> Self {
        Self {
            target: ObjectTarget::Value(instance),
        }
    }

    pub fn alias(key: impl Into<String>) -> Self {
        Self {
            target: ObjectTarget::Alias(key.into()),
        }
    }

    pub fn target(&self) -> &ObjectTarget {
        &self.target
    }

    pub fn resolve(&self, ctx: &mut ResolutionContext<'_>) -> Result<Instance> {
        match &self.target {
            ObjectTarget::Value(instance) => Ok(Arc::clone(instance)),
            ObjectTarget::Alias(target) => {
                let alias = ctx.current_key().unwrap_or_default().to_string();
                if !ctx.can_resolve(target) {
                    return Err(ResolverError::UnboundAlias {
                        alias,
                        target: target.clone(),
                    });
                }

                debug!("Alias {} -> {}", alias, target);
                ctx.resolve(target)
            }
        }
    }
}
