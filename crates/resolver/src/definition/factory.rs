use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::collect_arguments;
use crate::arguments::{ArgumentOverlay, Arguments};
use crate::errors::{ResolverError, Result};
use crate::introspection::{Parameter, Signature};
use crate::resolver::ResolutionContext;
use crate::Instance;

pub type FactoryFn = dyn Fn(&Arguments) -> anyhow::Result<Instance> + Send + Sync;

/// Пользовательский callable вместе с объявленными параметрами
///
/// У Rust замыкания нет runtime сигнатуры, поэтому параметры
/// объявляются явно, в порядке, в котором их ждет callable.
#[derive(Clone)]
pub struct Factory {
    name: String,
    signature: Signature,
    callable: Arc<FactoryFn>,
}

impl Factory {
    pub fn new<T, F>(name: impl Into<String>, callable: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature: Signature::new(),
            callable: Arc::new(move |args: &Arguments| -> anyhow::Result<Instance> {
                Ok(Arc::new(callable(args)?))
            }),
        }
    }

    /// Фабрика, которая сама возвращает type-erased экземпляр
    pub fn erased<F>(name: impl Into<String>, callable: F) -> Self
    where
        F: Fn(&Arguments) -> anyhow::Result<Instance> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature: Signature::new(),
            callable: Arc::new(callable),
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.signature = self.signature.param(parameter);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[Parameter] {
        self.signature.parameters()
    }

    fn invoke(&self, args: &Arguments) -> Result<Instance> {
        (self.callable)(args).map_err(|err| {
            ResolverError::from_callable(err, |source| ResolverError::FactoryInvocationFailure {
                factory: self.name.clone(),
                source,
            })
        })
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Получение экземпляра через вызов фабрики
#[derive(Debug, Clone)]
pub struct FactoryDefinition {
    factory: Factory,
    overlay: ArgumentOverlay,
}

impl FactoryDefinition {
    pub fn define(factory: Factory) -> Self {
        Self {
            factory,
            overlay: ArgumentOverlay::new(),
        }
    }

    /// Фабрика без параметров
    pub fn from_fn<T, F>(name: impl Into<String>, callable: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self::define(Factory::new(name, move |_| callable()))
    }

    pub fn with_argument<V: Any + Send + Sync>(self, name: impl Into<String>, value: V) -> Self {
        self.with_instance(name, Arc::new(value))
    }

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

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub fn overlay(&self) -> &ArgumentOverlay {
        &self.overlay
    }

    pub fn resolve(&self, ctx: &mut ResolutionContext<'_>) -> Result<Instance> {
        let factory = &self.factory;
        let args = if factory.parameters().is_empty() {
            Arguments::empty()
        } else {
            collect_arguments(factory.name(), factory.parameters(), &self.overlay, ctx)?
        };

        factory.invoke(&args)
    }
}
