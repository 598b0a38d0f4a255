//! Definitions: стратегии получения экземпляра для ключа
//!
//! - [`ClassDefinition`] - создать тип, автоматически разрешив параметры конструктора
//! - [`FactoryDefinition`] - вызвать пользовательскую фабрику, разрешив ее параметры
//! - [`ObjectDefinition`] - вернуть готовый экземпляр или перенаправить на другой ключ
//!
//! Definition неизменяем после создания. Builder методы возвращают новое
//! значение, поэтому один и тот же definition безопасно разделять между
//! несколькими резолверами.

mod class;
mod factory;
mod object;

pub use class::ClassDefinition;
pub use factory::{Factory, FactoryDefinition, FactoryFn};
pub use object::{ObjectDefinition, ObjectTarget};

use std::sync::Arc;
use tracing::trace;

use crate::arguments::{ArgumentOverlay, Arguments};
use crate::errors::{ResolverError, Result};
use crate::introspection::Parameter;
use crate::resolver::ResolutionContext;
use crate::Instance;

#[derive(Debug, Clone)]
pub enum Definition {
    Class(ClassDefinition),
    Factory(FactoryDefinition),
    Object(ObjectDefinition),
}

impl Definition {
    pub fn resolve(&self, ctx: &mut ResolutionContext<'_>) -> Result<Instance> {
        match self {
            Definition::Class(definition) => definition.resolve(ctx),
            Definition::Factory(definition) => definition.resolve(ctx),
            Definition::Object(definition) => definition.resolve(ctx),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Definition::Class(_) => "class",
            Definition::Factory(_) => "factory",
            Definition::Object(_) => "object",
        }
    }
}

impl From<ClassDefinition> for Definition {
    fn from(definition: ClassDefinition) -> Self {
        Definition::Class(definition)
    }
}

impl From<FactoryDefinition> for Definition {
    fn from(definition: FactoryDefinition) -> Self {
        Definition::Factory(definition)
    }
}

impl From<ObjectDefinition> for Definition {
    fn from(definition: ObjectDefinition) -> Self {
        Definition::Object(definition)
    }
}

/// Собрать аргументы для `owner` в порядке объявления параметров
///
/// Приоритет: overlay, затем default, затем рекурсивное разрешение
/// объявленного типа.
pub(crate) fn collect_arguments(
    owner: &str,
    parameters: &[Parameter],
    overlay: &ArgumentOverlay,
    ctx: &mut ResolutionContext<'_>,
) -> Result<Arguments> {
    let mut args = Arguments::with_capacity(parameters.len());

    for param in parameters {
        let name = param.name();

        if let Some(value) = overlay.get(name) {
            trace!("{}: параметр '{}' из overlay", owner, name);
            args.push(name, Arc::clone(value));
            continue;
        }

        if let Some(value) = param.default_value() {
            trace!("{}: параметр '{}' по умолчанию", owner, name);
            args.push(name, Arc::clone(value));
            continue;
        }

        if let Some(dependency) = param.declared_type() {
            trace!("{}: параметр '{}' -> {}", owner, name, dependency);
            let value = ctx.resolve(dependency)?;
            args.push(name, value);
            continue;
        }

        return Err(ResolverError::UnresolvableParameter {
            type_name: owner.to_string(),
            parameter: name.to_string(),
        });
    }

    Ok(args)
}
