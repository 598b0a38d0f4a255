//! Ошибки разрешения зависимостей
//!
//! Все ошибки возникают во время `resolve` и пробрасываются вызывающему
//! без retry и fallback. Частично собранные экземпляры отбрасываются.

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Основной error type резолвера
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Тип не найден introspector'ом
    #[error("Unknown type: {type_name}")]
    UnknownType { type_name: String },

    /// Параметр без overlay, без default и без объявленного типа
    #[error("Cannot resolve parameter '{parameter}' of {type_name}")]
    UnresolvableParameter { type_name: String, parameter: String },

    /// Фабрика вернула ошибку
    #[error("Factory '{factory}' failed: {source}")]
    FactoryInvocationFailure {
        factory: String,
        #[source]
        source: BoxError,
    },

    /// Конструктор типа вернул ошибку
    #[error("Construction of {type_name} failed: {source}")]
    ConstructionFailed {
        type_name: String,
        #[source]
        source: BoxError,
    },

    /// Alias указывает на ключ, который невозможно разрешить
    #[error("Alias '{alias}' points to unbound key '{target}'")]
    UnboundAlias { alias: String, target: String },

    #[error("Cyclic dependency detected: {}", .chain.join(" -> "))]
    CyclicDependency { chain: Vec<String> },

    #[error("Resolution depth limit {depth} exceeded at '{key}'")]
    DepthLimitExceeded { key: String, depth: usize },

    /// Значение аргумента не приводится к ожидаемому типу
    #[error("Argument '{parameter}' is not of type {expected}")]
    ArgumentTypeMismatch { parameter: String, expected: String },

    #[error("Missing argument '{parameter}'")]
    MissingArgument { parameter: String },

    /// Разрешенный экземпляр не приводится к запрошенному типу
    #[error("Instance for '{key}' is not of type {expected}")]
    TypeMismatch { key: String, expected: String },
}

impl ResolverError {
    /// Ключ, тип или параметр, на котором произошла ошибка
    pub fn key(&self) -> &str {
        match self {
            ResolverError::UnknownType { type_name }
            | ResolverError::UnresolvableParameter { type_name, .. }
            | ResolverError::ConstructionFailed { type_name, .. } => type_name,
            ResolverError::FactoryInvocationFailure { factory, .. } => factory,
            ResolverError::UnboundAlias { alias, .. } => alias,
            ResolverError::CyclicDependency { chain } => {
                chain.last().map(String::as_str).unwrap_or_default()
            }
            ResolverError::DepthLimitExceeded { key, .. }
            | ResolverError::TypeMismatch { key, .. } => key,
            ResolverError::ArgumentTypeMismatch { parameter, .. }
            | ResolverError::MissingArgument { parameter } => parameter,
        }
    }

    /// Ошибка конфигурации графа (а не сбой пользовательского кода)
    pub fn is_unresolvable(&self) -> bool {
        matches!(
            self,
            ResolverError::UnknownType { .. }
                | ResolverError::UnresolvableParameter { .. }
                | ResolverError::UnboundAlias { .. }
                | ResolverError::CyclicDependency { .. }
                | ResolverError::DepthLimitExceeded { .. }
        )
    }

    /// Извлечь `ResolverError` из ошибки пользовательского callable
    ///
    /// Если callable пробросил ошибку резолвера через `?`, она возвращается
    /// без обертки; иначе применяется `wrap`.
    pub(crate) fn from_callable(
        err: anyhow::Error,
        wrap: impl FnOnce(BoxError) -> ResolverError,
    ) -> ResolverError {
        match err.downcast::<ResolverError>() {
            Ok(inner) => inner,
            Err(other) => wrap(other.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolverError>;
