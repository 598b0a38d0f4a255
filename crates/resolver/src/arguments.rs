//! Argument overlay и собранные аргументы конструктора

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::{ResolverError, Result};
use crate::Instance;

/// Явно заданные значения параметров: имя параметра -> значение
///
/// Хранится copy-on-write: клоны overlay не видят последующих `with`.
#[derive(Clone, Default)]
pub struct ArgumentOverlay {
    values: Arc<HashMap<String, Instance>>,
}

impl ArgumentOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Вернуть overlay с установленным значением параметра
    pub fn with(mut self, name: impl Into<String>, value: Instance) -> Self {
        Arc::make_mut(&mut self.values).insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl fmt::Debug for ArgumentOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ArgumentOverlay").field("names", &names).finish()
    }
}

/// Позиционные аргументы в порядке объявления параметров
///
/// Имена сохраняются, чтобы конструктор мог брать значения по имени.
#[derive(Clone, Default)]
pub struct Arguments {
    entries: Vec<(String, Instance)>,
}

impl Arguments {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, value: Instance) {
        self.entries.push((name.into(), value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Сырой type-erased аргумент по имени
    pub fn raw(&self, name: &str) -> Option<&Instance> {
        self.entries
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }

    /// Аргумент по имени с проверкой типа
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        let value = self.raw(name).ok_or_else(|| ResolverError::MissingArgument {
            parameter: name.to_string(),
        })?;
        downcast(name, value)
    }

    /// Аргумент по позиции с проверкой типа
    pub fn at<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
        let (name, value) = self
            .entries
            .get(index)
            .ok_or_else(|| ResolverError::MissingArgument {
                parameter: format!("#{index}"),
            })?;
        downcast(name, value)
    }

    /// Скопировать значение аргумента (для примитивов: String, числа)
    pub fn cloned<T: Any + Send + Sync + Clone>(&self, name: &str) -> Result<T> {
        self.get::<T>(name).map(|value| (*value).clone())
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn downcast<T: Any + Send + Sync>(name: &str, value: &Instance) -> Result<Arc<T>> {
    Arc::clone(value)
        .downcast::<T>()
        .map_err(|_| ResolverError::ArgumentTypeMismatch {
            parameter: name.to_string(),
            expected: type_name::<T>().to_string(),
        })
}
