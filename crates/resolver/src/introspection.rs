//! Type introspection: сигнатуры конструкторов и таблица типов
//!
//! Резолвер не полагается на runtime reflection. Сигнатура конструктора
//! (параметры, default значения, объявленные типы зависимостей) задается
//! явно при регистрации типа и вычисляется один раз на тип.

use parking_lot::RwLock;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::arguments::Arguments;
use crate::Instance;

/// Канонический ключ для Rust типа
pub fn type_key<T: ?Sized + 'static>() -> String {
    type_name::<T>().to_string()
}

/// Параметр конструктора или фабрики
#[derive(Clone)]
pub struct Parameter {
    name: String,
    default: Option<Instance>,
    declared_type: Option<String>,
}

impl Parameter {
    /// Параметр без объявленного типа зависимости (примитив)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            declared_type: None,
        }
    }

    /// Параметр-зависимость, разрешаемый по ключу `key`
    pub fn service(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(name).typed(key)
    }

    /// Параметр-зависимость на Rust тип `T`
    pub fn of<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::service(name, type_key::<T>())
    }

    pub fn typed(mut self, key: impl Into<String>) -> Self {
        self.declared_type = Some(key.into());
        self
    }

    pub fn with_default<V: Any + Send + Sync>(self, value: V) -> Self {
        self.with_default_instance(Arc::new(value))
    }

    pub fn with_default_instance(mut self, value: Instance) -> Self {
        self.default = Some(value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn default_value(&self) -> Option<&Instance> {
        self.default.as_ref()
    }

    pub fn declared_type(&self) -> Option<&str> {
        self.declared_type.as_deref()
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("has_default", &self.has_default())
            .field("declared_type", &self.declared_type)
            .finish()
    }
}

/// Упорядоченный список параметров
#[derive(Debug, Clone, Default)]
pub struct Signature {
    parameters: Vec<Parameter>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl FromIterator<Parameter> for Signature {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Self {
            parameters: iter.into_iter().collect(),
        }
    }
}

pub type ConstructFn = dyn Fn(&Arguments) -> anyhow::Result<Instance> + Send + Sync;

/// Описание типа: ключ, сигнатура конструктора и сам конструктор
///
/// `signature == None` означает, что у типа нет конструктора с
/// параметрами и экземпляр создается конструктором по умолчанию.
#[derive(Clone)]
pub struct TypeInfo {
    key: String,
    signature: Option<Signature>,
    construct: Arc<ConstructFn>,
}

impl TypeInfo {
    pub fn new<T, F>(key: impl Into<String>, signature: Option<Signature>, construct: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            signature,
            construct: Arc::new(move |args: &Arguments| -> anyhow::Result<Instance> {
                Ok(Arc::new(construct(args)?))
            }),
        }
    }

    /// Тип без конструктора: `T::default()`
    pub fn default_constructed<T: Any + Send + Sync + Default>() -> Self {
        Self::new(type_key::<T>(), None, |_| Ok(T::default()))
    }

    /// Тип, описывающий себя через [`Injectable`]
    pub fn injectable<T: Injectable>() -> Self {
        Self::new(type_key::<T>(), T::signature(), T::construct)
    }

    /// Зарегистрировать тот же конструктор под другим ключом
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub fn has_constructor(&self) -> bool {
        self.signature.is_some()
    }

    pub fn instantiate(&self, args: &Arguments) -> anyhow::Result<Instance> {
        (self.construct)(args)
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("key", &self.key)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Rust тип, который сам объявляет свой конструктор
pub trait Injectable: Any + Send + Sync + Sized {
    /// `None` - конструктора нет, используется [`Injectable::construct`] с пустыми аргументами
    fn signature() -> Option<Signature>;

    fn construct(args: &Arguments) -> anyhow::Result<Self>;
}

/// Провайдер сигнатур конструкторов
///
/// Реализации могут наполнять описания любым способом: явная таблица,
/// макросы, сгенерированный код.
pub trait TypeIntrospector: Send + Sync {
    fn describe(&self, key: &str) -> Option<Arc<TypeInfo>>;

    fn contains(&self, key: &str) -> bool {
        self.describe(key).is_some()
    }
}

/// Явная таблица типов
#[derive(Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<String, Arc<TypeInfo>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, info: TypeInfo) -> &Self {
        let key = info.key().to_string();
        let previous = self.types.write().insert(key.clone(), Arc::new(info));
        if previous.is_some() {
            warn!("TypeRegistry: тип {} уже зарегистрирован, перезапись", key);
        } else {
            debug!("TypeRegistry: регистрация типа {}", key);
        }
        self
    }

    pub fn register_type<T: Injectable>(&self) -> &Self {
        self.register(TypeInfo::injectable::<T>())
    }

    pub fn register_default<T: Any + Send + Sync + Default>(&self) -> &Self {
        self.register(TypeInfo::default_constructed::<T>())
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.types.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl TypeIntrospector for TypeRegistry {
    fn describe(&self, key: &str) -> Option<Arc<TypeInfo>> {
        self.types.read().get(key).cloned()
    }

    fn contains(&self, key: &str) -> bool {
        self.types.read().contains_key(key)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.keys())
            .finish()
    }
}
