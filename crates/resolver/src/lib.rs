//! Object-graph resolver
//!
//! По ключу (обычно имени типа) строит полностью собранный экземпляр,
//! рекурсивно разрешая параметры его конструктора. Экземпляры кэшируются:
//! повторный запрос того же ключа возвращает тот же `Arc`.
//!
//! ```rust
//! use std::sync::Arc;
//! use resolver::{
//!     type_key, Arguments, FactoryDefinition, Injectable, Parameter, Resolver, Signature,
//!     TypeRegistry,
//! };
//!
//! #[derive(Debug)]
//! struct Config { dsn: String }
//!
//! #[derive(Debug)]
//! struct Database { config: Arc<Config> }
//!
//! impl Injectable for Database {
//!     fn signature() -> Option<Signature> {
//!         Some(Signature::new().param(Parameter::of::<Config>("config")))
//!     }
//!
//!     fn construct(args: &Arguments) -> anyhow::Result<Self> {
//!         Ok(Self { config: args.get("config")? })
//!     }
//! }
//!
//! let types = TypeRegistry::new();
//! types.register_type::<Database>();
//!
//! let mut resolver = Resolver::new(Arc::new(types));
//! resolver.register(
//!     type_key::<Config>(),
//!     FactoryDefinition::from_fn("config", || Ok(Config { dsn: "sqlite::memory:".into() })),
//! );
//!
//! let db = resolver.get::<Database>().unwrap();
//! assert_eq!(db.config.dsn, "sqlite::memory:");
//! assert!(Arc::ptr_eq(&db, &resolver.get::<Database>().unwrap()));
//! ```

use std::any::Any;
use std::sync::Arc;

pub mod arguments;
pub mod cache;
pub mod config;
pub mod definition;
pub mod errors;
pub mod introspection;
mod resolver;
mod stats;

/// Type-erased разделяемый экземпляр
pub type Instance = Arc<dyn Any + Send + Sync>;

pub use arguments::{ArgumentOverlay, Arguments};
pub use cache::{Cache, MemoryCache};
pub use config::{ResolverConfig, DEFAULT_ENV_PREFIX};
pub use definition::{
    ClassDefinition, Definition, Factory, FactoryDefinition, ObjectDefinition, ObjectTarget,
};
pub use errors::{ResolverError, Result};
pub use introspection::{
    type_key, Injectable, Parameter, Signature, TypeInfo, TypeIntrospector, TypeRegistry,
};
pub use resolver::{ResolutionContext, Resolver, ResolverBuilder};
pub use stats::ResolverStats;
