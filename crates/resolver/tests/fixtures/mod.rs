//! Общие fixtures для интеграционных тестов резолвера
#![allow(dead_code)]

use resolver::{
    type_key, Arguments, Factory, FactoryDefinition, Injectable, Parameter, Signature,
    TypeRegistry,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Ключ интерфейса репозитория: реализаций может быть несколько
pub const REPOSITORY_INTERFACE: &str = "fixtures::RepositoryInterface";

#[derive(Debug)]
pub struct Config {
    pub dsn: String,
    pub env: String,
}

pub struct ConfigFactory;

impl ConfigFactory {
    pub fn create() -> anyhow::Result<Config> {
        Ok(Config {
            dsn: "sqlite::memory:".to_string(),
            env: "test".to_string(),
        })
    }

    pub fn definition() -> FactoryDefinition {
        FactoryDefinition::from_fn("ConfigFactory::create", Self::create)
    }
}

#[derive(Debug)]
pub struct Database {
    pub config: Arc<Config>,
    pub dsn: String,
}

pub struct DatabaseFactory;

impl DatabaseFactory {
    pub fn create(args: &Arguments) -> anyhow::Result<Database> {
        let config: Arc<Config> = args.get("config")?;
        Ok(Database {
            dsn: config.dsn.clone(),
            config,
        })
    }

    pub fn definition() -> FactoryDefinition {
        FactoryDefinition::define(
            Factory::new("DatabaseFactory::create", Self::create)
                .with_parameter(Parameter::of::<Config>("config")),
        )
    }
}

#[derive(Debug)]
pub struct Repository {
    pub db: Arc<Database>,
    pub table: String,
}

impl Injectable for Repository {
    fn signature() -> Option<Signature> {
        Some(
            Signature::new()
                .param(Parameter::of::<Database>("db"))
                .param(Parameter::new("table").with_default("entities".to_string())),
        )
    }

    fn construct(args: &Arguments) -> anyhow::Result<Self> {
        Ok(Self {
            db: args.get("db")?,
            table: args.cloned("table")?,
        })
    }
}

#[derive(Debug)]
pub struct Service {
    pub repository: Arc<Repository>,
}

impl Injectable for Service {
    fn signature() -> Option<Signature> {
        Some(Signature::new().param(Parameter::service("repository", REPOSITORY_INTERFACE)))
    }

    fn construct(args: &Arguments) -> anyhow::Result<Self> {
        Ok(Self {
            repository: args.get("repository")?,
        })
    }
}

/// Тип без конструктора
#[derive(Debug, Default)]
pub struct Clock {
    pub ticks: u64,
}

/// Тип с параметром, который невозможно разрешить
#[derive(Debug)]
pub struct Mailer {
    pub host: String,
}

impl Injectable for Mailer {
    fn signature() -> Option<Signature> {
        Some(Signature::new().param(Parameter::new("host")))
    }

    fn construct(args: &Arguments) -> anyhow::Result<Self> {
        Ok(Self {
            host: args.cloned("host")?,
        })
    }
}

/// Таблица типов для fixtures
pub fn fixture_types() -> Arc<TypeRegistry> {
    let types = TypeRegistry::new();
    types
        .register_type::<Repository>()
        .register_type::<Service>()
        .register_type::<Mailer>()
        .register_default::<Clock>();
    Arc::new(types)
}

/// Фабрика, считающая свои вызовы
pub fn counting_factory(name: &str, counter: Arc<AtomicUsize>) -> FactoryDefinition {
    FactoryDefinition::from_fn(name.to_string(), move || {
        let call = counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(call)
    })
}

pub fn key_of<T: 'static>() -> String {
    type_key::<T>()
}
