mod fixtures;

use fixtures::*;
use resolver::{Definition, ObjectDefinition, Resolver};
use std::sync::Arc;

fn configured_resolver() -> Resolver {
    let definitions: Vec<(String, Definition)> = vec![
        (key_of::<Config>(), ConfigFactory::definition().into()),
        (key_of::<Database>(), DatabaseFactory::definition().into()),
        (
            REPOSITORY_INTERFACE.to_string(),
            ObjectDefinition::alias(key_of::<Repository>()).into(),
        ),
    ];
    Resolver::from_definitions(fixture_types(), definitions)
}

#[test]
fn test_resolve_class_with_nested_dependencies() {
    common::init_test_logging();
    let resolver = configured_resolver();

    // Service ни разу не регистрировался: разрешается через implicit class definition
    let service = resolver
        .get::<Service>()
        .expect("Service should resolve through nested definitions");

    let repository = resolver
        .resolve_as::<Repository>(REPOSITORY_INTERFACE)
        .expect("RepositoryInterface should resolve");
    assert!(Arc::ptr_eq(&service.repository, &repository));

    let database = resolver
        .get::<Database>()
        .expect("Database should resolve");
    assert!(Arc::ptr_eq(&repository.db, &database));

    let config = resolver.get::<Config>().expect("Config should resolve");
    assert!(Arc::ptr_eq(&database.config, &config));
    assert_eq!(database.dsn, "sqlite::memory:");
    assert_eq!(repository.table, "entities");
}

#[test]
fn test_alias_shares_instance_with_implementation() {
    let resolver = configured_resolver();

    let via_alias = resolver
        .resolve(REPOSITORY_INTERFACE)
        .expect("alias should resolve");
    let direct = resolver
        .resolve(&key_of::<Repository>())
        .expect("implementation should resolve");

    assert!(Arc::ptr_eq(&via_alias, &direct));
}

#[test]
fn test_factories_invoked_once_per_key() {
    let resolver = configured_resolver();

    let _ = resolver.get::<Service>().expect("Service should resolve");
    let before = resolver.stats();

    let _ = resolver.get::<Service>().expect("Service should resolve from cache");
    let _ = resolver.get::<Database>().expect("Database should resolve from cache");
    let after = resolver.stats();

    // повторные запросы обслуживаются кэшем, новых экземпляров нет
    assert_eq!(after.cached_instances, before.cached_instances);
    assert_eq!(after.cache_hits, before.cache_hits + 2);
    assert_eq!(after.failures, 0);
}

mod prelude_import {
    use resolver::*;
    use std::sync::Arc;

    #[test]
    fn test_glob_import_exposes_resolver_api() {
        let mut resolver = Resolver::new(Arc::new(TypeRegistry::new()));
        resolver.register("answer", ObjectDefinition::value(42u32));

        let answer = resolver.resolve_as::<u32>("answer").expect("answer resolves");
        assert_eq!(*answer, 42);
    }
}
