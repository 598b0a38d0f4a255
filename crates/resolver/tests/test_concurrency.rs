mod fixtures;

use fixtures::*;
use resolver::{FactoryDefinition, ObjectDefinition, Resolver, ResolverConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

const THREADS: usize = 8;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_resolver_is_send_and_sync() {
    assert_send_sync::<Resolver>();
}

#[test]
fn test_serialized_resolution_creates_single_instance() {
    let counter = Arc::new(AtomicUsize::new(0));
    let factory_counter = Arc::clone(&counter);

    let resolver = Resolver::builder(fixture_types())
        .config(ResolverConfig::concurrent().with_name("workers"))
        .definition(
            "slow_counter",
            FactoryDefinition::from_fn("slow_counter", move || {
                // окно для гонки между потоками
                thread::sleep(Duration::from_millis(20));
                Ok(factory_counter.fetch_add(1, Ordering::SeqCst) + 1)
            }),
        )
        .build();

    let barrier = Barrier::new(THREADS);
    let (resolver, barrier) = (&resolver, &barrier);
    let instances: Vec<Arc<usize>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(move || {
                    barrier.wait();
                    resolver
                        .resolve_as::<usize>("slow_counter")
                        .expect("slow_counter should resolve")
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker thread panicked"))
            .collect()
    });

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(instances
        .iter()
        .all(|instance| Arc::ptr_eq(instance, &instances[0])));
}

#[test]
fn test_shared_resolver_builds_graph_once() {
    let resolver = Arc::new(
        Resolver::builder(fixture_types())
            .config(ResolverConfig::concurrent())
            .definition(key_of::<Config>(), ConfigFactory::definition())
            .definition(key_of::<Database>(), DatabaseFactory::definition())
            .definition(
                REPOSITORY_INTERFACE,
                ObjectDefinition::alias(key_of::<Repository>()),
            )
            .build(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || resolver.get::<Service>().expect("Service should resolve"))
        })
        .collect();

    let services: Vec<Arc<Service>> = handles
        .into_iter()
        .map(|handle| handle.join().expect("worker thread panicked"))
        .collect();

    let repository = resolver
        .get::<Repository>()
        .expect("Repository should resolve");
    for service in &services {
        assert!(Arc::ptr_eq(service, &services[0]));
        assert!(Arc::ptr_eq(&service.repository, &repository));
    }
    assert_eq!(resolver.stats().failures, 0);
}
