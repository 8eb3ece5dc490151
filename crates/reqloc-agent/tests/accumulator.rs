//! Accumulation into the local store.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use reqloc_agent::accumulator::{request_key, validate_service, Accumulator};
use reqloc_core::{CounterStore, EntryState, Location};

fn accumulator() -> Arc<Accumulator> {
    Arc::new(Accumulator::new(Arc::new(CounterStore::new()), 38.7, -9.1))
}

fn count(acc: &Accumulator, key: &str) -> u64 {
    match acc.store().get(key) {
        EntryState::Present(r) => r.count,
        other => panic!("expected present entry for {key}, got {other:?}"),
    }
}

#[test]
fn register_request_stamps_local_coordinates() {
    let acc = accumulator();
    acc.register_request("orders");
    let r = acc.register_request("orders");
    assert_eq!(r.count, 2);
    assert_eq!(r.service, "orders");
    assert_eq!(r.location, Location::coordinates(38.7, -9.1));
    assert_eq!(count(&acc, "orders"), 2);
}

#[test]
fn add_request_keys_by_service_and_coordinates() {
    let acc = accumulator();
    acc.add_request("orders", 1.0, 2.0);
    acc.add_request("orders", 1.0, 2.0);
    acc.add_request("orders", 3.0, 2.0);

    assert_eq!(count(&acc, &request_key("orders", 1.0, 2.0)), 2);
    assert_eq!(count(&acc, &request_key("orders", 3.0, 2.0)), 1);
    assert_eq!(acc.store().get("orders"), EntryState::Absent);
    assert_eq!(request_key("orders", 1.5, -2.0), "orders\u{1f}1.5\u{1f}-2");
}

#[test]
fn located_and_bare_keys_never_collide() {
    let acc = accumulator();
    acc.register_request("a_1_2");
    acc.add_request("a", 1.0, 2.0);

    assert_eq!(count(&acc, "a_1_2"), 1);
    assert_eq!(count(&acc, &request_key("a", 1.0, 2.0)), 1);
    assert_eq!(acc.store().len(), 2);
}

#[test]
fn service_names_with_separator_are_refused() {
    assert!(validate_service("orders").is_ok());
    assert!(validate_service("a_1_2").is_ok());
    assert!(validate_service(" ").is_err());
    assert!(validate_service(&request_key("a", 1.0, 2.0)).is_err());
}

#[test]
fn increment_after_take_restarts_at_one() {
    let acc = accumulator();
    acc.register_request("orders");
    acc.register_request("orders");
    assert_eq!(acc.store().take("orders").unwrap().count, 2);
    assert_eq!(acc.register_request("orders").count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_add_request_counts_every_call() {
    let acc = accumulator();
    let n = 1000;

    let tasks: Vec<_> = (0..n)
        .map(|_| {
            let acc = Arc::clone(&acc);
            tokio::spawn(async move {
                acc.add_request("orders", 1.0, 1.0);
            })
        })
        .collect();
    for t in tasks {
        t.await.unwrap();
    }

    assert_eq!(count(&acc, &request_key("orders", 1.0, 1.0)), n);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_readers_never_see_faults() {
    let acc = accumulator();
    let mut tasks = Vec::new();

    for i in 0..8 {
        let acc = Arc::clone(&acc);
        tasks.push(tokio::spawn(async move {
            for j in 0..200 {
                acc.add_request(&format!("svc{}", (i + j) % 5), 1.0, 1.0);
            }
        }));
    }
    for _ in 0..4 {
        let acc = Arc::clone(&acc);
        tasks.push(tokio::spawn(async move {
            for _ in 0..100 {
                for (key, _) in acc.store().iter() {
                    let _ = acc.store().get(&key);
                }
            }
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }

    let total: u64 = acc
        .store()
        .iter()
        .filter_map(|(_, slot)| match slot {
            reqloc_core::Slot::Live(r) => Some(r.count),
            reqloc_core::Slot::Cleared => None,
        })
        .sum();
    assert_eq!(total, 8 * 200);
}
