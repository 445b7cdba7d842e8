//! Integration tests: arena lifecycle scenarios.
//!
//! Exercises allocate / register / clear / destroy sequences end to end
//! through the public API, checking emptiness, growth, and finalizer order.

use zonal::{Arena, ArenaError};
use zonal_test_utils::{init_tracing, DropCounter, FinalizerLog};

#[test]
fn overflow_then_clear_scenario() {
    init_tracing();
    let mut arena = Arena::new(64).unwrap();

    let first = arena.allocate(40).unwrap();
    assert_eq!((first.chunk(), first.offset()), (0, 0));

    // 24 bytes remain; 40 does not fit and forces a fresh chunk.
    let second = arena.allocate(40).unwrap();
    assert_eq!((second.chunk(), second.offset()), (1, 0));
    assert!(arena.bytes(&second).unwrap().len() >= 40);

    let stats = arena.stats();
    assert_eq!(stats.chunk_count, 2);
    assert_eq!(stats.expansions, 1);
    assert_eq!(stats.abandoned_bytes, 24);
    assert!(!arena.is_empty());

    arena.clear().unwrap();
    assert!(arena.is_empty());
    assert_eq!(arena.stats().chunk_count, 1);
    assert_eq!(arena.stats().reserved_bytes, 64);
}

#[test]
fn destroy_runs_finalizers_in_reverse() {
    init_tracing();
    let log = FinalizerLog::new();
    let mut arena = Arena::new(64).unwrap();
    arena.allocate(200).unwrap();
    for label in ["A", "B", "C"] {
        arena.register_finalizer(log.recorder(label)).unwrap();
    }

    arena.destroy().unwrap();
    assert_eq!(log.entries(), vec!["C", "B", "A"]);
    assert_eq!(arena.stats().chunk_count, 0);
    assert_eq!(arena.stats().reserved_bytes, 0);
}

#[test]
fn clear_runs_each_finalizer_exactly_once() {
    let log = FinalizerLog::new();
    let mut arena = Arena::new(128).unwrap();
    for i in 0..50 {
        arena.register_finalizer(log.recorder(i.to_string())).unwrap();
    }
    arena.clear().unwrap();
    arena.clear().unwrap();
    arena.destroy().unwrap();

    let expected: Vec<String> = (0..50).rev().map(|i| i.to_string()).collect();
    assert_eq!(log.entries(), expected);
}

#[test]
fn is_empty_tracks_lifecycle() {
    let mut arena = Arena::new(32).unwrap();
    assert!(arena.is_empty());

    arena.allocate(1).unwrap();
    assert!(!arena.is_empty());
    arena.clear().unwrap();
    assert!(arena.is_empty());

    arena.register_finalizer(|| {}).unwrap();
    assert!(!arena.is_empty());
    arena.clear().unwrap();
    assert!(arena.is_empty());

    // A second clear with nothing in between changes nothing.
    let before = arena.stats();
    arena.clear().unwrap();
    assert!(arena.is_empty());
    assert_eq!(arena.stats(), before);
}

#[test]
fn cleared_arena_reuses_baseline_chunk() {
    let mut arena = Arena::new(256).unwrap();
    for _ in 0..10 {
        arena.allocate(100).unwrap();
    }
    let expansions = arena.stats().expansions;
    assert!(expansions > 0);

    arena.clear().unwrap();
    let a = arena.allocate(200).unwrap();
    let b = arena.allocate(56).unwrap();
    assert_eq!(a.chunk(), 0);
    assert_eq!(b.chunk(), 0);
    assert_eq!(arena.stats().expansions, expansions);
    assert_eq!(arena.stats().free_bytes, 0);
}

#[test]
fn large_request_succeeds() {
    let mut arena = Arena::new(16).unwrap();
    let big = arena.allocate(10_000).unwrap();
    let bytes = arena.bytes_mut(&big).unwrap();
    assert_eq!(bytes.len(), 10_000);
    bytes[9_999] = 0xAB;
    assert_eq!(arena.bytes(&big).unwrap()[9_999], 0xAB);
}

#[test]
fn finalizers_release_owned_values() {
    let counter = DropCounter::new();
    let mut arena = Arena::new(64).unwrap();
    for _ in 0..8 {
        let guard = counter.guard();
        arena.register_finalizer(move || drop(guard)).unwrap();
    }
    assert_eq!(counter.dropped(), 0);
    arena.clear().unwrap();
    assert_eq!(counter.dropped(), 8);
}

#[test]
fn dropped_arena_finalizes_once() {
    let log = FinalizerLog::new();
    {
        let mut arena = Arena::new(64).unwrap();
        arena.register_finalizer(log.recorder("only")).unwrap();
        arena.allocate(1000).unwrap();
    }
    assert_eq!(log.entries(), vec!["only"]);
}

#[test]
fn use_after_destroy_is_reported() {
    let mut arena = Arena::new(64).unwrap();
    arena.destroy().unwrap();
    assert_eq!(arena.allocate(8), Err(ArenaError::Destroyed));
    assert_eq!(arena.allocate_copy(b"x"), Err(ArenaError::Destroyed));
    assert_eq!(
        arena.register_finalizer_with(drop, 5u32),
        Err(ArenaError::Destroyed)
    );
    assert!(!arena.is_empty());
}

#[test]
fn handles_from_before_clear_are_stale() {
    let mut arena = Arena::new(64).unwrap();
    let old = arena.allocate_copy(b"old").unwrap();
    arena.clear().unwrap();
    let new = arena.allocate_copy(b"new").unwrap();

    // Same physical location, different epoch.
    assert_eq!((old.chunk(), old.offset()), (new.chunk(), new.offset()));
    assert!(matches!(
        arena.bytes(&old),
        Err(ArenaError::StaleHandle { .. })
    ));
    assert_eq!(arena.bytes(&new).unwrap(), b"new");
}

#[test]
fn decode_style_workload() {
    // Many small string copies plus a finalizer per "container", repeated
    // across reuse cycles.
    let log = FinalizerLog::new();
    let mut arena = Arena::new(1024).unwrap();
    for round in 0..5 {
        let mut handles = Vec::new();
        for i in 0..100 {
            let text = format!("round {round} item {i}");
            handles.push((arena.allocate_copy(text.as_bytes()).unwrap(), text));
            if i % 10 == 0 {
                arena
                    .register_finalizer(log.recorder(format!("{round}:{i}")))
                    .unwrap();
            }
        }
        for (handle, text) in &handles {
            assert_eq!(arena.bytes(handle).unwrap(), text.as_bytes());
        }
        arena.clear().unwrap();
        assert!(arena.is_empty());
    }
    assert_eq!(log.len(), 50);
    assert_eq!(log.entries()[0], "0:90");
}
