//! Property-based tests for surface lifecycle management using proptest.

mod common;

use common::{ScriptedSurface, Tracker};
use proptest::prelude::*;
use std::sync::atomic::Ordering;
use surface_pool::{ConfigBuilder, Surface, SurfacePool, SurfaceSize};

const SIZES: [SurfaceSize; 3] = [
    SurfaceSize::new(64, 64),
    SurfaceSize::new(128, 64),
    SurfaceSize::new(256, 256),
];

#[derive(Debug, Clone)]
enum Op {
    Acquire(usize),
    Submit(usize),
    Finish(usize),
    Invalidate(usize),
    Oversize(usize),
    Age,
    Shrink,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..SIZES.len()).prop_map(Op::Acquire),
        3 => any::<usize>().prop_map(Op::Submit),
        3 => any::<usize>().prop_map(Op::Finish),
        1 => any::<usize>().prop_map(Op::Invalidate),
        1 => any::<usize>().prop_map(Op::Oversize),
        2 => Just(Op::Age),
        1 => Just(Op::Shrink),
    ]
}

/// Random frame sequences never lose, duplicate or mis-size a surface.
#[test]
fn test_surface_ownership_invariants() {
    proptest!(|(
        max_surfaces in 1usize..=6,
        max_age in 1u32..=4,
        ops in prop::collection::vec(op(), 1..80)
    )| {
        let tracker = Tracker::default();
        let config = ConfigBuilder::new()
            .max_surfaces(max_surfaces)
            .max_surface_age(max_age)
            .build()
            .unwrap();
        let pool = SurfacePool::with_config(tracker.factory(), config).unwrap();
        let mut held: Vec<ScriptedSurface> = Vec::new();

        for op in ops {
            match op {
                Op::Acquire(index) => {
                    let size = SIZES[index];
                    let surface = pool.acquire(size).unwrap();
                    prop_assert_eq!(surface.size(), size);
                    prop_assert!(!pool.is_pending(surface.buffer_id()).unwrap());
                    held.push(surface);
                }
                Op::Submit(index) if !held.is_empty() => {
                    let surface = held.swap_remove(index % held.len());
                    pool.submit(surface).unwrap();
                }
                Op::Finish(index) => {
                    let waiting = tracker.waiting();
                    if !waiting.is_empty() {
                        tracker.finish(waiting[index % waiting.len()]);
                    }
                }
                Op::Invalidate(index) if !held.is_empty() => {
                    let id = held[index % held.len()].buffer_id();
                    tracker.control(id).valid.store(false, Ordering::SeqCst);
                }
                Op::Oversize(index) if !held.is_empty() => {
                    let id = held[index % held.len()].buffer_id();
                    tracker.control(id).oversized.store(true, Ordering::SeqCst);
                }
                Op::Age => pool.age_and_collect().unwrap(),
                Op::Shrink => pool.shrink_to_fit().unwrap(),
                _ => {}
            }

            let available = pool.available_count().unwrap();
            let pending = pool.pending_count().unwrap();
            prop_assert!(available <= max_surfaces);
            prop_assert_eq!(tracker.live_count(), available + pending + held.len());
            prop_assert_eq!(tracker.waiting().len(), pending);
        }

        // Every pending surface is recycled or dropped once its writes finish.
        for id in tracker.waiting() {
            tracker.finish(id);
        }
        prop_assert_eq!(pool.pending_count().unwrap(), 0);
        prop_assert!(pool.available_count().unwrap() <= max_surfaces);
    });
}

/// Acquiring any sequence of sizes returns exactly those sizes.
#[test]
fn test_acquire_never_returns_wrong_size() {
    proptest!(|(
        seeded in prop::collection::vec(0..SIZES.len(), 0..8),
        requested in prop::collection::vec(0..SIZES.len(), 1..16)
    )| {
        let tracker = Tracker::default();
        let pool = SurfacePool::new(tracker.factory());

        for index in seeded {
            let surface = pool.acquire(SIZES[index]).unwrap();
            let id = surface.buffer_id();
            pool.submit(surface).unwrap();
            tracker.finish(id);
        }

        for index in requested {
            let size = SIZES[index];
            let surface = pool.acquire(size).unwrap();
            prop_assert_eq!(surface.size(), size);
        }
    });
}
