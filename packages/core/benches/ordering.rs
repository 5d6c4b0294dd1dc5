//! Performance benchmarks for event ordering
//!
//! Run with: `cargo bench -p event-planner-core`
//!
//! These benchmarks measure critical path performance:
//! - Display-order sort of a large in-memory collection
//! - Single reorder (one batched read, one write)
//! - Full normalization of 1000 events

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use event_planner_core::db::{DatabaseService, EventStore, TursoStore};
use event_planner_core::models::{sort_events, Event, NewEvent};
use event_planner_core::services::{EventService, OrderingService, ReorderRequest};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::runtime::Runtime;

/// Setup services over a fresh database seeded with `count` events
async fn setup_seeded(count: usize) -> (EventService, OrderingService, Vec<Event>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("bench.db");

    let db = Arc::new(DatabaseService::new(db_path).await.unwrap());
    let store: Arc<dyn EventStore> = Arc::new(TursoStore::new(db));
    let events = EventService::new(store.clone());
    let ordering = OrderingService::new(store);

    let base = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
    let mut created = Vec::with_capacity(count);
    for i in 0..count {
        let start = base + Duration::minutes(i as i64 * 30);
        let event = events
            .create_event(NewEvent {
                title: format!("Event {}", i),
                event_type: "Meeting".to_string(),
                start: start.to_rfc3339(),
                end: (start + Duration::minutes(15)).to_rfc3339(),
            })
            .await
            .unwrap();
        created.push(event);
    }

    (events, ordering, created, temp_dir)
}

/// Synthetic collection: every third event unordered, keys out of insertion order
fn synthetic_events(count: usize) -> Vec<Event> {
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| Event {
            id: format!("{:08}", i),
            title: format!("Event {}", i),
            event_type: "Meeting".to_string(),
            start: base + Duration::minutes((count - i) as i64),
            end: base + Duration::minutes((count - i) as i64 + 10),
            priority: if i % 3 == 0 {
                None
            } else {
                Some(((i * 7919) % count) as f64)
            },
            created_at: base,
            updated_at: base,
        })
        .collect()
}

fn bench_sort(c: &mut Criterion) {
    let events = synthetic_events(10_000);

    c.bench_function("sort_10000_events", |b| {
        b.iter(|| {
            let mut copy = events.clone();
            sort_events(&mut copy);
            black_box(copy);
        })
    });
}

/// Benchmark a single midpoint reorder
///
/// Target: < 5ms per move
fn bench_reorder(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    c.bench_function("reorder_midpoint", |b| {
        b.iter_custom(|iters| {
            rt.block_on(async {
                let (_events, ordering, created, _temp) = setup_seeded(3).await;
                ordering.normalize().await.unwrap();

                let start = std::time::Instant::now();
                for i in 0..iters {
                    // Rotate which event moves so every request stays valid
                    let (before, after) = if i % 2 == 0 { (0, 1) } else { (1, 2) };
                    let outcome = ordering
                        .reorder(ReorderRequest::new(
                            created[3 - before - after].id.as_str(),
                            Some(created[before].id.as_str()),
                            Some(created[after].id.as_str()),
                        ))
                        .await;
                    black_box(outcome.ok());
                }
                start.elapsed()
            })
        });
    });
}

/// Benchmark normalization of 1000 events
fn bench_normalize(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("normalize");
    group.sample_size(10); // Fewer samples for expensive operations

    group.bench_function("1000_events", |b| {
        b.iter_custom(|iters| {
            rt.block_on(async {
                let (_events, ordering, _created, _temp) = setup_seeded(1000).await;

                let start = std::time::Instant::now();
                for _ in 0..iters {
                    black_box(ordering.normalize().await.unwrap());
                }
                start.elapsed()
            })
        });
    });

    group.finish();
}

criterion_group!(benches, bench_sort, bench_reorder, bench_normalize);
criterion_main!(benches);
