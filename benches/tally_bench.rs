//! Benchmarks for Lectern hot paths
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use serde_json::json;
use uuid::Uuid;

use lectern::backend::{to_row, Filter, Order, Row, RowChange, SelectQuery};
use lectern::model::{PollVote, StreamMessage};
use lectern::service::{ChatFeed, PollTally};

fn create_votes(count: usize, options: usize) -> Vec<PollVote> {
    let poll_id = Uuid::new_v4();
    (0..count)
        .map(|i| PollVote {
            id: Uuid::new_v4(),
            poll_id,
            voter_id: Some(Uuid::new_v4()),
            option_index: (i % options) as i64,
            created_at: None,
        })
        .collect()
}

fn create_messages(stream_id: Uuid, count: usize) -> Vec<StreamMessage> {
    (0..count)
        .map(|i| StreamMessage {
            id: Uuid::new_v4(),
            stream_id,
            sender_id: Some(Uuid::new_v4()),
            sender_name: Some(format!("viewer-{i}")),
            body: format!("message {i}"),
            created_at: None,
        })
        .collect()
}

fn create_rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            let value = json!({
                "id": Uuid::new_v4(),
                "name": format!("Org {i}"),
                "status": if i % 3 == 0 { "active" } else { "suspended" },
                "created_at": format!("2026-01-01T{:02}:{:02}:00Z", (i / 60) % 24, i % 60),
            });
            match value {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            }
        })
        .collect()
}

fn bench_tally(c: &mut Criterion) {
    let mut group = c.benchmark_group("tally");

    for size in [100, 1000, 10000] {
        let votes = create_votes(size, 4);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("count_{}", size), |b| {
            b.iter(|| PollTally::count(black_box(4), black_box(&votes)))
        });
    }

    group.finish();
}

fn bench_query_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    let rows = create_rows(10000);
    let query = SelectQuery::from("organizations")
        .filter(Filter::eq("status", "active"))
        .order(Order::desc("created_at"))
        .limit(50);

    group.throughput(Throughput::Elements(rows.len() as u64));

    group.bench_function("filter_sort_limit_10000", |b| {
        b.iter(|| query.apply_to(black_box(&rows)))
    });

    group.finish();
}

fn bench_chat_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("chat_feed");

    let stream_id = Uuid::new_v4();
    let messages = create_messages(stream_id, 1000);

    group.bench_function("reconcile_1000", |b| {
        b.iter(|| {
            let mut feed = ChatFeed::new();
            feed.reconcile(black_box(messages.clone()));
            feed.len()
        })
    });

    // A duplicate insert never changes the feed, so one feed serves
    // every iteration; this measures the dedup scan itself
    group.bench_function("apply_duplicate_1000", |b| {
        let mut feed = ChatFeed::new();
        feed.reconcile(messages.clone());
        let duplicate = RowChange::Insert(to_row(&messages[999]).unwrap());

        b.iter(|| feed.apply(black_box(duplicate.clone())));
    });

    group.finish();
}

criterion_group!(benches, bench_tally, bench_query_eval, bench_chat_feed);
criterion_main!(benches);
