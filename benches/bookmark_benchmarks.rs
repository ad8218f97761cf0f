//! Benchmarks for bookmark navigation and resync.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use waymark_buffer::{Position, TextBuffer};
use waymark_core::{find_target, BookmarkStore, Direction, DocumentId, MemoryStorage, SyncEngine};

/// Generates a text with `lines` lines.
fn generate_large_text(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("Line {}: This is a sample line of text for benchmarking purposes.\n", i))
        .collect()
}

/// A buffer with every `step`th line marked.
fn marked_buffer(lines: usize, step: usize) -> TextBuffer {
    let mut buffer = TextBuffer::from(generate_large_text(lines));
    for line in (0..lines).step_by(step) {
        buffer.set_marked(line, true).unwrap();
    }
    buffer
}

/// Benchmarks the circular search over growing bookmark sets.
fn bench_find_target(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_target");

    for size in [10, 1000, 100000].iter() {
        let bookmarks: Vec<usize> = (0..*size).map(|i| i * 3).collect();
        let middle = size * 3 / 2;

        group.bench_with_input(BenchmarkId::new("forward", size), &bookmarks, |b, marks| {
            b.iter(|| find_target(black_box(marks), black_box(middle), Direction::Forward))
        });

        group.bench_with_input(BenchmarkId::new("backward_wrap", size), &bookmarks, |b, marks| {
            b.iter(|| find_target(black_box(marks), black_box(0), Direction::Backward))
        });
    }

    group.finish();
}

/// Benchmarks a full rescan of a buffer's marks.
fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");
    let id = DocumentId::from("bench");

    for lines in [1000, 100000].iter() {
        let buffer = marked_buffer(*lines, 10);

        group.bench_with_input(BenchmarkId::new("rescan", lines), &buffer, |b, buffer| {
            let mut store = BookmarkStore::new(MemoryStorage::new());
            b.iter(|| {
                let mut sync = SyncEngine::new(&mut store);
                sync.invalidate(&id);
                black_box(sync.ensure_fresh(&id, buffer))
            })
        });
    }

    group.finish();
}

/// Benchmarks mark shifting when lines are inserted at the top.
fn bench_shift_marks(c: &mut Criterion) {
    let mut group = c.benchmark_group("shift_marks");

    group.bench_function("newline_at_start", |b| {
        b.iter_with_setup(
            || marked_buffer(10000, 5),
            |mut buffer| {
                buffer.insert_at(Position::ZERO, black_box("\n")).unwrap();
                black_box(buffer)
            },
        )
    });

    group.finish();
}

criterion_group!(benches, bench_find_target, bench_rebuild, bench_shift_marks);

criterion_main!(benches);
