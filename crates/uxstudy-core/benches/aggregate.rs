use criterion::{black_box, criterion_group, criterion_main, Criterion};

use uxstudy_core::model::Row;
use uxstudy_core::statistics::{compute_summary, duration_by_task, success_by_task};

const OUTCOMES: [&str; 4] = ["Success", "Partial", "Fail", "Abandoned"];

fn task_rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            let duration = if i % 7 == 0 {
                String::new()
            } else {
                format!("{:.3}", 5.0 + (i % 90) as f64 * 0.37)
            };
            Row::new()
                .with("task_name", format!("Task {}", i % 12))
                .with("success", OUTCOMES[i % OUTCOMES.len()])
                .with("duration_seconds", duration)
        })
        .collect()
}

fn exit_rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            let v = (i % 5 + 1).to_string();
            Row::new()
                .with("satisfaction_1to5", v.as_str())
                .with("ease_of_use_1to5", v.as_str())
                .with("efficiency_1to5", v.as_str())
                .with("learnability_1to5", v.as_str())
                .with("error_prevention_1to5", v.as_str())
                .with("nps_0to10", (i % 11).to_string())
        })
        .collect()
}

fn bench_task_aggregates(c: &mut Criterion) {
    let rows = task_rows(10_000);

    c.bench_function("success_by_task_10k", |b| {
        b.iter(|| success_by_task(black_box(&rows)))
    });

    c.bench_function("duration_by_task_10k", |b| {
        b.iter(|| duration_by_task(black_box(&rows)))
    });
}

fn bench_full_summary(c: &mut Criterion) {
    let tasks = task_rows(5_000);
    let exits = exit_rows(1_000);
    let demographics: Vec<Row> = (0..1_000)
        .map(|i| {
            Row::new()
                .with("age", (18 + i % 60).to_string())
                .with("familiarity_1to5", (i % 5 + 1).to_string())
        })
        .collect();

    let consent: Vec<Row> = Vec::new();

    c.bench_function("compute_summary", |b| {
        b.iter(|| {
            compute_summary(
                black_box(&consent),
                black_box(&demographics),
                black_box(&tasks),
                black_box(&exits),
            )
        })
    });
}

criterion_group!(benches, bench_task_aggregates, bench_full_summary);
criterion_main!(benches);
