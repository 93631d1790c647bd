//! Benchmarks for the dashboard renderer
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tiltwatch::render::{render, ChartId, ChartSeries, DashboardView, LabelClock};
use tiltwatch::telemetry::{Payload, Sample};

fn create_test_payload(count: usize) -> Payload {
    let samples = (0..count)
        .map(|i| {
            let mut sample = Sample::new(1_700_000_000.0 + i as f64)
                .tilt_angle((i % 45) as f64)
                .light((i * 7 % 1024) as f64)
                .posture("Good");
            if i % 50 == 0 {
                sample = sample.calibrated();
            }
            if i % 17 == 0 {
                sample = sample.buzzed();
            }
            sample
        })
        .collect();

    let logs = (0..50).map(|i| format!("[POSTURE] Good (angle={}.0°)", i)).collect();
    Payload::new(samples, logs).last_calibration(1_700_000_000.0)
}

fn bench_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("series");

    for size in [300, 1000] {
        let payload = create_test_payload(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("angle_{}", size), |b| {
            b.iter(|| ChartSeries::from_samples(ChartId::Angle, black_box(payload.samples())))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let clock = LabelClock::utc();

    for size in [300, 1000] {
        let payload = create_test_payload(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("payload_{}", size), |b| {
            let mut view = DashboardView::new();
            b.iter(|| render(black_box(&payload), &mut view, &clock))
        });
    }

    group.bench_function("labels_300", |b| {
        let payload = create_test_payload(300);
        b.iter(|| {
            payload
                .samples()
                .iter()
                .map(|s| clock.label(black_box(s.timestamp)))
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_series, bench_render);
criterion_main!(benches);
