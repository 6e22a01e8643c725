//! Benchmarks for the Pomodoro timer and formatting helpers

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use posture_monitor::{
    timer::{PhaseDurations, PomodoroTimer},
    utils::format_hms,
};
use std::time::Duration;

fn benchmark_timer(c: &mut Criterion) {
    let mut group = c.benchmark_group("timer");

    group.bench_function("tick_running", |b| {
        let mut timer = PomodoroTimer::default();
        timer.start(Duration::ZERO);
        let mut now = Duration::ZERO;
        b.iter(|| {
            now += Duration::from_millis(1);
            black_box(timer.tick(black_box(now)))
        });
    });

    group.bench_function("auto_advance_full_cycle", |b| {
        let durations = PhaseDurations::from_minutes(1, 1, 1);
        b.iter(|| {
            let mut timer = PomodoroTimer::new(durations);
            let mut now = Duration::ZERO;
            // Alternate sitting and standing until the cycle is exhausted
            for step in 0..14u32 {
                let standing = step % 2 == 1;
                timer.auto_advance(standing, now);
                now += Duration::from_secs(61);
                timer.tick(now);
            }
            black_box(timer.is_complete())
        });
    });

    group.bench_function("pause_toggle", |b| {
        let mut timer = PomodoroTimer::default();
        timer.start(Duration::ZERO);
        let mut now = Duration::ZERO;
        b.iter(|| {
            now += Duration::from_millis(rand::random::<u8>().into());
            black_box(timer.toggle_pause(now))
        });
    });

    group.finish();
}

fn benchmark_format(c: &mut Criterion) {
    let durations: Vec<Duration> = (0..100)
        .map(|_| Duration::from_secs(rand::random::<u64>() % 7200))
        .collect();

    c.bench_function("format_hms", |b| {
        b.iter(|| {
            for d in &durations {
                black_box(format_hms(*d));
            }
        });
    });
}

criterion_group!(benches, benchmark_timer, benchmark_format);
criterion_main!(benches);
