use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trendline::{hourly_means, monthly_means, normalize, predict_next, TimeSeriesPoint};

fn synthetic_points(groups: &[&str], per_group: i64) -> Vec<TimeSeriesPoint> {
    let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    groups
        .iter()
        .flat_map(|group| {
            (0..per_group).map(move |i| {
                let hour = i as f64;
                TimeSeriesPoint::new(
                    start + Duration::hours(3 * i),
                    *group,
                    100.0 + 10.0 * (hour / 8.0).sin(),
                    60.0 + 20.0 * (hour / 5.0).cos(),
                )
            })
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let forecast = synthetic_points(&["Karachi"], 2_000);
    let tickers = synthetic_points(&["AAPL", "NFLX", "MSFT"], 2_000);

    c.bench_function("hourly_means", |b| b.iter(|| hourly_means(black_box(&forecast))));
    c.bench_function("monthly_means", |b| b.iter(|| monthly_means(black_box(&forecast))));
    c.bench_function("normalize", |b| b.iter(|| normalize(black_box(&tickers))));
    c.bench_function("predict_next", |b| b.iter(|| predict_next(black_box(&forecast))));
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
