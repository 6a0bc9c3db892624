use std::hint::black_box;
use std::sync::LazyLock;

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion};
use range_raptor::prelude::*;

const NUM_STOPS: usize = 200;
const NUM_PATTERNS: usize = 40;
const TRIPS_PER_PATTERN: usize = 20;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// A synthetic, linearly chained network, large enough to give the round loop and the pattern
/// sweep something to chew on without pulling in a GTFS feed.
fn synthetic_network() -> InMemoryTransitData {
    let mut data = InMemoryTransitData::new(NUM_STOPS);
    data.calendar.activate(0, date());

    let stops_per_pattern = NUM_STOPS / NUM_PATTERNS;
    for pattern_idx in 0..NUM_PATTERNS {
        let first_stop = pattern_idx * stops_per_pattern;
        let stops: Vec<usize> = (first_stop..(first_stop + stops_per_pattern).min(NUM_STOPS)).collect();
        if stops.len() < 2 {
            continue;
        }
        let mut trips = Vec::with_capacity(TRIPS_PER_PATTERN);
        for trip_idx in 0..TRIPS_PER_PATTERN {
            let start = 20_000 + (trip_idx as i64) * 300;
            let arrivals: Vec<Time> = (0..stops.len()).map(|pos| start + pos as i64 * 120).collect();
            let departures: Vec<Time> = arrivals.iter().map(|&t| t + 20).collect();
            trips.push(TripSchedule { arrivals, departures, service_id: 0, frequencies: Vec::new() });
        }
        // Every fifth pattern also carries a headway-defined trip, so the frequency worker's
        // Monte-Carlo boarding path sees real work rather than always falling through to the
        // scheduled-only search.
        if pattern_idx % 5 == 0 {
            let arrivals: Vec<Time> = (0..stops.len()).map(|pos| pos as i64 * 180).collect();
            let departures: Vec<Time> = arrivals.clone();
            trips.push(TripSchedule {
                arrivals,
                departures,
                service_id: 0,
                frequencies: vec![FrequencyEntry { start_time: 20_000, end_time: 30_000, headway_seconds: 600 }],
            });
        }
        data.add_pattern(TripPattern { stops, trips });
        // A short transfer linking consecutive patterns' boundary stops, so rounds beyond the
        // first actually have work to do.
        if first_stop + stops_per_pattern < NUM_STOPS {
            data.add_transfer(TransferLeg {
                from_stop: first_stop + stops_per_pattern - 1,
                to_stop: first_stop + stops_per_pattern,
                duration_seconds: 120,
                cost: 0.0,
            });
        }
    }
    data
}

static NETWORK: LazyLock<InMemoryTransitData> = LazyLock::new(synthetic_network);

fn standard_worker_benchmark(c: &mut Criterion) {
    let request = RaptorRequest::new(
        28_000,
        29_000,
        60,
        60,
        vec![Leg::new(0, 0, 0.0)],
        vec![Leg::new(NUM_STOPS - 1, 0, 0.0)],
        RaptorProfile::RangeRaptor,
        None,
        date(),
        None,
    )
    .unwrap();

    c.bench_function("standard_range_raptor", |b| {
        b.iter(|| {
            let worker = StandardWorker::new(black_box(&*NETWORK), black_box(&request), Tuning::default());
            worker.run().unwrap()
        })
    });
}

fn frequency_worker_benchmark(c: &mut Criterion) {
    let request = RaptorRequest::new(
        28_000,
        28_600,
        60,
        60,
        vec![Leg::new(0, 0, 0.0)],
        vec![Leg::new(NUM_STOPS - 1, 0, 0.0)],
        RaptorProfile::RangeRaptor,
        None,
        date(),
        None,
    )
    .unwrap();

    c.bench_function("frequency_monte_carlo", |b| {
        b.iter(|| {
            let worker = FrequencyWorker::new(black_box(&*NETWORK), black_box(&request), Tuning::default());
            worker.run(42, 8).unwrap()
        })
    });
}

criterion_group!(benches, standard_worker_benchmark, frequency_worker_benchmark);
criterion_main!(benches);
