//! End-to-end scenarios: concrete seed networks exercising each worker variant through the public
//! API only, rather than unit-level invariants.

use chrono::NaiveDate;
use range_raptor::prelude::*;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// S1 — single route, single trip: reachable only for departures before the trip leaves.
#[test]
fn s1_single_route_single_trip() {
    let mut data = InMemoryTransitData::new(3);
    data.calendar.activate(0, date());
    data.add_pattern(TripPattern {
        stops: vec![0, 1, 2],
        trips: vec![TripSchedule {
            arrivals: vec![28_800, 29_400, 30_300],
            departures: vec![28_800, 29_460, 30_300],
            service_id: 0,
            frequencies: Vec::new(),
        }],
    });

    let request = RaptorRequest::new(
        28_200,
        28_500,
        60,
        60,
        vec![Leg::new(0, 0, 0.0)],
        vec![Leg::new(2, 0, 0.0)],
        RaptorProfile::RangeRaptor,
        None,
        date(),
        None,
    )
    .unwrap();
    let worker = StandardWorker::new(&data, &request, Tuning::default());
    let results = worker.run().unwrap();

    for result in &results {
        let elapsed = result.arrival_at_egress_stop[0];
        if result.departure_time <= 28_800 {
            assert_eq!(elapsed, 30_300 - result.departure_time);
        } else {
            assert_eq!(elapsed, Time::MAX);
        }
    }
}

/// S2 — a transfer is required between two routes sharing stop B.
#[test]
fn s2_transfer_required_between_two_routes() {
    let mut data = InMemoryTransitData::new(3);
    data.calendar.activate(0, date());
    // Route 1: A(0) -> B(1), arrives 08:10.
    data.add_pattern(TripPattern {
        stops: vec![0, 1],
        trips: vec![TripSchedule {
            arrivals: vec![28_800, 29_400],
            departures: vec![28_800, 29_460],
            service_id: 0,
            frequencies: Vec::new(),
        }],
    });
    // Route 2: B(1) -> C(2), departs 08:15.
    data.add_pattern(TripPattern {
        stops: vec![1, 2],
        trips: vec![TripSchedule {
            arrivals: vec![29_700, 30_300],
            departures: vec![29_700, 30_300],
            service_id: 0,
            frequencies: Vec::new(),
        }],
    });
    data.add_transfer(TransferLeg { from_stop: 1, to_stop: 1, duration_seconds: 0, cost: 0.0 });

    let request = RaptorRequest::new(
        28_740,
        28_740,
        60,
        60,
        vec![Leg::new(0, 0, 0.0)],
        vec![Leg::new(2, 0, 0.0)],
        RaptorProfile::RangeRaptor,
        None,
        date(),
        None,
    )
    .unwrap();
    let worker = StandardWorker::new(&data, &request, Tuning::default());
    let results = worker.run().unwrap();

    assert_eq!(results[0].arrival_at_egress_stop[0], 30_300 - 28_740);
}

/// S3 — a faster route reaches a downstream stop of the boarded pattern earlier than the trip
/// boarded at the origin would have; the worker reboards the earlier trip.
#[test]
fn s3_reboards_an_earlier_trip_of_the_same_pattern() {
    let mut data = InMemoryTransitData::new(3);
    data.calendar.activate(0, date());
    // Pattern 0: A(0) -> B(1), two trips.
    data.add_pattern(TripPattern {
        stops: vec![0, 1],
        trips: vec![
            TripSchedule {
                arrivals: vec![28_800, 29_400],
                departures: vec![28_800, 29_460],
                service_id: 0,
                frequencies: Vec::new(),
            },
            TripSchedule {
                arrivals: vec![30_600, 31_200],
                departures: vec![30_600, 31_260],
                service_id: 0,
                frequencies: Vec::new(),
            },
        ],
    });
    // Pattern 1: C(2) -> B(1), a faster route reaching B at 08:00.
    data.add_pattern(TripPattern {
        stops: vec![2, 1],
        trips: vec![TripSchedule {
            arrivals: vec![28_500, 28_800],
            departures: vec![28_500, 28_860],
            service_id: 0,
            frequencies: Vec::new(),
        }],
    });

    let request = RaptorRequest::new(
        28_400,
        28_400,
        60,
        60,
        vec![Leg::new(0, 0, 0.0), Leg::new(2, 0, 0.0)],
        vec![Leg::new(1, 0, 0.0)],
        RaptorProfile::RangeRaptor,
        None,
        date(),
        None,
    )
    .unwrap();
    let worker = StandardWorker::new(&data, &request, Tuning::default());
    let results = worker.run().unwrap();

    assert_eq!(results[0].arrival_at_egress_stop[0], 28_800 - 28_400);
}

/// S4 — frequency best vs worst case bound every random draw.
#[test]
fn s4_frequency_best_vs_worst() {
    let mut data = InMemoryTransitData::new(2);
    data.calendar.activate(0, date());
    data.add_pattern(TripPattern {
        stops: vec![0, 1],
        trips: vec![TripSchedule {
            arrivals: vec![0, 60],
            departures: vec![0, 60],
            service_id: 0,
            frequencies: vec![FrequencyEntry { start_time: 28_800, end_time: 32_400, headway_seconds: 600 }],
        }],
    });

    let request = RaptorRequest::new(
        28_800,
        28_800,
        60,
        60,
        vec![Leg::new(0, 0, 0.0)],
        vec![Leg::new(1, 0, 0.0)],
        RaptorProfile::RangeRaptor,
        None,
        date(),
        None,
    )
    .unwrap();
    let worker = FrequencyWorker::new(&data, &request, Tuning::default());
    let distribution = worker.run(7, 10).unwrap();

    let best = distribution.best_case.minutes[0].arrival_at_egress_stop[0];
    let worst = distribution.worst_case.minutes[0].arrival_at_egress_stop[0];
    assert_eq!(best, 60 + 60);
    assert_eq!(worst, 600 + 60 + 60);
    for draw in &distribution.random_draws {
        let random = draw.minutes[0].arrival_at_egress_stop[0];
        assert!(random >= best && random <= worst);
    }
}

/// S5 — a pareto trade-off: a faster, costlier, more-transfers path and a slower, cheaper,
/// fewer-transfers path both survive at the destination.
#[test]
fn s5_pareto_trade_off_neither_path_dominates() {
    let mut data = InMemoryTransitData::new(3);
    data.calendar.activate(0, date());
    // Direct, slower, cheaper route A(0) -> C(2).
    data.add_pattern(TripPattern {
        stops: vec![0, 2],
        trips: vec![TripSchedule {
            arrivals: vec![28_800, 30_000],
            departures: vec![28_800, 30_000],
            service_id: 0,
            frequencies: Vec::new(),
        }],
    });
    // Faster, costlier two-leg alternative via B(1).
    data.add_pattern(TripPattern {
        stops: vec![0, 1],
        trips: vec![TripSchedule {
            arrivals: vec![28_800, 29_000],
            departures: vec![28_800, 29_000],
            service_id: 0,
            frequencies: Vec::new(),
        }],
    });
    data.add_pattern(TripPattern {
        stops: vec![1, 2],
        trips: vec![TripSchedule {
            arrivals: vec![29_900, 29_950],
            departures: vec![29_900, 29_950],
            service_id: 0,
            frequencies: Vec::new(),
        }],
    });

    let request = RaptorRequest::new(
        28_740,
        28_740,
        60,
        60,
        vec![Leg::new(0, 0, 0.0)],
        vec![Leg::new(2, 0, 0.0)],
        RaptorProfile::MultiCriteria,
        Some(CostFactors::default()),
        date(),
        None,
    )
    .unwrap();
    let worker = MultiCriteriaWorker::new(&data, &request, Tuning::default());
    let paths = worker.run().unwrap();

    assert!(paths.iter().any(|p| p.transfers == 0 && p.arrival_time == 30_000));
    assert!(paths.iter().any(|p| p.transfers == 1 && p.arrival_time == 29_950));
}

/// S6 — the egress stop has no inbound service active on the requested date: the search
/// terminates cleanly with an empty result, no panics.
#[test]
fn s6_unreachable_target_yields_empty_results_without_panicking() {
    let mut data = InMemoryTransitData::new(2);
    // A pattern exists but its service is never activated for any date.
    data.add_pattern(TripPattern {
        stops: vec![0, 1],
        trips: vec![TripSchedule {
            arrivals: vec![28_800, 29_400],
            departures: vec![28_800, 29_400],
            service_id: 0,
            frequencies: Vec::new(),
        }],
    });

    let request = RaptorRequest::new(
        28_200,
        28_800,
        60,
        60,
        vec![Leg::new(0, 0, 0.0)],
        vec![Leg::new(1, 0, 0.0)],
        RaptorProfile::RangeRaptor,
        None,
        date(),
        None,
    )
    .unwrap();
    let worker = StandardWorker::new(&data, &request, Tuning::default());
    let results = worker.run().unwrap();
    assert!(results.iter().all(|r| r.arrival_at_egress_stop[0] == Time::MAX));

    let mc_request = RaptorRequest::new(
        28_200,
        28_800,
        60,
        60,
        vec![Leg::new(0, 0, 0.0)],
        vec![Leg::new(1, 0, 0.0)],
        RaptorProfile::MultiCriteria,
        Some(CostFactors::default()),
        date(),
        None,
    )
    .unwrap();
    let mc_worker = MultiCriteriaWorker::new(&data, &mc_request, Tuning::default());
    assert!(mc_worker.run().unwrap().is_empty());
}
