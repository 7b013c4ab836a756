//! Optimizer property tests: permutation, determinism, and the spec'd
//! ordering scenarios.

mod fixtures;

use std::collections::HashSet;

use route_tracker::model::{Point, Site, SiteId};
use route_tracker::optimizer::visiting_order;

use fixtures::{site, COLLECTION_POINTS, STATIONS};

fn fixture_sites() -> Vec<Site> {
    COLLECTION_POINTS
        .iter()
        .map(|loc| site(loc.name, loc.lat, loc.lon))
        .collect()
}

fn station_origin() -> Point {
    let (lat, lon) = STATIONS[0].coords();
    Point::new(lat, lon)
}

#[test]
fn output_is_a_permutation_of_input() {
    let sites = fixture_sites();
    let order = visiting_order(station_origin(), &sites);

    assert_eq!(order.len(), sites.len());
    let input_ids: HashSet<SiteId> = sites.iter().map(|s| s.id.clone()).collect();
    let output_ids: HashSet<SiteId> = order.iter().cloned().collect();
    assert_eq!(output_ids, input_ids, "every site exactly once");
    assert_eq!(order.len(), output_ids.len(), "no duplicates");
}

#[test]
fn repeated_calls_are_identical() {
    let sites = fixture_sites();
    let origin = station_origin();
    let first = visiting_order(origin, &sites);
    for _ in 0..10 {
        assert_eq!(visiting_order(origin, &sites), first);
    }
}

#[test]
fn nearest_site_comes_first() {
    // Origin (8.50, 125.90); A at (8.48, 125.95) is ~6km away, B at
    // (8.60, 125.80) is ~16km. Order must be [A, B].
    let sites = vec![site("b", 8.60, 125.80), site("a", 8.48, 125.95)];
    let order = visiting_order(Point::new(8.50, 125.90), &sites);
    assert_eq!(order, vec![SiteId::new("a"), SiteId::new("b")]);
}

#[test]
fn chains_from_last_placed_site() {
    // From the origin: a ~5.9km, b ~7.8km, c ~8.9km, so ranking by origin
    // distance alone would give [a, b, c]. After visiting a the cursor sits
    // ~3km from c and ~13km from b, so the chained order is [a, c, b].
    let sites = vec![
        site("a", 8.48, 125.95),
        site("b", 8.55, 125.85),
        site("c", 8.46, 125.97),
    ];
    let order = visiting_order(Point::new(8.50, 125.90), &sites);
    assert_eq!(
        order,
        vec![SiteId::new("a"), SiteId::new("c"), SiteId::new("b")]
    );
}

#[test]
fn empty_set_means_task_complete() {
    let order = visiting_order(station_origin(), &[]);
    assert!(order.is_empty());
}

#[test]
fn zero_distance_ties_are_stable() {
    let sites = vec![
        site("first", 8.48, 125.95),
        site("second", 8.48, 125.95),
        site("third", 8.48, 125.95),
    ];
    let order = visiting_order(station_origin(), &sites);
    assert_eq!(
        order,
        vec![
            SiteId::new("first"),
            SiteId::new("second"),
            SiteId::new("third")
        ]
    );
}
