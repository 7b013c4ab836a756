//! Test fixtures for route-tracker.
//!
//! Provides realistic test data including:
//! - Real Agusan del Sur collection points (from OpenStreetMap)
//! - Builders for sites, samples, and scripted providers/reporters

pub mod agusan_sites;

#[allow(unused_imports)]
pub use agusan_sites::*;

use route_tracker::model::{LocationSample, Point, Site};

/// Build a pending site with a short id.
pub fn site(id: &str, lat: f64, lon: f64) -> Site {
    Site::new(id, format!("Site {id}"), "brgy-poblacion", Point::new(lat, lon))
}

/// Build a sample with default accuracy.
pub fn sample_at(lat: f64, lon: f64, timestamp: i64) -> LocationSample {
    LocationSample {
        location: Point::new(lat, lon),
        accuracy_m: 8.0,
        timestamp,
    }
}
