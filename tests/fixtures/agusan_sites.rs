//! Real Agusan del Sur locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap around San Francisco and
//! Prosperidad, the region the engine's example scenarios use.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// Vehicle stations (depot/start points).
pub const STATIONS: &[Location] = &[
    Location::new("San Francisco Motorpool", 8.5005, 125.9021),
    Location::new("Prosperidad Capitol Depot", 8.6055, 125.9152),
];

/// Collection points across nearby barangays.
pub const COLLECTION_POINTS: &[Location] = &[
    Location::new("Brgy Hubang Hall", 8.4802, 125.9503),
    Location::new("Brgy Karaus Market", 8.5123, 125.9244),
    Location::new("Brgy Alegria Plaza", 8.5347, 125.8870),
    Location::new("Brgy Ladgadan Chapel", 8.5608, 125.9435),
    Location::new("Brgy Ormaca Crossing", 8.4550, 125.8692),
    Location::new("Brgy Pasta School", 8.6002, 125.8014),
];
