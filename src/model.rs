//! Domain types for the tracking engine.
//!
//! Route geometry is stored as decoded coordinate sequences; encoding to a
//! compact polyline format, if needed, happens at API boundaries, not here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo;

/// A geographic point (latitude, longitude) in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine distance to another point in kilometers.
    pub fn distance_km(&self, other: Point) -> f64 {
        geo::distance_km(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Unique identifier for a collection site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteId(String);

impl SiteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Completion status of a site within the active task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteStatus {
    Pending,
    Completed,
}

/// A collection point the vehicle must visit.
///
/// Created from schedule data at task start; only the task state machine
/// flips `status` to `Completed`. Sites are never removed during a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    /// Owning area (barangay) identifier.
    pub area_id: String,
    pub location: Point,
    pub status: SiteStatus,
}

impl Site {
    pub fn new(id: impl Into<String>, name: impl Into<String>, area_id: impl Into<String>, location: Point) -> Self {
        Self {
            id: SiteId::new(id),
            name: name.into(),
            area_id: area_id.into(),
            location,
            status: SiteStatus::Pending,
        }
    }
}

/// One position fix from the sensor stream.
///
/// Only the most recent sample is retained anywhere downstream; there is no
/// trajectory log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationSample {
    pub location: Point,
    pub accuracy_m: f64,
    /// Unix epoch seconds.
    pub timestamp: i64,
}

/// The currently displayed route: geometry plus summary figures.
///
/// Always replaced wholesale, never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePayload {
    /// Ordered coordinate sequence from start to target.
    pub geometry: Vec<Point>,
    pub duration_minutes: f64,
    pub distance_km: f64,
    pub target_site: SiteId,
    /// True when synthesized offline as a straight line.
    pub is_fallback: bool,
}

impl RoutePayload {
    /// First coordinate of the geometry, if any.
    pub fn start(&self) -> Option<Point> {
        self.geometry.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance_matches_geo() {
        let a = Point::new(8.50, 125.90);
        let b = Point::new(8.48, 125.95);
        let direct = geo::distance_km(8.50, 125.90, 8.48, 125.95);
        assert_eq!(a.distance_km(b), direct);
    }

    #[test]
    fn payload_start() {
        let payload = RoutePayload {
            geometry: vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)],
            duration_minutes: 10.0,
            distance_km: 5.0,
            target_site: SiteId::new("s1"),
            is_fallback: false,
        };
        assert_eq!(payload.start(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn payload_serde_round_trip() {
        let payload = RoutePayload {
            geometry: vec![Point::new(8.5, 125.9)],
            duration_minutes: 12.4,
            distance_km: 6.2,
            target_site: SiteId::new("site-a"),
            is_fallback: true,
        };
        let json = serde_json::to_string(&payload).unwrap();
        let back: RoutePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }
}
