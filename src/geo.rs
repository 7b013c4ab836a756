//! Geodesic helpers shared by the optimizer, proximity detector, and
//! recalculation policy.
//!
//! All distance consumers go through [`distance_km`] so thresholds compare
//! against the same formula everywhere.

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two points in kilometers.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Compact duration string: `"45 min"`, `"1h 20min"`, `"2h"`.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}min"),
    }
}

/// Long-form duration string: `"45 minutes"`, `"1 hour 20 minutes"`.
pub fn format_duration_long(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    let hour_part = match hours {
        0 => None,
        1 => Some("1 hour".to_string()),
        h => Some(format!("{h} hours")),
    };
    let min_part = match mins {
        0 if hours > 0 => None,
        1 => Some("1 minute".to_string()),
        m => Some(format!("{m} minutes")),
    };

    match (hour_part, min_part) {
        (Some(h), Some(m)) => format!("{h} {m}"),
        (Some(h), None) => h,
        (None, Some(m)) => m,
        (None, None) => "0 minutes".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        let dist = distance_km(8.5, 125.9, 8.5, 125.9);
        assert!(dist < 0.001, "same point should have ~0 distance");
    }

    #[test]
    fn known_distance() {
        // Butuan City (8.9475, 125.5406) to Davao City (7.1907, 125.4553)
        // Actual distance ~195 km
        let dist = distance_km(8.9475, 125.5406, 7.1907, 125.4553);
        assert!(
            dist > 185.0 && dist < 205.0,
            "Butuan to Davao should be ~195km, got {dist}"
        );
    }

    #[test]
    fn symmetric() {
        let forward = distance_km(8.5, 125.9, 8.6, 125.8);
        let backward = distance_km(8.6, 125.8, 8.5, 125.9);
        assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn short_form_minutes_only() {
        assert_eq!(format_duration(45), "45 min");
        assert_eq!(format_duration(0), "0 min");
    }

    #[test]
    fn short_form_hours() {
        assert_eq!(format_duration(80), "1h 20min");
        assert_eq!(format_duration(120), "2h");
    }

    #[test]
    fn long_form() {
        assert_eq!(format_duration_long(45), "45 minutes");
        assert_eq!(format_duration_long(80), "1 hour 20 minutes");
        assert_eq!(format_duration_long(120), "2 hours");
        assert_eq!(format_duration_long(61), "1 hour 1 minute");
        assert_eq!(format_duration_long(0), "0 minutes");
    }
}
