//! OSRM HTTP adapter for turn-by-turn routes.
//!
//! Stateless beyond the HTTP client itself: no retries, no caching. Failures
//! come back as [`DirectionsError`] so the caller can decide on fallback.

use serde::Deserialize;
use tracing::debug;

use crate::model::Point;
use crate::traits::{DirectionsError, DirectionsProvider, DirectionsRoute};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
    /// Access credential appended to requests, for hosted providers.
    pub access_token: Option<String>,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
            access_token: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl DirectionsProvider for OsrmClient {
    fn route(&self, waypoints: &[Point]) -> Result<DirectionsRoute, DirectionsError> {
        if waypoints.len() < 2 {
            return Err(DirectionsError::Malformed(
                "route request needs at least two waypoints".to_string(),
            ));
        }

        let coords = waypoints
            .iter()
            .map(|p| format!("{:.6},{:.6}", p.lon, p.lat))
            .collect::<Vec<_>>()
            .join(";");

        let mut url = format!(
            "{}/route/v1/{}/{}?alternatives=true&overview=full&geometries=geojson",
            self.config.base_url, self.config.profile, coords
        );
        if let Some(token) = &self.config.access_token {
            url.push_str("&access_token=");
            url.push_str(token);
        }
        debug!(%url, "requesting route");

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| DirectionsError::Unavailable(err.to_string()))?
            .json::<OsrmRouteResponse>()
            .map_err(|err| DirectionsError::Malformed(err.to_string()))?;

        // Pick the minimum-duration candidate among alternatives.
        let best = body
            .routes
            .into_iter()
            .min_by(|a, b| a.duration.total_cmp(&b.duration))
            .ok_or_else(|| DirectionsError::Malformed("no routes in response".to_string()))?;

        let geometry = best
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Point::new(lat, lon))
            .collect();

        Ok(DirectionsRoute {
            geometry,
            duration_minutes: best.duration / 60.0,
            distance_km: best.distance / 1000.0,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Seconds.
    duration: f64,
    /// Meters.
    distance: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// GeoJSON LineString coordinates, `[lon, lat]` pairs.
    coordinates: Vec<[f64; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_single_waypoint() {
        let client = OsrmClient::new(OsrmConfig::default()).unwrap();
        let err = client.route(&[Point::new(8.5, 125.9)]).unwrap_err();
        assert!(matches!(err, DirectionsError::Malformed(_)));
    }

    #[test]
    fn response_parses_geojson_geometry() {
        let json = r#"{
            "code": "Ok",
            "routes": [
                {"duration": 744.0, "distance": 6200.0,
                 "geometry": {"type": "LineString",
                              "coordinates": [[125.90, 8.50], [125.95, 8.48]]}}
            ]
        }"#;
        let body: OsrmRouteResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.routes.len(), 1);
        assert_eq!(body.routes[0].geometry.coordinates[0], [125.90, 8.50]);
    }
}
