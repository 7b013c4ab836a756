//! Injectable seams for the tracking engine.
//!
//! These are intentionally minimal. The engine is handed implementations of
//! each capability instead of reaching for ambient globals, so every external
//! effect (network, storage, wall clock, backend reporting) can be faked in
//! tests.

use thiserror::Error;

use crate::model::{Point, SiteId};
use crate::progress::ProgressReport;

/// A single turn-by-turn route from a directions provider.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRoute {
    /// Ordered coordinate sequence along the route.
    pub geometry: Vec<Point>,
    pub duration_minutes: f64,
    pub distance_km: f64,
}

/// Failure modes of a directions request.
///
/// Callers treat every variant as "directions unavailable" and fall back to a
/// straight-line route; the variants exist for logging.
#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("directions service unreachable: {0}")]
    Unavailable(String),
    #[error("malformed directions response: {0}")]
    Malformed(String),
}

/// External turn-by-turn routing service.
///
/// One ordered coordinate list (at least two points) in, one route out. No
/// retries happen at this layer; retry and fallback policy belong to the
/// caller.
pub trait DirectionsProvider {
    fn route(&self, waypoints: &[Point]) -> Result<DirectionsRoute, DirectionsError>;
}

/// Persistent-tier write failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io failure: {0}")]
    Io(#[from] std::io::Error),
}

/// A key/value blob store backing the persistent cache tier.
///
/// The store has no TTL of its own; expiry metadata is stamped into the
/// blobs by the route cache. Unreadable values are reported as absent.
pub trait CacheStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn clear(&mut self);
}

/// Progress-report push failure.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("progress endpoint unreachable: {0}")]
    Unavailable(String),
}

/// Backend progress-reporting endpoint.
///
/// The engine pushes one report per accepted sample; the backend may answer
/// with site ids it has independently determined are completed, which the
/// engine merges into local state.
pub trait ProgressReporter {
    fn report(&mut self, report: &ProgressReport) -> Result<Vec<SiteId>, ReportError>;
}

/// Wall-clock seam for cache TTL arithmetic.
pub trait Clock {
    /// Current time as unix epoch seconds.
    fn now_epoch_secs(&self) -> i64;
}

/// Production clock reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}
