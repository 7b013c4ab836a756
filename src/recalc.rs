//! Recalculation policy: when to discard the displayed route, and the
//! straight-line fallback used when the directions provider is unreachable.

use tracing::debug;

use crate::model::{Point, RoutePayload, Site};

/// Distance from the route start beyond which the displayed route is stale.
pub const OFF_ROUTE_THRESHOLD_KM: f64 = 0.2;

/// Fixed pace for fallback duration estimates.
pub const FALLBACK_MINUTES_PER_KM: f64 = 2.0;

/// Why a recalculation was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecalcReason {
    /// Nothing is displayed yet.
    NoRoute,
    /// Current position drifted past the off-route threshold.
    OffRoute,
    /// A site completed since the displayed route was computed.
    SiteCompleted,
}

/// The displayed route plus the completion epoch it was computed at.
///
/// The epoch is a counter bumped once per site completion; comparing it to
/// the task's current epoch implements "has not yet been recalculated for
/// that transition".
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRoute {
    pub payload: RoutePayload,
    pub completion_epoch: u64,
}

/// Decide whether a new route must be requested for this position.
pub fn should_recalculate(
    position: Point,
    route: Option<&ActiveRoute>,
    completion_epoch: u64,
) -> Option<RecalcReason> {
    let Some(active) = route else {
        return Some(RecalcReason::NoRoute);
    };

    if active.completion_epoch < completion_epoch {
        debug!("route predates a site completion, recalculating");
        return Some(RecalcReason::SiteCompleted);
    }

    match active.payload.start() {
        Some(start) if position.distance_km(start) > OFF_ROUTE_THRESHOLD_KM => {
            debug!("position drifted off route, recalculating");
            Some(RecalcReason::OffRoute)
        }
        Some(_) => None,
        // A route with no geometry cannot anchor an off-route check.
        None => Some(RecalcReason::NoRoute),
    }
}

/// Synthesize a straight-line route when directions are unavailable.
///
/// Duration is estimated at a fixed 2 minutes per kilometer.
pub fn fallback_route(from: Point, target: &Site) -> RoutePayload {
    let distance_km = from.distance_km(target.location);
    RoutePayload {
        geometry: vec![from, target.location],
        duration_minutes: distance_km * FALLBACK_MINUTES_PER_KM,
        distance_km,
        target_site: target.id.clone(),
        is_fallback: true,
    }
}
