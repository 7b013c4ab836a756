//! Engine orchestration.
//!
//! [`TaskEngine`] is the pure core: it holds task, tracker, visiting order,
//! and displayed route, and turns events into at most one outstanding route
//! request plus a progress report. It performs no I/O, so the sample cascade
//! is testable without a live sensor or network.
//!
//! [`Navigator`] is the blocking driver around it: it resolves route
//! requests through the cache and directions provider (straight-line
//! fallback on failure) and pushes progress reports, merging any
//! server-confirmed completions back in.

use tracing::{debug, info, warn};

use crate::cache::{self, RouteCache, STATIC_ROUTE_TTL_SECS};
use crate::model::{LocationSample, Point, RoutePayload, Site, SiteId};
use crate::optimizer;
use crate::progress::{ProgressReport, TaskState};
use crate::recalc::{self, ActiveRoute, RecalcReason};
use crate::tracker::{SensorConfig, SensorErrorKind, Tracker, TrackerEffect, TrackerEvent};
use crate::traits::{Clock, DirectionsError, DirectionsProvider, DirectionsRoute, ProgressReporter};

/// A route request the host must resolve (cache, then provider).
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    /// Matches the request to its response; stale ids are discarded.
    pub id: u64,
    pub from: Point,
    pub target: SiteId,
    /// Ordered coordinates for the directions provider (current position,
    /// then the target site).
    pub waypoints: Vec<Point>,
    /// Completion epoch when the request was issued. The installed route is
    /// stamped with this value, so completions that land while the request
    /// is in flight still count as "not yet recalculated for".
    pub completion_epoch: u64,
    pub reason: RecalcReason,
}

/// What one ingested sample produced.
#[derive(Debug, Clone, Default)]
pub struct SampleOutcome {
    /// Sites newly completed by proximity.
    pub completed: Vec<SiteId>,
    /// Route request to resolve, if recalculation triggered and none is
    /// already in flight.
    pub request: Option<RouteRequest>,
    /// Progress report to push to the backend.
    pub report: Option<ProgressReport>,
}

/// Pure event/effect core for one active task.
#[derive(Debug)]
pub struct TaskEngine {
    task: TaskState,
    tracker: Tracker,
    /// Vehicle start point, used to anchor ordering until a live position
    /// exists. Immutable for the task's duration.
    origin: Point,
    order: Vec<SiteId>,
    route: Option<ActiveRoute>,
    /// Bumped once per completed site; drives the stale-route trigger.
    completion_epoch: u64,
    in_flight: Option<RouteRequest>,
    next_request_id: u64,
}

impl TaskEngine {
    pub fn new(
        schedule_id: impl Into<String>,
        area_id: impl Into<String>,
        origin: Point,
        sites: Vec<Site>,
        sensor_config: SensorConfig,
    ) -> Self {
        let task = TaskState::new(schedule_id, area_id, sites);
        let order = optimizer::visiting_order(origin, &task.pending());
        Self {
            task,
            tracker: Tracker::new(sensor_config),
            origin,
            order,
            route: None,
            completion_epoch: 0,
            in_flight: None,
            next_request_id: 1,
        }
    }

    pub fn task(&self) -> &TaskState {
        &self.task
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Current visiting order over pending sites.
    pub fn visiting_order(&self) -> &[SiteId] {
        &self.order
    }

    /// Next site to visit.
    pub fn current_target(&self) -> Option<&Site> {
        self.order.first().and_then(|id| self.task.site(id))
    }

    /// The displayed route, if any.
    pub fn route(&self) -> Option<&RoutePayload> {
        self.route.as_ref().map(|r| &r.payload)
    }

    pub fn is_complete(&self) -> bool {
        self.task.is_complete()
    }

    /// Begin (or restart) tracking.
    pub fn start_tracking(&mut self) -> Vec<TrackerEffect> {
        self.tracker.handle(TrackerEvent::Start)
    }

    /// Classify-and-handle a sensor failure.
    pub fn on_sensor_failure(&mut self, kind: SensorErrorKind) -> Vec<TrackerEffect> {
        self.tracker.handle(TrackerEvent::Failure(kind))
    }

    /// The scheduled sensor retry has elapsed.
    pub fn on_retry_elapsed(&mut self) -> Vec<TrackerEffect> {
        self.tracker.handle(TrackerEvent::RetryElapsed)
    }

    /// Ingest one position sample: proximity detection, order maintenance,
    /// recalculation decision, progress report.
    pub fn on_sample(&mut self, sample: LocationSample) -> SampleOutcome {
        let effects = self.tracker.handle(TrackerEvent::Sample(sample));
        let accepted = effects
            .iter()
            .any(|e| matches!(e, TrackerEffect::Forward(_)));
        if !accepted || !self.task.is_active() {
            return SampleOutcome::default();
        }

        let position = sample.location;
        let completed = self.task.detect_arrivals(position);
        for id in &completed {
            self.completion_epoch += 1;
            debug!(site = %id, epoch = self.completion_epoch, "arrival detected");
        }
        if !completed.is_empty() {
            self.recompute_order();
        }
        if self.task.is_complete() {
            info!("all sites completed");
        }

        let reason = recalc::should_recalculate(position, self.route.as_ref(), self.completion_epoch);
        if reason == Some(RecalcReason::OffRoute) {
            // The vehicle moved materially since the order was anchored.
            self.recompute_order();
        }

        let request = match reason {
            Some(reason) if self.in_flight.is_none() => {
                let target = self
                    .current_target()
                    .map(|t| (t.id.clone(), t.location));
                target.map(|(target_id, target_location)| {
                    let request = RouteRequest {
                        id: self.next_request_id,
                        from: position,
                        target: target_id,
                        waypoints: vec![position, target_location],
                        completion_epoch: self.completion_epoch,
                        reason,
                    };
                    self.next_request_id += 1;
                    self.in_flight = Some(request.clone());
                    request
                })
            }
            _ => None,
        };

        let report = self
            .task
            .report_for(position, sample.accuracy_m, sample.timestamp);

        SampleOutcome {
            completed,
            request,
            report: Some(report),
        }
    }

    /// Apply the outcome of a route request.
    ///
    /// A response whose id does not match the outstanding request, or that
    /// arrives after the task stopped, is discarded. A provider error
    /// installs the straight-line fallback for the requested leg.
    pub fn on_route_response(
        &mut self,
        id: u64,
        result: Result<DirectionsRoute, DirectionsError>,
    ) -> Option<RoutePayload> {
        let matches = self.in_flight.as_ref().is_some_and(|req| req.id == id);
        if !matches || !self.task.is_active() {
            debug!(id, "discarding stale route response");
            return None;
        }
        let request = self.in_flight.take()?;

        let payload = match result {
            Ok(route) => RoutePayload {
                geometry: route.geometry,
                duration_minutes: route.duration_minutes,
                distance_km: route.distance_km,
                target_site: request.target.clone(),
                is_fallback: false,
            },
            Err(err) => {
                warn!(%err, "directions unavailable, synthesizing fallback");
                let target = self.task.site(&request.target)?;
                recalc::fallback_route(request.from, target)
            }
        };

        self.route = Some(ActiveRoute {
            payload: payload.clone(),
            completion_epoch: request.completion_epoch,
        });
        Some(payload)
    }

    /// Merge completions the backend determined server-side. Each newly
    /// completed site advances the completion epoch, so the next sample
    /// recalculates.
    pub fn on_server_completions(&mut self, ids: &[SiteId]) -> Vec<SiteId> {
        let newly = self.task.merge_server_completions(ids);
        for _ in &newly {
            self.completion_epoch += 1;
        }
        if !newly.is_empty() {
            self.recompute_order();
        }
        newly
    }

    /// Manual "mark as completed" override: trusts operator input over
    /// sensor noise, same transition as proximity detection.
    pub fn mark_completed(&mut self, id: &SiteId) -> bool {
        let changed = self.task.mark_completed(id);
        if changed {
            self.completion_epoch += 1;
            self.recompute_order();
        }
        changed
    }

    /// Stop the task: tear down the sensor subscription and invalidate any
    /// in-flight route request.
    pub fn stop(&mut self) -> Vec<TrackerEffect> {
        self.task.finish();
        self.in_flight = None;
        self.route = None;
        self.tracker.handle(TrackerEvent::Stop)
    }

    /// Replace the visiting order wholesale, anchored at the latest position
    /// when tracking has one, else at the station origin.
    fn recompute_order(&mut self) {
        let anchor = self
            .tracker
            .current()
            .map_or(self.origin, |s| s.location);
        self.order = optimizer::visiting_order(anchor, &self.task.pending());
    }
}

/// Summary of one [`Navigator::ingest`] call.
#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    /// Sites completed by local proximity detection.
    pub completed: Vec<SiteId>,
    /// Sites completed by the backend's server-side check.
    pub server_completed: Vec<SiteId>,
    /// True when the displayed route was replaced this sample.
    pub route_updated: bool,
}

/// Blocking driver: wires the engine to cache, directions provider, and
/// progress reporter. One directions call at most per ingested sample.
pub struct Navigator<P, R, C>
where
    P: DirectionsProvider,
    R: ProgressReporter,
    C: Clock,
{
    engine: TaskEngine,
    cache: RouteCache<C>,
    provider: P,
    reporter: Option<R>,
}

impl<P, R, C> Navigator<P, R, C>
where
    P: DirectionsProvider,
    R: ProgressReporter,
    C: Clock,
{
    pub fn new(engine: TaskEngine, cache: RouteCache<C>, provider: P, reporter: Option<R>) -> Self {
        Self {
            engine,
            cache,
            provider,
            reporter,
        }
    }

    pub fn engine(&self) -> &TaskEngine {
        &self.engine
    }

    pub fn start(&mut self) -> Vec<TrackerEffect> {
        self.engine.start_tracking()
    }

    pub fn stop(&mut self) -> Vec<TrackerEffect> {
        self.engine.stop()
    }

    /// Run the full cascade for one sample: tracker update, proximity,
    /// recalculation, cache/provider/fallback, progress push and merge.
    pub fn ingest(&mut self, sample: LocationSample) -> IngestSummary {
        let outcome = self.engine.on_sample(sample);
        let mut summary = IngestSummary {
            completed: outcome.completed,
            ..IngestSummary::default()
        };

        if let Some(request) = outcome.request {
            summary.route_updated = self.resolve(request);
        }

        if let (Some(report), Some(reporter)) = (outcome.report, self.reporter.as_mut()) {
            match reporter.report(&report) {
                Ok(server_ids) => {
                    summary.server_completed = self.engine.on_server_completions(&server_ids);
                }
                Err(err) => warn!(%err, "progress push failed"),
            }
        }

        summary
    }

    /// Site-to-site leg through the cache (24 h TTL), used for previewing
    /// the planned tour. Falls back to a straight line when offline.
    pub fn leg_between(&mut self, from: Point, target: &Site) -> RoutePayload {
        let waypoints = [from, target.location];
        let key = cache::route_key(&waypoints);
        if let Some(mut hit) = self.cache.get(&key) {
            hit.target_site = target.id.clone();
            return hit;
        }

        match self.provider.route(&waypoints) {
            Ok(route) => {
                let payload = RoutePayload {
                    geometry: route.geometry,
                    duration_minutes: route.duration_minutes,
                    distance_km: route.distance_km,
                    target_site: target.id.clone(),
                    is_fallback: false,
                };
                self.cache
                    .set(&key, payload.clone(), Some(STATIC_ROUTE_TTL_SECS));
                payload
            }
            Err(err) => {
                warn!(%err, "directions unavailable for site leg, using straight line");
                recalc::fallback_route(from, target)
            }
        }
    }

    /// Resolve one route request: cache first, then the provider, then the
    /// straight-line fallback. Returns true when a route was installed.
    fn resolve(&mut self, request: RouteRequest) -> bool {
        let key = cache::position_anchored_key(request.from, &request.waypoints);

        if let Some(hit) = self.cache.get(&key) {
            let route = DirectionsRoute {
                geometry: hit.geometry,
                duration_minutes: hit.duration_minutes,
                distance_km: hit.distance_km,
            };
            return self.engine.on_route_response(request.id, Ok(route)).is_some();
        }

        match self.provider.route(&request.waypoints) {
            Ok(route) => {
                let installed = self.engine.on_route_response(request.id, Ok(route));
                if let Some(payload) = &installed {
                    // Unbounded TTL: the last computed route replays offline.
                    self.cache.set(&key, payload.clone(), None);
                }
                installed.is_some()
            }
            Err(err) => self.engine.on_route_response(request.id, Err(err)).is_some(),
        }
    }
}
