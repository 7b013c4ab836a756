//! Live location tracker state machine.
//!
//! `Idle → Tracking → (Error | Stopped)`, driven by explicit events. Each
//! transition is a pure function of `(state, event)` returning effects for
//! the host to execute (subscribe/unsubscribe to the platform sensor,
//! schedule a retry, surface guidance text). Only the latest sample is
//! retained; there is no trajectory log.

use tracing::{debug, info, warn};

use crate::model::LocationSample;

/// Delay before the single automatic retry after a sensor timeout.
pub const RETRY_DELAY_SECS: u64 = 5;

/// Subscription parameters for the platform position stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorConfig {
    pub high_accuracy: bool,
    pub timeout_secs: u64,
    /// Maximum tolerable age of a delivered sample.
    pub max_sample_age_secs: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_secs: 20,
            max_sample_age_secs: 10,
        }
    }
}

/// Sensor failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorErrorKind {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

impl SensorErrorKind {
    /// User-facing guidance for each failure class.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Location permission is denied. Enable location access for this app and restart tracking."
            }
            Self::PositionUnavailable => {
                "Current position is unavailable. Check that location services are turned on."
            }
            Self::Timeout => "Timed out waiting for a position fix. Retrying shortly.",
            Self::Unknown => "Location tracking failed. Restart tracking to continue.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Tracking,
    Error(SensorErrorKind),
    Stopped,
}

/// Input events for the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerEvent {
    /// Explicit start or restart.
    Start,
    Sample(LocationSample),
    Failure(SensorErrorKind),
    /// The retry scheduled after a timeout has elapsed.
    RetryElapsed,
    /// Explicit stop (task cancelled or completed).
    Stop,
}

/// Effects the host must execute after a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerEffect {
    Subscribe(SensorConfig),
    Unsubscribe,
    ScheduleRetry { delay_secs: u64 },
    /// Forward an accepted sample downstream (recalc policy, proximity).
    Forward(LocationSample),
    /// Show guidance text to the operator.
    SurfaceError(SensorErrorKind),
}

/// The tracker: current state plus latest-sample bookkeeping.
#[derive(Debug)]
pub struct Tracker {
    state: TrackerState,
    config: SensorConfig,
    current: Option<LocationSample>,
    retry_attempted: bool,
}

impl Tracker {
    pub fn new(config: SensorConfig) -> Self {
        Self {
            state: TrackerState::Idle,
            config,
            current: None,
            retry_attempted: false,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Latest accepted sample, if any.
    pub fn current(&self) -> Option<LocationSample> {
        self.current
    }

    pub fn last_update(&self) -> Option<i64> {
        self.current.map(|s| s.timestamp)
    }

    /// Apply one event, returning the effects to execute.
    pub fn handle(&mut self, event: TrackerEvent) -> Vec<TrackerEffect> {
        match (self.state, event) {
            (TrackerState::Idle | TrackerState::Error(_) | TrackerState::Stopped, TrackerEvent::Start) => {
                info!("tracking started");
                self.state = TrackerState::Tracking;
                self.retry_attempted = false;
                vec![TrackerEffect::Subscribe(self.config)]
            }
            (TrackerState::Tracking, TrackerEvent::Sample(sample)) => {
                debug!(
                    lat = sample.location.lat,
                    lon = sample.location.lon,
                    accuracy_m = sample.accuracy_m,
                    "position sample"
                );
                self.current = Some(sample);
                vec![TrackerEffect::Forward(sample)]
            }
            (TrackerState::Tracking, TrackerEvent::Failure(kind)) => {
                warn!(?kind, "sensor failure");
                self.state = TrackerState::Error(kind);
                if kind == SensorErrorKind::Timeout && !self.retry_attempted {
                    self.retry_attempted = true;
                    // Tear the stream down first; the retry resubscribes.
                    vec![
                        TrackerEffect::Unsubscribe,
                        TrackerEffect::ScheduleRetry {
                            delay_secs: RETRY_DELAY_SECS,
                        },
                    ]
                } else {
                    vec![TrackerEffect::Unsubscribe, TrackerEffect::SurfaceError(kind)]
                }
            }
            (TrackerState::Error(SensorErrorKind::Timeout), TrackerEvent::RetryElapsed) => {
                info!("retrying after sensor timeout");
                self.state = TrackerState::Tracking;
                vec![TrackerEffect::Subscribe(self.config)]
            }
            (TrackerState::Tracking | TrackerState::Error(_), TrackerEvent::Stop) => {
                info!("tracking stopped");
                self.state = TrackerState::Stopped;
                self.current = None;
                vec![TrackerEffect::Unsubscribe]
            }
            // Samples and failures after stop, duplicate stops, stray retries.
            _ => Vec::new(),
        }
    }
}
