//! Task progress state: the canonical site list, proximity-driven
//! completion, and progress reports for the backend.
//!
//! Sites live in one vector with a per-site status, so the pending and
//! completed sets are disjoint views over the same data and always partition
//! the schedule.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{Point, Site, SiteId, SiteStatus};

/// Distance within which a site is deemed visited. Inclusive: a sample
/// exactly at the threshold completes the site.
pub const ARRIVAL_THRESHOLD_KM: f64 = 0.05;

/// One position push to the backend progress endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    pub schedule_id: String,
    pub area_id: String,
    /// Unix epoch seconds.
    pub timestamp: i64,
}

/// State of the active collection task.
#[derive(Debug, Clone)]
pub struct TaskState {
    schedule_id: String,
    area_id: String,
    sites: Vec<Site>,
    active: bool,
}

impl TaskState {
    /// Start a task over the sites of a schedule. All sites begin pending.
    pub fn new(schedule_id: impl Into<String>, area_id: impl Into<String>, mut sites: Vec<Site>) -> Self {
        for site in &mut sites {
            site.status = SiteStatus::Pending;
        }
        Self {
            schedule_id: schedule_id.into(),
            area_id: area_id.into(),
            sites,
            active: true,
        }
    }

    pub fn schedule_id(&self) -> &str {
        &self.schedule_id
    }

    pub fn area_id(&self) -> &str {
        &self.area_id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True once every site is completed.
    pub fn is_complete(&self) -> bool {
        self.sites.iter().all(|s| s.status == SiteStatus::Completed)
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site(&self, id: &SiteId) -> Option<&Site> {
        self.sites.iter().find(|s| &s.id == id)
    }

    /// Sites still to visit, in schedule order.
    pub fn pending(&self) -> Vec<Site> {
        self.sites
            .iter()
            .filter(|s| s.status == SiteStatus::Pending)
            .cloned()
            .collect()
    }

    pub fn completed_ids(&self) -> Vec<SiteId> {
        self.sites
            .iter()
            .filter(|s| s.status == SiteStatus::Completed)
            .map(|s| s.id.clone())
            .collect()
    }

    /// Mark a site completed (manual override or backend confirmation).
    ///
    /// Returns true if the site was pending and is now completed.
    pub fn mark_completed(&mut self, id: &SiteId) -> bool {
        match self.sites.iter_mut().find(|s| &s.id == id) {
            Some(site) if site.status == SiteStatus::Pending => {
                site.status = SiteStatus::Completed;
                info!(site = %id, "site completed");
                true
            }
            _ => false,
        }
    }

    /// Complete every pending site within the arrival threshold of
    /// `position`. Returns the newly completed ids.
    pub fn detect_arrivals(&mut self, position: Point) -> Vec<SiteId> {
        let arrived: Vec<SiteId> = self
            .sites
            .iter()
            .filter(|s| {
                s.status == SiteStatus::Pending
                    && position.distance_km(s.location) <= ARRIVAL_THRESHOLD_KM
            })
            .map(|s| s.id.clone())
            .collect();

        for id in &arrived {
            self.mark_completed(id);
        }
        arrived
    }

    /// Merge server-side completions. Ids already completed locally (or
    /// unknown) are ignored; newly completed ids are returned.
    pub fn merge_server_completions(&mut self, ids: &[SiteId]) -> Vec<SiteId> {
        ids.iter()
            .filter(|id| self.mark_completed(id))
            .cloned()
            .collect()
    }

    /// Build the report pushed to the backend for one sample.
    pub fn report_for(&self, position: Point, accuracy_m: f64, timestamp: i64) -> ProgressReport {
        ProgressReport {
            latitude: position.lat,
            longitude: position.lon,
            accuracy: accuracy_m,
            schedule_id: self.schedule_id.clone(),
            area_id: self.area_id.clone(),
            timestamp,
        }
    }

    /// Deactivate the task (cancelled or finished).
    pub fn finish(&mut self) {
        self.active = false;
    }
}
