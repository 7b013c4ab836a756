//! Two-tier route cache: in-process map plus a persistent blob store.
//!
//! TTL semantics live entirely here; the backing store holds opaque blobs.
//! Expired entries are evicted lazily on lookup, never by a background sweep.
//! Persistent-tier write failures are swallowed: the in-memory tier stays
//! authoritative for the current session.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::model::{Point, RoutePayload};
use crate::traits::{CacheStore, Clock};

/// Default TTL for static site-to-site routes.
pub const STATIC_ROUTE_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    payload: RoutePayload,
    created_at: i64,
    /// `None` means the entry never expires (offline fallback reuse).
    ttl_secs: Option<i64>,
}

impl CacheEntry {
    fn fresh_at(&self, now: i64) -> bool {
        match self.ttl_secs {
            Some(ttl) => now - self.created_at <= ttl,
            None => true,
        }
    }
}

/// Deterministic key for a site-to-site route request.
///
/// Hashes the full coordinate sequence at 6-decimal precision, so logically
/// identical requests always map to the same key.
pub fn route_key(waypoints: &[Point]) -> String {
    hash_parts("route", None, waypoints)
}

/// Key for a live-tracking request anchored at the current position.
///
/// The anchor is part of the key, so these rarely hit while the vehicle is
/// moving; their value is replaying the last computed route when offline.
pub fn position_anchored_key(position: Point, waypoints: &[Point]) -> String {
    hash_parts("live", Some(position), waypoints)
}

fn hash_parts(prefix: &str, anchor: Option<Point>, waypoints: &[Point]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prefix.as_bytes());
    if let Some(p) = anchor {
        hasher.update(format!("@{:.6},{:.6}", p.lon, p.lat).as_bytes());
    }
    for p in waypoints {
        hasher.update(format!(";{:.6},{:.6}", p.lon, p.lat).as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Two-tier TTL cache for route payloads.
pub struct RouteCache<C: Clock> {
    memory: HashMap<String, CacheEntry>,
    store: Box<dyn CacheStore>,
    clock: C,
}

impl<C: Clock> RouteCache<C> {
    pub fn new(store: Box<dyn CacheStore>, clock: C) -> Self {
        Self {
            memory: HashMap::new(),
            store,
            clock,
        }
    }

    /// Look up a payload, checking the in-memory tier first.
    ///
    /// An expired entry is treated as absent. A persistent blob that fails to
    /// parse is treated as a miss, never an error.
    pub fn get(&mut self, key: &str) -> Option<RoutePayload> {
        let now = self.clock.now_epoch_secs();

        if let Some(entry) = self.memory.get(key) {
            if entry.fresh_at(now) {
                debug!(key, "route cache hit (memory)");
                return Some(entry.payload.clone());
            }
            self.memory.remove(key);
        }

        let blob = self.store.get(key)?;
        let entry: CacheEntry = match serde_json::from_str(&blob) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(key, %err, "corrupt cache blob, treating as miss");
                return None;
            }
        };
        if !entry.fresh_at(now) {
            return None;
        }

        debug!(key, "route cache hit (persistent)");
        let payload = entry.payload.clone();
        // Promote so the next lookup stays in process.
        self.memory.insert(key.to_string(), entry);
        Some(payload)
    }

    /// Write a payload to both tiers. `ttl_secs = None` never expires.
    ///
    /// A persistent-tier failure is logged and swallowed.
    pub fn set(&mut self, key: &str, payload: RoutePayload, ttl_secs: Option<i64>) {
        let entry = CacheEntry {
            payload,
            created_at: self.clock.now_epoch_secs(),
            ttl_secs,
        };

        match serde_json::to_string(&entry) {
            Ok(blob) => {
                if let Err(err) = self.store.set(key, &blob) {
                    warn!(key, %err, "persistent cache write failed, keeping memory tier");
                }
            }
            Err(err) => warn!(key, %err, "cache entry serialization failed"),
        }

        self.memory.insert(key.to_string(), entry);
    }

    /// Drop both tiers.
    pub fn clear(&mut self) {
        self.memory.clear();
        self.store.clear();
    }
}
