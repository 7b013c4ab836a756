//! route-tracker core
//!
//! Route-optimization, caching, and live-tracking engine for a field-collection
//! vehicle: orders unvisited sites into a traversal sequence, fetches
//! turn-by-turn routes through a two-tier cache, consumes a continuous
//! position stream, and detects site arrival by proximity.

pub mod traits;
pub mod model;
pub mod geo;
pub mod optimizer;
pub mod directions;
pub mod cache;
pub mod storage;
pub mod tracker;
pub mod recalc;
pub mod progress;
pub mod engine;
