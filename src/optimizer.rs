//! Site-order optimizer (nearest-neighbor heuristic).
//!
//! Deliberately not a TSP solver: determinism and speed over optimality.
//! O(n²) is fine because a task holds tens of sites, not thousands.

use crate::model::{Point, Site, SiteId};

/// Order pending sites into a visiting sequence starting from `origin`.
///
/// Repeatedly picks the unplaced site nearest to the most recently placed
/// point (the origin counts as the first placed point). Ties, including
/// duplicate coordinates, resolve to the earlier site in input order.
///
/// An empty input yields an empty order; the caller treats that as "task
/// complete," not an error.
pub fn visiting_order(origin: Point, pending: &[Site]) -> Vec<SiteId> {
    let mut remaining: Vec<&Site> = pending.iter().collect();
    let mut order = Vec::with_capacity(remaining.len());
    let mut cursor = origin;

    while !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;
        for (idx, site) in remaining.iter().enumerate() {
            let dist = cursor.distance_km(site.location);
            // Strict less-than keeps ties on the earlier input index.
            if dist < best_dist {
                best_dist = dist;
                best_idx = idx;
            }
        }
        let site = remaining.remove(best_idx);
        cursor = site.location;
        order.push(site.id.clone());
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(id: &str, lat: f64, lon: f64) -> Site {
        Site::new(id, id, "area-1", Point::new(lat, lon))
    }

    #[test]
    fn empty_input_is_empty_order() {
        let order = visiting_order(Point::new(8.5, 125.9), &[]);
        assert!(order.is_empty());
    }

    #[test]
    fn single_site_is_trivial() {
        let sites = [site("only", 8.48, 125.95)];
        let order = visiting_order(Point::new(8.5, 125.9), &sites);
        assert_eq!(order, vec![SiteId::new("only")]);
    }

    #[test]
    fn nearest_first() {
        // A is ~6km from origin, B ~16km.
        let sites = [site("b", 8.60, 125.80), site("a", 8.48, 125.95)];
        let order = visiting_order(Point::new(8.50, 125.90), &sites);
        assert_eq!(order, vec![SiteId::new("a"), SiteId::new("b")]);
    }

    #[test]
    fn duplicate_coordinates_keep_input_order() {
        let sites = [
            site("first", 8.48, 125.95),
            site("second", 8.48, 125.95),
        ];
        let order = visiting_order(Point::new(8.50, 125.90), &sites);
        assert_eq!(order, vec![SiteId::new("first"), SiteId::new("second")]);
    }
}
