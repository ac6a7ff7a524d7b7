//! Nearest-parent lookup over the parents of one country.

use rstar::{RTree, RTreeObject, AABB};

use crate::models::GeoPoint;

/// A persisted parent entity as seen by the resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentRef {
    /// Store row id.
    pub id: i64,
    pub geoname_id: i64,
    pub point: GeoPoint,
}

/// Linear nearest-neighbour scan in raw lat/lon degree space.
///
/// The first parent with the strictly smallest distance wins, so exact ties
/// resolve to whichever came first in `parents`.
pub fn find_nearest_parent<'a>(point: GeoPoint, parents: &'a [ParentRef]) -> Option<&'a ParentRef> {
    let mut best: Option<(&ParentRef, f64)> = None;
    for parent in parents {
        let d = parent.point.distance_sq(&point);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((parent, d)),
        }
    }
    best.map(|(parent, _)| parent)
}

/// Per-country collection of candidate parents.
pub trait ParentIndex: Default {
    fn insert(&mut self, parent: ParentRef);

    fn nearest(&self, point: GeoPoint) -> Option<&ParentRef>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parents kept in creation order and scanned linearly.
#[derive(Debug, Default)]
pub struct LinearIndex {
    parents: Vec<ParentRef>,
}

impl ParentIndex for LinearIndex {
    fn insert(&mut self, parent: ParentRef) {
        self.parents.push(parent);
    }

    fn nearest(&self, point: GeoPoint) -> Option<&ParentRef> {
        find_nearest_parent(point, &self.parents)
    }

    fn len(&self) -> usize {
        self.parents.len()
    }
}

/// Wrapper for R-tree indexing of parents
#[derive(Debug, Clone, Copy)]
struct IndexedParent {
    parent: ParentRef,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedParent {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Half-width of the first search box, in degrees.
const INITIAL_SEARCH_RADIUS: f64 = 0.5;

/// Largest box tried before falling back to a full scan. Doubling from
/// [`INITIAL_SEARCH_RADIUS`] stops at 256 degrees, which covers any parent
/// within 256 degrees of the point.
const MAX_SEARCH_RADIUS: f64 = 360.0;

/// R-tree backed index. Same metric as [`LinearIndex`], but ties between
/// equidistant parents are broken arbitrarily.
///
/// Lookups query a square box around the point and double it until the best
/// hit lies within the box's inscribed circle, which makes it the true nearest.
pub struct RTreeIndex {
    tree: RTree<IndexedParent>,
}

impl Default for RTreeIndex {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl ParentIndex for RTreeIndex {
    fn insert(&mut self, parent: ParentRef) {
        let corner = [parent.point.lat, parent.point.lon];
        self.tree.insert(IndexedParent {
            parent,
            envelope: AABB::from_corners(corner, corner),
        });
    }

    fn nearest(&self, point: GeoPoint) -> Option<&ParentRef> {
        if self.tree.size() == 0 {
            return None;
        }

        let mut radius = INITIAL_SEARCH_RADIUS;
        while radius <= MAX_SEARCH_RADIUS {
            let query_envelope = AABB::from_corners(
                [point.lat - radius, point.lon - radius],
                [point.lat + radius, point.lon + radius],
            );

            let best = closest(
                self.tree.locate_in_envelope_intersecting(&query_envelope),
                point,
            );
            if let Some((parent, d)) = best {
                if d <= radius * radius {
                    return Some(parent);
                }
            }
            radius *= 2.0;
        }

        // Nearest parent is more than 256 degrees away, only possible with
        // out-of-range coordinates.
        closest(self.tree.iter(), point).map(|(parent, _)| parent)
    }

    fn len(&self) -> usize {
        self.tree.size()
    }
}

fn closest<'a, I>(candidates: I, point: GeoPoint) -> Option<(&'a ParentRef, f64)>
where
    I: Iterator<Item = &'a IndexedParent>,
{
    candidates
        .map(|ip| (&ip.parent, ip.parent.point.distance_sq(&point)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
