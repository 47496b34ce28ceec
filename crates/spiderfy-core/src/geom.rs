//! Screen-space and geographic primitives plus the small helpers the spiderfier is built on.

use serde::{Deserialize, Serialize};

/// Unit tag for the host map's layer (pixel) space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerSpace {}

pub type LayerPoint = euclid::Point2D<f64, LayerSpace>;

pub fn layer_point(x: f64, y: f64) -> LayerPoint {
    euclid::point2(x, y)
}

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Squared euclidean distance. Only ever used for comparisons, so the square root is skipped.
pub fn squared_distance(a: LayerPoint, b: LayerPoint) -> f64 {
    (a - b).square_length()
}

/// Arithmetic mean of `points`.
///
/// # Panics
///
/// Panics when `points` is empty. Callers only ask for the centroid of a cluster, which always
/// has at least two members.
pub fn centroid(points: &[LayerPoint]) -> LayerPoint {
    assert!(!points.is_empty(), "centroid of an empty point set");
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(x, y), p| (x + p.x, y + p.y));
    let n = points.len() as f64;
    layer_point(sum_x / n, sum_y / n)
}

/// Removes and returns the element with the smallest key.
///
/// Ties go to the element seen first. Each call removes exactly one element, which is what makes
/// foot assignment one-to-one. Returns `None` once `candidates` is exhausted.
pub fn extract_nearest<T>(candidates: &mut Vec<T>, mut key: impl FnMut(&T) -> f64) -> Option<T> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, item) in candidates.iter().enumerate() {
        let val = key(item);
        if best.is_none_or(|(_, best_val)| val < best_val) {
            best = Some((idx, val));
        }
    }
    best.map(|(idx, _)| candidates.remove(idx))
}
