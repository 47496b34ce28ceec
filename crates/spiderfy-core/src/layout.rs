//! Foot-point generators.
//!
//! Both generators work in layer space around the cluster centroid and return exactly `count`
//! points.

use crate::geom::{LayerPoint, layer_point};
use crate::options::SpiderfyOptions;
use serde::Serialize;
use std::f64::consts::TAU;

/// Extra angle added per spiral step so later turns do not land on earlier ones.
const SPIRAL_ANGLE_DRIFT: f64 = 0.0005;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutKind {
    Circle,
    Spiral,
}

impl LayoutKind {
    pub fn for_count(count: usize, circle_spiral_switchover: usize) -> Self {
        if count >= circle_spiral_switchover {
            Self::Spiral
        } else {
            Self::Circle
        }
    }
}

/// Evenly spaced points on a circle whose circumference grows with `count`.
pub fn circle_points(
    count: usize,
    center: LayerPoint,
    foot_separation: f64,
    start_angle: f64,
) -> Vec<LayerPoint> {
    let circumference = foot_separation * (count as f64 + 2.0);
    let radius = circumference / TAU;
    let angle_step = TAU / count as f64;
    (0..count)
        .map(|i| {
            let angle = start_angle + i as f64 * angle_step;
            layer_point(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// Points along an outward spiral, innermost first.
pub fn spiral_points(
    count: usize,
    center: LayerPoint,
    foot_separation: f64,
    length_start: f64,
    length_factor: f64,
) -> Vec<LayerPoint> {
    let mut leg_length = length_start;
    let mut angle = 0.0_f64;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        angle += foot_separation / leg_length + i as f64 * SPIRAL_ANGLE_DRIFT;
        out.push(layer_point(
            center.x + leg_length * angle.cos(),
            center.y + leg_length * angle.sin(),
        ));
        leg_length += TAU * length_factor / angle;
    }
    out
}

/// Picks the layout for a cluster of `count` markers and generates its feet in assignment order.
///
/// Spiral feet come outermost first; matching from the outside in crosses fewer legs.
pub fn foot_points(
    count: usize,
    center: LayerPoint,
    opts: &SpiderfyOptions,
) -> (LayoutKind, Vec<LayerPoint>) {
    let kind = LayoutKind::for_count(count, opts.circle_spiral_switchover);
    let points = match kind {
        LayoutKind::Circle => circle_points(
            count,
            center,
            opts.circle_foot_separation,
            opts.circle_start_angle,
        ),
        LayoutKind::Spiral => {
            let mut pts = spiral_points(
                count,
                center,
                opts.spiral_foot_separation,
                opts.spiral_length_start,
                opts.spiral_length_factor,
            );
            pts.reverse();
            pts
        }
    };
    (kind, points)
}
