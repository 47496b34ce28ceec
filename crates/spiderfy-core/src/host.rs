//! Capabilities the spiderfier needs from the host map.

use crate::geom::{LatLng, LayerPoint};
use std::fmt::Debug;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerEvent {
    Click,
    MouseOver,
    MouseOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEvent {
    Click,
    ZoomEnd,
}

/// Style of the line connecting a displaced marker to its original position.
#[derive(Debug, Clone, PartialEq)]
pub struct LegStyle {
    pub color: String,
    pub weight: f64,
    /// Legs never take pointer events; the host should not make them clickable.
    pub interactive: bool,
}

/// The host map, its markers and its graphics layer.
///
/// Markers are owned by the host; the spiderfier only holds `Marker` handles and compares them
/// by identity (`Eq + Hash`). Subscriptions returned by `subscribe_*` are handed back verbatim to
/// the matching `unsubscribe_*` call.
///
/// The host delivers subscribed events by calling [`Spiderfier::handle_marker_event`] and
/// [`Spiderfier::handle_map_event`].
///
/// [`Spiderfier::handle_marker_event`]: crate::Spiderfier::handle_marker_event
/// [`Spiderfier::handle_map_event`]: crate::Spiderfier::handle_map_event
pub trait MapHost {
    type Marker: Clone + Eq + Hash + Debug;
    type Leg;
    type Subscription;

    /// Geographic position to layer point.
    fn project(&self, position: LatLng) -> LayerPoint;
    /// Inverse of [`MapHost::project`].
    fn unproject(&self, point: LayerPoint) -> LatLng;

    fn marker_position(&self, marker: &Self::Marker) -> LatLng;
    fn set_marker_position(&mut self, marker: &Self::Marker, position: LatLng);
    fn z_index_offset(&self, marker: &Self::Marker) -> i32;
    fn set_z_index_offset(&mut self, marker: &Self::Marker, offset: i32);
    /// Whether the marker is currently attached to the map.
    fn has_marker(&self, marker: &Self::Marker) -> bool;

    fn subscribe_marker(&mut self, marker: &Self::Marker, event: MarkerEvent) -> Self::Subscription;
    fn unsubscribe_marker(&mut self, marker: &Self::Marker, subscription: Self::Subscription);
    fn subscribe_map(&mut self, event: MapEvent) -> Self::Subscription;
    fn unsubscribe_map(&mut self, subscription: Self::Subscription);

    fn create_leg(&mut self, path: [LatLng; 2], style: &LegStyle) -> Self::Leg;
    fn add_leg(&mut self, leg: &Self::Leg);
    fn remove_leg(&mut self, leg: &Self::Leg);
    fn set_leg_color(&mut self, leg: &Self::Leg, color: &str);
}
