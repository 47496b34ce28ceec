use crate::error::{Error, Result};
use crate::projection::{from_world_pixel, to_world_pixel};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::{Deserialize, Serialize};
use spiderfy_core::{
    ClickOutcome, LatLng, LayerPoint, LegStyle, MapEvent, MapHost, MarkerEvent, Spiderfier,
};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub String);

impl From<&str> for MarkerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MarkerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LegId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRecord {
    pub position: LatLng,
    pub z_index_offset: i32,
    pub on_map: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegRecord {
    pub path: [LatLng; 2],
    pub style: LegStyle,
    pub on_map: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Target {
    Marker(MarkerId, MarkerEvent),
    Map(MapEvent),
}

/// A map with no screen: markers, legs and event subscriptions live in memory.
///
/// The layer origin is the world pixel of the view center, so the center projects to `(0, 0)`.
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    zoom: f64,
    center: LatLng,
    pixel_origin: LayerPoint,
    markers: IndexMap<MarkerId, MarkerRecord, FxBuildHasher>,
    legs: FxHashMap<LegId, LegRecord>,
    subscriptions: FxHashMap<SubscriptionId, Target>,
    next_leg: u64,
    next_subscription: u64,
}

impl HeadlessMap {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self {
            zoom,
            center,
            pixel_origin: to_world_pixel(center, zoom),
            markers: IndexMap::default(),
            legs: FxHashMap::default(),
            subscriptions: FxHashMap::default(),
            next_leg: 0,
            next_subscription: 0,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    /// Adds a marker to the map. It is not tracked by any spiderfier until registered there.
    pub fn add_marker(
        &mut self,
        id: impl Into<MarkerId>,
        position: LatLng,
        z_index_offset: i32,
    ) -> Result<MarkerId> {
        let id = id.into();
        if self.markers.contains_key(&id) {
            return Err(Error::DuplicateMarker { id });
        }
        self.markers.insert(
            id.clone(),
            MarkerRecord {
                position,
                z_index_offset,
                on_map: true,
            },
        );
        Ok(id)
    }

    pub fn marker(&self, id: &MarkerId) -> Option<&MarkerRecord> {
        self.markers.get(id)
    }

    fn record_mut(&mut self, id: &MarkerId) -> Result<&mut MarkerRecord> {
        self.markers
            .get_mut(id)
            .ok_or_else(|| Error::UnknownMarker { id: id.clone() })
    }

    /// Detaches a marker from the map without forgetting it.
    pub fn remove_from_map(&mut self, id: &MarkerId) -> Result<()> {
        self.record_mut(id)?.on_map = false;
        Ok(())
    }

    pub fn add_to_map(&mut self, id: &MarkerId) -> Result<()> {
        self.record_mut(id)?.on_map = true;
        Ok(())
    }

    /// Moves a marker from the host side, e.g. at the end of a drag.
    pub fn move_marker(&mut self, id: &MarkerId, position: LatLng) -> Result<()> {
        self.record_mut(id)?.position = position;
        Ok(())
    }

    pub fn legs_on_map(&self) -> impl Iterator<Item = &LegRecord> {
        self.legs.values().filter(|leg| leg.on_map)
    }

    pub fn leg(&self, id: LegId) -> Option<&LegRecord> {
        self.legs.get(&id)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn marker_subscription_count(&self, id: &MarkerId, event: MarkerEvent) -> usize {
        let wanted = Target::Marker(id.clone(), event);
        self.subscriptions.values().filter(|t| **t == wanted).count()
    }

    fn has_subscription(&self, target: &Target) -> bool {
        self.subscriptions.values().any(|t| t == target)
    }

    /// Delivers a marker event to `engine` if anything subscribed to it.
    pub fn fire_marker(
        &mut self,
        engine: &mut Spiderfier<Self>,
        id: &MarkerId,
        event: MarkerEvent,
    ) -> Option<ClickOutcome> {
        if !self.has_subscription(&Target::Marker(id.clone(), event)) {
            return None;
        }
        engine.handle_marker_event(self, id, event)
    }

    pub fn click(&mut self, engine: &mut Spiderfier<Self>, id: &MarkerId) -> Option<ClickOutcome> {
        self.fire_marker(engine, id, MarkerEvent::Click)
    }

    /// Delivers a map event to `engine` if it subscribed to it. Returns whether it was delivered.
    pub fn fire_map(&mut self, engine: &mut Spiderfier<Self>, event: MapEvent) -> bool {
        if !self.has_subscription(&Target::Map(event)) {
            return false;
        }
        engine.handle_map_event(self, event);
        true
    }

    /// Changes the zoom around the current center and fires `zoomend`.
    pub fn set_zoom(&mut self, engine: &mut Spiderfier<Self>, zoom: f64) {
        self.zoom = zoom;
        self.pixel_origin = to_world_pixel(self.center, zoom);
        self.fire_map(engine, MapEvent::ZoomEnd);
    }
}

impl MapHost for HeadlessMap {
    type Marker = MarkerId;
    type Leg = LegId;
    type Subscription = SubscriptionId;

    fn project(&self, position: LatLng) -> LayerPoint {
        let px = to_world_pixel(position, self.zoom);
        (px - self.pixel_origin).to_point()
    }

    fn unproject(&self, point: LayerPoint) -> LatLng {
        from_world_pixel(point + self.pixel_origin.to_vector(), self.zoom)
    }

    fn marker_position(&self, marker: &MarkerId) -> LatLng {
        match self.markers.get(marker) {
            Some(record) => record.position,
            None => {
                warn!(%marker, "position of unknown marker");
                LatLng::default()
            }
        }
    }

    fn set_marker_position(&mut self, marker: &MarkerId, position: LatLng) {
        if let Err(err) = self.move_marker(marker, position) {
            warn!(%err, "set_marker_position");
        }
    }

    fn z_index_offset(&self, marker: &MarkerId) -> i32 {
        self.markers
            .get(marker)
            .map(|record| record.z_index_offset)
            .unwrap_or_default()
    }

    fn set_z_index_offset(&mut self, marker: &MarkerId, offset: i32) {
        match self.record_mut(marker) {
            Ok(record) => record.z_index_offset = offset,
            Err(err) => warn!(%err, "set_z_index_offset"),
        }
    }

    fn has_marker(&self, marker: &MarkerId) -> bool {
        self.markers.get(marker).is_some_and(|record| record.on_map)
    }

    fn subscribe_marker(&mut self, marker: &MarkerId, event: MarkerEvent) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions
            .insert(id, Target::Marker(marker.clone(), event));
        id
    }

    fn unsubscribe_marker(&mut self, _marker: &MarkerId, subscription: SubscriptionId) {
        self.subscriptions.remove(&subscription);
    }

    fn subscribe_map(&mut self, event: MapEvent) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.insert(id, Target::Map(event));
        id
    }

    fn unsubscribe_map(&mut self, subscription: SubscriptionId) {
        self.subscriptions.remove(&subscription);
    }

    fn create_leg(&mut self, path: [LatLng; 2], style: &LegStyle) -> LegId {
        let id = LegId(self.next_leg);
        self.next_leg += 1;
        self.legs.insert(
            id,
            LegRecord {
                path,
                style: style.clone(),
                on_map: false,
            },
        );
        id
    }

    fn add_leg(&mut self, leg: &LegId) {
        if let Some(record) = self.legs.get_mut(leg) {
            record.on_map = true;
        }
    }

    fn remove_leg(&mut self, leg: &LegId) {
        // Removed legs are never re-added.
        self.legs.remove(leg);
    }

    fn set_leg_color(&mut self, leg: &LegId, color: &str) {
        if let Some(record) = self.legs.get_mut(leg) {
            record.style.color = color.to_string();
        }
    }
}
