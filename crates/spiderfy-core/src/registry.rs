//! Ordered set of tracked markers and the auxiliary state kept for each of them.

use crate::geom::LatLng;
use crate::host::MapHost;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// Leg color listeners, present only while legs are highlightable.
pub(crate) struct HighlightListeners<S> {
    pub(crate) over: S,
    pub(crate) out: S,
}

/// State attached to a marker while it is displaced.
pub(crate) struct SpiderLeg<H: MapHost> {
    pub(crate) usual_position: LatLng,
    pub(crate) leg: H::Leg,
    pub(crate) highlight: Option<HighlightListeners<H::Subscription>>,
}

pub(crate) struct Tracked<H: MapHost> {
    pub(crate) click: H::Subscription,
    pub(crate) spider: Option<SpiderLeg<H>>,
}

/// Insertion-ordered, duplicate-free marker set. Each entry owns its click subscription.
pub(crate) struct MarkerRegistry<H: MapHost> {
    entries: IndexMap<H::Marker, Tracked<H>, FxBuildHasher>,
}

impl<H: MapHost> Default for MarkerRegistry<H> {
    fn default() -> Self {
        Self {
            entries: IndexMap::default(),
        }
    }
}

impl<H: MapHost> MarkerRegistry<H> {
    pub(crate) fn contains(&self, marker: &H::Marker) -> bool {
        self.entries.contains_key(marker)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn insert(&mut self, marker: H::Marker, click: H::Subscription) {
        self.entries.insert(
            marker,
            Tracked {
                click,
                spider: None,
            },
        );
    }

    /// Removes the entry and keeps the order of the remaining markers.
    pub(crate) fn remove(&mut self, marker: &H::Marker) -> Option<Tracked<H>> {
        self.entries.shift_remove(marker)
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (H::Marker, Tracked<H>)> + '_ {
        self.entries.drain(..)
    }

    pub(crate) fn get_mut(&mut self, marker: &H::Marker) -> Option<&mut Tracked<H>> {
        self.entries.get_mut(marker)
    }

    pub(crate) fn spider(&self, marker: &H::Marker) -> Option<&SpiderLeg<H>> {
        self.entries.get(marker)?.spider.as_ref()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &H::Marker> {
        self.entries.keys()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&H::Marker, &mut Tracked<H>)> {
        self.entries.iter_mut()
    }

    pub(crate) fn snapshot(&self) -> Vec<H::Marker> {
        self.entries.keys().cloned().collect()
    }
}
