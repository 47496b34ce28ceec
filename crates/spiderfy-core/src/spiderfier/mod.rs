//! The spiderfier: marker registry front-end, click handling and the spider state machine.

mod spiderfy;
mod unspiderfy;

use crate::events::{Channel, ListenerId, Listeners, Notification};
use crate::host::{MapEvent, MapHost, MarkerEvent};
use crate::layout::LayoutKind;
use crate::options::SpiderfyOptions;
use crate::registry::MarkerRegistry;
use tracing::debug;

/// Z-order boost applied to displaced markers so they render above everything else.
pub const SPIDERFIED_Z_OFFSET: i32 = 1_000_000;

/// Global spider state.
///
/// Only `Idle` and `Spiderfied` are ever observed from outside: notifications fire after the
/// state has settled and the host cannot reach the engine while an operation runs. The
/// transient variants exist for the `tracing` transition log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpiderState {
    #[default]
    Idle,
    /// Markers are being moved onto their feet.
    Spiderfying,
    /// A cluster is spread out.
    Spiderfied,
    /// Legs are being torn down and markers restored.
    Unspiderfying,
}

/// What a marker click resulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No cluster (or the marker was already spread out): a `click` notification was sent.
    Click,
    Spiderfy { feet: usize, layout: LayoutKind },
}

pub struct Spiderfier<H: MapHost> {
    options: SpiderfyOptions,
    state: SpiderState,
    registry: MarkerRegistry<H>,
    listeners: Listeners<H::Marker>,
    map_subscriptions: Vec<H::Subscription>,
}

impl<H: MapHost> std::fmt::Debug for Spiderfier<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spiderfier")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("markers", &self.registry.len())
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl<H: MapHost> Spiderfier<H> {
    /// Creates a spiderfier and subscribes to map clicks and zoom ends, both of which collapse
    /// any spread-out cluster.
    pub fn new(host: &mut H, options: SpiderfyOptions) -> Self {
        let map_subscriptions = [MapEvent::Click, MapEvent::ZoomEnd]
            .into_iter()
            .map(|event| host.subscribe_map(event))
            .collect();
        Self {
            options,
            state: SpiderState::Idle,
            registry: MarkerRegistry::default(),
            listeners: Listeners::default(),
            map_subscriptions,
        }
    }

    pub fn options(&self) -> &SpiderfyOptions {
        &self.options
    }

    /// Options may be changed at any time; they apply from the next spiderfy on.
    pub fn options_mut(&mut self) -> &mut SpiderfyOptions {
        &mut self.options
    }

    pub fn state(&self) -> SpiderState {
        self.state
    }

    pub fn is_spiderfied(&self, marker: &H::Marker) -> bool {
        self.registry.spider(marker).is_some()
    }

    fn set_state(&mut self, state: SpiderState) {
        debug!(from = ?self.state, to = ?state, "spider state");
        self.state = state;
    }

    pub fn add_marker(&mut self, host: &mut H, marker: H::Marker) -> &mut Self {
        if self.registry.contains(&marker) {
            debug!(?marker, "marker already tracked");
            return self;
        }
        let click = host.subscribe_marker(&marker, MarkerEvent::Click);
        self.registry.insert(marker, click);
        self
    }

    /// Stops tracking `marker`. A spread-out cluster is collapsed first so no leg is left behind.
    pub fn remove_marker(&mut self, host: &mut H, marker: &H::Marker) -> &mut Self {
        if self.is_spiderfied(marker) {
            self.unspiderfy(host, None);
        }
        match self.registry.remove(marker) {
            Some(tracked) => host.unsubscribe_marker(marker, tracked.click),
            None => debug!(?marker, "remove of untracked marker"),
        }
        self
    }

    pub fn clear_markers(&mut self, host: &mut H) -> &mut Self {
        self.unspiderfy(host, None);
        for (marker, tracked) in self.registry.drain() {
            host.unsubscribe_marker(&marker, tracked.click);
        }
        self
    }

    /// Snapshot of the tracked markers in insertion order.
    pub fn markers(&self) -> Vec<H::Marker> {
        self.registry.snapshot()
    }

    pub fn add_listener(
        &mut self,
        channel: Channel,
        callback: impl FnMut(&Notification<'_, H::Marker>) + 'static,
    ) -> ListenerId {
        self.listeners.add(channel, callback)
    }

    pub fn remove_listener(&mut self, channel: Channel, id: ListenerId) -> &mut Self {
        self.listeners.remove(channel, id);
        self
    }

    pub fn clear_listeners(&mut self, channel: Channel) -> &mut Self {
        self.listeners.clear(channel);
        self
    }

    /// Entry point for subscribed marker events.
    ///
    /// Returns the click outcome for clicks on tracked markers and `None` otherwise.
    pub fn handle_marker_event(
        &mut self,
        host: &mut H,
        marker: &H::Marker,
        event: MarkerEvent,
    ) -> Option<ClickOutcome> {
        let color = match event {
            MarkerEvent::Click => {
                if !self.registry.contains(marker) {
                    return None;
                }
                return Some(self.spider_listener(host, marker));
            }
            MarkerEvent::MouseOver => &self.options.leg_colors.highlighted,
            MarkerEvent::MouseOut => &self.options.leg_colors.usual,
        };
        if let Some(spider) = self.registry.spider(marker) {
            if spider.highlight.is_some() {
                host.set_leg_color(&spider.leg, color);
            }
        }
        None
    }

    /// Entry point for subscribed map events. Both map clicks and zoom ends collapse the cluster.
    pub fn handle_map_event(&mut self, host: &mut H, event: MapEvent) {
        debug!(?event, "map event");
        self.unspiderfy(host, None);
    }

    /// Collapses any cluster, releases every marker and drops the map subscriptions.
    pub fn detach(mut self, host: &mut H) {
        self.clear_markers(host);
        for subscription in self.map_subscriptions.drain(..) {
            host.unsubscribe_map(subscription);
        }
    }
}
