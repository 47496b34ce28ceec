//! Listener registry for `click`, `spiderfy` and `unspiderfy` notifications.
//!
//! Delivery is synchronous and in registration order. A panicking listener unwinds through the
//! operation that triggered it; nothing is caught here.

use crate::geom::LatLng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Click,
    Spiderfy,
    Unspiderfy,
}

impl Channel {
    const ALL: [Channel; 3] = [Channel::Click, Channel::Spiderfy, Channel::Unspiderfy];

    fn index(self) -> usize {
        match self {
            Channel::Click => 0,
            Channel::Spiderfy => 1,
            Channel::Unspiderfy => 2,
        }
    }
}

#[derive(Debug)]
pub enum Notification<'a, M> {
    /// A marker was clicked without forming a cluster, or was clicked while spread out.
    /// `position` is where the marker was when it was clicked.
    Click { marker: &'a M, position: LatLng },
    Spiderfy {
        markers: &'a [M],
        non_nearby: &'a [M],
    },
    Unspiderfy {
        markers: &'a [M],
        non_nearby: &'a [M],
    },
}

impl<M> Notification<'_, M> {
    pub fn channel(&self) -> Channel {
        match self {
            Notification::Click { .. } => Channel::Click,
            Notification::Spiderfy { .. } => Channel::Spiderfy,
            Notification::Unspiderfy { .. } => Channel::Unspiderfy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Callback<M> = Box<dyn FnMut(&Notification<'_, M>)>;

pub struct Listeners<M> {
    next_id: u64,
    channels: [Vec<(ListenerId, Callback<M>)>; 3],
}

impl<M> Default for Listeners<M> {
    fn default() -> Self {
        Self {
            next_id: 0,
            channels: [Vec::new(), Vec::new(), Vec::new()],
        }
    }
}

impl<M> fmt::Debug for Listeners<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for channel in Channel::ALL {
            map.entry(&channel, &self.len(channel));
        }
        map.finish()
    }
}

impl<M> Listeners<M> {
    pub fn add(
        &mut self,
        channel: Channel,
        callback: impl FnMut(&Notification<'_, M>) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.channels[channel.index()].push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if `id` was not registered on `channel`.
    pub fn remove(&mut self, channel: Channel, id: ListenerId) -> bool {
        let list = &mut self.channels[channel.index()];
        match list.iter().position(|(lid, _)| *lid == id) {
            Some(idx) => {
                list.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, channel: Channel) {
        self.channels[channel.index()].clear();
    }

    pub fn len(&self, channel: Channel) -> usize {
        self.channels[channel.index()].len()
    }

    /// Calls every listener of the notification's channel and returns how many ran.
    pub fn trigger(&mut self, notification: &Notification<'_, M>) -> usize {
        let list = &mut self.channels[notification.channel().index()];
        for (_, callback) in list.iter_mut() {
            callback(notification);
        }
        list.len()
    }
}
