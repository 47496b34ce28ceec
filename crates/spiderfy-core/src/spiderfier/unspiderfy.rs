use super::{SPIDERFIED_Z_OFFSET, SpiderState, Spiderfier};
use crate::events::Notification;
use crate::host::MapHost;
use tracing::debug;

impl<H: MapHost> Spiderfier<H> {
    /// Puts every displaced marker back and removes its leg.
    ///
    /// `marker_not_to_move` keeps its current (foot) position but is otherwise released like the
    /// rest. Returns `false`, without notifying anyone, when nothing is spread out.
    pub fn unspiderfy(&mut self, host: &mut H, marker_not_to_move: Option<&H::Marker>) -> bool {
        if self.state != SpiderState::Spiderfied {
            return false;
        }
        self.set_state(SpiderState::Unspiderfying);

        let mut restored = Vec::new();
        let mut non_nearby = Vec::new();
        for (marker, tracked) in self.registry.iter_mut() {
            let Some(spider) = tracked.spider.take() else {
                non_nearby.push(marker.clone());
                continue;
            };
            host.remove_leg(&spider.leg);
            if marker_not_to_move != Some(marker) {
                host.set_marker_position(marker, spider.usual_position);
            }
            let z = host.z_index_offset(marker);
            host.set_z_index_offset(marker, z.wrapping_sub(SPIDERFIED_Z_OFFSET));
            if let Some(hl) = spider.highlight {
                host.unsubscribe_marker(marker, hl.over);
                host.unsubscribe_marker(marker, hl.out);
            }
            restored.push(marker.clone());
        }
        debug!(restored = restored.len(), "unspiderfy");

        self.set_state(SpiderState::Idle);
        self.listeners.trigger(&Notification::Unspiderfy {
            markers: &restored,
            non_nearby: &non_nearby,
        });
        true
    }
}
