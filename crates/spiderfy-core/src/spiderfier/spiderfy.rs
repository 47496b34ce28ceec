use super::{ClickOutcome, SPIDERFIED_Z_OFFSET, SpiderState, Spiderfier};
use crate::events::Notification;
use crate::geom::{LatLng, LayerPoint, centroid, extract_nearest, squared_distance};
use crate::host::{LegStyle, MapHost, MarkerEvent};
use crate::layout::foot_points;
use crate::registry::{HighlightListeners, SpiderLeg};
use tracing::{debug, trace};

struct NearbyMarker<M> {
    marker: M,
    point: LayerPoint,
}

impl<H: MapHost> Spiderfier<H> {
    /// Handles a click on `marker`.
    ///
    /// A marker that is already spread out only produces a `click` notification. With
    /// `keep_spiderfied` unset the cluster is collapsed first and every marker, the clicked one
    /// included, goes back to its usual position.
    ///
    /// Only reached through [`Spiderfier::handle_marker_event`], which filters out untracked
    /// markers.
    pub(crate) fn spider_listener(&mut self, host: &mut H, marker: &H::Marker) -> ClickOutcome {
        let spiderfied = self.is_spiderfied(marker);
        let position = host.marker_position(marker);
        if !spiderfied || !self.options.keep_spiderfied {
            self.unspiderfy(host, None);
        }
        if spiderfied {
            return self.emit_click(marker, position);
        }

        let px_sq = self.options.nearby_distance * self.options.nearby_distance;
        let marker_pt = host.project(host.marker_position(marker));
        let mut nearby = Vec::new();
        let mut non_nearby = Vec::new();
        for m in self.registry.iter() {
            if !host.has_marker(m) {
                continue;
            }
            let point = host.project(host.marker_position(m));
            if squared_distance(point, marker_pt) < px_sq {
                nearby.push(NearbyMarker {
                    marker: m.clone(),
                    point,
                });
            } else {
                non_nearby.push(m.clone());
            }
        }

        // The clicked marker is its own only neighbour: not a cluster.
        if nearby.len() < 2 {
            return self.emit_click(marker, position);
        }
        self.spiderfy(host, nearby, non_nearby)
    }

    fn emit_click(&mut self, marker: &H::Marker, position: LatLng) -> ClickOutcome {
        self.listeners.trigger(&Notification::Click { marker, position });
        ClickOutcome::Click
    }

    fn spiderfy(
        &mut self,
        host: &mut H,
        mut nearby: Vec<NearbyMarker<H::Marker>>,
        non_nearby: Vec<H::Marker>,
    ) -> ClickOutcome {
        self.set_state(SpiderState::Spiderfying);

        let count = nearby.len();
        let points: Vec<LayerPoint> = nearby.iter().map(|n| n.point).collect();
        let body = centroid(&points);
        let (layout, feet) = foot_points(count, body, &self.options);
        debug!(feet = count, ?layout, "spiderfy");

        let style = LegStyle {
            color: self.options.leg_colors.usual.clone(),
            weight: self.options.leg_weight,
            interactive: false,
        };
        let highlight_legs = self.options.highlights_legs();

        let mut spiderfied = Vec::with_capacity(count);
        for foot in feet {
            let Some(nearest) = extract_nearest(&mut nearby, |n| squared_distance(n.point, foot))
            else {
                break;
            };
            let marker = nearest.marker;
            let Some(tracked) = self.registry.get_mut(&marker) else {
                continue;
            };
            let foot_pos = host.unproject(foot);
            let usual_position = host.marker_position(&marker);
            trace!(?marker, x = foot.x, y = foot.y, "foot assigned");

            let leg = host.create_leg([usual_position, foot_pos], &style);
            host.add_leg(&leg);
            let highlight = highlight_legs.then(|| HighlightListeners {
                over: host.subscribe_marker(&marker, MarkerEvent::MouseOver),
                out: host.subscribe_marker(&marker, MarkerEvent::MouseOut),
            });
            tracked.spider = Some(SpiderLeg {
                usual_position,
                leg,
                highlight,
            });

            host.set_marker_position(&marker, foot_pos);
            let z = host.z_index_offset(&marker);
            host.set_z_index_offset(&marker, z.wrapping_add(SPIDERFIED_Z_OFFSET));
            spiderfied.push(marker);
        }

        self.set_state(SpiderState::Spiderfied);
        self.listeners.trigger(&Notification::Spiderfy {
            markers: &spiderfied,
            non_nearby: &non_nearby,
        });
        ClickOutcome::Spiderfy {
            feet: spiderfied.len(),
            layout,
        }
    }
}
