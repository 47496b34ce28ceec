#![forbid(unsafe_code)]

//! Headless overlapping-marker spiderfier.
//!
//! When several markers sit on (nearly) the same screen position, clicking one of them fans the
//! whole cluster out along a circle or a spiral, connects each displaced marker to its original
//! position with a leg, and restores everything on the next map click or zoom.
//!
//! The crate never renders or projects anything itself. The host map provides those
//! capabilities through [`MapHost`], and forwards marker/map events into the [`Spiderfier`].

pub mod error;
pub mod events;
pub mod geom;
pub mod host;
pub mod layout;
pub mod options;
mod registry;
pub mod spiderfier;

pub use error::{Error, Result};
pub use events::{Channel, ListenerId, Listeners, Notification};
pub use geom::{
    LatLng, LayerPoint, LayerSpace, centroid, extract_nearest, layer_point, squared_distance,
};
pub use host::{LegStyle, MapEvent, MapHost, MarkerEvent};
pub use layout::{LayoutKind, circle_points, foot_points, spiral_points};
pub use options::{LegColors, SpiderfyOptions};
pub use spiderfier::{ClickOutcome, SPIDERFIED_Z_OFFSET, SpiderState, Spiderfier};

/// Version of this crate, exposed for hosts that report plugin versions.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
