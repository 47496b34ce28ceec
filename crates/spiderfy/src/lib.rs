#![forbid(unsafe_code)]

//! `spiderfy` spreads overlapping map markers apart when one of them is clicked.
//!
//! The algorithm and state machine live in `spiderfy-core` and are re-exported here. Hosts
//! implement [`MapHost`] for their map and forward marker/map events to the [`Spiderfier`].
//!
//! # Features
//!
//! - `headless`: an in-memory Web Mercator host (`spiderfy::headless`), handy for tests and
//!   offline tooling.

pub use spiderfy_core::*;

#[cfg(feature = "headless")]
pub mod headless {
    pub use spiderfy_headless::projection;
    pub use spiderfy_headless::{
        Error, HeadlessMap, LegId, LegRecord, MarkerId, MarkerRecord, Result, Scene, SceneMarker,
        SubscriptionId,
    };
}
