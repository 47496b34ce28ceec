#![forbid(unsafe_code)]

//! An in-memory map host for `spiderfy-core`.
//!
//! `HeadlessMap` keeps markers, legs and subscriptions in plain collections and projects with
//! spherical Web Mercator, so the spiderfier can be exercised (and inspected) without a real map.

pub mod error;
pub mod map;
pub mod projection;
pub mod scene;

pub use error::{Error, Result};
pub use map::{HeadlessMap, LegId, LegRecord, MarkerId, MarkerRecord, SubscriptionId};
pub use scene::{Scene, SceneMarker};
