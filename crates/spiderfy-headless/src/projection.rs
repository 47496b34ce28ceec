//! Spherical Web Mercator, as used by slippy-map tiles.

use spiderfy_core::{LatLng, LayerPoint, layer_point};
use std::f64::consts::{FRAC_PI_4, TAU};

pub const TILE_SIZE: f64 = 256.0;
/// Latitude at which the projection turns the world into a square.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// Absolute pixel position of `pos` at `zoom`.
pub fn to_world_pixel(pos: LatLng, zoom: f64) -> LayerPoint {
    let size = world_size(zoom);
    let lat = pos.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = size * (pos.lng / 360.0 + 0.5);
    let y = size * (0.5 - (FRAC_PI_4 + lat / 2.0).tan().ln() / TAU);
    layer_point(x, y)
}

pub fn from_world_pixel(px: LayerPoint, zoom: f64) -> LatLng {
    let size = world_size(zoom);
    let lng = (px.x / size - 0.5) * 360.0;
    let m = (0.5 - px.y / size) * TAU;
    let lat = (2.0 * m.exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
    LatLng::new(lat, lng)
}
