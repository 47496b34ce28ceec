//! JSON scene fixtures: a view, a set of markers and optional spiderfier options.

use crate::error::Result;
use crate::map::{HeadlessMap, MarkerId};
use serde::{Deserialize, Serialize};
use spiderfy_core::{LatLng, Spiderfier, SpiderfyOptions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default)]
    pub center: LatLng,
    pub zoom: f64,
    #[serde(default)]
    pub options: Option<SpiderfyOptions>,
    pub markers: Vec<SceneMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneMarker {
    pub id: MarkerId,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub z_index_offset: i32,
    #[serde(default = "default_on_map")]
    pub on_map: bool,
}

fn default_on_map() -> bool {
    true
}

impl Scene {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Builds the map and a spiderfier tracking every scene marker, in scene order.
    pub fn build(&self) -> Result<(HeadlessMap, Spiderfier<HeadlessMap>)> {
        let options = self.options.clone().unwrap_or_default();
        options.validate()?;

        let mut map = HeadlessMap::new(self.center, self.zoom);
        let mut engine = Spiderfier::new(&mut map, options);
        for m in &self.markers {
            let id = map.add_marker(m.id.clone(), LatLng::new(m.lat, m.lng), m.z_index_offset)?;
            if !m.on_map {
                map.remove_from_map(&id)?;
            }
            engine.add_marker(&mut map, id);
        }
        Ok((map, engine))
    }
}
