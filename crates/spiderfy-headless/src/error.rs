use crate::map::MarkerId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid scene JSON: {0}")]
    Scene(#[from] serde_json::Error),

    #[error("marker already exists: {id}")]
    DuplicateMarker { id: MarkerId },

    #[error("unknown marker: {id}")]
    UnknownMarker { id: MarkerId },

    #[error(transparent)]
    Core(#[from] spiderfy_core::Error),
}
