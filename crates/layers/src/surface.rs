use thiserror::Error;

use crate::layer::{LayerId, LayerSpec, SourceKind};
use crate::symbology::DotIcon;
use crate::vector::SourceData;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("map surface is not ready")]
    NotReady,
    #[error("unknown source: {0}")]
    UnknownSource(LayerId),
    #[error("source {id} holds {expected:?}, got {found:?}")]
    KindMismatch {
        id: LayerId,
        expected: SourceKind,
        found: SourceKind,
    },
    #[error("layer {layer} references unknown source {source_id}")]
    DanglingLayer { layer: LayerId, source_id: LayerId },
    #[error("{0} already exists")]
    Duplicate(LayerId),
    #[error("map surface removed")]
    Removed,
}

/// The hosting map: data sources, visual layers and registered images.
///
/// Implementations may fail at any time (surface torn down mid-frame); callers
/// in this workspace treat every error as transient.
pub trait MapSurface {
    fn has_source(&self, id: &LayerId) -> bool;
    fn add_source(&mut self, id: &LayerId, data: SourceData) -> Result<(), SurfaceError>;
    fn set_source_data(&mut self, id: &LayerId, data: SourceData) -> Result<(), SurfaceError>;

    fn has_layer(&self, id: &LayerId) -> bool;
    fn add_layer(&mut self, layer: LayerSpec) -> Result<(), SurfaceError>;

    fn has_image(&self, id: &LayerId) -> bool;
    fn add_image(&mut self, id: &LayerId, icon: DotIcon) -> Result<(), SurfaceError>;
}
