use tracing::debug;

use crate::layer::{LayerId, LayerSpec, SourceKind};
use crate::surface::{MapSurface, SurfaceError};
use crate::symbology::DotIcon;
use crate::vector::SourceData;

// Every helper checks the surface itself; there is no registry to fall out
// of sync with a map that was recreated.

/// Adds an empty source of `kind` unless `id` already exists.
///
/// Returns `true` when the source was created by this call.
pub fn ensure_source(
    surface: &mut impl MapSurface,
    id: &LayerId,
    kind: SourceKind,
) -> Result<bool, SurfaceError> {
    if surface.has_source(id) {
        return Ok(false);
    }
    surface.add_source(id, SourceData::empty(kind))?;
    debug!(source = %id, ?kind, "source added");
    Ok(true)
}

/// Adds `layer` unless a layer with the same id exists.
pub fn ensure_layer(surface: &mut impl MapSurface, layer: LayerSpec) -> Result<bool, SurfaceError> {
    if surface.has_layer(&layer.id) {
        return Ok(false);
    }
    let id = layer.id.clone();
    surface.add_layer(layer)?;
    debug!(layer = %id, "layer added");
    Ok(true)
}

/// Registers the image produced by `make` unless `id` is already registered.
///
/// `make` only runs when the image is missing.
pub fn ensure_image(
    surface: &mut impl MapSurface,
    id: &LayerId,
    make: impl FnOnce() -> DotIcon,
) -> Result<bool, SurfaceError> {
    if surface.has_image(id) {
        return Ok(false);
    }
    surface.add_image(id, make())?;
    debug!(image = %id, "image added");
    Ok(true)
}
