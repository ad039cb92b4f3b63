use std::collections::BTreeMap;

use crate::layer::{LayerId, LayerSpec};
use crate::surface::{MapSurface, SurfaceError};
use crate::symbology::DotIcon;
use crate::vector::SourceData;

/// In-memory [`MapSurface`] recording the latest payload of every source.
///
/// Used by the headless host and by tests. `loading` simulates a map whose
/// style has not finished loading, `remove` a map torn down while callers
/// still hold it.
#[derive(Debug, Default, Clone)]
pub struct MemorySurface {
    sources: BTreeMap<LayerId, SourceData>,
    writes: BTreeMap<LayerId, u64>,
    layers: Vec<LayerSpec>,
    images: BTreeMap<LayerId, DotIcon>,
    loading: bool,
    removed: bool,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that rejects every mutation with `NotReady` until
    /// [`MemorySurface::finish_loading`] is called.
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn remove(&mut self) {
        self.removed = true;
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn source(&self, id: &LayerId) -> Option<&SourceData> {
        self.sources.get(id)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of `set_source_data` calls that reached `id`.
    pub fn write_count(&self, id: &LayerId) -> u64 {
        self.writes.get(id).copied().unwrap_or(0)
    }

    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn image(&self, id: &LayerId) -> Option<&DotIcon> {
        self.images.get(id)
    }

    fn check_alive(&self) -> Result<(), SurfaceError> {
        if self.removed {
            Err(SurfaceError::Removed)
        } else if self.loading {
            Err(SurfaceError::NotReady)
        } else {
            Ok(())
        }
    }
}

impl MapSurface for MemorySurface {
    fn has_source(&self, id: &LayerId) -> bool {
        self.sources.contains_key(id)
    }

    fn add_source(&mut self, id: &LayerId, data: SourceData) -> Result<(), SurfaceError> {
        self.check_alive()?;
        if self.sources.contains_key(id) {
            return Err(SurfaceError::Duplicate(id.clone()));
        }
        self.sources.insert(id.clone(), data);
        Ok(())
    }

    fn set_source_data(&mut self, id: &LayerId, data: SourceData) -> Result<(), SurfaceError> {
        self.check_alive()?;
        let slot = self
            .sources
            .get_mut(id)
            .ok_or_else(|| SurfaceError::UnknownSource(id.clone()))?;
        if slot.kind() != data.kind() {
            return Err(SurfaceError::KindMismatch {
                id: id.clone(),
                expected: slot.kind(),
                found: data.kind(),
            });
        }
        *slot = data;
        *self.writes.entry(id.clone()).or_insert(0) += 1;
        Ok(())
    }

    fn has_layer(&self, id: &LayerId) -> bool {
        self.layers.iter().any(|l| &l.id == id)
    }

    fn add_layer(&mut self, layer: LayerSpec) -> Result<(), SurfaceError> {
        self.check_alive()?;
        if self.has_layer(&layer.id) {
            return Err(SurfaceError::Duplicate(layer.id));
        }
        if !self.sources.contains_key(&layer.source) {
            return Err(SurfaceError::DanglingLayer {
                layer: layer.id,
                source_id: layer.source,
            });
        }
        self.layers.push(layer);
        Ok(())
    }

    fn has_image(&self, id: &LayerId) -> bool {
        self.images.contains_key(id)
    }

    fn add_image(&mut self, id: &LayerId, icon: DotIcon) -> Result<(), SurfaceError> {
        self.check_alive()?;
        if self.images.contains_key(id) {
            return Err(SurfaceError::Duplicate(id.clone()));
        }
        self.images.insert(id.clone(), icon);
        Ok(())
    }
}
