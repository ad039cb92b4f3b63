#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerStyle {
    pub visible: bool,
    pub color: [f32; 4],
    pub opacity: f32,
}

impl LayerStyle {
    pub const fn new(visible: bool, color: [f32; 4], opacity: f32) -> Self {
        Self {
            visible,
            color,
            opacity,
        }
    }

    /// Visible style from an sRGB byte triple. Opacity is clamped to [0, 1].
    pub fn from_rgb(rgb: [u8; 3], opacity: f32) -> Self {
        let [r, g, b] = rgb.map(|c| c as f32 / 255.0);
        Self::new(true, [r, g, b, 1.0], opacity.clamp(0.0, 1.0))
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            visible: true,
            color: [1.0, 1.0, 1.0, 1.0],
            opacity: 1.0,
        }
    }
}

/// Square RGBA8 image registered with the map for point symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotIcon {
    pub size_px: u32,
    /// Row-major RGBA8 with straight alpha, `size_px * size_px * 4` bytes.
    pub rgba: Vec<u8>,
}

impl DotIcon {
    /// Filled disc with a soft halo.
    ///
    /// The inner 40% of the radius is opaque; alpha then falls off linearly
    /// to zero at the edge.
    pub fn glow(size_px: u32, color: [u8; 3]) -> Self {
        let size = size_px.max(1);
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        let center = size as f32 / 2.0;
        let radius = center;
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - center;
                let dy = y as f32 + 0.5 - center;
                let r = (dx * dx + dy * dy).sqrt() / radius;
                let alpha = if r <= 0.4 {
                    1.0
                } else {
                    ((1.0 - r) / 0.6).clamp(0.0, 1.0)
                };
                let a = (alpha * 255.0).round() as u8;
                rgba.extend_from_slice(&[color[0], color[1], color[2], a]);
            }
        }
        Self {
            size_px: size,
            rgba,
        }
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.size_px || y >= self.size_px {
            return None;
        }
        let idx = ((y * self.size_px + x) * 4 + 3) as usize;
        self.rgba.get(idx).copied()
    }
}
