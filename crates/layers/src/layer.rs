use crate::symbology::LayerStyle;

/// Map-side identifier of a layer, source or image.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Lines,
    Points,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Line { width_px: f32 },
    /// Points drawn with a registered image.
    Symbol { icon: LayerId, size: f32 },
}

/// Visual layer bound to one data source.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: LayerId,
    pub source: LayerId,
    pub kind: LayerKind,
    pub style: LayerStyle,
}

impl LayerSpec {
    pub fn line(id: impl Into<String>, source: impl Into<String>, width_px: f32) -> Self {
        Self {
            id: LayerId::new(id),
            source: LayerId::new(source),
            kind: LayerKind::Line { width_px },
            style: LayerStyle::default(),
        }
    }

    pub fn symbol(
        id: impl Into<String>,
        source: impl Into<String>,
        icon: impl Into<String>,
        size: f32,
    ) -> Self {
        Self {
            id: LayerId::new(id),
            source: LayerId::new(source),
            kind: LayerKind::Symbol {
                icon: LayerId::new(icon),
                size,
            },
            style: LayerStyle::default(),
        }
    }

    pub fn with_style(mut self, style: LayerStyle) -> Self {
        self.style = style;
        self
    }
}
