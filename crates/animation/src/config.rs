use std::fs;
use std::path::Path;

use routes::{MAX_LEG_STEPS, RoutePlan};
use runtime::DEFAULT_INTERSECTION_THRESHOLD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Reveal time for one segment.
    pub segment_duration_ms: f64,
    /// Time for a dot to travel one full segment.
    pub dot_lap_ms: f64,
    pub dots_per_segment: usize,
    /// How far each following dot trails the previous one, in laps.
    pub dot_phase_offset: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            segment_duration_ms: 900.0,
            dot_lap_ms: 1800.0,
            dots_per_segment: 2,
            dot_phase_offset: 0.12,
        }
    }
}

impl TimingConfig {
    pub fn reveal_total_ms(&self, segment_count: usize) -> f64 {
        self.segment_duration_ms * segment_count as f64
    }
}

/// Ids of the map resources owned by the route animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerIds {
    pub line_source: String,
    pub line_layer: String,
    pub dot_source: String,
    pub dot_layer: String,
    pub dot_icon: String,
    pub line_width_px: f32,
    pub line_color: [u8; 3],
    pub line_opacity: f32,
    pub dot_icon_px: u32,
    pub dot_color: [u8; 3],
}

impl Default for LayerIds {
    fn default() -> Self {
        Self {
            line_source: "route-line".to_string(),
            line_layer: "route-line-layer".to_string(),
            dot_source: "route-dots".to_string(),
            dot_layer: "route-dots-layer".to_string(),
            dot_icon: "route-dot".to_string(),
            line_width_px: 2.0,
            line_color: [0x0e, 0xa5, 0xe9],
            line_opacity: 0.85,
            dot_icon_px: 24,
            dot_color: [0x38, 0xbd, 0xf8],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteAnimationConfig {
    pub route: RoutePlan,
    pub timing: TimingConfig,
    pub layers: LayerIds,
    pub visibility_threshold: f64,
}

impl Default for RouteAnimationConfig {
    fn default() -> Self {
        Self {
            route: RoutePlan::default(),
            timing: TimingConfig::default(),
            layers: LayerIds::default(),
            visibility_threshold: DEFAULT_INTERSECTION_THRESHOLD,
        }
    }
}

impl RouteAnimationConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let payload = fs::read_to_string(path)?;
        Self::from_json_str(&payload)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        if !(t.segment_duration_ms.is_finite() && t.segment_duration_ms > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "segment_duration_ms must be positive, got {}",
                t.segment_duration_ms
            )));
        }
        if !(t.dot_lap_ms.is_finite() && t.dot_lap_ms > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "dot_lap_ms must be positive, got {}",
                t.dot_lap_ms
            )));
        }
        if !(0.0..1.0).contains(&t.dot_phase_offset) {
            return Err(ConfigError::Invalid(format!(
                "dot_phase_offset must be in [0, 1), got {}",
                t.dot_phase_offset
            )));
        }
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            return Err(ConfigError::Invalid(format!(
                "visibility_threshold must be in [0, 1], got {}",
                self.visibility_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.route.curvature) {
            return Err(ConfigError::Invalid(format!(
                "route.curvature must be in [0, 1], got {}",
                self.route.curvature
            )));
        }
        if self.route.steps > MAX_LEG_STEPS {
            return Err(ConfigError::Invalid(format!(
                "route.steps must be at most {MAX_LEG_STEPS}, got {}",
                self.route.steps
            )));
        }
        if !(0.0..=1.0).contains(&self.layers.line_opacity) {
            return Err(ConfigError::Invalid(format!(
                "layers.line_opacity must be in [0, 1], got {}",
                self.layers.line_opacity
            )));
        }
        Ok(())
    }
}
