use foundation::math::GeoPoint;
use routes::Route;

use crate::config::TimingConfig;

/// Phase in [0, 1) of dot `k` after `dots_elapsed_ms` of looping.
pub fn dot_phase(dots_elapsed_ms: f64, k: usize, timing: &TimingConfig) -> f64 {
    let laps = dots_elapsed_ms / timing.dot_lap_ms;
    let t = (laps - k as f64 * timing.dot_phase_offset).rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs.
    if t >= 1.0 { 0.0 } else { t }
}

/// Every dot on every segment, segment-major, as one batch.
pub fn dot_positions(route: &Route, dots_elapsed_ms: f64, timing: &TimingConfig) -> Vec<GeoPoint> {
    let per_segment = timing.dots_per_segment;
    let mut points = Vec::with_capacity(route.segment_count() * per_segment);
    for segment in route.segments() {
        for k in 0..per_segment {
            let t = dot_phase(dots_elapsed_ms, k, timing);
            if let Some(p) = segment.point_at_fraction(t) {
                points.push(p);
            }
        }
    }
    points
}
