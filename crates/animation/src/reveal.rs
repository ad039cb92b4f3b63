use foundation::math::GeoPoint;
use routes::{Route, append_split_parts};

/// Where the reveal stands at a given elapsed time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RevealProgress {
    pub segment_index: usize,
    pub fraction: f64,
    pub complete: bool,
}

/// Maps the reveal clock onto a segment index and in-segment fraction.
///
/// `elapsed_ms` is clamped to `[0, segment_count * per_segment_ms]`. At the
/// end the last segment reports fraction 1.
pub fn reveal_progress(elapsed_ms: f64, per_segment_ms: f64, segment_count: usize) -> RevealProgress {
    if segment_count == 0 || per_segment_ms <= 0.0 {
        return RevealProgress {
            segment_index: 0,
            fraction: 1.0,
            complete: true,
        };
    }
    let total = per_segment_ms * segment_count as f64;
    let elapsed = elapsed_ms.clamp(0.0, total);
    if elapsed >= total {
        return RevealProgress {
            segment_index: segment_count - 1,
            fraction: 1.0,
            complete: true,
        };
    }
    let index = ((elapsed / per_segment_ms).floor() as usize).min(segment_count - 1);
    let fraction = ((elapsed - index as f64 * per_segment_ms) / per_segment_ms).clamp(0.0, 1.0);
    RevealProgress {
        segment_index: index,
        fraction,
        complete: false,
    }
}

/// The drawn route at `progress`: all earlier segments in full plus the
/// revealed prefix of the current one, split at the antimeridian.
pub fn revealed_lines(route: &Route, progress: RevealProgress) -> Vec<Vec<GeoPoint>> {
    if progress.complete {
        return route.full_lines().to_vec();
    }
    let segments = route.segments();
    let current = progress.segment_index.min(segments.len().saturating_sub(1));

    let mut lines = Vec::new();
    for segment in &segments[..current] {
        append_split_parts(&mut lines, segment.points());
    }
    if let Some(segment) = segments.get(current) {
        append_split_parts(&mut lines, segment.revealed_prefix(progress.fraction));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{RevealProgress, reveal_progress, revealed_lines};
    use crate::test_support::default_route;
    use pretty_assertions::assert_eq;

    #[test]
    fn progress_at_start_and_end() {
        assert_eq!(
            reveal_progress(0.0, 900.0, 8),
            RevealProgress {
                segment_index: 0,
                fraction: 0.0,
                complete: false
            }
        );
        let end = reveal_progress(7200.0, 900.0, 8);
        assert!(end.complete);
        assert_eq!(end.segment_index, 7);
        assert_eq!(end.fraction, 1.0);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(reveal_progress(-50.0, 900.0, 8).segment_index, 0);
        assert!(reveal_progress(1.0e9, 900.0, 8).complete);
    }

    #[test]
    fn mid_segment_progress() {
        let p = reveal_progress(900.0 * 2.5, 900.0, 8);
        assert_eq!(p.segment_index, 2);
        assert!((p.fraction - 0.5).abs() < 1e-12);
        assert!(!p.complete);
    }

    #[test]
    fn zero_elapsed_draws_first_point_only() {
        let route = default_route();
        let lines = revealed_lines(&route, reveal_progress(0.0, 900.0, route.segment_count()));
        let first = route.first_point().expect("first point");
        assert_eq!(lines, vec![vec![first]]);
    }

    #[test]
    fn complete_reveal_is_full_route() {
        let route = default_route();
        let lines = revealed_lines(&route, reveal_progress(7200.0, 900.0, route.segment_count()));
        assert_eq!(lines, route.full_lines().to_vec());
    }

    #[test]
    fn revealed_vertex_count_grows_with_time() {
        let route = default_route();
        let count = route.segment_count();
        let mut previous = 0;
        for step in 0..=72 {
            let progress = reveal_progress(step as f64 * 100.0, 900.0, count);
            let vertices: usize = revealed_lines(&route, progress).iter().map(Vec::len).sum();
            assert!(vertices >= previous, "step {step}: {vertices} < {previous}");
            previous = vertices;
        }
    }

    #[test]
    fn revealed_lines_never_jump_the_dateline() {
        let route = default_route();
        let count = route.segment_count();
        for step in 0..=72 {
            let progress = reveal_progress(step as f64 * 100.0, 900.0, count);
            for line in revealed_lines(&route, progress) {
                assert!(!line.is_empty());
                for pair in line.windows(2) {
                    assert!((pair[1].lon_deg - pair[0].lon_deg).abs() <= 180.0);
                }
            }
        }
    }
}
