use foundation::math::GeoPoint;
use foundation::time::Millis;
use routes::Route;
use tracing::{debug, info};

use crate::config::TimingConfig;
use crate::dots::dot_positions;
use crate::reveal::{reveal_progress, revealed_lines};
use crate::state::{AnimationState, Phase};

/// What one frame produced for the map.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutput {
    /// Nothing to draw: no route, or the driver is stopped.
    Idle,
    /// Partially revealed route for the line source.
    Reveal(Vec<Vec<GeoPoint>>),
    /// The whole route; emitted once, on the frame the reveal finishes.
    RevealComplete(Vec<Vec<GeoPoint>>),
    /// Every dot position for the point source.
    Dots(Vec<GeoPoint>),
}

/// Frame-driven state machine behind the route animation.
///
/// Both clocks advance by the delta between consecutive `advance` calls.
/// [`RouteAnimation::pause`] forgets the previous timestamp, so time spent
/// between a pause and the next frame is never counted.
#[derive(Debug, Clone)]
pub struct RouteAnimation {
    timing: TimingConfig,
    route: Option<Route>,
    state: AnimationState,
    last_frame: Option<Millis>,
    loop_entries: u32,
}

impl RouteAnimation {
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            timing,
            route: None,
            state: AnimationState::default(),
            last_frame: None,
            loop_entries: 0,
        }
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// How many times the driver has entered [`Phase::LoopingDots`].
    pub fn loop_entries(&self) -> u32 {
        self.loop_entries
    }

    pub fn reveal_total_ms(&self) -> f64 {
        let segments = self.route.as_ref().map_or(0, Route::segment_count);
        self.timing.reveal_total_ms(segments)
    }

    /// Starts revealing `route` from the beginning. Ignored once stopped.
    pub fn load_route(&mut self, route: Route) {
        if self.state.phase == Phase::Stopped {
            return;
        }
        info!(
            segments = route.segment_count(),
            total_km = route.total_km(),
            "route reveal started"
        );
        self.route = Some(route);
        self.state = AnimationState {
            phase: Phase::Revealing,
            ..AnimationState::default()
        };
        self.last_frame = None;
    }

    /// Advances to host time `now` and returns the frame's payload.
    pub fn advance(&mut self, now: Millis) -> FrameOutput {
        let Some(route) = self.route.as_ref() else {
            return FrameOutput::Idle;
        };
        if !self.state.phase.is_running() {
            return FrameOutput::Idle;
        }
        let dt = self.last_frame.map_or(0.0, |last| now.since(last));
        self.last_frame = Some(now);

        match self.state.phase {
            Phase::Revealing => {
                let per_segment = self.timing.segment_duration_ms;
                let total = self.timing.reveal_total_ms(route.segment_count());
                self.state.elapsed_ms = (self.state.elapsed_ms + dt).min(total);
                let progress =
                    reveal_progress(self.state.elapsed_ms, per_segment, route.segment_count());
                self.state.current_segment_index = progress.segment_index;
                self.state.partial_fraction = progress.fraction;

                if progress.complete {
                    self.state.phase = Phase::LoopingDots;
                    self.state.dots_elapsed_ms = 0.0;
                    self.loop_entries += 1;
                    info!(elapsed_ms = self.state.elapsed_ms, "route revealed, looping dots");
                    FrameOutput::RevealComplete(route.full_lines().to_vec())
                } else {
                    FrameOutput::Reveal(revealed_lines(route, progress))
                }
            }
            Phase::LoopingDots => {
                self.state.dots_elapsed_ms += dt;
                FrameOutput::Dots(dot_positions(route, self.state.dots_elapsed_ms, &self.timing))
            }
            Phase::Idle | Phase::Stopped => FrameOutput::Idle,
        }
    }

    /// Drops the frame-to-frame delta; the next frame advances by zero.
    pub fn pause(&mut self) {
        if self.last_frame.take().is_some() {
            debug!(phase = %self.state.phase, "animation clock paused");
        }
    }

    /// Terminal: releases the route.
    pub fn stop(&mut self) {
        self.route = None;
        self.last_frame = None;
        self.state.phase = Phase::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameOutput, RouteAnimation};
    use crate::config::TimingConfig;
    use crate::state::Phase;
    use crate::test_support::default_route;
    use foundation::time::Millis;
    use pretty_assertions::assert_eq;

    fn revealing() -> RouteAnimation {
        let mut driver = RouteAnimation::new(TimingConfig::default());
        driver.load_route(default_route());
        driver
    }

    #[test]
    fn idle_without_route() {
        let mut driver = RouteAnimation::new(TimingConfig::default());
        assert_eq!(driver.advance(Millis(16.0)), FrameOutput::Idle);
        assert_eq!(driver.phase(), Phase::Idle);
    }

    #[test]
    fn first_frame_draws_the_origin() {
        let mut driver = revealing();
        let first = default_route().first_point().expect("first point");
        assert_eq!(
            driver.advance(Millis(5000.0)),
            FrameOutput::Reveal(vec![vec![first]])
        );
        assert_eq!(driver.state().elapsed_ms, 0.0);
    }

    #[test]
    fn elapsed_accumulates_frame_deltas() {
        let mut driver = revealing();
        driver.advance(Millis(100.0));
        driver.advance(Millis(1000.0));
        driver.advance(Millis(1450.0));
        let state = driver.state();
        assert_eq!(state.elapsed_ms, 1350.0);
        assert_eq!(state.current_segment_index, 1);
        assert!((state.partial_fraction - 0.5).abs() < 1e-12);
    }

    #[test]
    fn loop_is_entered_exactly_once() {
        let mut driver = revealing();
        let route = default_route();
        driver.advance(Millis(0.0));
        let out = driver.advance(Millis(7200.0));
        assert_eq!(out, FrameOutput::RevealComplete(route.full_lines().to_vec()));
        assert_eq!(driver.phase(), Phase::LoopingDots);

        for i in 1..=10 {
            match driver.advance(Millis(7200.0 + i as f64 * 16.0)) {
                FrameOutput::Dots(points) => assert_eq!(points.len(), 16),
                other => panic!("expected dots, got {other:?}"),
            }
        }
        assert_eq!(driver.loop_entries(), 1);
        assert_eq!(driver.state().dots_elapsed_ms, 160.0);
    }

    #[test]
    fn overshoot_clamps_elapsed() {
        let mut driver = revealing();
        driver.advance(Millis(0.0));
        driver.advance(Millis(1.0e7));
        assert_eq!(driver.state().elapsed_ms, driver.reveal_total_ms());
    }

    #[test]
    fn paused_time_is_not_counted() {
        let mut driver = revealing();
        driver.advance(Millis(0.0));
        driver.advance(Millis(300.0));
        driver.pause();
        driver.advance(Millis(60_000.0));
        driver.advance(Millis(60_100.0));
        assert_eq!(driver.state().elapsed_ms, 400.0);
    }

    #[test]
    fn stopped_driver_ignores_frames_and_routes() {
        let mut driver = revealing();
        driver.stop();
        assert_eq!(driver.advance(Millis(16.0)), FrameOutput::Idle);
        driver.load_route(default_route());
        assert_eq!(driver.phase(), Phase::Stopped);
        assert!(driver.route().is_none());
    }
}
