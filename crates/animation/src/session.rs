use formats::PlaceTable;
use foundation::time::Millis;
use layers::{
    DotIcon, LayerId, LayerSpec, LayerStyle, MapSurface, SourceData, SourceKind, SurfaceError,
    ensure_image, ensure_layer, ensure_source,
};
use routes::build_route;
use runtime::{FrameLoop, FrameRequestId, FrameScheduler, Visibility, VisibilityChange};
use tracing::{debug, info, warn};

use crate::config::{LayerIds, RouteAnimationConfig};
use crate::driver::{FrameOutput, RouteAnimation};
use crate::state::Phase;

/// A running route animation bound to one map surface.
///
/// The session owns every piece of mutable state. Hosts forward fired frame
/// callbacks to [`RouteSession::on_frame`] and visibility signals to the
/// `set_*` methods; [`RouteSession::dispose`] tears everything down and also
/// runs on drop.
///
/// Map resources are created lazily. Until the surface accepts them every
/// frame retries, and a write that finds its source gone schedules another
/// attempt.
pub struct RouteSession<S: MapSurface, F: FrameScheduler> {
    surface: S,
    scheduler: F,
    config: RouteAnimationConfig,
    driver: RouteAnimation,
    visibility: Visibility,
    reveal_loop: FrameLoop,
    dots_loop: FrameLoop,
    resources_ready: bool,
    disposed: bool,
}

/// Creates a session and, when `places` is given, starts revealing the
/// configured route.
///
/// A missing table or an unresolved waypoint leaves the session idle and
/// logs a warning; it never fails.
pub fn start_route_animation<S: MapSurface, F: FrameScheduler>(
    surface: S,
    scheduler: F,
    config: RouteAnimationConfig,
    places: Option<&PlaceTable>,
) -> RouteSession<S, F> {
    let mut session = RouteSession::new(surface, scheduler, config);
    match places {
        Some(places) => session.load_places(places),
        None => warn!("coordinate table unavailable, route animation idle"),
    }
    session
}

impl<S: MapSurface, F: FrameScheduler> RouteSession<S, F> {
    pub fn new(surface: S, scheduler: F, config: RouteAnimationConfig) -> Self {
        let driver = RouteAnimation::new(config.timing.clone());
        let visibility = Visibility::new(config.visibility_threshold);
        Self {
            surface,
            scheduler,
            config,
            driver,
            visibility,
            reveal_loop: FrameLoop::new("reveal"),
            dots_loop: FrameLoop::new("dots"),
            resources_ready: false,
            disposed: false,
        }
    }

    /// Resolves the route against `places` and restarts the reveal.
    pub fn load_places(&mut self, places: &PlaceTable) {
        if self.disposed {
            return;
        }
        let route = match build_route(&self.config.route, places.places()) {
            Ok(route) => route,
            Err(err) => {
                warn!(error = %err, places = places.len(), "route unavailable, animation idle");
                return;
            }
        };
        self.ensure_ready();
        self.reveal_loop.cancel(&mut self.scheduler);
        self.dots_loop.cancel(&mut self.scheduler);
        self.driver.load_route(route);
        self.arm_current();
    }

    /// Entry point for a fired frame callback.
    ///
    /// Callbacks for ids the session no longer owns are ignored.
    pub fn on_frame(&mut self, id: FrameRequestId, now: Millis) {
        if self.disposed {
            return;
        }
        let owned = self.reveal_loop.take_fired(id) || self.dots_loop.take_fired(id);
        if !owned {
            debug!(id = id.0, "stale frame callback ignored");
            return;
        }
        if !self.visibility.is_active() {
            return;
        }

        match self.driver.advance(now) {
            FrameOutput::Idle => {}
            FrameOutput::Reveal(lines) => {
                let id = LayerId::new(&self.config.layers.line_source);
                self.write(&id, SourceData::Lines(lines));
                self.reveal_loop.arm(&mut self.scheduler);
            }
            FrameOutput::RevealComplete(lines) => {
                let id = LayerId::new(&self.config.layers.line_source);
                self.write(&id, SourceData::Lines(lines));
                self.dots_loop.arm(&mut self.scheduler);
            }
            FrameOutput::Dots(points) => {
                let id = LayerId::new(&self.config.layers.dot_source);
                self.write(&id, SourceData::Points(points));
                self.dots_loop.arm(&mut self.scheduler);
            }
        }
    }

    /// Feeds the viewport intersection ratio of the map container.
    pub fn set_intersection_ratio(&mut self, ratio: f64) {
        let change = self.visibility.set_intersection_ratio(ratio);
        self.apply_visibility(change);
    }

    /// Feeds the document (tab) visibility.
    pub fn set_document_visible(&mut self, visible: bool) {
        let change = self.visibility.set_document_visible(visible);
        self.apply_visibility(change);
    }

    /// Cancels pending frames and releases the route. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.reveal_loop.cancel(&mut self.scheduler);
        self.dots_loop.cancel(&mut self.scheduler);
        self.driver.stop();
        info!("route animation disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn phase(&self) -> Phase {
        self.driver.phase()
    }

    pub fn driver(&self) -> &RouteAnimation {
        &self.driver
    }

    pub fn config(&self) -> &RouteAnimationConfig {
        &self.config
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    pub fn has_pending_frame(&self) -> bool {
        self.reveal_loop.is_pending() || self.dots_loop.is_pending()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    fn apply_visibility(&mut self, change: VisibilityChange) {
        if self.disposed {
            return;
        }
        match change {
            VisibilityChange::Suspended => {
                self.reveal_loop.cancel(&mut self.scheduler);
                self.dots_loop.cancel(&mut self.scheduler);
                self.driver.pause();
                debug!(phase = %self.driver.phase(), "route animation suspended");
            }
            VisibilityChange::Resumed => {
                self.arm_current();
                debug!(phase = %self.driver.phase(), "route animation resumed");
            }
            VisibilityChange::Unchanged => {}
        }
    }

    fn arm_current(&mut self) {
        if !self.visibility.is_active() {
            return;
        }
        match self.driver.phase() {
            Phase::Revealing => {
                self.reveal_loop.arm(&mut self.scheduler);
            }
            Phase::LoopingDots => {
                self.dots_loop.arm(&mut self.scheduler);
            }
            Phase::Idle | Phase::Stopped => {}
        }
    }

    fn ensure_resources(&mut self) -> Result<(), SurfaceError> {
        let ids: &LayerIds = &self.config.layers;
        let surface = &mut self.surface;

        ensure_source(surface, &LayerId::new(&ids.line_source), SourceKind::Lines)?;
        ensure_layer(
            surface,
            LayerSpec::line(&ids.line_layer, &ids.line_source, ids.line_width_px)
                .with_style(LayerStyle::from_rgb(ids.line_color, ids.line_opacity)),
        )?;

        let (icon_px, color) = (ids.dot_icon_px, ids.dot_color);
        ensure_image(surface, &LayerId::new(&ids.dot_icon), || {
            DotIcon::glow(icon_px, color)
        })?;
        ensure_source(surface, &LayerId::new(&ids.dot_source), SourceKind::Points)?;
        ensure_layer(
            surface,
            LayerSpec::symbol(&ids.dot_layer, &ids.dot_source, &ids.dot_icon, icon_px as f32)
                .with_style(LayerStyle::from_rgb(color, 1.0)),
        )?;
        Ok(())
    }

    /// Creates any missing resource; `true` once all of them exist.
    fn ensure_ready(&mut self) -> bool {
        if self.resources_ready {
            return true;
        }
        match self.ensure_resources() {
            Ok(()) => {
                self.resources_ready = true;
                debug!("route resources ready");
            }
            Err(err) => debug!(error = %err, "route resources not ready"),
        }
        self.resources_ready
    }

    fn write(&mut self, id: &LayerId, data: SourceData) {
        if !self.ensure_ready() {
            return;
        }
        match self.surface.set_source_data(id, data) {
            Ok(()) => {}
            Err(err @ SurfaceError::UnknownSource(_)) => {
                self.resources_ready = false;
                debug!(source = %id, error = %err, "source missing, resources will be recreated");
            }
            Err(err) => debug!(source = %id, error = %err, "source update skipped"),
        }
    }
}

impl<S: MapSurface, F: FrameScheduler> Drop for RouteSession<S, F> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::{RouteSession, start_route_animation};
    use crate::config::RouteAnimationConfig;
    use crate::state::Phase;
    use crate::test_support::{default_places, default_route};
    use formats::PlaceTable;
    use foundation::math::GeoPoint;
    use foundation::time::Millis;
    use layers::{LayerId, LayerKind, LayerStyle, MemorySurface, SourceData};
    use pretty_assertions::assert_eq;
    use runtime::ManualScheduler;

    type Session = RouteSession<MemorySurface, ManualScheduler>;

    fn started() -> Session {
        start_route_animation(
            MemorySurface::new(),
            ManualScheduler::new(),
            RouteAnimationConfig::default(),
            Some(&default_places()),
        )
    }

    /// Fires every pending callback at `now`.
    fn pump(session: &mut Session, now: f64) {
        for id in session.scheduler_mut().take_pending() {
            session.on_frame(id, Millis(now));
        }
    }

    fn lines(session: &Session) -> Vec<Vec<GeoPoint>> {
        session
            .surface()
            .source(&LayerId::from("route-line"))
            .and_then(SourceData::lines)
            .map(<[_]>::to_vec)
            .unwrap_or_default()
    }

    #[test]
    fn start_creates_resources_and_arms_reveal() {
        let session = started();
        let surface = session.surface();
        assert_eq!(session.phase(), Phase::Revealing);
        assert_eq!(surface.source_count(), 2);
        assert_eq!(surface.layers().len(), 2);
        assert!(surface.image(&LayerId::from("route-dot")).is_some());
        assert_eq!(session.scheduler().pending_count(), 1);
    }

    #[test]
    fn first_frame_draws_the_origin() {
        let mut session = started();
        pump(&mut session, 1000.0);
        let first = default_route().first_point().expect("first point");
        assert_eq!(lines(&session), vec![vec![first]]);
    }

    #[test]
    fn reveal_then_loop_dots() {
        let mut session = started();
        pump(&mut session, 0.0);
        pump(&mut session, 8000.0);
        assert_eq!(session.phase(), Phase::LoopingDots);
        assert_eq!(lines(&session), default_route().full_lines().to_vec());

        let line_writes = session.surface().write_count(&LayerId::from("route-line"));
        for i in 1..=5 {
            pump(&mut session, 8000.0 + i as f64 * 16.0);
        }
        let surface = session.surface();
        assert_eq!(surface.write_count(&LayerId::from("route-line")), line_writes);
        assert_eq!(surface.write_count(&LayerId::from("route-dots")), 5);
        assert_eq!(session.driver().loop_entries(), 1);
        assert_eq!(session.scheduler().pending_count(), 1);
    }

    #[test]
    fn leaving_view_cancels_and_return_rearms_once() {
        let mut session = started();
        pump(&mut session, 0.0);
        assert_eq!(session.scheduler().pending_count(), 1);

        session.set_intersection_ratio(0.0);
        assert_eq!(session.scheduler().pending_count(), 0);
        assert_eq!(session.scheduler().cancelled_count(), 1);

        let requested = session.scheduler().requested_count();
        session.set_document_visible(false);
        session.set_intersection_ratio(0.5);
        assert_eq!(session.scheduler().pending_count(), 0);
        session.set_document_visible(true);
        session.set_document_visible(true);
        assert_eq!(session.scheduler().requested_count(), requested + 1);
        assert_eq!(session.scheduler().pending_count(), 1);
    }

    #[test]
    fn suspending_the_dot_loop_rearms_one_dots_frame() {
        let mut session = started();
        pump(&mut session, 0.0);
        pump(&mut session, 8000.0);
        pump(&mut session, 8016.0);
        assert_eq!(session.phase(), Phase::LoopingDots);
        let line_writes = session.surface().write_count(&LayerId::from("route-line"));
        let dot_writes = session.surface().write_count(&LayerId::from("route-dots"));

        session.set_document_visible(false);
        assert_eq!(session.scheduler().pending_count(), 0);
        let requested = session.scheduler().requested_count();

        session.set_document_visible(true);
        session.set_intersection_ratio(1.0);
        assert_eq!(session.scheduler().requested_count(), requested + 1);
        assert_eq!(session.scheduler().pending_count(), 1);

        pump(&mut session, 60_000.0);
        let surface = session.surface();
        assert_eq!(surface.write_count(&LayerId::from("route-dots")), dot_writes + 1);
        assert_eq!(surface.write_count(&LayerId::from("route-line")), line_writes);
        assert_eq!(session.driver().loop_entries(), 1);
        assert_eq!(session.driver().state().dots_elapsed_ms, 16.0);
        assert_eq!(session.scheduler().pending_count(), 1);
    }

    #[test]
    fn hidden_time_does_not_advance_the_reveal() {
        let mut session = started();
        pump(&mut session, 0.0);
        pump(&mut session, 200.0);
        session.set_document_visible(false);
        session.set_document_visible(true);
        pump(&mut session, 50_000.0);
        pump(&mut session, 50_100.0);
        assert_eq!(session.driver().state().elapsed_ms, 300.0);
        assert_eq!(session.phase(), Phase::Revealing);
    }

    #[test]
    fn missing_place_stays_idle() {
        let mut places = default_places().places().clone();
        places.remove("Tokyo");
        let table = PlaceTable::from_places(places);
        let session = start_route_animation(
            MemorySurface::new(),
            ManualScheduler::new(),
            RouteAnimationConfig::default(),
            Some(&table),
        );
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.surface().source_count(), 0);
        assert_eq!(session.scheduler().requested_count(), 0);
    }

    #[test]
    fn missing_table_stays_idle() {
        let session = start_route_animation(
            MemorySurface::new(),
            ManualScheduler::new(),
            RouteAnimationConfig::default(),
            None,
        );
        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.has_pending_frame());
    }

    #[test]
    fn dispose_is_idempotent() {
        let mut session = started();
        pump(&mut session, 0.0);
        session.dispose();
        session.dispose();
        assert!(session.is_disposed());
        assert_eq!(session.phase(), Phase::Stopped);
        assert_eq!(session.scheduler().pending_count(), 0);
        assert_eq!(session.scheduler().cancelled_count(), 1);
        assert!(session.driver().route().is_none());

        // Late signals and callbacks are no-ops.
        session.set_intersection_ratio(0.0);
        session.set_intersection_ratio(1.0);
        assert_eq!(session.scheduler().pending_count(), 0);
    }

    #[test]
    fn stale_callback_is_ignored() {
        let mut session = started();
        let fired = session.scheduler_mut().take_pending();
        session.on_frame(fired[0], Millis(0.0));
        let requested = session.scheduler().requested_count();

        // Delivering the same id twice must not schedule a second frame.
        session.on_frame(fired[0], Millis(16.0));
        assert_eq!(session.scheduler().requested_count(), requested);
        assert_eq!(session.scheduler().pending_count(), 1);
    }

    #[test]
    fn late_surface_gets_resources_on_a_later_frame() {
        let mut session = start_route_animation(
            MemorySurface::loading(),
            ManualScheduler::new(),
            RouteAnimationConfig::default(),
            Some(&default_places()),
        );
        assert_eq!(session.phase(), Phase::Revealing);
        assert_eq!(session.surface().source_count(), 0);

        pump(&mut session, 0.0);
        pump(&mut session, 16.0);
        assert_eq!(session.surface().source_count(), 0);

        session.surface_mut().finish_loading();
        pump(&mut session, 32.0);
        let surface = session.surface();
        assert_eq!(surface.source_count(), 2);
        assert_eq!(surface.layers().len(), 2);
        assert_eq!(surface.write_count(&LayerId::from("route-line")), 1);

        pump(&mut session, 9000.0);
        pump(&mut session, 9016.0);
        assert_eq!(session.phase(), Phase::LoopingDots);
        assert_eq!(lines(&session), default_route().full_lines().to_vec());
        assert_eq!(session.surface().write_count(&LayerId::from("route-dots")), 1);
    }

    #[test]
    fn layers_carry_the_configured_colors() {
        let mut config = RouteAnimationConfig::default();
        config.layers.line_color = [255, 0, 0];
        config.layers.line_opacity = 0.5;
        config.layers.dot_color = [0, 255, 0];
        let session = start_route_animation(
            MemorySurface::new(),
            ManualScheduler::new(),
            config,
            Some(&default_places()),
        );
        let layers = session.surface().layers();
        assert!(matches!(layers[0].kind, LayerKind::Line { width_px } if width_px == 2.0));
        assert_eq!(layers[0].style, LayerStyle::from_rgb([255, 0, 0], 0.5));
        assert!(matches!(layers[1].kind, LayerKind::Symbol { .. }));
        assert_eq!(layers[1].style, LayerStyle::from_rgb([0, 255, 0], 1.0));
    }

    #[test]
    fn removed_surface_does_not_stop_the_clock() {
        let mut surface = MemorySurface::new();
        surface.remove();
        let mut session = start_route_animation(
            surface,
            ManualScheduler::new(),
            RouteAnimationConfig::default(),
            Some(&default_places()),
        );
        pump(&mut session, 0.0);
        pump(&mut session, 450.0);
        assert_eq!(session.phase(), Phase::Revealing);
        assert_eq!(session.driver().state().elapsed_ms, 450.0);
    }
}
