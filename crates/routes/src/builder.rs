use std::collections::{BTreeMap, HashMap};

use foundation::math::GeoPoint;
use thiserror::Error;
use tracing::debug;

use crate::antimeridian::append_split_parts;
use crate::arc_length::ArcLengthTable;
use crate::plan::RoutePlan;

/// Name -> position resolution for waypoints.
pub trait WaypointLookup {
    fn resolve(&self, name: &str) -> Option<GeoPoint>;
}

impl WaypointLookup for BTreeMap<String, GeoPoint> {
    fn resolve(&self, name: &str) -> Option<GeoPoint> {
        self.get(name).copied()
    }
}

impl WaypointLookup for HashMap<String, GeoPoint> {
    fn resolve(&self, name: &str) -> Option<GeoPoint> {
        self.get(name).copied()
    }
}

impl<T: WaypointLookup + ?Sized> WaypointLookup for &T {
    fn resolve(&self, name: &str) -> Option<GeoPoint> {
        (**self).resolve(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("unknown waypoint: {name}")]
    UnknownWaypoint { name: String },
    #[error("route needs at least two waypoints, got {count}")]
    TooFewWaypoints { count: usize },
}

/// One interpolated leg of the route: the unit of animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    from: String,
    to: String,
    points: Vec<GeoPoint>,
    arc: ArcLengthTable,
}

impl Segment {
    fn new(from: &str, to: &str, points: Vec<GeoPoint>) -> Self {
        let arc = ArcLengthTable::from_points(&points);
        Self {
            from: from.to_string(),
            to: to.to_string(),
            points,
            arc,
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn arc(&self) -> &ArcLengthTable {
        &self.arc
    }

    pub fn total_km(&self) -> f64 {
        self.arc.total_km()
    }

    /// Leading points drawn after `fraction` of the segment's reveal.
    ///
    /// Always at least one point; the whole segment at `fraction >= 1`.
    pub fn revealed_prefix(&self, fraction: f64) -> &[GeoPoint] {
        let last = self.points.len().saturating_sub(1);
        let drawn = (fraction.clamp(0.0, 1.0) * last as f64).ceil() as usize;
        let count = (drawn + 1).min(self.points.len());
        &self.points[..count]
    }

    /// Arc-length parametrized position, `fraction` in [0, 1].
    pub fn point_at_fraction(&self, fraction: f64) -> Option<GeoPoint> {
        self.arc.point_at_fraction(&self.points, fraction)
    }
}

/// Immutable, fully resolved route.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    segments: Vec<Segment>,
    full_lines: Vec<Vec<GeoPoint>>,
}

impl Route {
    fn new(segments: Vec<Segment>) -> Self {
        let mut full_lines = Vec::new();
        for segment in &segments {
            append_split_parts(&mut full_lines, segment.points());
        }
        Self {
            segments,
            full_lines,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The complete route, split at the antimeridian.
    pub fn full_lines(&self) -> &[Vec<GeoPoint>] {
        &self.full_lines
    }

    pub fn total_km(&self) -> f64 {
        self.segments.iter().map(Segment::total_km).sum()
    }

    pub fn first_point(&self) -> Option<GeoPoint> {
        self.segments.first().and_then(|s| s.points().first().copied())
    }
}

/// Builds a [`Route`] from a plan; all waypoints resolve or nothing is built.
#[derive(Debug, Clone, Copy)]
pub struct RouteBuilder<'a> {
    plan: &'a RoutePlan,
}

impl<'a> RouteBuilder<'a> {
    pub fn new(plan: &'a RoutePlan) -> Self {
        Self { plan }
    }

    pub fn build(&self, lookup: &impl WaypointLookup) -> Result<Route, RouteError> {
        let names = &self.plan.waypoints;
        if names.len() < 2 {
            return Err(RouteError::TooFewWaypoints { count: names.len() });
        }

        let mut stops = Vec::with_capacity(names.len());
        for name in names {
            let point = lookup
                .resolve(name)
                .ok_or_else(|| RouteError::UnknownWaypoint { name: name.clone() })?;
            stops.push((name.as_str(), point.normalized()));
        }

        let segments: Vec<Segment> = stops
            .windows(2)
            .map(|pair| {
                let ((from, a), (to, b)) = (pair[0], pair[1]);
                let strategy = self.plan.strategy_for(from, to);
                let points = strategy.interpolate(a, b, self.plan.steps, self.plan.curvature);
                Segment::new(from, to, points)
            })
            .collect();

        let route = Route::new(segments);
        debug!(
            segments = route.segment_count(),
            lines = route.full_lines().len(),
            total_km = route.total_km(),
            "route built"
        );
        Ok(route)
    }
}

pub fn build_route(plan: &RoutePlan, lookup: &impl WaypointLookup) -> Result<Route, RouteError> {
    RouteBuilder::new(plan).build(lookup)
}
