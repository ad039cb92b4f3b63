use foundation::math::{
    GeoPoint, UnitVec3, central_angle, clamp_lat, normalize_lon, shortest_lon_delta,
};
use serde::{Deserialize, Serialize};

/// Every interpolated path has at least its two endpoints.
pub const MIN_STEPS: usize = 2;

/// Default blend between the straight and the great-circle path.
pub const DEFAULT_CURVATURE: f64 = 0.5;

/// Screen-arc amplitude as a fraction of the leg's raw 2-D length.
pub const SCREEN_ARC_AMPLITUDE_RATIO: f64 = 0.18;
/// Screen-arc amplitude bounds (degrees).
pub const SCREEN_ARC_MIN_AMPLITUDE_DEG: f64 = 8.0;
pub const SCREEN_ARC_MAX_AMPLITUDE_DEG: f64 = 22.0;

// Below this, sin(d) is treated as zero (identical or antipodal endpoints).
const DEGENERATE_SIN_EPS: f64 = 1e-12;

/// Horizontal direction a screen arc is forced to travel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenDirection {
    Left,
    Right,
}

/// Which side of the chord a screen arc bulges towards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bend {
    Up,
    Down,
    #[default]
    Auto,
}

impl Bend {
    /// +1 bends north, -1 bends south.
    ///
    /// `Auto` bends north when the leg's latitudes sum to zero or more.
    pub fn sign(self, a: GeoPoint, b: GeoPoint) -> f64 {
        match self {
            Bend::Up => 1.0,
            Bend::Down => -1.0,
            Bend::Auto => {
                if a.lat_deg + b.lat_deg >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

/// Interpolation strategy for a single route leg.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LegStrategy {
    #[default]
    SoftGreatCircle,
    ScreenArc {
        #[serde(default)]
        direction: Option<ScreenDirection>,
        #[serde(default)]
        bend: Bend,
    },
}

impl LegStrategy {
    pub fn interpolate(
        &self,
        a: GeoPoint,
        b: GeoPoint,
        steps: usize,
        curvature: f64,
    ) -> Vec<GeoPoint> {
        match *self {
            LegStrategy::SoftGreatCircle => soft_great_circle(a, b, steps, curvature),
            LegStrategy::ScreenArc { direction, bend } => {
                screen_arc(a, b, steps, direction, bend)
            }
        }
    }
}

// Endpoints are pinned so consecutive legs join on identical points.
fn pin_endpoints(mut points: Vec<GeoPoint>, a: GeoPoint, b: GeoPoint) -> Vec<GeoPoint> {
    if let Some(first) = points.first_mut() {
        *first = a.normalized();
    }
    if let Some(last) = points.last_mut() {
        *last = b.normalized();
    }
    points
}

fn fractions(steps: usize) -> impl Iterator<Item = f64> {
    let steps = steps.max(MIN_STEPS);
    let last = (steps - 1) as f64;
    (0..steps).map(move |i| i as f64 / last)
}

/// Spherical linear interpolation between `a` and `b`.
///
/// Identical and antipodal endpoints have no unique great circle; both
/// return `[a, b]`.
pub fn great_circle(a: GeoPoint, b: GeoPoint, steps: usize) -> Vec<GeoPoint> {
    let d = central_angle(a, b);
    let sin_d = d.sin();
    if d == 0.0 || sin_d.abs() < DEGENERATE_SIN_EPS {
        return vec![a.normalized(), b.normalized()];
    }

    let va = UnitVec3::from_geo(a);
    let vb = UnitVec3::from_geo(b);
    let points = fractions(steps)
        .map(|f| {
            let wa = ((1.0 - f) * d).sin() / sin_d;
            let wb = (f * d).sin() / sin_d;
            (va.scaled(wa) + vb.scaled(wb)).to_geo()
        })
        .collect();
    pin_endpoints(points, a, b)
}

/// Straight lon/lat blend that always takes the short way around.
pub fn linear_shortest(a: GeoPoint, b: GeoPoint, steps: usize) -> Vec<GeoPoint> {
    let d_lon = shortest_lon_delta(a.lon_deg, b.lon_deg);
    let d_lat = b.lat_deg - a.lat_deg;
    let points = fractions(steps)
        .map(|f| {
            GeoPoint::new(
                normalize_lon(a.lon_deg + d_lon * f),
                clamp_lat(a.lat_deg + d_lat * f),
            )
        })
        .collect();
    pin_endpoints(points, a, b)
}

/// Pointwise blend of [`linear_shortest`] and [`great_circle`].
///
/// `curvature` 0 is the straight path, 1 the full great circle. When the
/// great circle degenerates the straight path is returned.
pub fn soft_great_circle(
    a: GeoPoint,
    b: GeoPoint,
    steps: usize,
    curvature: f64,
) -> Vec<GeoPoint> {
    let c = curvature.clamp(0.0, 1.0);
    let straight = linear_shortest(a, b, steps);
    let arc = great_circle(a, b, steps);
    if arc.len() != straight.len() {
        return straight;
    }

    straight
        .iter()
        .zip(&arc)
        .map(|(l, g)| {
            // Blend longitudes on the same side of the antimeridian.
            let d_lon = shortest_lon_delta(l.lon_deg, g.lon_deg);
            GeoPoint::new(
                normalize_lon(l.lon_deg + d_lon * c),
                clamp_lat(l.lat_deg + (g.lat_deg - l.lat_deg) * c),
            )
        })
        .collect()
}

/// Sinusoidal arc drawn in raw lon/lat space.
///
/// `direction` forces the horizontal travel direction, crossing the
/// antimeridian when needed; `None` takes the short way. The bulge is
/// perpendicular to the chord with amplitude proportional to its length.
pub fn screen_arc(
    a: GeoPoint,
    b: GeoPoint,
    steps: usize,
    direction: Option<ScreenDirection>,
    bend: Bend,
) -> Vec<GeoPoint> {
    let target_lon = match direction {
        Some(ScreenDirection::Left) if b.lon_deg > a.lon_deg => b.lon_deg - 360.0,
        Some(ScreenDirection::Right) if b.lon_deg < a.lon_deg => b.lon_deg + 360.0,
        Some(_) => b.lon_deg,
        None => a.lon_deg + shortest_lon_delta(a.lon_deg, b.lon_deg),
    };

    let dx = target_lon - a.lon_deg;
    let dy = b.lat_deg - a.lat_deg;
    let len = dx.hypot(dy);
    if len == 0.0 {
        return fractions(steps).map(|_| a.normalized()).collect();
    }

    let amplitude = (len * SCREEN_ARC_AMPLITUDE_RATIO)
        .clamp(SCREEN_ARC_MIN_AMPLITUDE_DEG, SCREEN_ARC_MAX_AMPLITUDE_DEG)
        * bend.sign(a, b);

    // Chord normal, oriented north.
    let (mut nx, mut ny) = (-dy / len, dx / len);
    if ny < 0.0 {
        nx = -nx;
        ny = -ny;
    }

    let points = fractions(steps)
        .map(|f| {
            let offset = amplitude * (std::f64::consts::PI * f).sin();
            GeoPoint::new(
                normalize_lon(a.lon_deg + dx * f + nx * offset),
                clamp_lat(a.lat_deg + dy * f + ny * offset),
            )
        })
        .collect();
    pin_endpoints(points, a, b)
}
