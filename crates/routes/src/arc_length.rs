use foundation::math::{GeoPoint, clamp_lat, haversine_km, normalize_lon, shortest_lon_delta};

/// Running sum of haversine distances along a polyline.
///
/// `cumulative_km[i]` is the distance from the first point to point `i`, so
/// the table has one entry per point and starts at zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArcLengthTable {
    cumulative_km: Vec<f64>,
}

impl ArcLengthTable {
    pub fn from_points(points: &[GeoPoint]) -> Self {
        let mut cumulative_km = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += haversine_km(points[i - 1], *p);
            }
            cumulative_km.push(total);
        }
        Self { cumulative_km }
    }

    pub fn total_km(&self) -> f64 {
        self.cumulative_km.last().copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.cumulative_km.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative_km.is_empty()
    }

    pub fn cumulative_km(&self) -> &[f64] {
        &self.cumulative_km
    }

    /// Finds the pair of points straddling `distance_km`.
    ///
    /// Returns `(i, t)` such that the position lies `t` of the way from point
    /// `i - 1` to point `i`. Returns `None` for tables with fewer than two
    /// entries.
    pub fn locate(&self, distance_km: f64) -> Option<(usize, f64)> {
        if self.cumulative_km.len() < 2 {
            return None;
        }
        let total = self.total_km();
        let d = distance_km.clamp(0.0, total);

        // First index whose cumulative distance reaches `d`.
        let i = self
            .cumulative_km
            .partition_point(|&c| c < d)
            .clamp(1, self.cumulative_km.len() - 1);
        let start = self.cumulative_km[i - 1];
        let span = self.cumulative_km[i] - start;
        let t = if span > 0.0 { (d - start) / span } else { 0.0 };
        Some((i, t.clamp(0.0, 1.0)))
    }

    /// Position `fraction` of the way along `points` by arc length.
    ///
    /// `points` must be the polyline this table was built from.
    pub fn point_at_fraction(&self, points: &[GeoPoint], fraction: f64) -> Option<GeoPoint> {
        let first = *points.first()?;
        let total = self.total_km();
        if total <= 0.0 {
            return Some(first);
        }
        let (i, t) = self.locate(fraction.clamp(0.0, 1.0) * total)?;
        let a = *points.get(i - 1)?;
        let b = *points.get(i)?;
        let d_lon = shortest_lon_delta(a.lon_deg, b.lon_deg);
        Some(GeoPoint::new(
            normalize_lon(a.lon_deg + d_lon * t),
            clamp_lat(a.lat_deg + (b.lat_deg - a.lat_deg) * t),
        ))
    }
}
