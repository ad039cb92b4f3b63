/// Mean Earth radius (kilometers) used for spherical distances.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Geographic position in degrees.
///
/// Longitude comes first, matching GeoJSON coordinate order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    /// Longitude wrapped into [-180, 180] and latitude clamped into [-90, 90].
    pub fn normalized(self) -> Self {
        Self::new(normalize_lon(self.lon_deg), clamp_lat(self.lat_deg))
    }

    pub fn as_array(self) -> [f64; 2] {
        [self.lon_deg, self.lat_deg]
    }
}

/// Wraps a longitude into [-180, 180].
///
/// Values already inside the range are returned untouched so that both
/// `-180` and `180` survive normalization.
pub fn normalize_lon(lon_deg: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon_deg) {
        return lon_deg;
    }
    if !lon_deg.is_finite() {
        return lon_deg;
    }
    (lon_deg + 180.0).rem_euclid(360.0) - 180.0
}

pub fn clamp_lat(lat_deg: f64) -> f64 {
    lat_deg.clamp(-90.0, 90.0)
}

/// Signed longitude delta from `from` to `to` taking the short way around.
///
/// The result lies in [-180, 180].
pub fn shortest_lon_delta(from_deg: f64, to_deg: f64) -> f64 {
    let mut delta = to_deg - from_deg;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    delta
}

/// Great-circle distance in kilometers (haversine, atan2 form).
pub fn haversine_km(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let lat1 = p1.lat_deg.to_radians();
    let lat2 = p2.lat_deg.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (p2.lon_deg - p1.lon_deg).to_radians();

    let sin_lat = (d_lat * 0.5).sin();
    let sin_lon = (d_lon * 0.5).sin();
    let a = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lon * sin_lon;
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}
