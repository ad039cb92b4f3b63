use super::geodesy::{GeoPoint, clamp_lat, normalize_lon};

/// Cartesian position on the unit sphere.
///
/// Axes follow the ECEF convention: +x through (0°, 0°), +y through
/// (90°E, 0°), +z through the north pole.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UnitVec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl UnitVec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_geo(p: GeoPoint) -> Self {
        let lat = p.lat_deg.to_radians();
        let lon = p.lon_deg.to_radians();
        let cos_lat = lat.cos();
        Self::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
    }

    /// Converts back to degrees. The vector does not need to be unit length.
    pub fn to_geo(self) -> GeoPoint {
        let lon = self.y.atan2(self.x).to_degrees();
        let lat = self.z.atan2((self.x * self.x + self.y * self.y).sqrt()).to_degrees();
        GeoPoint::new(normalize_lon(lon), clamp_lat(lat))
    }

    pub fn scaled(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }
}

impl std::ops::Add for UnitVec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

/// Central angle (radians) between two positions.
///
/// Uses the haversine form so that identical positions yield exactly zero.
pub fn central_angle(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat_deg.to_radians();
    let lat2 = b.lat_deg.to_radians();
    let sin_lat = ((lat2 - lat1) * 0.5).sin();
    let sin_lon = ((b.lon_deg - a.lon_deg).to_radians() * 0.5).sin();
    let h = (sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lon * sin_lon).clamp(0.0, 1.0);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::{UnitVec3, central_angle};
    use crate::math::GeoPoint;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn equator_prime_meridian_is_x_axis() {
        let v = UnitVec3::from_geo(GeoPoint::new(0.0, 0.0));
        assert_close(v.x, 1.0, 1e-12);
        assert_close(v.y, 0.0, 1e-12);
        assert_close(v.z, 0.0, 1e-12);
    }

    #[test]
    fn geo_round_trip() {
        for (lon, lat) in [(0.0, 0.0), (90.0, 45.0), (-120.0, -60.0), (179.0, 89.0)] {
            let p = UnitVec3::from_geo(GeoPoint::new(lon, lat)).to_geo();
            assert_close(p.lon_deg, lon, 1e-9);
            assert_close(p.lat_deg, lat, 1e-9);
        }
    }

    #[test]
    fn pole_to_pole_is_pi() {
        let d = central_angle(GeoPoint::new(0.0, 90.0), GeoPoint::new(0.0, -90.0));
        assert_close(d, std::f64::consts::PI, 1e-9);
    }
}
