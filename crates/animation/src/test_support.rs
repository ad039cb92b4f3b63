use formats::PlaceTable;
use foundation::math::GeoPoint;
use routes::{Route, RoutePlan, build_route};

pub fn default_places() -> PlaceTable {
    PlaceTable::from_places(
        [
            ("Kathmandu", 85.3240, 27.7172),
            ("Dubai", 55.2708, 25.2048),
            ("London", -0.1276, 51.5072),
            ("New York", -74.0060, 40.7128),
            ("San Francisco", -122.4194, 37.7749),
            ("Tokyo", 139.6917, 35.6895),
            ("Singapore", 103.8198, 1.3521),
            ("Sydney", 151.2093, -33.8688),
        ]
        .into_iter()
        .map(|(name, lon, lat)| (name.to_string(), GeoPoint::new(lon, lat))),
    )
}

pub fn default_route() -> Route {
    match build_route(&RoutePlan::default(), default_places().places()) {
        Ok(route) => route,
        Err(err) => panic!("default route: {err}"),
    }
}
