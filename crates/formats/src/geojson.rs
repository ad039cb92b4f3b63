use foundation::math::GeoPoint;
use layers::SourceData;
use serde_json::{Map, Value};

fn point_coords(p: GeoPoint) -> Value {
    Value::from(p.as_array().to_vec())
}

fn geometry(ty: &str, coordinates: Value) -> Value {
    let mut obj = Map::new();
    obj.insert("type".to_string(), Value::String(ty.to_string()));
    obj.insert("coordinates".to_string(), coordinates);
    Value::Object(obj)
}

fn feature(geometry: Value, properties: Map<String, Value>) -> Value {
    let mut obj = Map::new();
    obj.insert("type".to_string(), Value::String("Feature".to_string()));
    obj.insert("properties".to_string(), Value::Object(properties));
    obj.insert("geometry".to_string(), geometry);
    Value::Object(obj)
}

pub fn point_feature(p: GeoPoint, properties: Map<String, Value>) -> Value {
    feature(geometry("Point", point_coords(p)), properties)
}

pub fn line_feature(line: &[GeoPoint], properties: Map<String, Value>) -> Value {
    let coords = line.iter().copied().map(point_coords).collect();
    feature(geometry("LineString", Value::Array(coords)), properties)
}

pub fn feature_collection(features: Vec<Value>) -> Value {
    let mut root = Map::new();
    root.insert(
        "type".to_string(),
        Value::String("FeatureCollection".to_string()),
    );
    root.insert("features".to_string(), Value::Array(features));
    Value::Object(root)
}

/// GeoJSON view of a source payload: one feature per line or point.
///
/// Lines are emitted as separate `LineString` features rather than one
/// `MultiLineString` so renderers never join parts across the dateline.
/// Single-vertex lines become `Point` features.
pub fn source_data_to_geojson(data: &SourceData) -> Value {
    let features = match data {
        SourceData::Lines(lines) => lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let mut props = Map::new();
                props.insert("part".to_string(), Value::from(i as u64));
                match line.as_slice() {
                    [only] => point_feature(*only, props),
                    _ => line_feature(line, props),
                }
            })
            .collect(),
        SourceData::Points(points) => points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut props = Map::new();
                props.insert("index".to_string(), Value::from(i as u64));
                point_feature(*p, props)
            })
            .collect(),
    };
    feature_collection(features)
}

#[cfg(test)]
mod tests {
    use super::source_data_to_geojson;
    use foundation::math::GeoPoint;
    use layers::SourceData;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn lines_become_line_strings() {
        let data = SourceData::Lines(vec![
            vec![GeoPoint::new(170.0, 0.0), GeoPoint::new(180.0, 5.0)],
            vec![GeoPoint::new(-180.0, 5.0)],
        ]);
        let value = source_data_to_geojson(&data);
        assert_eq!(
            value,
            json!({
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "properties": {"part": 0},
                     "geometry": {"type": "LineString", "coordinates": [[170.0, 0.0], [180.0, 5.0]]}},
                    {"type": "Feature", "properties": {"part": 1},
                     "geometry": {"type": "Point", "coordinates": [-180.0, 5.0]}}
                ]
            })
        );
    }

    #[test]
    fn points_are_indexed() {
        let data = SourceData::Points(vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)]);
        let value = source_data_to_geojson(&data);
        let features = value["features"].as_array().expect("features");
        assert_eq!(features.len(), 2);
        assert_eq!(features[1]["properties"]["index"], json!(1));
        assert_eq!(features[1]["geometry"]["coordinates"], json!([3.0, 4.0]));
    }
}
