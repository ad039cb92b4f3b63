use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use foundation::math::GeoPoint;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaceTableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected a GeoJSON FeatureCollection or an array of features")]
    NotAFeatureCollection,
}

/// Why a feature did not make it into the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotAnObject,
    MissingName,
    NotAPoint,
    BadCoordinates,
    DuplicateName(String),
}

/// Named positions loaded from a GeoJSON point collection.
///
/// Only features with `properties.name` and a `Point` geometry are kept;
/// anything else is recorded in [`PlaceTable::skipped`]. The first feature
/// wins when a name repeats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceTable {
    places: BTreeMap<String, GeoPoint>,
    skipped: Vec<(usize, SkipReason)>,
}

impl PlaceTable {
    pub fn from_geojson_str(payload: &str) -> Result<Self, PlaceTableError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(&value)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlaceTableError> {
        let payload = fs::read_to_string(path)?;
        Self::from_geojson_str(&payload)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, PlaceTableError> {
        let features = match value {
            Value::Array(items) => items,
            Value::Object(obj) => {
                let ty = obj.get("type").and_then(|v| v.as_str());
                if ty != Some("FeatureCollection") {
                    return Err(PlaceTableError::NotAFeatureCollection);
                }
                obj.get("features")
                    .and_then(|v| v.as_array())
                    .ok_or(PlaceTableError::NotAFeatureCollection)?
            }
            _ => return Err(PlaceTableError::NotAFeatureCollection),
        };

        let mut table = PlaceTable::default();
        for (index, feature) in features.iter().enumerate() {
            match parse_place(feature) {
                Ok((name, point)) => {
                    if table.places.contains_key(&name) {
                        table.skipped.push((index, SkipReason::DuplicateName(name)));
                    } else {
                        table.places.insert(name, point);
                    }
                }
                Err(reason) => table.skipped.push((index, reason)),
            }
        }
        Ok(table)
    }

    pub fn from_places(places: impl IntoIterator<Item = (String, GeoPoint)>) -> Self {
        Self {
            places: places.into_iter().collect(),
            skipped: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<GeoPoint> {
        self.places.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn places(&self) -> &BTreeMap<String, GeoPoint> {
        &self.places
    }

    pub fn skipped(&self) -> &[(usize, SkipReason)] {
        &self.skipped
    }

    /// Names from `wanted` that the table cannot resolve, in order.
    pub fn missing<'a>(&self, wanted: &'a [String]) -> Vec<&'a str> {
        wanted
            .iter()
            .filter(|name| !self.places.contains_key(name.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn to_geojson_value(&self) -> Value {
        let features = self
            .places
            .iter()
            .map(|(name, p)| {
                let mut props = Map::new();
                props.insert("name".to_string(), Value::String(name.clone()));
                crate::geojson::point_feature(*p, props)
            })
            .collect();
        crate::geojson::feature_collection(features)
    }
}

fn parse_place(feature: &Value) -> Result<(String, GeoPoint), SkipReason> {
    let obj = feature.as_object().ok_or(SkipReason::NotAnObject)?;
    let name = obj
        .get("properties")
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(SkipReason::MissingName)?;

    let geometry = obj.get("geometry").ok_or(SkipReason::NotAPoint)?;
    // Tolerate tables that omit the geometry type but carry point coordinates.
    match geometry.get("type").and_then(|t| t.as_str()) {
        Some("Point") | None => {}
        Some(_) => return Err(SkipReason::NotAPoint),
    }

    let coords = geometry
        .get("coordinates")
        .and_then(|c| c.as_array())
        .ok_or(SkipReason::BadCoordinates)?;
    let (Some(lon), Some(lat)) = (
        coords.first().and_then(Value::as_f64),
        coords.get(1).and_then(Value::as_f64),
    ) else {
        return Err(SkipReason::BadCoordinates);
    };
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err(SkipReason::BadCoordinates);
    }

    Ok((name.to_string(), GeoPoint::new(lon, lat)))
}
