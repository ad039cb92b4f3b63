use foundation::math::GeoPoint;

use crate::layer::SourceKind;

/// Payload written to a map data source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceData {
    Lines(Vec<Vec<GeoPoint>>),
    Points(Vec<GeoPoint>),
}

impl SourceData {
    pub fn empty(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Lines => SourceData::Lines(Vec::new()),
            SourceKind::Points => SourceData::Points(Vec::new()),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            SourceData::Lines(_) => SourceKind::Lines,
            SourceData::Points(_) => SourceKind::Points,
        }
    }

    pub fn lines(&self) -> Option<&[Vec<GeoPoint>]> {
        match self {
            SourceData::Lines(lines) => Some(lines),
            SourceData::Points(_) => None,
        }
    }

    pub fn points(&self) -> Option<&[GeoPoint]> {
        match self {
            SourceData::Points(points) => Some(points),
            SourceData::Lines(_) => None,
        }
    }

    /// Total number of vertices in the payload.
    pub fn vertex_count(&self) -> usize {
        match self {
            SourceData::Lines(lines) => lines.iter().map(Vec::len).sum(),
            SourceData::Points(points) => points.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SourceData;
    use crate::layer::SourceKind;
    use foundation::math::GeoPoint;

    #[test]
    fn empty_matches_kind() {
        assert_eq!(SourceData::empty(SourceKind::Lines).kind(), SourceKind::Lines);
        assert_eq!(SourceData::empty(SourceKind::Points).vertex_count(), 0);
    }

    #[test]
    fn vertex_count_sums_lines() {
        let data = SourceData::Lines(vec![
            vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)],
            vec![GeoPoint::new(2.0, 2.0)],
        ]);
        assert_eq!(data.vertex_count(), 3);
        assert!(data.points().is_none());
    }
}
