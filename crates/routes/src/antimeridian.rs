use foundation::math::{GeoPoint, clamp_lat};

/// Splits a polyline wherever consecutive longitudes jump by more than 180°.
///
/// Each jump is treated as a dateline crossing: the current line is closed on
/// the ±180° meridian at the linearly interpolated latitude and a new line is
/// opened on the mirrored meridian. No returned line crosses the dateline.
pub fn split_at_antimeridian(points: &[GeoPoint]) -> Vec<Vec<GeoPoint>> {
    let mut lines: Vec<Vec<GeoPoint>> = Vec::new();
    let Some(&first) = points.first() else {
        return lines;
    };

    let mut current = vec![first];
    for pair in points.windows(2) {
        let (p0, p1) = (pair[0], pair[1]);
        let delta = p1.lon_deg - p0.lon_deg;
        if delta.abs() <= 180.0 {
            current.push(p1);
            continue;
        }

        // Crossing eastward means the raw longitude jumped down (e.g. 179 -> -179).
        let (unwrapped, boundary) = if delta < 0.0 {
            (p1.lon_deg + 360.0, 180.0)
        } else {
            (p1.lon_deg - 360.0, -180.0)
        };
        let span = unwrapped - p0.lon_deg;
        if span == 0.0 {
            // Both points sit on the dateline itself.
            lines.push(std::mem::replace(&mut current, vec![p1]));
            continue;
        }

        let t = ((boundary - p0.lon_deg) / span).clamp(0.0, 1.0);
        let lat = clamp_lat(p0.lat_deg + (p1.lat_deg - p0.lat_deg) * t);
        current.push(GeoPoint::new(boundary, lat));
        lines.push(std::mem::replace(
            &mut current,
            vec![GeoPoint::new(-boundary, lat)],
        ));
        current.push(p1);
    }
    lines.push(current);

    lines.retain(|line| !line.is_empty());
    lines
}

/// Appends `part` to `lines`, continuing the last line when `part` starts
/// exactly where it ends.
pub fn append_line_part(lines: &mut Vec<Vec<GeoPoint>>, part: Vec<GeoPoint>) {
    let Some(&head) = part.first() else {
        return;
    };
    if let Some(last) = lines.last_mut() {
        if last.last() == Some(&head) {
            last.extend_from_slice(&part[1..]);
            return;
        }
    }
    lines.push(part);
}

/// Splits every part and merges the results into `lines`.
pub fn append_split_parts(lines: &mut Vec<Vec<GeoPoint>>, points: &[GeoPoint]) {
    for part in split_at_antimeridian(points) {
        append_line_part(lines, part);
    }
}
