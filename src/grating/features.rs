use crate::error::Result;
use crate::grating::{Grating, MAX_ROW_COL, MIN_ROW_COL, squarish};
use geo_types::{LineString, MultiLineString, Point, Rect, coord};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde_json::Value;
use tracing::debug;

fn feature(geometry: Geometry, properties: Option<JsonObject>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties,
        foreign_members: None,
    }
}

/// Builds the grating over `bounds` as GeoJSON: one point per cell,
/// named by its row and column label, followed by a single
/// MultiLineString of all grid lines.
///
/// Unless `rectangle` is set, the cells are made roughly square,
/// keeping the larger of `rows` and `cols` along the longer side. The
/// squared layout is only used if its counts stay within the allowed
/// range.
///
/// Rows are lettered from the top of `bounds` down, or from the bottom up
/// when `flipped` is set, which suits bounds whose y axis points down.
pub fn to_geojson(
    bounds: Rect<f64>,
    rows: u32,
    cols: u32,
    flipped: bool,
    rectangle: bool,
) -> Result<FeatureCollection> {
    let (min, max) = (bounds.min(), bounds.max());
    let width = bounds.width();
    let height = bounds.height();

    let (mut rows, mut cols) = (rows, cols);
    let mut delta_x = width / cols.max(1) as f64;
    let mut delta_y = height / rows.max(1) as f64;

    if !rectangle {
        let (sq_x, sq_y, sq_rows, sq_cols) = squarish(width, height, rows.max(cols));
        let valid = MIN_ROW_COL..=MAX_ROW_COL;
        if valid.contains(&sq_rows) && valid.contains(&sq_cols) {
            (rows, cols) = (sq_rows, sq_cols);
            (delta_x, delta_y) = (sq_x, sq_y);
        }
    }
    debug!(rows, cols, delta_x, delta_y, "building grating");

    let grating =
        Grating::new(min.x, min.y, width, height, rows, cols, false)?.with_flip_y_label(flipped);

    let mut lines = Vec::with_capacity((rows + cols + 2) as usize);
    for col in 0..=cols {
        let x = min.x + delta_x * col as f64;
        lines.push(LineString::from(vec![
            coord! { x: x, y: min.y },
            coord! { x: x, y: max.y },
        ]));
    }
    for row in 0..=rows {
        let y = min.y + delta_y * row as f64;
        lines.push(LineString::from(vec![
            coord! { x: min.x, y: y },
            coord! { x: max.x, y: y },
        ]));
    }

    let mut features = Vec::with_capacity((rows * cols + 1) as usize);
    for col in 0..cols {
        let x = min.x + delta_x * (col as f64 + 0.5);
        for row in 0..rows {
            let y = min.y + delta_y * (row as f64 + 0.5);
            let name = format!(
                "{}{}",
                grating.label_for_row(row).unwrap_or_default(),
                grating.label_for_col(col).unwrap_or_default()
            );
            let mut props = JsonObject::new();
            props.insert("name".to_string(), Value::String(name));
            features.push(feature(Geometry::from(&Point::new(x, y)), Some(props)));
        }
    }
    features.push(feature(Geometry::from(&MultiLineString::new(lines)), None));

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}
