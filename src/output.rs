//! Output formatting for linematch results.
//!
//! The green dataset is written as a GeoJSON `FeatureCollection`, one
//! feature per line, in red input order.

use anyhow::Result;
use geo::MultiLineString;
use serde_json::{json, Value};

use std::io::Write;

use crate::types::OutputFeature;

/// GeoJSON geometry object for an assembled geometry.
///
/// Coordinates are written as `[lon, lat]`.
pub fn geometry_to_json(geometry: &MultiLineString<f64>) -> Value {
    let coordinates: Vec<Vec<[f64; 2]>> = geometry
        .0
        .iter()
        .map(|ls| ls.0.iter().map(|c| [c.x, c.y]).collect())
        .collect();

    json!({
        "type": "MultiLineString",
        "coordinates": coordinates,
    })
}

/// GeoJSON feature object for one green feature.
pub fn feature_to_json(feature: &OutputFeature) -> Value {
    json!({
        "type": "Feature",
        "properties": Value::Object(feature.properties.clone()),
        "geometry": geometry_to_json(&feature.geometry),
    })
}

/// Write the green dataset.
///
/// `crs` is copied into a legacy `crs` member when the blue dataset had one.
pub fn write_geojson<W: Write>(
    writer: &mut W,
    features: &[OutputFeature],
    crs: Option<&str>,
) -> Result<()> {
    writeln!(writer, "{{")?;
    writeln!(writer, "\"type\": \"FeatureCollection\",")?;
    if let Some(name) = crs {
        let member = json!({ "type": "name", "properties": { "name": name } });
        writeln!(writer, "\"crs\": {},", member)?;
    }
    writeln!(writer, "\"features\": [")?;

    for (i, feature) in features.iter().enumerate() {
        let sep = if i + 1 < features.len() { "," } else { "" };
        writeln!(writer, "{}{}", feature_to_json(feature), sep)?;
    }

    writeln!(writer, "]")?;
    writeln!(writer, "}}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeatureReport;
    use geo::line_string;
    use serde_json::Map;

    fn feature(id: i64, geometry: MultiLineString<f64>) -> OutputFeature {
        let mut properties = Map::new();
        properties.insert("id".to_string(), json!(id));
        properties.insert("road_name".to_string(), json!("Ring road"));
        OutputFeature {
            properties,
            geometry,
            report: FeatureReport::default(),
        }
    }

    #[test]
    fn test_geometry_to_json() {
        let geometry = MultiLineString::new(vec![line_string![(x: 37.6, y: 55.7), (x: 37.7, y: 55.8)]]);
        let value = geometry_to_json(&geometry);
        assert_eq!(value["type"], "MultiLineString");
        assert_eq!(value["coordinates"][0][1], json!([37.7, 55.8]));
    }

    #[test]
    fn test_empty_geometry() {
        let value = geometry_to_json(&MultiLineString::new(vec![]));
        assert_eq!(value["coordinates"], json!([]));
    }

    #[test]
    fn test_write_geojson_is_valid() {
        let features = vec![
            feature(1, MultiLineString::new(vec![line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)]])),
            feature(2, MultiLineString::new(vec![])),
        ];
        let mut buf = Vec::new();
        write_geojson(&mut buf, &features, Some("EPSG:4326")).unwrap();

        let parsed: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["type"], "FeatureCollection");
        assert_eq!(parsed["crs"]["properties"]["name"], "EPSG:4326");
        assert_eq!(parsed["features"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["features"][1]["properties"]["id"], 2);
    }

    #[test]
    fn test_write_geojson_empty() {
        let mut buf = Vec::new();
        write_geojson(&mut buf, &[], None).unwrap();
        let parsed: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["features"], json!([]));
        assert!(parsed.get("crs").is_none());
    }
}
