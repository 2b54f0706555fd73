//! GeoJSON dataset parser.
//!
//! Reads `FeatureCollection` files of line features. Red features keep their
//! full property map; blue features are reduced to an identifier and a
//! geometry.

use ahash::AHashSet;
use anyhow::{bail, Context, Result};
use geo::{Coord, LineString, MultiLineString};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::BufRead;
use std::path::Path;

use crate::config::Config;
use crate::error::MatchError;
use crate::parser::util::open_dataset;
use crate::types::{BlueLine, LineId, RedFeature};

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    crs: Option<Value>,
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

/// The blue reference network.
#[derive(Debug, Clone)]
pub struct BlueDataset {
    /// Name of the legacy `crs` member, if the file declares one.
    pub crs: Option<String>,
    pub lines: Vec<BlueLine>,
}

/// The red attributed network.
#[derive(Debug, Clone)]
pub struct RedDataset {
    pub crs: Option<String>,
    pub features: Vec<RedFeature>,
}

/// Read the blue dataset at `path` (supports .gz).
pub fn read_blue_lines(path: &Path, config: &Config) -> Result<BlueDataset> {
    let reader = open_dataset(path)?;
    parse_blue_reader(reader, config)
        .with_context(|| format!("Failed to read blue dataset {}", path.display()))
}

/// Read the red dataset at `path` (supports .gz).
pub fn read_red_features(path: &Path, config: &Config) -> Result<RedDataset> {
    let reader = open_dataset(path)?;
    parse_red_reader(reader, config)
        .with_context(|| format!("Failed to read red dataset {}", path.display()))
}

/// Parse a blue dataset from a reader.
pub fn parse_blue_reader<R: BufRead>(reader: R, config: &Config) -> Result<BlueDataset> {
    let collection = parse_collection(reader)?;
    let mut seen = AHashSet::new();
    let mut lines = Vec::with_capacity(collection.features.len());

    for (index, feature) in collection.features.into_iter().enumerate() {
        let properties = feature.properties.unwrap_or_default();
        let raw_id = properties
            .get(&config.blue_id_field)
            .ok_or_else(|| MatchError::MissingAttribute {
                index,
                field: config.blue_id_field.clone(),
            })?;
        let id = parse_line_id(raw_id, index)?;

        if !seen.insert(id) {
            return Err(MatchError::DuplicateLineId(id).into());
        }

        let geometry = convert_geometry(feature.geometry.as_ref())
            .with_context(|| format!("Invalid geometry for blue line {}", id))?;
        lines.push(BlueLine::new(id, geometry));
    }

    Ok(BlueDataset {
        crs: crs_name(collection.crs.as_ref()),
        lines,
    })
}

/// Parse a red dataset from a reader.
pub fn parse_red_reader<R: BufRead>(reader: R, config: &Config) -> Result<RedDataset> {
    let collection = parse_collection(reader)?;
    let mut features = Vec::with_capacity(collection.features.len());

    for (index, feature) in collection.features.into_iter().enumerate() {
        let properties = feature.properties.unwrap_or_default();
        for field in &config.required_red_fields {
            if !properties.contains_key(field) {
                return Err(MatchError::MissingAttribute {
                    index,
                    field: field.clone(),
                }
                .into());
            }
        }

        let geometry = convert_geometry(feature.geometry.as_ref())
            .with_context(|| format!("Invalid geometry for red feature {}", index))?;
        features.push(RedFeature::new(properties, geometry));
    }

    Ok(RedDataset {
        crs: crs_name(collection.crs.as_ref()),
        features,
    })
}

/// Reject datasets that declare different coordinate reference systems.
///
/// Files without a `crs` member are WGS84 and compatible with anything that
/// does not declare otherwise.
pub fn check_crs(red: Option<&str>, blue: Option<&str>) -> Result<(), MatchError> {
    match (red, blue) {
        (Some(r), Some(b)) if r != b => Err(MatchError::CrsMismatch {
            red: r.to_string(),
            blue: b.to_string(),
        }),
        _ => Ok(()),
    }
}

fn parse_collection<R: BufRead>(reader: R) -> Result<RawCollection> {
    let collection: RawCollection =
        serde_json::from_reader(reader).context("Failed to parse GeoJSON")?;
    if collection.kind != "FeatureCollection" {
        bail!(
            "Expected a FeatureCollection, found '{}'",
            collection.kind
        );
    }
    Ok(collection)
}

fn crs_name(crs: Option<&Value>) -> Option<String> {
    crs?.get("properties")?
        .get("name")?
        .as_str()
        .map(str::to_string)
}

/// Accept integer identifiers and strings holding one.
fn parse_line_id(value: &Value, index: usize) -> Result<LineId, MatchError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.map(LineId).ok_or_else(|| MatchError::InvalidLineId {
        index,
        value: value.to_string(),
    })
}

fn convert_geometry(geometry: Option<&RawGeometry>) -> Result<MultiLineString<f64>> {
    let geometry = match geometry {
        Some(g) => g,
        None => return Ok(MultiLineString::new(Vec::new())),
    };

    match geometry.kind.as_str() {
        "LineString" => {
            let coords: Vec<Vec<f64>> = serde_json::from_value(geometry.coordinates.clone())
                .context("Malformed LineString coordinates")?;
            Ok(MultiLineString::new(vec![to_line_string(&coords)?]))
        }
        "MultiLineString" => {
            let parts: Vec<Vec<Vec<f64>>> = serde_json::from_value(geometry.coordinates.clone())
                .context("Malformed MultiLineString coordinates")?;
            let lines = parts
                .iter()
                .map(|coords| to_line_string(coords))
                .collect::<Result<Vec<_>>>()?;
            Ok(MultiLineString::new(lines))
        }
        other => Err(MatchError::UnsupportedGeometry(other.to_string()).into()),
    }
}

fn to_line_string(coords: &[Vec<f64>]) -> Result<LineString<f64>> {
    coords
        .iter()
        .map(|pos| match pos.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => bail!("Position needs at least two numbers, got {:?}", pos),
        })
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    const BLUE: &str = r#"{
  "type": "FeatureCollection",
  "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:OGC:1.3:CRS84" } },
  "features": [
    { "type": "Feature", "properties": { "link_id": 10 },
      "geometry": { "type": "MultiLineString", "coordinates": [[[37.60, 55.70], [37.61, 55.70]]] } },
    { "type": "Feature", "properties": { "link_id": "11" },
      "geometry": { "type": "LineString", "coordinates": [[37.61, 55.70, 120.0], [37.62, 55.70, 121.0]] } }
  ]
}"#;

    const RED: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature",
      "properties": { "id": 1, "road_id": 7, "road_part_id": 2, "start_m": 0, "finish_m": 900,
                      "road_name": "Tverskaya", "link_id": 5 },
      "geometry": { "type": "LineString", "coordinates": [[37.60, 55.7001], [37.62, 55.7001]] } },
    { "type": "Feature",
      "properties": { "id": 2, "road_id": 7, "road_part_id": 3, "start_m": 900, "finish_m": 1000,
                      "road_name": "Tverskaya" },
      "geometry": null }
  ]
}"#;

    fn reader(s: &str) -> BufReader<&[u8]> {
        BufReader::new(s.as_bytes())
    }

    #[test]
    fn test_parse_blue() {
        let data = parse_blue_reader(reader(BLUE), &Config::default()).unwrap();
        assert_eq!(data.crs.as_deref(), Some("urn:ogc:def:crs:OGC:1.3:CRS84"));
        assert_eq!(data.lines.len(), 2);
        assert_eq!(data.lines[0].id, LineId(10));
        assert_eq!(data.lines[1].id, LineId(11));
        assert_eq!(data.lines[1].geometry.0[0].0[0], Coord { x: 37.61, y: 55.70 });
    }

    #[test]
    fn test_parse_red() {
        let data = parse_red_reader(reader(RED), &Config::default()).unwrap();
        assert_eq!(data.crs, None);
        assert_eq!(data.features.len(), 2);
        assert_eq!(data.features[0].properties["road_name"], "Tverskaya");
        assert_eq!(data.features[0].vertices().len(), 2);
        assert!(data.features[1].vertices().is_empty());
    }

    #[test]
    fn test_red_missing_attribute() {
        let red = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"id": 1}, "geometry": null}]}"#;
        let err = parse_red_reader(reader(red), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("road_id"));
    }

    #[test]
    fn test_blue_duplicate_id() {
        let blue = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"link_id": 1}, "geometry": null},
            {"type": "Feature", "properties": {"link_id": 1}, "geometry": null}]}"#;
        let err = parse_blue_reader(reader(blue), &Config::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<MatchError>(),
            Some(&MatchError::DuplicateLineId(LineId(1)))
        );
    }

    #[test]
    fn test_blue_invalid_id() {
        let blue = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"link_id": "abc"}, "geometry": null}]}"#;
        assert!(parse_blue_reader(reader(blue), &Config::default()).is_err());
    }

    #[test]
    fn test_unsupported_geometry() {
        let blue = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"link_id": 1},
             "geometry": {"type": "Point", "coordinates": [37.6, 55.7]}}]}"#;
        let err = parse_blue_reader(reader(blue), &Config::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("Point"));
    }

    #[test]
    fn test_not_a_collection() {
        let err = parse_red_reader(reader(r#"{"type": "Feature"}"#), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("FeatureCollection"));
    }

    #[test]
    fn test_check_crs() {
        assert!(check_crs(None, Some("EPSG:4326")).is_ok());
        assert!(check_crs(Some("EPSG:4326"), Some("EPSG:4326")).is_ok());
        assert!(check_crs(Some("EPSG:3857"), Some("EPSG:4326")).is_err());
    }
}
