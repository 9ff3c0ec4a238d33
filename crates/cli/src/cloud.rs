//! Point-cloud provider: GeoJSON point collections and CSV coordinate tables.
//!
//! Coordinates are taken as `(x, y)` = `(lng, lat)` in whatever frame the
//! file uses; no projection happens here.

use std::path::Path;

use anyhow::{bail, Context, Result};
use heartfit::Point;
use polars::prelude::*;
use serde::Deserialize;

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Point { coordinates: Vec<f64> },
    #[serde(other)]
    Other,
}

/// Loaded cloud plus how many features were not points.
#[derive(Debug)]
pub struct Cloud {
    pub points: Vec<Point>,
    pub skipped: usize,
}

/// Dispatch on file extension (`.geojson`/`.json` or `.csv`).
pub fn load_cloud(path: &Path) -> Result<Cloud> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let cloud = match ext.as_deref() {
        Some("geojson") | Some("json") => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_geojson(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        Some("csv") => Cloud {
            points: load_csv(path).with_context(|| format!("reading {}", path.display()))?,
            skipped: 0,
        },
        _ => bail!("unsupported cloud format: {}", path.display()),
    };
    if cloud.points.is_empty() {
        bail!("{} contains no points", path.display());
    }
    Ok(cloud)
}

/// Point features of a GeoJSON FeatureCollection; other geometries are skipped.
pub fn parse_geojson(text: &str) -> Result<Cloud> {
    let fc: FeatureCollection = serde_json::from_str(text)?;
    let mut points = Vec::with_capacity(fc.features.len());
    let mut skipped = 0;
    for (i, feature) in fc.features.into_iter().enumerate() {
        match feature.geometry {
            Some(Geometry::Point { coordinates }) => {
                if coordinates.len() < 2 {
                    bail!("feature {} has fewer than two coordinates", i);
                }
                points.push(Point::new(coordinates[0], coordinates[1]));
            }
            _ => skipped += 1,
        }
    }
    Ok(Cloud { points, skipped })
}

const COLUMN_PAIRS: [(&str, &str); 4] = [
    ("x", "y"),
    ("lng", "lat"),
    ("lon", "lat"),
    ("longitude", "latitude"),
];

fn pick_columns(names: &[String]) -> Option<(String, String)> {
    let find = |want: &str| names.iter().find(|n| n.eq_ignore_ascii_case(want)).cloned();
    COLUMN_PAIRS
        .iter()
        .find_map(|&(x, y)| Some((find(x)?, find(y)?)))
}

/// CSV with an `x,y` (or `lng,lat`, `lon,lat`, `longitude,latitude`) column pair.
pub fn load_csv(path: &Path) -> Result<Vec<Point>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()?
        .collect()?;
    let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
    let Some((xc, yc)) = pick_columns(&names) else {
        bail!("no coordinate columns among {:?}", names);
    };
    let xs = df.column(&xc)?.cast(&DataType::Float64)?;
    let ys = df.column(&yc)?.cast(&DataType::Float64)?;
    xs.f64()?
        .into_iter()
        .zip(ys.f64()?.into_iter())
        .enumerate()
        .map(|(row, pair)| match pair {
            (Some(x), Some(y)) => Ok(Point::new(x, y)),
            _ => bail!("row {} has a missing coordinate", row),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn geojson_points_are_read_in_order_and_others_skipped() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [11.5, 48.1]}, "properties": {}},
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}, "properties": {}},
                {"type": "Feature", "geometry": null, "properties": {}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [12.0, 49.0, 300.0]}, "properties": {}}
            ]
        }"#;
        let cloud = parse_geojson(text).unwrap();
        assert_eq!(cloud.points, vec![Point::new(11.5, 48.1), Point::new(12.0, 49.0)]);
        assert_eq!(cloud.skipped, 2);
    }

    #[test]
    fn geojson_point_needs_two_coordinates() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1.0]}}
        ]}"#;
        assert!(parse_geojson(text).is_err());
    }

    #[test]
    fn csv_with_lat_lng_headers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nodes.csv");
        fs::write(&path, "id,Lat,Lng\n1,48.0,11.0\n2,48.5,11.25\n").unwrap();
        let cloud = load_cloud(&path).unwrap();
        assert_eq!(cloud.points, vec![Point::new(11.0, 48.0), Point::new(11.25, 48.5)]);
    }

    #[test]
    fn csv_integer_columns_are_widened() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        fs::write(&path, "x,y\n1,2\n3,4\n").unwrap();
        assert_eq!(
            load_csv(&path).unwrap(),
            vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]
        );
    }

    #[test]
    fn unknown_extension_and_empty_clouds_fail() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("cloud.txt");
        fs::write(&txt, "1 2").unwrap();
        assert!(load_cloud(&txt).is_err());
        let empty = dir.path().join("empty.geojson");
        fs::write(&empty, r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(load_cloud(&empty).is_err());
    }
}
