//! Result consumer: GeoJSON encoding of fitted curves.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use heartfit::{OptimizationResult, Point};
use serde::Serialize;
use serde_json::{json, Value};

/// Fit summary stored in the output collection's `properties`.
#[derive(Debug, Serialize)]
pub struct FitReport {
    pub scale: f64,
    pub angle: f64,
    pub tx: f64,
    pub ty: f64,
    pub cost: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
    pub curve_points: usize,
    pub cloud_points: usize,
    /// Output points are cloud nodes rather than raw curve samples.
    pub snapped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_start: Option<usize>,
}

impl FitReport {
    pub fn new(res: &OptimizationResult, cloud_points: usize, snapped: bool) -> Self {
        Self {
            scale: res.params.scale,
            angle: res.params.angle,
            tx: res.params.tx,
            ty: res.params.ty,
            cost: res.cost,
            iterations: res.iterations,
            evaluations: res.evaluations,
            converged: res.converged,
            curve_points: res.curve.len(),
            cloud_points,
            snapped,
            best_start: None,
        }
    }
}

/// FeatureCollection of Point features; `properties` goes on the collection.
pub fn feature_collection(points: &[Point], properties: Value) -> Value {
    let features: Vec<Value> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [p.x, p.y] },
                "properties": { "order": i }
            })
        })
        .collect();
    json!({
        "type": "FeatureCollection",
        "properties": properties,
        "features": features
    })
}

pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_keeps_point_order() {
        let pts = vec![Point::new(1.0, 2.0), Point::new(-3.5, 0.25)];
        let fc = feature_collection(&pts, json!({"cost": 0.5}));
        assert_eq!(fc["type"], "FeatureCollection");
        assert_eq!(fc["properties"]["cost"], 0.5);
        assert_eq!(fc["features"][1]["geometry"]["coordinates"][0], -3.5);
        assert_eq!(fc["features"][1]["properties"]["order"], 1);
    }
}
