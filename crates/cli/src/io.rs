use anyhow::{Context, Result};
use hullbox::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

/// Accepted point-file shapes: a bare `[[x, y, z], ...]` array or
/// `{"points": [[x, y, z], ...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PointsFile {
    Bare(Vec<[f64; 3]>),
    Wrapped { points: Vec<[f64; 3]> },
}

pub fn parse_points(text: &str) -> Result<Vec<Point3<f64>>> {
    let raw: PointsFile = serde_json::from_str(text).context("parsing point list")?;
    let coords = match raw {
        PointsFile::Bare(v) | PointsFile::Wrapped { points: v } => v,
    };
    Ok(coords.into_iter().map(Point3::from).collect())
}

pub fn read_points(path: &Path) -> Result<Vec<Point3<f64>>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_points(&text).with_context(|| format!("in {}", path.display()))
}

#[inline]
pub fn xyz(p: &Point3<f64>) -> [f64; 3] {
    [p.x, p.y, p.z]
}

#[inline]
pub fn vec_xyz(v: &Vector3<f64>) -> [f64; 3] {
    [v.x, v.y, v.z]
}

/// JSON view of a result shape.
#[derive(Serialize)]
pub struct ShapeOut {
    pub kind: &'static str,
    pub points: Vec<[f64; 3]>,
}

impl From<&Geometry> for ShapeOut {
    fn from(g: &Geometry) -> Self {
        Self {
            kind: g.kind(),
            points: g.points().iter().map(xyz).collect(),
        }
    }
}

pub fn box_json(b: &Aabb) -> Value {
    json!({
        "min": xyz(&b.min()),
        "max": xyz(&b.max()),
        "center": xyz(&b.center()),
        "extents": vec_xyz(&b.extents()),
    })
}

/// Write pretty JSON to `out`, or to stdout when `None`.
pub fn emit(out: Option<&Path>, value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating output dir {}", parent.display()))?;
                }
            }
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// `"x,y,z"` → `[x, y, z]`, for clap value parsing.
pub fn parse_vec3(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts[..] else {
        return Err(format!("expected x,y,z, got {s:?}"));
    };
    let num = |t: &str| t.parse::<f64>().map_err(|e| format!("{t:?}: {e}"));
    Ok([num(x)?, num(y)?, num(z)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn both_point_file_shapes_parse() {
        let bare = parse_points("[[0,0,0],[1,2,3]]").unwrap();
        assert_eq!(bare[1], Point3::new(1.0, 2.0, 3.0));
        let wrapped = parse_points(r#"{"points": [[1,1,1]]}"#).unwrap();
        assert_eq!(wrapped, vec![Point3::new(1.0, 1.0, 1.0)]);
        assert!(parse_points("[[0,0]]").is_err());
    }

    #[test]
    fn read_points_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("square.json");
        fs::write(&path, "[[0,0,0],[1,0,0],[1,1,0],[0,1,0],[0.5,0.5,0]]").unwrap();
        let pts = read_points(&path).unwrap();
        let area = ConvexArea::from_points(&pts, 1e-9).unwrap();
        assert_eq!(area.vertex_count(), 4);
        assert!(read_points(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn emit_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested/out.json");
        let shape = ShapeOut::from(&Geometry::Point(Point3::new(1.0, 2.0, 3.0)));
        emit(Some(&out), &serde_json::to_value(&shape).unwrap()).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(parsed["kind"], "point");
        assert_eq!(parsed["points"][0][2], 3.0);
    }

    #[test]
    fn vec3_arguments() {
        assert_eq!(parse_vec3("1, -2.5,3").unwrap(), [1.0, -2.5, 3.0]);
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("a,b,c").is_err());
    }
}
