use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hullbox::prelude::*;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;

use io::{box_json, emit, parse_vec3, read_points, vec_xyz, xyz, ShapeOut};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Convex hulls, bounding boxes and clips over JSON point files")]
struct Cmd {
    /// Tolerance passed to every geometric predicate
    #[arg(long, global = true, default_value_t = 1e-9)]
    eps: f64,

    /// Write JSON here instead of stdout
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Convex hull of a coplanar point set
    Hull {
        #[arg(long)]
        input: PathBuf,
        /// Report the cheapest equal shape (triangle, rectangle or area)
        #[arg(long)]
        simplify: bool,
    },
    /// Bounding box of a point set, optionally with a viewport rectangle
    Aabb {
        #[arg(long)]
        input: PathBuf,
        /// Eye point "x,y,z" for the viewport
        #[arg(long, value_parser = parse_vec3)]
        eye: Option<[f64; 3]>,
        /// Screen "right" direction "x,y,z"
        #[arg(long, value_parser = parse_vec3, default_value = "1,0,0")]
        right: [f64; 3],
        /// Screen distance in front of the box centre (nearest corner if absent)
        #[arg(long)]
        distance: Option<f64>,
        /// Zoom factor for a square viewport (requires --distance)
        #[arg(long, requires = "distance")]
        zoom: Option<f64>,
    },
    /// Clip the hull of a point set by a half-space
    Clip {
        #[arg(long)]
        input: PathBuf,
        /// Point on the plane "x,y,z"
        #[arg(long, value_parser = parse_vec3)]
        point: [f64; 3],
        /// Plane normal "x,y,z"
        #[arg(long, value_parser = parse_vec3)]
        normal: [f64; 3],
        /// Point on the side to keep "x,y,z"
        #[arg(long, value_parser = parse_vec3)]
        reference: [f64; 3],
    },
    /// Draw a reproducible coplanar point cloud
    Sample {
        #[arg(long, default_value_t = 64)]
        count: usize,
        #[arg(long, default_value_t = 1.0)]
        radius: f64,
        /// Square layout instead of a disk
        #[arg(long)]
        square: bool,
        /// Sample on z = 0 instead of a random plane
        #[arg(long)]
        flat: bool,
        #[arg(long, default_value_t = 0.0)]
        jitter: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let eps = cmd.eps;
    let value = match cmd.action {
        Action::Hull { input, simplify } => hull(&input, simplify, eps)?,
        Action::Aabb {
            input,
            eye,
            right,
            distance,
            zoom,
        } => aabb(&input, eye, right, distance, zoom, eps)?,
        Action::Clip {
            input,
            point,
            normal,
            reference,
        } => clip(&input, point, normal, reference, eps)?,
        Action::Sample {
            count,
            radius,
            square,
            flat,
            jitter,
            seed,
            index,
        } => {
            let cfg = CloudCfg {
                count,
                radius,
                layout: if square {
                    CloudLayout::Square
                } else {
                    CloudLayout::Disk
                },
                jitter,
                random_plane: !flat,
            };
            sample(cfg, ReplayToken::new(seed, index))
        }
    };
    emit(cmd.out.as_deref(), &value)
}

fn hull(input: &Path, simplify: bool, eps: f64) -> Result<Value> {
    let pts = read_points(input)?;
    tracing::info!(input = %input.display(), points = pts.len(), eps, "hull");
    let area = ConvexArea::from_points(&pts, eps)
        .with_context(|| format!("building hull of {}", input.display()))?;
    tracing::info!(vertices = area.vertex_count(), "hull_built");
    let shape = if simplify {
        match area.simplify(eps) {
            Simplified::Triangle(t) => ShapeOut {
                kind: "triangle",
                points: t.points().iter().map(xyz).collect(),
            },
            Simplified::Rectangle(r) => ShapeOut {
                kind: "rectangle",
                points: r.points().iter().map(xyz).collect(),
            },
            Simplified::Area(a) => ShapeOut::from(&Geometry::Area(a)),
        }
    } else {
        ShapeOut::from(&Geometry::Area(area.clone()))
    };
    Ok(json!({
        "shape": shape,
        "normal": vec_xyz(area.normal()),
        "area": area.area(),
        "centroid": xyz(&area.centroid()),
    }))
}

fn aabb(
    input: &Path,
    eye: Option<[f64; 3]>,
    right: [f64; 3],
    distance: Option<f64>,
    zoom: Option<f64>,
    eps: f64,
) -> Result<Value> {
    let pts = read_points(input)?;
    tracing::info!(input = %input.display(), points = pts.len(), "aabb");
    let b = Aabb::from_points(&pts)?;
    let mut out = box_json(&b);
    if let Some(eye) = eye {
        let (eye, right) = (Point3::from(eye), Vector3::from(right));
        let rect = match (distance, zoom) {
            (Some(d), Some(z)) => b.viewport_zoomed(&eye, &right, d, z, eps),
            (Some(d), None) => b.viewport_at_distance(&eye, &right, d, eps),
            _ => b.viewport(&eye, &right, eps),
        };
        tracing::info!(found = rect.is_some(), "viewport");
        out["viewport"] = match rect {
            Some(r) => json!(r.points().iter().map(xyz).collect::<Vec<_>>()),
            None => Value::Null,
        };
    }
    Ok(out)
}

fn clip(
    input: &Path,
    point: [f64; 3],
    normal: [f64; 3],
    reference: [f64; 3],
    eps: f64,
) -> Result<Value> {
    let pts = read_points(input)?;
    let area = ConvexArea::from_points(&pts, eps)
        .with_context(|| format!("building hull of {}", input.display()))?;
    let plane = Plane::new(Point3::from(point), Vector3::from(normal)).context("zero plane normal")?;
    let kept = area.clip_plane(&plane, &Point3::from(reference), eps);
    tracing::info!(
        input = %input.display(),
        kind = kept.as_ref().map_or("none", Geometry::kind),
        "clip"
    );
    Ok(match kept {
        Some(g) => json!({ "shape": ShapeOut::from(&g) }),
        None => json!({ "shape": null }),
    })
}

fn sample(cfg: CloudCfg, tok: ReplayToken) -> Value {
    tracing::info!(count = cfg.count, seed = tok.seed, index = tok.index, "sample");
    let cloud = draw_coplanar_cloud(cfg, tok);
    json!({
        "points": cloud.points.iter().map(xyz).collect::<Vec<_>>(),
        "normal": vec_xyz(&cloud.normal),
        "origin": xyz(&cloud.origin),
    })
}
