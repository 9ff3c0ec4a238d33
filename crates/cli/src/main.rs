use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use heartfit::prelude::*;
use tracing_subscriber::fmt::SubscriberBuilder;

mod cloud;
mod output;
mod provenance;

use output::{feature_collection, write_json, FitReport};
use provenance::{current_git_rev, write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "heartfit")]
#[command(about = "Fit a heart outline onto the densest part of a point cloud")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Fit the heart to a cloud and write the placed curve as GeoJSON
    Fit(FitArgs),
    /// Write the canonical (untransformed) heart curve as GeoJSON
    Heart {
        #[arg(long, default_value_t = DEFAULT_POINTS)]
        points: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IndexArg {
    Brute,
    Kd,
}

impl From<IndexArg> for IndexKind {
    fn from(arg: IndexArg) -> Self {
        match arg {
            IndexArg::Brute => IndexKind::BruteForce,
            IndexArg::Kd => IndexKind::KdTree,
        }
    }
}

#[derive(Args, Debug)]
struct FitArgs {
    /// Cloud file (.geojson/.json point features, or .csv with x,y / lng,lat columns)
    #[arg(long)]
    cloud: PathBuf,
    #[arg(long)]
    out: PathBuf,
    /// Curve sample count
    #[arg(long, default_value_t = DEFAULT_POINTS)]
    points: usize,
    /// Start scale; not clamped, negative values mirror the curve
    #[arg(long, default_value_t = 0.10, allow_hyphen_values = true)]
    scale: f64,
    /// Start angle in radians
    #[arg(long, default_value_t = 0.01, allow_hyphen_values = true)]
    angle: f64,
    #[arg(long, default_value_t = 2.5, allow_hyphen_values = true)]
    tx: f64,
    #[arg(long, default_value_t = 2.5, allow_hyphen_values = true)]
    ty: f64,
    /// Start at the cloud centroid instead of (tx, ty)
    #[arg(long)]
    center_on_cloud: bool,
    #[arg(long, default_value_t = 1000)]
    max_iter: usize,
    /// Relative spread of simplex costs at which the search stops
    #[arg(long, default_value_t = 1e-12)]
    tol: f64,
    #[arg(long, value_enum, default_value_t = IndexArg::Brute)]
    index: IndexArg,
    /// Number of starts; >1 retries from seeded jitter around the start
    #[arg(long, default_value_t = 1)]
    starts: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Emit the nearest cloud node per curve point instead of the raw curve
    #[arg(long)]
    snap: bool,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Fit(args) => run_fit(&args).map(|_| ()),
        Action::Heart { points, out } => heart(points, &out),
        Action::Report => report(),
    }
}

fn fit_cfg(args: &FitArgs, cloud: &[Point]) -> FitCfg {
    let mut initial = SimilarityParams::new(args.scale, args.angle, args.tx, args.ty);
    if args.center_on_cloud {
        if let Some(c) = centroid(cloud) {
            initial.tx = c.x;
            initial.ty = c.y;
        }
    }
    FitCfg {
        curve_points: args.points,
        initial,
        index: args.index.into(),
        simplex: SimplexCfg::with_limits(args.max_iter, args.tol),
    }
}

fn run_fit(args: &FitArgs) -> Result<FitReport> {
    let loaded = cloud::load_cloud(&args.cloud)?;
    let points = loaded.points;
    tracing::info!(
        cloud = %args.cloud.display(),
        points = points.len(),
        skipped = loaded.skipped,
        "cloud_loaded"
    );
    let cfg = fit_cfg(args, &points);
    tracing::info!(
        scale = cfg.initial.scale,
        angle = cfg.initial.angle,
        tx = cfg.initial.tx,
        ty = cfg.initial.ty,
        index = ?cfg.index,
        starts = args.starts,
        "fit_start"
    );

    let (res, best_start) = if args.starts > 1 {
        let ms = MultiStartCfg {
            starts: args.starts,
            seed: args.seed,
            ..MultiStartCfg::default()
        };
        let multi = multistart(&points, &cfg, &ms)?;
        for (k, (start, cost)) in multi.runs.iter().enumerate() {
            tracing::debug!(start = k, scale = start.scale, cost, "start_done");
        }
        (multi.best, Some(multi.best_start))
    } else {
        (fit(&points, &cfg)?, None)
    };

    let emitted: Vec<Point> = if args.snap {
        let index = CloudIndex::build(cfg.index, &points)?;
        snap_to_cloud(&res.curve, &index)
            .into_iter()
            .map(|i| points[i])
            .collect()
    } else {
        res.curve.clone()
    };

    let mut report = FitReport::new(&res, points.len(), args.snap);
    report.best_start = best_start;
    tracing::info!(
        cost = report.cost,
        iterations = report.iterations,
        evaluations = report.evaluations,
        converged = report.converged,
        "fit_done"
    );
    if !report.converged {
        tracing::warn!(max_iter = args.max_iter, "iteration cap reached before tolerance");
    }

    let fc = feature_collection(&emitted, serde_json::to_value(&report)?);
    write_json(&args.out, &fc)?;
    let params = serde_json::json!({
        "cloud": args.cloud.to_string_lossy(),
        "points": args.points,
        "initial": [cfg.initial.scale, cfg.initial.angle, cfg.initial.tx, cfg.initial.ty],
        "max_iter": args.max_iter,
        "tol": args.tol,
        "index": format!("{:?}", cfg.index),
        "starts": args.starts,
        "seed": args.seed,
        "snap": args.snap
    });
    write_sidecar(&args.out, Payload::new("fit", params))?;
    Ok(report)
}

fn heart(points: usize, out: &Path) -> Result<()> {
    tracing::info!(points, out = %out.display(), "heart");
    let curve = heart_curve(points)?;
    write_json(out, &feature_collection(&curve, serde_json::json!({ "points": points })))?;
    write_sidecar(out, Payload::new("heart", serde_json::json!({ "points": points })))?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": current_git_rev(),
        "heartfit_version": heartfit::VERSION,
        "defaults": {
            "points": DEFAULT_POINTS,
            "initial": SimilarityParams::default().to_vector().as_slice(),
        }
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn args(cloud: PathBuf, out: PathBuf) -> FitArgs {
        FitArgs {
            cloud,
            out,
            points: 50,
            scale: 0.1,
            angle: 0.0,
            tx: 0.0,
            ty: 0.0,
            center_on_cloud: false,
            max_iter: 1000,
            tol: 1e-12,
            index: IndexArg::Brute,
            starts: 1,
            seed: 0,
            snap: false,
        }
    }

    fn cluster_geojson(dir: &Path) -> PathBuf {
        let pts = vec![Point::new(100.0, 100.0); 10];
        let path = dir.join("cluster.geojson");
        write_json(&path, &feature_collection(&pts, serde_json::json!({}))).unwrap();
        path
    }

    #[test]
    fn fit_writes_collection_and_sidecar() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out").join("fit.geojson");
        let report = run_fit(&args(cluster_geojson(dir.path()), out.clone())).unwrap();
        assert!(report.cost < 1e-6);
        assert_eq!(report.cloud_points, 10);

        let fc: serde_json::Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(fc["features"].as_array().unwrap().len(), 50);
        assert_eq!(fc["properties"]["snapped"], false);
        assert!(fc.get("properties").unwrap().get("best_start").is_none());
        assert!(dir.path().join("out").join("fit.provenance.json").exists());
    }

    #[test]
    fn snapped_output_uses_cloud_nodes() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("snap.geojson");
        let mut a = args(cluster_geojson(dir.path()), out.clone());
        a.snap = true;
        a.index = IndexArg::Kd;
        run_fit(&a).unwrap();
        let fc: serde_json::Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        for f in fc["features"].as_array().unwrap() {
            assert_eq!(f["geometry"]["coordinates"], serde_json::json!([100.0, 100.0]));
        }
    }

    #[test]
    fn center_on_cloud_moves_the_start() {
        let cloud = vec![Point::new(10.0, 20.0), Point::new(30.0, 40.0)];
        let mut a = args(PathBuf::from("unused.csv"), PathBuf::from("unused.geojson"));
        a.center_on_cloud = true;
        let cfg = fit_cfg(&a, &cloud);
        assert_eq!((cfg.initial.tx, cfg.initial.ty), (20.0, 30.0));
        assert_eq!(cfg.initial.scale, 0.1);
    }

    #[test]
    fn multistart_reports_winning_start() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("multi.geojson");
        let mut a = args(cluster_geojson(dir.path()), out);
        a.starts = 3;
        a.seed = 9;
        let report = run_fit(&a).unwrap();
        assert!(report.best_start.unwrap() < 3);
    }

    #[test]
    fn cli_parses_negative_start_values() {
        let cmd = Cmd::try_parse_from([
            "heartfit", "fit", "--cloud", "c.csv", "--out", "o.geojson", "--tx", "-3.5",
            "--scale", "-0.2", "--index", "kd",
        ])
        .unwrap();
        match cmd.action {
            Action::Fit(a) => {
                assert_eq!(a.tx, -3.5);
                assert_eq!(a.scale, -0.2);
                assert!(matches!(a.index, IndexArg::Kd));
                assert_eq!(a.points, DEFAULT_POINTS);
            }
            _ => panic!("expected fit"),
        }
    }
}
