use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;
use vo::harness::{self, Divergence, FuzzCfg, FuzzError, ReplayToken};
use vo::{ProjectionTest, Vec2, VelocityObstacle};

#[derive(Parser)]
#[command(name = "vo-cli")]
#[command(about = "Velocity-obstacle classification and differential fuzzing")]
struct Cmd {
    /// Log at debug level (default: warnings only)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

/// Sampling bounds shared by `fuzz` and `replay`.
#[derive(clap::Args, Clone, Copy)]
struct Bounds {
    /// Positions and velocities are drawn from [-coord_bound, coord_bound)
    #[arg(long, default_value_t = FuzzCfg::default().coord_bound)]
    coord_bound: f64,
    /// Radii are drawn from (0, radius_max]
    #[arg(long, default_value_t = FuzzCfg::default().radius_max)]
    radius_max: f64,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Form {
    Vector,
    Angle,
    Both,
}

#[derive(Subcommand)]
enum Action {
    /// Cross-check both classifiers on random trials; prints the seed first
    Fuzz {
        /// Replay a previous run; defaults to wall-clock seconds
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = FuzzCfg::default().iterations)]
        iterations: u64,
        #[command(flatten)]
        bounds: Bounds,
        /// Also write the divergence report (JSON) here
        #[arg(long)]
        out: Option<String>,
    },
    /// Re-run a single trial of a previous fuzz run
    Replay {
        #[arg(long)]
        seed: u64,
        #[arg(long)]
        index: u64,
        #[command(flatten)]
        bounds: Bounds,
    },
    /// Classify one configuration (vectors as `x,y`)
    Classify {
        #[arg(long, value_parser = parse_vec2, allow_hyphen_values = true)]
        pa: Vec2,
        #[arg(long, value_parser = parse_vec2, allow_hyphen_values = true)]
        pb: Vec2,
        #[arg(long)]
        ra: f64,
        #[arg(long)]
        rb: f64,
        #[arg(long, value_parser = parse_vec2, allow_hyphen_values = true)]
        va: Vec2,
        #[arg(long, value_parser = parse_vec2, allow_hyphen_values = true)]
        vb: Vec2,
        #[arg(long, value_enum, default_value_t = Form::Both)]
        form: Form,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::WARN };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Fuzz {
            seed,
            iterations,
            bounds,
            out,
        } => fuzz(seed, bounds.cfg(iterations), out),
        Action::Replay {
            seed,
            index,
            bounds,
        } => replay(ReplayToken::new(seed, index), bounds.cfg(1)),
        Action::Classify {
            pa,
            pb,
            ra,
            rb,
            va,
            vb,
            form,
        } => classify(pa, pb, ra, rb, va, vb, form),
    }
}

impl Bounds {
    fn cfg(self, iterations: u64) -> FuzzCfg {
        FuzzCfg {
            iterations,
            coord_bound: self.coord_bound,
            radius_max: self.radius_max,
        }
    }
}

fn fuzz(seed: Option<u64>, cfg: FuzzCfg, out: Option<String>) -> Result<()> {
    let seed = match seed {
        Some(s) => s,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock before unix epoch")?
            .as_secs(),
    };
    println!("seed == {seed}");
    tracing::debug!(
        seed,
        iterations = cfg.iterations,
        coord_bound = cfg.coord_bound,
        radius_max = cfg.radius_max,
        "fuzz"
    );

    match harness::run(cfg, seed) {
        Ok(summary) => {
            tracing::info!(
                trials = summary.trials,
                counts = ?summary.counts,
                "fuzz_clean"
            );
            Ok(())
        }
        Err(FuzzError::Divergence(d)) => {
            let report = DivergenceReport::from(d.as_ref());
            println!("{}", serde_json::to_string_pretty(&report)?);
            if let Some(out) = out {
                write_report(&out, &report)?;
            }
            tracing::error!(seed, index = ?report.index, "divergence");
            bail!(divergence_summary(&d))
        }
        Err(e) => Err(e.into()),
    }
}

fn replay(tok: ReplayToken, cfg: FuzzCfg) -> Result<()> {
    tracing::debug!(seed = tok.seed, index = tok.index, "replay");
    match harness::replay(cfg, tok) {
        Ok(case) => {
            println!("{case}");
            Ok(())
        }
        Err(FuzzError::Divergence(d)) => {
            let report = DivergenceReport::from(d.as_ref());
            println!("{}", serde_json::to_string_pretty(&report)?);
            bail!(divergence_summary(&d))
        }
        Err(e) => Err(e.into()),
    }
}

fn classify(pa: Vec2, pb: Vec2, ra: f64, rb: f64, va: Vec2, vb: Vec2, form: Form) -> Result<()> {
    if !(ra >= 0.0 && rb >= 0.0) {
        bail!("radii must be non-negative, got ra={ra} rb={rb}");
    }
    let vec_case = ProjectionTest::new(pa, pb, ra, rb).check(va, vb);
    let ang_case = VelocityObstacle::new(pa, pb, ra, rb).check(va, vb);
    tracing::debug!(%vec_case, %ang_case, "classify");
    match form {
        Form::Vector => println!("{vec_case}"),
        Form::Angle => println!("{ang_case}"),
        Form::Both => {
            println!("vector={vec_case} angle={ang_case}");
            if vec_case != ang_case {
                bail!("classifiers diverge: vector={vec_case} angle={ang_case}");
            }
        }
    }
    Ok(())
}

/// One-line error for a divergence; the full state is already on stdout as JSON.
fn divergence_summary(d: &Divergence) -> String {
    match d.token {
        Some(tok) => format!(
            "classifiers diverge: projection={} angular={} (seed={}, index={})",
            d.projection, d.angular, tok.seed, tok.index
        ),
        None => format!(
            "classifiers diverge on the regression trial: projection={} angular={}",
            d.projection, d.angular
        ),
    }
}

/// Parse `x,y` into a vector.
fn parse_vec2(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let parse = |t: &str| {
        t.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate `{t}`: {e}"))
    };
    let v = Vec2::new(parse(x)?, parse(y)?);
    if !(v.x.is_finite() && v.y.is_finite()) {
        return Err(format!("coordinates must be finite, got `{s}`"));
    }
    Ok(v)
}

/// JSON form of a `Divergence`; vectors as `[x, y]`, undefined angles as `null`.
#[derive(Serialize)]
struct DivergenceReport {
    seed: Option<u64>,
    index: Option<u64>,
    projection: String,
    angular: String,
    a: AgentReport,
    b: AgentReport,
    va: [f64; 2],
    vb: [f64; 2],
    p: [f64; 2],
    r: f64,
    w: [f64; 2],
    wp: f64,
    wp_neg: f64,
    angle_between: Option<f64>,
    beta: Option<f64>,
    tangent_length: f64,
}

#[derive(Serialize)]
struct AgentReport {
    position: [f64; 2],
    radius: f64,
}

fn xy(v: Vec2) -> [f64; 2] {
    [v.x, v.y]
}

impl From<&Divergence> for DivergenceReport {
    fn from(d: &Divergence) -> Self {
        let t = &d.trial;
        Self {
            seed: d.token.map(|tok| tok.seed),
            index: d.token.map(|tok| tok.index),
            projection: d.projection.to_string(),
            angular: d.angular.to_string(),
            a: AgentReport {
                position: xy(t.a.position),
                radius: t.a.radius,
            },
            b: AgentReport {
                position: xy(t.b.position),
                radius: t.b.radius,
            },
            va: xy(t.va),
            vb: xy(t.vb),
            p: xy(d.p),
            r: d.r,
            w: xy(d.w),
            wp: d.wp,
            wp_neg: d.wp_neg,
            // NaN for zero-length w or p.
            angle_between: Some(d.angle_between).filter(|a| a.is_finite()),
            beta: d.beta,
            tangent_length: d.tangent_length,
        }
    }
}

fn write_report(out: &str, report: &DivergenceReport) -> Result<()> {
    let out_path = Path::new(out);
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating report dir {}", parent.display()))?;
        }
    }
    std::fs::write(out_path, serde_json::to_vec_pretty(report)?)
        .with_context(|| format!("writing {}", out_path.display()))?;
    tracing::info!(report = %out_path.display(), "report_written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use vo::harness::{check_trial, Trial};

    #[test]
    fn parse_vec2_accepts_pairs() {
        assert_eq!(parse_vec2("1,2").unwrap(), Vec2::new(1.0, 2.0));
        assert_eq!(parse_vec2(" -0.5 , 3e2").unwrap(), Vec2::new(-0.5, 300.0));
    }

    #[test]
    fn parse_vec2_rejects_garbage() {
        assert!(parse_vec2("1").is_err());
        assert!(parse_vec2("1,x").is_err());
        assert!(parse_vec2("inf,0").is_err());
    }

    #[test]
    fn classify_args_accept_negative_vectors() {
        let cmd = Cmd::try_parse_from([
            "vo-cli", "classify", "--pa", "-1,-2", "--pb", "3,4", "--ra", "1", "--rb", "2",
            "--va", "0,0", "--vb", "-1,1", "--form", "vector",
        ])
        .unwrap();
        match cmd.action {
            Action::Classify { pa, vb, form, .. } => {
                assert_eq!(pa, Vec2::new(-1.0, -2.0));
                assert_eq!(vb, Vec2::new(-1.0, 1.0));
                assert!(form == Form::Vector);
            }
            _ => panic!("expected classify"),
        }
    }

    #[test]
    fn fuzz_defaults_match_library() {
        let cmd = Cmd::try_parse_from(["vo-cli", "fuzz"]).unwrap();
        match cmd.action {
            Action::Fuzz {
                seed,
                iterations,
                bounds,
                out,
            } => {
                assert!(seed.is_none() && out.is_none());
                assert_eq!(bounds.cfg(iterations), FuzzCfg::default());
            }
            _ => panic!("expected fuzz"),
        }
    }

    fn sample_divergence(token: Option<ReplayToken>) -> Divergence {
        Divergence {
            trial: Trial::regression(),
            token,
            p: Vec2::new(0.0, 5.0),
            r: 3.0,
            w: Vec2::new(0.0, 0.0),
            wp: 0.0,
            wp_neg: 0.0,
            angle_between: f64::NAN,
            beta: Some(0.5),
            tangent_length: 4.0,
            projection: vo::ProjectionCase::Circle,
            angular: vo::ProjectionCase::Right,
        }
    }

    #[test]
    fn report_json_shape() {
        assert!(check_trial(&Trial::regression()).is_ok());
        let d = sample_divergence(Some(ReplayToken::new(3, 9)));
        let v = serde_json::to_value(DivergenceReport::from(&d)).unwrap();
        assert_eq!(v["seed"], 3);
        assert_eq!(v["index"], 9);
        assert_eq!(v["projection"], "CIRCLE");
        assert_eq!(v["angular"], "RIGHT");
        assert_eq!(v["b"]["position"][1], 5.0);
        assert!(v["angle_between"].is_null());
    }

    #[test]
    fn divergence_error_is_one_line() {
        let replayable = divergence_summary(&sample_divergence(Some(ReplayToken::new(3, 9))));
        assert!(!replayable.contains('\n'));
        assert!(replayable.contains("seed=3, index=9"));
        assert!(replayable.contains("projection=CIRCLE angular=RIGHT"));

        let pinned = divergence_summary(&sample_divergence(None));
        assert!(!pinned.contains('\n'));
        assert!(pinned.contains("regression trial"));
        // The multi-line dump is reserved for the JSON report.
        assert!(sample_divergence(None).to_string().lines().count() > 1);
    }

    #[test]
    fn write_report_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested").join("div.json");
        let report = DivergenceReport::from(&sample_divergence(Some(ReplayToken::new(11, 2))));
        write_report(out.to_str().unwrap(), &report).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(parsed["seed"], 11);
        assert_eq!(parsed["index"], 2);
        assert_eq!(parsed["w"][0], 0.0);
        let entries = std::fs::read_dir(out.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1, "only the report itself is written");
    }
}
