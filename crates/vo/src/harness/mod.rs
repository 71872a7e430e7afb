//! Differential fuzzing of the two VO classifiers.
//!
//! Purpose
//! - Sample random agent pairs and candidate velocities, classify each with
//!   `ProjectionTest` and `VelocityObstacle`, and stop at the first disagreement.
//! - A disagreement is a logic defect in one of the formulations, so it is never
//!   retried; the returned `Divergence` carries every intermediate quantity.
//!
//! Reproducibility
//! - A run is identified by a single `seed`. Trial `i` draws from its own RNG
//!   derived from `ReplayToken { seed, index: i }` (see `sample`), so `replay`
//!   can regenerate one failing trial in isolation.

mod sample;

pub use sample::{draw_trial, sample_trial, ReplayToken};

use std::fmt;

use crate::classify::{ProjectionCase, ProjectionTest, VelocityObstacle};
use crate::geom::{Agent, Vec2};

/// Harness configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuzzCfg {
    /// Random trials per run (the pinned regression trial is extra).
    pub iterations: u64,
    /// Positions and velocities are drawn from `[-coord_bound, coord_bound)` per axis.
    pub coord_bound: f64,
    /// Radii are drawn from `(0, radius_max]`.
    pub radius_max: f64,
}

impl Default for FuzzCfg {
    fn default() -> Self {
        Self {
            iterations: 1000,
            coord_bound: 100.0,
            radius_max: 101.0,
        }
    }
}

impl FuzzCfg {
    pub fn validate(&self) -> Result<(), FuzzError> {
        if self.iterations == 0 {
            return Err(FuzzError::invalid("iterations must be positive"));
        }
        if !self.coord_bound.is_finite() || self.coord_bound <= 0.0 {
            return Err(FuzzError::invalid(format!(
                "coord_bound must be finite and positive, got {}",
                self.coord_bound
            )));
        }
        // Sampling draws from `-coord_bound..coord_bound`, whose width must stay finite.
        if !(2.0 * self.coord_bound).is_finite() {
            return Err(FuzzError::invalid(format!(
                "coord_bound too large for a finite sampling range, got {}",
                self.coord_bound
            )));
        }
        if !self.radius_max.is_finite() || self.radius_max <= 0.0 {
            return Err(FuzzError::invalid(format!(
                "radius_max must be finite and positive, got {}",
                self.radius_max
            )));
        }
        Ok(())
    }
}

/// Error type for harness runs.
#[derive(Debug)]
pub enum FuzzError {
    InvalidCfg { reason: String },
    Divergence(Box<Divergence>),
}

impl FuzzError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidCfg {
            reason: reason.into(),
        }
    }

    /// The divergence, if this run failed on one.
    pub fn divergence(&self) -> Option<&Divergence> {
        match self {
            Self::Divergence(d) => Some(d.as_ref()),
            Self::InvalidCfg { .. } => None,
        }
    }
}

impl fmt::Display for FuzzError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCfg { reason } => write!(f, "invalid fuzz config: {reason}"),
            Self::Divergence(d) => write!(f, "{d}"),
        }
    }
}

impl std::error::Error for FuzzError {}

impl From<Divergence> for FuzzError {
    fn from(d: Divergence) -> Self {
        Self::Divergence(Box::new(d))
    }
}

/// One classification input: two agents and their candidate velocities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trial {
    pub a: Agent,
    pub b: Agent,
    pub va: Vec2,
    pub vb: Vec2,
}

impl Trial {
    /// Hand-checked configuration pinned ahead of every run; classifies as `Circle`.
    pub fn regression() -> Self {
        Self {
            a: Agent::new(Vec2::new(0.0, 0.0), 1.0),
            b: Agent::new(Vec2::new(0.0, 5.0), 2.0),
            va: Vec2::new(0.0, 0.0),
            vb: Vec2::new(1.0, -1.0),
        }
    }
}

/// Full state of a disagreement between the two classifiers.
#[derive(Clone, Debug, PartialEq)]
pub struct Divergence {
    pub trial: Trial,
    /// `None` for the pinned regression trial.
    pub token: Option<ReplayToken>,
    pub p: Vec2,
    pub r: f64,
    pub w: Vec2,
    /// `w · p` as used by the projection form.
    pub wp: f64,
    /// `w · (-p)` as used by the angular form.
    pub wp_neg: f64,
    /// `theta`; NaN for zero-length `w` or `p`.
    pub angle_between: f64,
    pub beta: Option<f64>,
    pub tangent_length: f64,
    pub projection: ProjectionCase,
    pub angular: ProjectionCase,
}

impl Divergence {
    fn capture(
        trial: &Trial,
        vec_form: &ProjectionTest,
        ang_form: &VelocityObstacle,
        projection: ProjectionCase,
        angular: ProjectionCase,
    ) -> Self {
        let w = vec_form.w(trial.va, trial.vb);
        Self {
            trial: *trial,
            token: None,
            p: vec_form.p(),
            r: vec_form.r(),
            w,
            wp: w.dot(&vec_form.p()),
            wp_neg: w.dot(&-ang_form.p()),
            angle_between: ang_form.angle_between(trial.va, trial.vb),
            beta: ang_form.beta(),
            tangent_length: ang_form.tangent_length(),
            projection,
            angular,
        }
    }
}

fn fmt_vec(v: &Vec2) -> String {
    format!("<{}, {}>", v.x, v.y)
}

fn fmt_angle(rad: f64) -> String {
    format!("{rad} ({}°)", rad.to_degrees())
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.trial;
        writeln!(
            f,
            "classifiers diverge: projection={} angular={}",
            self.projection, self.angular
        )?;
        if let Some(tok) = self.token {
            writeln!(f, "  replay: seed={} index={}", tok.seed, tok.index)?;
        } else {
            writeln!(f, "  replay: regression trial")?;
        }
        writeln!(f, "  a: p={} r={}", fmt_vec(&t.a.position), t.a.radius)?;
        writeln!(f, "  b: p={} r={}", fmt_vec(&t.b.position), t.b.radius)?;
        writeln!(f, "  va={} vb={}", fmt_vec(&t.va), fmt_vec(&t.vb))?;
        writeln!(f, "  p={} r={}", fmt_vec(&self.p), self.r)?;
        writeln!(f, "  w={}", fmt_vec(&self.w))?;
        writeln!(f, "  w·p={} w·(-p)={}", self.wp, self.wp_neg)?;
        writeln!(f, "  l={}", self.tangent_length)?;
        match self.beta {
            Some(beta) => writeln!(f, "  beta={}", fmt_angle(beta))?,
            None => writeln!(f, "  beta=undefined (overlap)")?,
        }
        write!(f, "  theta={}", fmt_angle(self.angle_between))
    }
}

impl std::error::Error for Divergence {}

/// Classify one trial with both forms; `Err` carries the full diagnostic state.
pub fn check_trial(trial: &Trial) -> Result<ProjectionCase, Divergence> {
    let (a, b) = (&trial.a, &trial.b);
    let vec_form = ProjectionTest::new(a.position, b.position, a.radius, b.radius);
    let ang_form = VelocityObstacle::new(a.position, b.position, a.radius, b.radius);
    let projection = vec_form.check(trial.va, trial.vb);
    let angular = ang_form.check(trial.va, trial.vb);
    if projection != angular {
        return Err(Divergence::capture(trial, &vec_form, &ang_form, projection, angular));
    }
    Ok(projection)
}

/// Outcome of a clean run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuzzSummary {
    pub seed: u64,
    /// Trials checked, including the regression trial.
    pub trials: u64,
    /// Tallies indexed by `ProjectionCase::index`.
    pub counts: [u64; 4],
}

impl FuzzSummary {
    #[inline]
    pub fn count(&self, case: ProjectionCase) -> u64 {
        self.counts[case.index()]
    }
}

/// Run the regression trial, then `cfg.iterations` random trials derived from `seed`.
///
/// Stops at the first divergence.
pub fn run(cfg: FuzzCfg, seed: u64) -> Result<FuzzSummary, FuzzError> {
    cfg.validate()?;
    let mut summary = FuzzSummary {
        seed,
        trials: 0,
        counts: [0; 4],
    };

    let case = check_trial(&Trial::regression())?;
    summary.counts[case.index()] += 1;
    summary.trials += 1;

    for index in 0..cfg.iterations {
        let tok = ReplayToken::new(seed, index);
        let case = replay_token(&cfg, tok)?;
        summary.counts[case.index()] += 1;
        summary.trials += 1;
    }
    Ok(summary)
}

/// Re-run a single random trial of a previous run.
pub fn replay(cfg: FuzzCfg, tok: ReplayToken) -> Result<ProjectionCase, FuzzError> {
    cfg.validate()?;
    Ok(replay_token(&cfg, tok)?)
}

fn replay_token(cfg: &FuzzCfg, tok: ReplayToken) -> Result<ProjectionCase, Divergence> {
    let trial = draw_trial(cfg, tok);
    check_trial(&trial).map_err(|mut d| {
        d.token = Some(tok);
        d
    })
}

#[cfg(test)]
mod tests;
