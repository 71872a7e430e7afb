//! Velocity-obstacle region classification for pairs of circular agents.
//!
//! Layout
//! - `geom`: the 2D vector alias, the signed-area `det`, and `Agent`.
//! - `classify`: `ProjectionCase` plus two independently derived classifiers,
//!   `ProjectionTest` (dot/cross only) and `VelocityObstacle` (acos angles).
//! - `harness`: seeded differential fuzzing that asserts both classifiers agree.
//!
//! The library performs no I/O; reporting lives in the `vo-cli` crate.

pub mod classify;
pub mod geom;
pub mod harness;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use classify::{classify, Classify, ProjectionCase, ProjectionTest, VelocityObstacle};
pub use geom::{det, Agent, Vec2};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::classify::{classify, Classify, ProjectionCase, ProjectionTest, VelocityObstacle};
    pub use crate::geom::{det, Agent, Vec2};
    pub use crate::harness::{
        check_trial, replay, run, Divergence, FuzzCfg, FuzzError, FuzzSummary, ReplayToken, Trial,
    };
}
