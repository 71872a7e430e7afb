//! Region classification against the velocity obstacle of A induced by B.
//!
//! Model
//! - `p = pB - pA` is the relative position, `r = rA + rB` the combined radius.
//! - For candidate velocities `(va, vb)` the offset `w = (va - vb) - p` locates the
//!   relative velocity with respect to the centre of the collision circle.
//! - The outcome is one of `ProjectionCase::{Collision, Circle, Left, Right}`:
//!   overlapping agents, inside the circular cap, or nearest to the left/right leg.
//!
//! Two formulations
//! - `ProjectionTest`: dot, cross and squared magnitudes only (no sqrt, no trig).
//! - `VelocityObstacle`: explicit angles `theta` (between `w` and `-p`) and the
//!   cone half-angle `beta = acos(r / |p|)`.
//!
//! They are derived independently and must agree on every non-degenerate input;
//! `harness` checks that. Keep their bodies separate.

mod angular;
mod projection;

pub use angular::VelocityObstacle;
pub use projection::ProjectionTest;

use std::fmt;

use crate::geom::{Agent, Vec2};

/// Where a candidate relative velocity falls with respect to the VO cone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectionCase {
    /// Agents already overlap or touch; independent of the velocities.
    Collision,
    /// Inside the circular cap of the cone.
    Circle,
    /// Nearest to the left tangent leg.
    Left,
    /// Nearest to the right tangent leg (also the tie-break on the axis).
    Right,
}

impl ProjectionCase {
    pub const ALL: [ProjectionCase; 4] = [
        ProjectionCase::Collision,
        ProjectionCase::Circle,
        ProjectionCase::Left,
        ProjectionCase::Right,
    ];

    /// Stable upper-case label used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectionCase::Collision => "COLLISION",
            ProjectionCase::Circle => "CIRCLE",
            ProjectionCase::Left => "LEFT",
            ProjectionCase::Right => "RIGHT",
        }
    }

    /// Position in `ALL`; used for tallies.
    pub fn index(self) -> usize {
        match self {
            ProjectionCase::Collision => 0,
            ProjectionCase::Circle => 1,
            ProjectionCase::Left => 2,
            ProjectionCase::Right => 3,
        }
    }
}

impl fmt::Display for ProjectionCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common surface of both formulations so callers can be generic over them.
pub trait Classify: Sized {
    fn new(pa: Vec2, pb: Vec2, ra: f64, rb: f64) -> Self;

    fn check(&self, va: Vec2, vb: Vec2) -> ProjectionCase;

    #[inline]
    fn from_agents(a: &Agent, b: &Agent) -> Self {
        Self::new(a.position, b.position, a.radius, b.radius)
    }
}

/// Classify candidate velocities `(va, vb)` for agents at `pa`, `pb` with radii `ra`, `rb`.
///
/// Uses the projection form, which needs no transcendental functions.
#[inline]
pub fn classify(pa: Vec2, pb: Vec2, ra: f64, rb: f64, va: Vec2, vb: Vec2) -> ProjectionCase {
    ProjectionTest::new(pa, pb, ra, rb).check(va, vb)
}
