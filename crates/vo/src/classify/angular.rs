//! Angle-form classifier: compares `theta` (between `w` and `-p`) with the
//! cone half-angle `beta`.
//!
//! Geometry
//! - The tangent leg `ℓ`, the relative position `p` and a segment of length `r`
//!   form a right triangle, so `cos(beta) = r / |p|` and `|ℓ|² = |p|² - r²`.
//! - `w • (-p) = |w| |p| cos(theta)` and `w × (-p) = |w| |p| sin(theta)`.
//!   `w` lies in the circular cap iff it points toward the apex (`cos > 0`)
//!   and `theta < beta`; otherwise the sign of `sin(theta)` picks the leg.

use super::{Classify, ProjectionCase};
use crate::geom::{det, Vec2};

/// VO of A induced by B, tested by explicit angles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocityObstacle {
    p: Vec2,
    r: f64,
    /// `acos(r / |p|)`; `None` while the agents overlap (ratio ≥ 1).
    beta: Option<f64>,
}

impl VelocityObstacle {
    pub fn new(pa: Vec2, pb: Vec2, ra: f64, rb: f64) -> Self {
        let p = pb - pa;
        let r = ra + rb;
        // Domain error for acos({x | x > 1}).
        let beta = if p.norm_squared() > r.powi(2) {
            Some((r / p.norm()).acos())
        } else {
            None
        };
        Self { p, r, beta }
    }

    #[inline]
    pub fn p(&self) -> Vec2 {
        self.p
    }

    #[inline]
    pub fn r(&self) -> f64 {
        self.r
    }

    /// Cone half-angle in radians, in `[0, π/2]`; `None` for overlapping agents.
    #[inline]
    pub fn beta(&self) -> Option<f64> {
        self.beta
    }

    /// Length of the tangent leg from the apex to the collision circle.
    ///
    /// Reported as `sqrt(| |p|² - r² |)` so it stays finite for overlapping agents.
    pub fn tangent_length(&self) -> f64 {
        (self.p.norm_squared() - self.r.powi(2)).abs().sqrt()
    }

    /// `w` as seen from agent A: `vb` is held constant, so the relative velocity is `va - vb`.
    #[inline]
    pub fn w(&self, va: Vec2, vb: Vec2) -> Vec2 {
        (va - vb) - self.p
    }

    /// Angle `theta ∈ [0, π]` between `w` and `-p`.
    ///
    /// NaN if `w` or `p` has zero length. The cosine is clamped to `[-1, 1]`
    /// since rounding can push it past 1 for nearly parallel vectors.
    pub fn angle_between(&self, va: Vec2, vb: Vec2) -> f64 {
        let w = self.w(va, vb);
        let wp = w.dot(&-self.p);
        let cos_theta = wp / (w.norm_squared() * self.p.norm_squared()).sqrt();
        cos_theta.clamp(-1.0, 1.0).acos()
    }

    pub fn check(&self, va: Vec2, vb: Vec2) -> ProjectionCase {
        // `beta` is unset exactly when |p|² <= r², i.e. the agents overlap or touch.
        let Some(beta) = self.beta else {
            return ProjectionCase::Collision;
        };

        let w = self.w(va, vb);
        let neg_p = -self.p;
        let wp = w.dot(&neg_p);

        // w points back toward the apex and lies within the tangent angle.
        if wp > 0.0 && self.angle_between(va, vb) < beta {
            return ProjectionCase::Circle;
        }

        // Matches the projection form by convention; sin(theta) is undefined here.
        if self.p.norm_squared() == 0.0 || w.norm_squared() == 0.0 {
            return ProjectionCase::Right;
        }

        let sin_theta = det(w, neg_p) / (w.norm_squared() * self.p.norm_squared()).sqrt();
        if sin_theta > 0.0 {
            return ProjectionCase::Left;
        }
        // Includes theta == 0 and theta == π.
        ProjectionCase::Right
    }
}

impl Classify for VelocityObstacle {
    #[inline]
    fn new(pa: Vec2, pb: Vec2, ra: f64, rb: f64) -> Self {
        VelocityObstacle::new(pa, pb, ra, rb)
    }

    #[inline]
    fn check(&self, va: Vec2, vb: Vec2) -> ProjectionCase {
        VelocityObstacle::check(self, va, vb)
    }
}
