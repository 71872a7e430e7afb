//! Vector-form classifier: signs of dot and cross products only.

use super::{Classify, ProjectionCase};
use crate::geom::{det, Vec2};

/// VO of A induced by B, tested by projection.
///
/// The circular-cap test compares `(w·p)²` against `|w|² r²`, i.e. the squared
/// cosine of the angle between `w` and `-p` against `(r/|p|)²` scaled by `|p|²`
/// (Cauchy–Schwarz form), so no square root is ever taken.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionTest {
    p: Vec2,
    r: f64,
}

impl ProjectionTest {
    pub fn new(pa: Vec2, pb: Vec2, ra: f64, rb: f64) -> Self {
        Self {
            p: pb - pa,
            r: ra + rb,
        }
    }

    /// Relative position `pB - pA`.
    #[inline]
    pub fn p(&self) -> Vec2 {
        self.p
    }

    /// Combined radius `rA + rB`.
    #[inline]
    pub fn r(&self) -> f64 {
        self.r
    }

    /// Offset of the relative velocity `va - vb` from the circle centre `p`.
    #[inline]
    pub fn w(&self, va: Vec2, vb: Vec2) -> Vec2 {
        (va - vb) - self.p
    }

    pub fn check(&self, va: Vec2, vb: Vec2) -> ProjectionCase {
        if self.p.norm_squared() <= self.r.powi(2) {
            return ProjectionCase::Collision;
        }

        let w = self.w(va, vb);
        let wp = w.dot(&self.p);
        if wp < 0.0 && wp.powi(2) > w.norm_squared() * self.r.powi(2) {
            return ProjectionCase::Circle;
        }

        if det(self.p, w) > 0.0 {
            return ProjectionCase::Left;
        }
        ProjectionCase::Right
    }
}

impl Classify for ProjectionTest {
    #[inline]
    fn new(pa: Vec2, pb: Vec2, ra: f64, rb: f64) -> Self {
        ProjectionTest::new(pa, pb, ra, rb)
    }

    #[inline]
    fn check(&self, va: Vec2, vb: Vec2) -> ProjectionCase {
        ProjectionTest::check(self, va, vb)
    }
}
