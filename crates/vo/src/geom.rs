//! 2D value types shared by both classifiers.
//!
//! `Vec2` is nalgebra's column vector; it already provides add, subtract,
//! scalar scaling, `dot` and `norm_squared`. The one operation it lacks for
//! planar work is the scalar cross product, provided here as `det`.

pub use nalgebra::Vector2;

/// Planar vector used for positions and velocities.
pub type Vec2 = Vector2<f64>;

/// Signed area of the parallelogram spanned by `a` and `b` (2D cross product).
/// Positive for a→b counterclockwise, negative otherwise.
#[inline]
pub fn det(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Circular agent: position plus collision radius (non-negative).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agent {
    pub position: Vec2,
    pub radius: f64,
}

impl Agent {
    #[inline]
    pub fn new(position: Vec2, radius: f64) -> Self {
        Self { position, radius }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn vector_ops() {
        let v = vector![1.0, 1.0];
        let u = vector![2.0, 3.0];
        assert_eq!(v + u, vector![3.0, 4.0]);
        assert_eq!(v - u, vector![-1.0, -2.0]);
        assert_eq!(u * 2.0, vector![4.0, 6.0]);
        assert_eq!(v.dot(&u), 5.0);
        assert_eq!(u.norm_squared(), 13.0);
        assert_eq!(u.norm_squared(), u.dot(&u));
    }

    #[test]
    fn det_axis_aligned() {
        assert_eq!(det(vector![1.0, 1.0], vector![2.0, 3.0]), 1.0);
        assert!((det(vector![1.0, 0.0], vector![0.0, 2.5]) - 2.5).abs() < 1e-12);
        // Orientation flips with argument order; parallel vectors vanish.
        assert_eq!(det(vector![0.0, 2.5], vector![1.0, 0.0]), -2.5);
        assert_eq!(det(vector![2.0, 4.0], vector![-1.0, -2.0]), 0.0);
    }

    #[test]
    fn det_randomized_seeded() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..32 {
            let a = Vec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
            let b = Vec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
            assert_eq!(det(a, b), -det(b, a));
            assert_eq!(det(a, a), 0.0);
        }
    }
}
