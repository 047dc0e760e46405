//! Vector algebra on [`Vector`] values.
//!
//! All functions are pure and never fail. Degenerate input is reported
//! through the returned value rather than an error, see [`facet_normal`].

use crate::nalgebra_types::*;
use crate::triangle::Triangle;

/// Componentwise `a - b`.
pub fn sub(a: &Vector, b: &Vector) -> Vector {
    a - b
}

/// Right handed cross product `v × w`.
pub fn cross(v: &Vector, w: &Vector) -> Vector {
    v.cross(w)
}

/// Euclidean length.
pub fn length(v: &Vector) -> f64 {
    v.norm()
}

/// Componentwise multiply by `f`.
pub fn scale(v: &Vector, f: f64) -> Vector {
    v.scale(f)
}

/// Unit normal of the facet, oriented by the right hand rule over the
/// winding `vertex[0] -> vertex[1] -> vertex[2]`.
///
/// A degenerate facet (coincident or collinear vertices) has a zero length
/// cross product. The reciprocal is then `+inf` and every component of the
/// result is NaN. Callers can test for this with `is_degenerate`.
pub fn facet_normal(t: &Triangle) -> Vector {
    let v = sub(&t.vertex[1], &t.vertex[0]);
    let w = sub(&t.vertex[2], &t.vertex[0]);
    let n = cross(&v, &w);
    scale(&n, 1.0 / length(&n))
}

/// True when `v` is the sentinel returned by [`facet_normal`] for a
/// degenerate facet.
pub fn is_degenerate(v: &Vector) -> bool {
    v.iter().all(|c| c.is_nan())
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::vec3;
    use approx::{abs_diff_eq, relative_eq};

    fn tri(a: Vector, b: Vector, c: Vector) -> Triangle {
        Triangle::new(Vector::zeros(), [a, b, c])
    }

    #[test]
    fn primitives() {
        let a = vec3![1.0, 2.0, 3.0];
        let b = vec3![4.0, 6.0, 8.0];
        assert_eq!(sub(&b, &a), vec3![3.0, 4.0, 5.0]);
        assert_eq!(cross(&vec3![1.0, 0.0, 0.0], &vec3![0.0, 1.0, 0.0]), vec3![0.0, 0.0, 1.0]);
        assert_eq!(length(&vec3![3.0, 4.0, 0.0]), 5.0);
        assert_eq!(scale(&a, -2.0), vec3![-2.0, -4.0, -6.0]);
    }

    #[test]
    fn unit_square_corner() {
        let t = tri(vec3![0.0, 0.0, 0.0], vec3![1.0, 0.0, 0.0], vec3![0.0, 1.0, 0.0]);
        assert!(abs_diff_eq!(facet_normal(&t), vec3![0.0, 0.0, 1.0], epsilon = 1e-14));
    }

    #[test]
    fn reversed_winding() {
        let t = tri(vec3![0.0, 1.0, 0.0], vec3![1.0, 0.0, 0.0], vec3![0.0, 0.0, 0.0]);
        assert!(abs_diff_eq!(facet_normal(&t), vec3![0.0, 0.0, -1.0], epsilon = 1e-14));
    }

    #[test]
    fn diagonal() {
        let t = tri(vec3![0.0, 0.0, 0.0], vec3![1.0, 1.0, 0.0], vec3![0.0, 0.0, 1.0]);
        let half = std::f64::consts::SQRT_2 / 2.0;
        assert!(abs_diff_eq!(facet_normal(&t), vec3![half, -half, 0.0], epsilon = 1e-14));
    }

    #[test]
    fn wild_facets() {
        let a = vec3![1.87881290913, -3.53213620186, -11.3913011551];
        let b = vec3![-2.68665337563, 4.77704572678, -10.5945053101];
        let c = vec3![6.36734676361, 2.7538228035, -9.43354320526];
        let d = vec3![-5.0690164566, -6.2167840004, -8.72221755981];

        let n = facet_normal(&tri(a, b, c));
        assert!(abs_diff_eq!(n, vec3![0.165308400989, 0.183746621013, -0.968973815441], epsilon = 1e-7));
        assert!(relative_eq!(length(&n), 1.0, max_relative = 1e-14));

        let n = facet_normal(&tri(a, d, b));
        assert!(abs_diff_eq!(n, vec3![-0.32688832283, -0.089389257133, -0.940825998783], epsilon = 1e-7));
        assert!(relative_eq!(length(&n), 1.0, max_relative = 1e-14));
    }

    #[test]
    fn default_triangle_is_degenerate() {
        let n = facet_normal(&Triangle::default());
        assert!(n.x.is_nan() && n.y.is_nan() && n.z.is_nan());
        assert!(is_degenerate(&n));
    }

    #[test]
    fn collinear_is_degenerate() {
        let t = tri(vec3![0.0, 0.0, 0.0], vec3![1.0, 1.0, 1.0], vec3![2.0, 2.0, 2.0]);
        assert!(is_degenerate(&facet_normal(&t)));
    }

    #[test]
    fn scale_invariant() {
        let a = vec3![0.5, -1.0, 2.0];
        let b = vec3![3.0, 0.25, -1.0];
        let c = vec3![-2.0, 4.0, 0.0];
        let n = facet_normal(&tri(a, b, c));
        for k in [1e-3, 0.5, 7.0, 1e6] {
            let scaled = facet_normal(&tri(a * k, b * k, c * k));
            assert!(abs_diff_eq!(scaled, n, epsilon = 1e-12));
        }
        let flipped = facet_normal(&tri(b, a, c));
        assert!(abs_diff_eq!(flipped, -n, epsilon = 1e-14));
    }
}
