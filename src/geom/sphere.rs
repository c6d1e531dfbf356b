//! Quasi-uniform direction sets on the unit sphere.

use crate::Vector;

/// Golden angle [rad].
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Generates `n` unit vectors spread quasi-uniformly over the full sphere.
///
/// Golden-angle (Fibonacci) spiral: `z_i = 1 - (2i + 1) / n`, azimuth
/// advancing by the golden angle. The sequence is deterministic and
/// symmetric in `z`, so for even `n` exactly half of the vectors point up.
pub fn fibonacci_sphere(n: usize) -> Vec<Vector> {
    let nf = n as f64;
    (0..n)
        .map(|i| {
            let z = 1.0 - (2.0 * i as f64 + 1.0) / nf;
            let r = (1.0 - z * z).max(0.0).sqrt();
            let phi = GOLDEN_ANGLE * i as f64;
            Vector::new(r * phi.cos(), r * phi.sin(), z)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_length() {
        for v in fibonacci_sphere(257) {
            assert!((v.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_even_split() {
        let dirs = fibonacci_sphere(1000);
        let up = dirs.iter().filter(|v| v.dz > 0.0).count();
        assert_eq!(up, 500);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(fibonacci_sphere(100), fibonacci_sphere(100));
    }

    #[test]
    fn test_mean_direction_near_zero() {
        let dirs = fibonacci_sphere(1000);
        let n = dirs.len() as f64;
        let sum = dirs.iter().fold(Vector::new(0.0, 0.0, 0.0), |acc, v| {
            Vector::new(acc.dx + v.dx, acc.dy + v.dy, acc.dz + v.dz)
        });
        assert!(sum.length() / n < 1e-2);
    }
}
