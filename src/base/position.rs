use std::cmp::Ordering;

use nalgebra::Vector3;

use super::tolerance::{EPS, HASH_GRID};

/// Fractional coordinates
pub type Position = Vector3<f64>;

/// Component-wise equality within `EPS`
pub fn position_eq(lhs: &Position, rhs: &Position) -> bool {
    (0..3).all(|i| (lhs[i] - rhs[i]).abs() < EPS)
}

/// Lexicographic (x, y, z) comparison; components within `EPS` compare equal
pub fn position_cmp(lhs: &Position, rhs: &Position) -> Ordering {
    for i in 0..3 {
        if (lhs[i] - rhs[i]).abs() >= EPS {
            if lhs[i] < rhs[i] {
                return Ordering::Less;
            } else {
                return Ordering::Greater;
            }
        }
    }
    Ordering::Equal
}

/// Reduce each component into [0, 1)
pub fn reduce_mod1(position: &Position) -> Position {
    position.map(|e| e - e.floor())
}

/// Reduce each component into [0, l)
pub fn reduce_mod_l(position: &Position, l: usize) -> Position {
    let l = l as f64;
    position.map(|e| e - l * (e / l).floor())
}

/// True if every component is within `EPS` of an integer
pub fn is_integer_translation(diff: &Position) -> bool {
    (0..3).all(|i| (diff[i] - diff[i].round()).abs() < EPS)
}

/// Hashable key for a position, rounded to the `HASH_GRID` step.
///
/// Two positions that agree within the coordinate tolerance map to the same
/// key, so it can back `HashMap` lookups over ε-noisy coordinates. The
/// `periodic` variant additionally wraps the rounded integers into an L-cell
/// supercell, which keeps coordinates like `4 - 1e-12` on the wrapped image
/// rather than a key of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionKey([i64; 3]);

impl PositionKey {
    pub fn new(position: &Position) -> Self {
        Self([
            (position[0] / HASH_GRID).round() as i64,
            (position[1] / HASH_GRID).round() as i64,
            (position[2] / HASH_GRID).round() as i64,
        ])
    }

    pub fn periodic(position: &Position, l: usize) -> Self {
        let period = (l as f64 / HASH_GRID).round() as i64;
        let reduced = reduce_mod_l(position, l);
        let mut key = [0; 3];
        for i in 0..3 {
            key[i] = ((reduced[i] / HASH_GRID).round() as i64).rem_euclid(period);
        }
        Self(key)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::vector;

    use super::*;

    #[test]
    fn test_position_cmp() {
        let p1 = vector![0.5, 0.0, 0.0];
        let p2 = vector![0.5 + 1e-12, 0.0, 0.25];
        assert_eq!(position_cmp(&p1, &p2), Ordering::Less);
        assert!(position_eq(&p1, &vector![0.5 + 1e-12, 1e-13, 0.0]));
    }

    #[test]
    fn test_reduce_mod_l() {
        let reduced = reduce_mod_l(&vector![-0.5, 4.25, 8.0], 4);
        assert!(position_eq(&reduced, &vector![3.5, 0.25, 0.0]));
        let reduced = reduce_mod1(&vector![-0.25, 1.5, 2.0]);
        assert!(position_eq(&reduced, &vector![0.75, 0.5, 0.0]));
    }

    #[test]
    fn test_periodic_key_wraps_noise() {
        let l = 4;
        let exact = PositionKey::periodic(&vector![0.0, 0.0, 0.0], l);
        let noisy = PositionKey::periodic(&vector![4.0 - 1e-12, 1e-12, -1e-12], l);
        assert_eq!(exact, noisy);
    }

    #[test]
    fn test_integer_translation() {
        assert!(is_integer_translation(&vector![1.0 + 1e-12, -2.0, 0.0]));
        assert!(!is_integer_translation(&vector![0.5, 0.0, 0.0]));
    }
}
