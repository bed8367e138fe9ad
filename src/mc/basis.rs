use nalgebra::DMatrix;

use crate::base::CemcError;

/// Orthonormal site-operator basis for k components.
///
/// Row α−1 holds φ_α over the occupations {0, …, k−1}; rows are built by
/// Gram–Schmidt on the power basis {σ, σ², …} against the constant
/// function, orthonormal under the uniform measure (1/k)·Σ f(σ)g(σ). The
/// constant row is the implicit empty-cluster basis function and is not
/// stored. Signs are fixed so that φ_α(0) > 0, which reproduces the
/// conventional binary basis φ_1 = [+1, −1].
#[derive(Debug, Clone)]
pub struct SiteOperatorBasis {
    num_components: usize,
    matrix: DMatrix<f64>,
}

impl SiteOperatorBasis {
    pub fn new(num_components: usize) -> Result<Self, CemcError> {
        if num_components < 2 {
            return Err(CemcError::InvalidComponentCount(num_components));
        }
        let k = num_components;
        let inner = |f: &[f64], g: &[f64]| -> f64 {
            f.iter().zip(g.iter()).map(|(a, b)| a * b).sum::<f64>() / k as f64
        };

        let mut rows: Vec<Vec<f64>> = vec![vec![1.0; k]];
        for alpha in 1..k {
            let mut row: Vec<f64> = (0..k).map(|s| (s as f64).powi(alpha as i32)).collect();
            // second projection pass keeps orthogonality at the 1e-12 level
            for _ in 0..2 {
                for prev in rows.iter() {
                    let overlap = inner(&row, prev);
                    for (value, p) in row.iter_mut().zip(prev.iter()) {
                        *value -= overlap * p;
                    }
                }
            }
            let norm = inner(&row, &row).sqrt();
            if norm < 1e-8 {
                return Err(CemcError::BasisConstructionError(alpha));
            }
            let sign = if row[0] < 0.0 { -1.0 } else { 1.0 };
            for value in row.iter_mut() {
                *value *= sign / norm;
            }
            rows.push(row);
        }

        Ok(Self {
            num_components,
            matrix: DMatrix::from_fn(k - 1, k, |r, c| rows[r + 1][c]),
        })
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }

    /// φ_α(σ) for α ∈ [1, k−1], σ ∈ [0, k−1]
    pub fn evaluate(&self, alpha: usize, sigma: usize) -> f64 {
        self.matrix[(alpha - 1, sigma)]
    }

    /// Parse and range-check an `"sα"` symbol
    pub fn alpha_from_symbol(&self, symbol: &str) -> Result<usize, CemcError> {
        let alpha = symbol
            .strip_prefix('s')
            .and_then(|rest| rest.parse::<usize>().ok())
            .filter(|&alpha| alpha >= 1)
            .ok_or_else(|| CemcError::InvalidSpecieSymbol(symbol.to_string()))?;
        if alpha >= self.num_components {
            return Err(CemcError::BasisIndexOutOfRange {
                alpha,
                num_components: self.num_components,
            });
        }
        Ok(alpha)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_binary_basis_is_exact() {
        let basis = SiteOperatorBasis::new(2).unwrap();
        assert_eq!(basis.evaluate(1, 0), 1.0);
        assert_eq!(basis.evaluate(1, 1), -1.0);
    }

    #[test]
    fn test_ternary_rows() {
        let basis = SiteOperatorBasis::new(3).unwrap();
        // φ_1 ∝ (+1, 0, −1), φ_2 ∝ (+1, −2, +1), both unit norm under
        // the uniform measure
        let scale = basis.evaluate(1, 0);
        assert!(scale > 0.0);
        assert_relative_eq!(basis.evaluate(1, 1), 0.0, epsilon = 1e-12);
        assert_relative_eq!(basis.evaluate(1, 2), -scale, epsilon = 1e-12);

        let ratio = basis.evaluate(2, 1) / basis.evaluate(2, 0);
        assert_relative_eq!(ratio, -2.0, epsilon = 1e-12);
        assert_relative_eq!(basis.evaluate(2, 2), basis.evaluate(2, 0), epsilon = 1e-12);
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    #[case(6)]
    #[case(8)]
    fn test_orthonormality(#[case] k: usize) {
        let basis = SiteOperatorBasis::new(k).unwrap();
        for alpha in 1..k {
            for beta in 1..k {
                let overlap: f64 = (0..k)
                    .map(|s| basis.evaluate(alpha, s) * basis.evaluate(beta, s))
                    .sum::<f64>()
                    / k as f64;
                let expected = if alpha == beta { 1.0 } else { 0.0 };
                assert_relative_eq!(overlap, expected, epsilon = 1e-12);
            }
        }
    }

    #[rstest]
    #[case(3)]
    #[case(5)]
    fn test_rows_average_to_zero(#[case] k: usize) {
        let basis = SiteOperatorBasis::new(k).unwrap();
        for alpha in 1..k {
            let mean: f64 = (0..k).map(|s| basis.evaluate(alpha, s)).sum::<f64>() / k as f64;
            assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_symbol_parsing() {
        let basis = SiteOperatorBasis::new(3).unwrap();
        assert_eq!(basis.alpha_from_symbol("s1").unwrap(), 1);
        assert_eq!(basis.alpha_from_symbol("s2").unwrap(), 2);
        assert!(basis.alpha_from_symbol("s3").is_err());
        assert!(basis.alpha_from_symbol("x1").is_err());
        assert!(SiteOperatorBasis::new(1).is_err());
    }
}
