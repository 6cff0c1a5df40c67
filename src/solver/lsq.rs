//! Weighted least squares
use log::trace;
use nalgebra::{Cholesky, DMatrix, DVector};

use crate::prelude::Error;

/// Squared Cholesky pivot, relative to the diagonal term of its column,
/// below which the normal matrix is considered rank deficient.
/// Both are expressed in the unit of that column, so the test holds
/// when position [cycles/m] and ambiguity [cycles] columns are mixed.
const MIN_PIVOT_RATIO: f64 = 1.0E-12;

/// Weighted least squares estimate
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LeastSquares {
    /// Estimated correction vector
    pub x: DVector<f64>,
    /// (AᵗWA)⁻¹
    pub covariance: DMatrix<f64>,
    /// Post-fit residuals A·x - b
    pub residuals: DVector<f64>,
    /// A posteriori variance factor, when there is redundancy
    pub variance_factor: Option<f64>,
}

/// Solves `x = (AᵗWA)⁻¹ AᵗWb` through Cholesky factorization of the normal matrix.
pub(crate) fn weighted_least_squares(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    w: &DMatrix<f64>,
) -> Result<LeastSquares, Error> {
    let (nrows, ncols) = a.shape();

    if b.nrows() != nrows {
        return Err(Error::DimensionMismatch {
            expected: nrows,
            found: b.nrows(),
        });
    }

    if w.nrows() != nrows || w.ncols() != nrows {
        return Err(Error::DimensionMismatch {
            expected: nrows,
            found: w.nrows(),
        });
    }

    // rank(AᵗWA) <= rank(A) <= nrows
    if nrows < ncols {
        return Err(Error::SingularNormalMatrix);
    }

    let at_w = a.transpose() * w;
    let normal = &at_w * a;

    let diagonal = normal.diagonal();
    let cholesky = Cholesky::new(normal).ok_or(Error::SingularNormalMatrix)?;

    // L_ii² / N_ii: share of column i not explained by the previous columns
    let pivots = cholesky
        .l_dirty()
        .diagonal()
        .zip_map(&diagonal, |l_ii, n_ii| l_ii * l_ii / n_ii);

    let ratio = pivots.min();
    trace!("normal matrix pivots: {} (min={:e})", pivots.transpose(), ratio);

    if !(ratio > MIN_PIVOT_RATIO) {
        return Err(Error::SingularNormalMatrix);
    }

    let x = cholesky.solve(&(&at_w * b));
    if x.iter().any(|xi| !xi.is_finite()) {
        return Err(Error::SingularNormalMatrix);
    }

    let covariance = cholesky.inverse();
    let residuals = a * &x - b;

    let variance_factor = if nrows > ncols {
        let v_w_v = (residuals.transpose() * w * &residuals)[(0, 0)];
        Some(v_w_v / (nrows - ncols) as f64)
    } else {
        None
    };

    Ok(LeastSquares {
        x,
        covariance,
        residuals,
        variance_factor,
    })
}
