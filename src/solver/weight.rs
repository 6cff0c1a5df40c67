//! Double difference covariance propagation
use nalgebra::{Cholesky, DMatrix, DVector};

use crate::prelude::Error;

/// Weight matrix `W = (DS·Σ·(DS)ᵗ)⁻¹` of the double differences.
/// Σ is the diagonal covariance of the raw (base, rover) interleaved observations,
/// both receivers sharing the variance of each satellite.
/// Double differences sharing the reference satellite are correlated.
pub(crate) fn double_difference_weights(
    ds: &DMatrix<f64>,
    variances: &[f64],
) -> Result<DMatrix<f64>, Error> {
    if ds.ncols() != 2 * variances.len() {
        return Err(Error::DimensionMismatch {
            expected: ds.ncols(),
            found: 2 * variances.len(),
        });
    }

    let sigma = DVector::from_iterator(
        ds.ncols(),
        variances.iter().flat_map(|variance| [*variance, *variance]),
    );

    let q = ds * DMatrix::from_diagonal(&sigma) * ds.transpose();

    let cholesky = Cholesky::new(q).ok_or(Error::SingularNormalMatrix)?;
    Ok(cholesky.inverse())
}

/// Assembles independent weight blocks along the diagonal.
pub(crate) fn block_diagonal(blocks: &[&DMatrix<f64>]) -> DMatrix<f64> {
    let size = blocks.iter().map(|block| block.nrows()).sum();
    let mut w = DMatrix::<f64>::zeros(size, size);
    let mut offset = 0;
    for block in blocks {
        let n = block.nrows();
        w.view_mut((offset, offset), (n, n)).copy_from(*block);
        offset += n;
    }
    w
}

#[cfg(test)]
mod test {
    use super::{block_diagonal, double_difference_weights};
    use crate::differencing::DifferencingMatrices;
    use nalgebra::DMatrix;

    #[test]
    fn correlated_through_reference() {
        let matrices = DifferencingMatrices::new(3, 0).unwrap();
        let w = double_difference_weights(&matrices.ds(), &[1.0, 2.0, 3.0]).unwrap();

        // Q = [[2σ0² + 2σ1², 2σ0²], [2σ0², 2σ0² + 2σ2²]]
        let q = DMatrix::from_row_slice(2, 2, &[6.0, 2.0, 2.0, 8.0]);
        let identity = q * w;
        assert!((identity - DMatrix::<f64>::identity(2, 2)).norm() < 1.0E-12);
    }

    #[test]
    fn weights_dimension() {
        let matrices = DifferencingMatrices::new(3, 0).unwrap();
        assert!(double_difference_weights(&matrices.ds(), &[1.0, 2.0]).is_err());
    }

    #[test]
    fn blocks() {
        let a = DMatrix::from_element(2, 2, 1.0);
        let b = DMatrix::from_element(1, 1, 5.0);
        let w = block_diagonal(&[&a, &b]);
        assert_eq!((w.nrows(), w.ncols()), (3, 3));
        assert_eq!(w[(1, 1)], 1.0);
        assert_eq!(w[(2, 2)], 5.0);
        assert_eq!(w[(0, 2)], 0.0);
        assert_eq!(w[(2, 1)], 0.0);
    }
}
