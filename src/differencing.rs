//! Single and double differencing operators.
//!
//! The raw observation vector `l` is interleaved (base₁, rover₁, base₂, rover₂, ...).
//! `S` (N × 2N) forms one base minus rover single difference per satellite,
//! `D` ((N-1) × N) forms reference minus satellite double differences,
//! one per non reference satellite, in canonical order.
use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::prelude::Error;

/// Single (`S`) and double (`D`) differencing matrices, for a given
/// number of satellites and reference satellite. Both depend on these two
/// parameters only, and must be rebuilt whenever one of them changes.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferencingMatrices {
    /// Reference satellite index, in canonical ordering
    reference: usize,
    /// Single differencing matrix
    s: DMatrix<f64>,
    /// Double differencing matrix
    d: DMatrix<f64>,
}

impl DifferencingMatrices {
    /// Builds [DifferencingMatrices] for `size` satellites, `reference` being
    /// the index of the reference satellite.
    pub fn new(size: usize, reference: usize) -> Result<Self, Error> {
        if size < 2 {
            return Err(Error::NotEnoughSatellites(size));
        }

        if reference >= size {
            return Err(Error::InvalidReference(reference));
        }

        let s = Self::single_difference_matrix(size);

        let mut d = DMatrix::<f64>::zeros(size - 1, size);
        for (row, column) in (0..size).filter(|j| *j != reference).enumerate() {
            d[(row, reference)] = 1.0;
            d[(row, column)] = -1.0;
        }

        Ok(Self { reference, s, d })
    }

    fn single_difference_matrix(size: usize) -> DMatrix<f64> {
        let mut s = DMatrix::<f64>::zeros(size, 2 * size);
        for i in 0..size {
            s[(i, 2 * i)] = 1.0;
            s[(i, 2 * i + 1)] = -1.0;
        }
        s
    }

    /// Number of satellites
    pub fn size(&self) -> usize {
        self.s.nrows()
    }

    /// Reference satellite index
    pub fn reference(&self) -> usize {
        self.reference
    }

    /// Index of the satellites paired with the reference, row by row of `D`.
    pub fn paired_indexes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.size()).filter(move |j| *j != self.reference)
    }

    /// Single differencing matrix `S`
    pub fn s(&self) -> &DMatrix<f64> {
        &self.s
    }

    /// Double differencing matrix `D`
    pub fn d(&self) -> &DMatrix<f64> {
        &self.d
    }

    /// Combined `D·S` operator, from raw observations to double differences
    pub fn ds(&self) -> DMatrix<f64> {
        &self.d * &self.s
    }

    /// Forms `S·l`
    pub fn single_difference(&self, l: &DVector<f64>) -> Result<DVector<f64>, Error> {
        if l.nrows() != self.s.ncols() {
            return Err(Error::DimensionMismatch {
                expected: self.s.ncols(),
                found: l.nrows(),
            });
        }
        Ok(&self.s * l)
    }

    /// Forms `D·sl`
    pub fn double_difference(&self, sl: &DVector<f64>) -> Result<DVector<f64>, Error> {
        if sl.nrows() != self.d.ncols() {
            return Err(Error::DimensionMismatch {
                expected: self.d.ncols(),
                found: sl.nrows(),
            });
        }
        Ok(&self.d * sl)
    }

    /// Forms `D·S·l`, from raw observations
    pub fn apply(&self, l: &DVector<f64>) -> Result<DVector<f64>, Error> {
        let sl = self.single_difference(l)?;
        debug!("single differences: {}", sl.transpose());
        let dsl = self.double_difference(&sl)?;
        debug!("double differences: {}", dsl.transpose());
        Ok(dsl)
    }
}

#[cfg(test)]
mod test {
    use super::DifferencingMatrices;
    use crate::prelude::Error;
    use nalgebra::DVector;

    #[test]
    fn eight_satellites_last_reference() {
        let matrices = DifferencingMatrices::new(8, 7).unwrap();

        let s = matrices.s();
        assert_eq!((s.nrows(), s.ncols()), (8, 16));
        assert_eq!(s[(0, 0)], 1.0);
        assert_eq!(s[(0, 1)], -1.0);
        assert_eq!(s[(7, 14)], 1.0);
        assert_eq!(s[(7, 15)], -1.0);

        let d = matrices.d();
        assert_eq!((d.nrows(), d.ncols()), (7, 8));
        for row in 0..7 {
            assert_eq!(d[(row, 7)], 1.0);
            assert_eq!(d[(row, row)], -1.0);
        }

        assert_eq!(matrices.paired_indexes().collect::<Vec<_>>(), (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn first_satellite_reference() {
        let matrices = DifferencingMatrices::new(4, 0).unwrap();
        let d = matrices.d();
        assert_eq!(d.row(0).iter().copied().collect::<Vec<_>>(), vec![1.0, -1.0, 0.0, 0.0]);
        assert_eq!(d.row(2).iter().copied().collect::<Vec<_>>(), vec![1.0, 0.0, 0.0, -1.0]);
        assert_eq!(matrices.paired_indexes().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn invalid_setups() {
        assert_eq!(DifferencingMatrices::new(1, 0), Err(Error::NotEnoughSatellites(1)));
        assert_eq!(DifferencingMatrices::new(0, 0), Err(Error::NotEnoughSatellites(0)));
        assert_eq!(DifferencingMatrices::new(4, 4), Err(Error::InvalidReference(4)));
    }

    #[test]
    fn vector_dimensions() {
        let matrices = DifferencingMatrices::new(3, 1).unwrap();
        assert_eq!(
            matrices.single_difference(&DVector::zeros(5)),
            Err(Error::DimensionMismatch {
                expected: 6,
                found: 5
            })
        );
        assert_eq!(
            matrices.double_difference(&DVector::zeros(6)),
            Err(Error::DimensionMismatch {
                expected: 3,
                found: 6
            })
        );
    }

    #[test]
    fn double_difference_values() {
        let matrices = DifferencingMatrices::new(3, 1).unwrap();
        let l = DVector::from_vec(vec![10.0, 4.0, 20.0, 5.0, 30.0, 10.0]);
        // single differences: 6, 15, 20
        let dd = matrices.apply(&l).unwrap();
        assert_eq!(dd.as_slice(), &[9.0, -5.0]);
    }
}
