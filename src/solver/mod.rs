//! Double difference baseline solver
use std::collections::HashMap;

use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};

mod lsq;
mod weight;

use lsq::{weighted_least_squares, LeastSquares};
use weight::{block_diagonal, double_difference_weights};

use crate::{
    cfg::{Config, ReferenceSelection},
    differencing::DifferencingMatrices,
    geometry::{predicted_double_difference_m, validate_wavelength, DesignMatrix},
    prelude::{
        Ambiguity, AmbiguityPair, Epoch, Error, Observable, Observations, Position, Satellite,
        Solution, SolutionType, SV,
    },
    satellite::{highest_elevation, reference_index},
};

/// Observations of a single epoch, in canonical satellite ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    /// Sampling [Epoch]
    pub epoch: Epoch,
    /// [Satellite]s in sight of both receivers. This defines the canonical ordering.
    pub satellites: Vec<Satellite>,
    /// Base and rover [Observations]
    pub observations: Observations,
}

impl Input {
    pub fn new(epoch: Epoch, satellites: Vec<Satellite>, observations: Observations) -> Self {
        Self {
            epoch,
            satellites,
            observations,
        }
    }

    /// Satellite identifiers, in canonical ordering
    pub fn sv(&self) -> Vec<SV> {
        self.satellites.iter().map(|sat| sat.sv).collect()
    }
}

/// Linearized double difference system of one epoch,
/// shared by float and fixed resolutions.
struct System {
    reference: SV,
    pairs: Vec<AmbiguityPair>,
    design: DesignMatrix,
    /// DD phase [cycles]
    double_differences: DVector<f64>,
    /// DD phase minus predicted DD range [cycles]
    b_phase: DVector<f64>,
    /// DD code minus predicted DD range [cycles]
    b_code: DVector<f64>,
    w_phase: DMatrix<f64>,
    w_code: DMatrix<f64>,
}

/// [Solver] resolves the rover position relative to the known base
/// position, from double differenced observations.
/// Each epoch is resolved independently with a single linearization
/// around the nominal rover position: the nominal position should be
/// within a few meters of the truth.
#[derive(Debug, Clone)]
pub struct Solver {
    /// Solver [Config]
    cfg: Config,
    /// Base (reference receiver) [Position]
    base: Position,
    /// Carrier wavelength [m]
    wavelength: f64,
}

impl Solver {
    /// Creates a new [Solver] for this base station.
    pub fn new(cfg: &Config, base: Position) -> Result<Self, Error> {
        let wavelength = cfg.wavelength();
        validate_wavelength(wavelength)?;

        for sigma in [cfg.phase_sigma_m, cfg.code_sigma_m] {
            if !(sigma > 0.0 && sigma.is_finite()) {
                return Err(Error::NonPositiveSigma);
            }
        }

        Ok(Self {
            cfg: cfg.clone(),
            base,
            wavelength,
        })
    }

    /// Base [Position]
    pub fn base(&self) -> &Position {
        &self.base
    }

    /// Wavelength in use [m]
    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    /// Resolves position and real valued ambiguities.
    pub fn float_solution(&self, input: &Input, rover: &Position) -> Result<Solution, Error> {
        let system = self.system(input, rover)?;

        let (a, b, w) = if self.cfg.code_aided {
            let phase = system.design.phase();
            let code = system.design.code();
            let (n, ncols) = phase.shape();

            let mut a = DMatrix::<f64>::zeros(2 * n, ncols);
            a.view_mut((0, 0), (n, ncols)).copy_from(&phase);
            a.view_mut((n, 0), (n, ncols)).copy_from(&code);

            let mut b = DVector::<f64>::zeros(2 * n);
            b.rows_mut(0, n).copy_from(&system.b_phase);
            b.rows_mut(n, n).copy_from(&system.b_code);

            let w = block_diagonal(&[&system.w_phase, &system.w_code]);
            (a, b, w)
        } else {
            (
                system.design.phase(),
                system.b_phase.clone(),
                system.w_phase.clone(),
            )
        };

        debug!(
            "{} - float system: A({}x{}) code_aided={}",
            input.epoch,
            a.nrows(),
            a.ncols(),
            self.cfg.code_aided
        );

        let lsq = self.solve(input.epoch, &a, &b, &w)?;

        let ambiguities = system
            .pairs
            .iter()
            .enumerate()
            .map(|(j, pair)| Ambiguity {
                pair: *pair,
                cycles: lsq.x[3 + j],
            })
            .collect();

        Ok(self.solution(
            input.epoch,
            SolutionType::Float,
            rover,
            system,
            ambiguities,
            lsq,
        ))
    }

    /// Resolves the position, with integer ambiguities known ahead of time,
    /// indexed by paired (non reference) satellite.
    pub fn fixed_solution(
        &self,
        input: &Input,
        rover: &Position,
        integers: &HashMap<SV, i64>,
    ) -> Result<Solution, Error> {
        let system = self.system(input, rover)?;

        let mut b = system.b_phase.clone();
        let mut ambiguities = Vec::with_capacity(system.pairs.len());

        for (j, pair) in system.pairs.iter().enumerate() {
            let integer = integers
                .get(&pair.satellite)
                .ok_or(Error::MissingAmbiguity(pair.satellite))?;

            b[j] -= *integer as f64;

            ambiguities.push(Ambiguity {
                pair: *pair,
                cycles: *integer as f64,
            });
        }

        let a = system.design.position().clone();
        let w = system.w_phase.clone();

        debug!(
            "{} - fixed system: A({}x{})",
            input.epoch,
            a.nrows(),
            a.ncols()
        );

        let lsq = self.solve(input.epoch, &a, &b, &w)?;

        Ok(self.solution(
            input.epoch,
            SolutionType::Fixed,
            rover,
            system,
            ambiguities,
            lsq,
        ))
    }

    /// Resolves independent epochs, one float [Solution] per [Input].
    pub fn float_solutions(&self, inputs: &[Input], rover: &Position) -> Vec<Result<Solution, Error>> {
        inputs
            .iter()
            .map(|input| self.float_solution(input, rover))
            .collect()
    }

    fn solve(
        &self,
        epoch: Epoch,
        a: &DMatrix<f64>,
        b: &DVector<f64>,
        w: &DMatrix<f64>,
    ) -> Result<LeastSquares, Error> {
        weighted_least_squares(a, b, w).map_err(|e| {
            warn!("{} - rejected solution: {}", epoch, e);
            e
        })
    }

    fn solution(
        &self,
        epoch: Epoch,
        solution_type: SolutionType,
        rover: &Position,
        system: System,
        ambiguities: Vec<Ambiguity>,
        lsq: LeastSquares,
    ) -> Solution {
        let dx = lsq.x.fixed_rows::<3>(0).into_owned();
        let position = rover.corrected(&dx);
        let baseline = position.ecef() - self.base.ecef();

        info!(
            "{} - {} solution: dx={:.4} baseline={:.4}m (ref={})",
            epoch,
            solution_type,
            dx.transpose(),
            baseline.norm(),
            system.reference,
        );

        Solution {
            epoch,
            solution_type,
            reference: system.reference,
            double_differences: system.double_differences,
            correction: lsq.x,
            position,
            baseline,
            ambiguities,
            covariance: lsq.covariance,
            residuals: lsq.residuals,
            variance_factor: lsq.variance_factor,
        }
    }

    /// Forms the double differences, design matrix and weights.
    fn system(&self, input: &Input, rover: &Position) -> Result<System, Error> {
        let sv = input.sv();
        let size = sv.len();

        if size < 2 {
            return Err(Error::NotEnoughSatellites(size));
        }

        let elevations = input
            .satellites
            .iter()
            .map(|sat| sat.elevation_deg(rover))
            .collect::<Vec<_>>();

        let reference = match self.cfg.reference {
            ReferenceSelection::Fixed(reference) => reference_index(&sv, reference)?,
            ReferenceSelection::HighestElevation => {
                let index = highest_elevation(&elevations).ok_or(Error::NotEnoughSatellites(size))?;
                reference_index(&sv, sv[index])?
            },
        };

        let matrices = DifferencingMatrices::new(size, reference)?;
        let ref_sat = &input.satellites[reference];

        debug!(
            "{} - reference {} (elev={:.2}°)",
            input.epoch, ref_sat.sv, elevations[reference]
        );

        let design = DesignMatrix::new(&rover.ecef(), &input.satellites, &matrices, self.wavelength)?;

        let l_phase = input.observations.raw_vector(&sv, Observable::PhaseCycles)?;
        let double_differences = matrices.apply(&l_phase)?;

        let l_code = input
            .observations
            .raw_vector(&sv, Observable::PseudoRangeMeters)?;
        let dd_code = matrices.apply(&l_code)?;

        let mut pairs = Vec::with_capacity(size - 1);
        let mut b_phase = DVector::<f64>::zeros(size - 1);
        let mut b_code = DVector::<f64>::zeros(size - 1);

        for (j, index) in matrices.paired_indexes().enumerate() {
            let satellite = &input.satellites[index];

            let predicted =
                predicted_double_difference_m(&self.base.ecef(), &rover.ecef(), satellite, ref_sat)?;

            b_phase[j] = double_differences[j] - predicted / self.wavelength;
            b_code[j] = (dd_code[j] - predicted) / self.wavelength;

            pairs.push(AmbiguityPair {
                reference: ref_sat.sv,
                satellite: satellite.sv,
            });
        }

        let w_phase = self.weights(&input.satellites, &elevations, &matrices, self.cfg.phase_sigma_m)?;
        let w_code = self.weights(&input.satellites, &elevations, &matrices, self.cfg.code_sigma_m)?;

        Ok(System {
            reference: ref_sat.sv,
            pairs,
            design,
            double_differences,
            b_phase,
            b_code,
            w_phase,
            w_code,
        })
    }

    /// Double difference weights for this noise level [m], expressed in cycles.
    fn weights(
        &self,
        satellites: &[Satellite],
        elevations: &[f64],
        matrices: &DifferencingMatrices,
        sigma_m: f64,
    ) -> Result<DMatrix<f64>, Error> {
        let sigma_cycles = sigma_m / self.wavelength;

        let variances = satellites
            .iter()
            .zip(elevations.iter())
            .map(|(sat, elevation)| {
                self.cfg
                    .weight_model
                    .variance(sigma_cycles, *elevation)
                    .ok_or(Error::InvalidElevation(sat.sv))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        double_difference_weights(&matrices.ds(), &variances)
    }
}
