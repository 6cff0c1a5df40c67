//! Calibration baseline in Valencia (Spain), first epoch of 2016-11-15 22:19:05.
//! Geodetic receivers on choke ring antennas, pillar 1A is the base station,
//! pillar 3A the rover.
use std::collections::HashMap;
use std::str::FromStr;

use crate::prelude::{
    Constellation, Epoch, Input, Observation, Observations, Position, Satellite, SV,
};

/// Pillar 1A phase center, ECEF [m]
pub const BASE_ECEF_M: (f64, f64, f64) = (4929635.400, -29041.877, 4033567.846);

/// Pillar 3A nominal phase center, ECEF [m]
pub const ROVER_NOMINAL_ECEF_M: (f64, f64, f64) = (4929605.400, -29123.700, 4033603.800);

/// Pillar 3A published coordinates, prior ambiguity resolution
pub const ROVER_FLOAT_ECEF_M: (f64, f64, f64) = (4929605.364, -29123.817, 4033603.867);

/// Pillar 3A published coordinates, after ambiguity resolution
pub const ROVER_FIXED_ECEF_M: (f64, f64, f64) = (4929605.542, -29123.828, 4033603.932);

/// Published G24-Gxx float ambiguities [cycles]
pub const FLOAT_AMBIGUITIES: [(u8, f64); 7] = [
    (10, 12.564),
    (12, 34.873),
    (13, -3.838),
    (15, -4.170),
    (17, 1.538),
    (18, 11.324),
    (19, 34.352),
];

/// Published G24-Gxx integer ambiguities [cycles]
pub const INTEGER_AMBIGUITIES: [(u8, i64); 7] = [
    (10, 12),
    (12, 35),
    (13, -4),
    (15, -4),
    (17, 1),
    (18, 11),
    (19, 34),
];

/// (PRN, ECEF [m], base (C1C [m], L1C [cycles]), rover (C1C [m], L1C [cycles]))
const DATA: [(u8, [f64; 3], [f64; 2], [f64; 2]); 8] = [
    (
        10,
        [4634093.207, -19899701.050, 16933747.321],
        [23726969.123, 124686036.295],
        [23726881.094, 124685588.685],
    ),
    (
        12,
        [22559170.178, -8979632.676, 10377257.530],
        [20647534.024, 108503516.027],
        [20647514.655, 108503447.644],
    ),
    (
        13,
        [23277536.897, 12575815.276, -2029027.200],
        [23087780.798, 121327099.499],
        [23087860.345, 121327512.345],
    ),
    (
        15,
        [25950462.808, 2443858.353, 5881092.070],
        [21346539.664, 112176830.803],
        [21346576.786, 112177022.660],
    ),
    (
        17,
        [5785091.956, 16827408.400, 20125597.869],
        [23379753.757, 122861442.012],
        [23379790.820, 122861635.973],
    ),
    (
        18,
        [13564948.214, -21357948.777, 8232124.013],
        [23217805.737, 122010370.583],
        [23217736.821, 122010019.631],
    ),
    (
        19,
        [12262838.101, 17165601.305, 15682863.092],
        [22181729.713, 116565751.296],
        [22181785.598, 116566080.299],
    ),
    (
        24,
        [15569244.807, -1039249.482, 21443791.252],
        [20436699.926, 107395596.426],
        [20436682.002, 107395502.123],
    ),
];

pub fn gps(prn: u8) -> SV {
    SV::new(Constellation::GPS, prn)
}

pub fn position(coords: (f64, f64, f64)) -> Position {
    Position::from_ecef_m(coords.0, coords.1, coords.2)
}

pub fn base() -> Position {
    position(BASE_ECEF_M)
}

pub fn rover_nominal() -> Position {
    position(ROVER_NOMINAL_ECEF_M)
}

pub fn epoch() -> Epoch {
    Epoch::from_str("2016-11-15T22:19:05 GPST").unwrap()
}

pub fn satellites() -> Vec<Satellite> {
    DATA.iter()
        .map(|(prn, ecef, _, _)| Satellite::new(gps(*prn), ecef[0], ecef[1], ecef[2]))
        .collect()
}

pub fn observations() -> Observations {
    DATA.iter()
        .fold(Observations::default(), |obs, (prn, _, base, rover)| {
            obs.with_pair(
                gps(*prn),
                Observation::new(base[0], base[1]),
                Observation::new(rover[0], rover[1]),
            )
        })
}

pub fn input() -> Input {
    Input::new(epoch(), satellites(), observations())
}

/// [Input] restricted to the first `size` satellites
pub fn truncated_input(size: usize) -> Input {
    let satellites = satellites().into_iter().take(size).collect::<Vec<_>>();

    let observations = DATA
        .iter()
        .take(size)
        .fold(Observations::default(), |obs, (prn, _, base, rover)| {
            obs.with_pair(
                gps(*prn),
                Observation::new(base[0], base[1]),
                Observation::new(rover[0], rover[1]),
            )
        });

    Input::new(epoch(), satellites, observations)
}

pub fn integer_ambiguities() -> HashMap<SV, i64> {
    INTEGER_AMBIGUITIES
        .iter()
        .map(|(prn, n)| (gps(*prn), *n))
        .collect()
}
