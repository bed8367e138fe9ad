#![allow(dead_code)]

use nalgebra::{vector, Matrix3};

use cemc::base::{Cluster, Operation, Operations, Position, SpaceGroup};

/// The 48 signed permutation matrices of the cubic point group m-3m
pub fn cubic_rotations() -> Vec<Matrix3<f64>> {
    let permutations = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    let mut rotations = Vec::with_capacity(48);
    for permutation in permutations {
        for signs in 0..8u32 {
            let mut matrix = Matrix3::zeros();
            for row in 0..3 {
                let sign = if signs & (1 << row) != 0 { -1.0 } else { 1.0 };
                matrix[(row, permutation[row])] = sign;
            }
            rotations.push(matrix);
        }
    }
    rotations
}

fn with_centerings(centerings: &[Position]) -> Operations {
    let mut operations = Vec::new();
    for rotation in cubic_rotations() {
        for centering in centerings {
            operations.push(Operation::new(rotation, *centering));
        }
    }
    operations
}

/// Conventional A2 (BCC) group: m-3m rotations with the body centering
pub fn bcc_space_group() -> SpaceGroup {
    SpaceGroup::new(
        "A2",
        with_centerings(&[vector![0.0, 0.0, 0.0], vector![0.5, 0.5, 0.5]]),
    )
}

/// Ordered B2 group: m-3m rotations, no centering, frames coinciding with
/// the disordered reference
pub fn b2_space_group() -> SpaceGroup {
    SpaceGroup::new("B2", with_centerings(&[vector![0.0, 0.0, 0.0]]))
        .with_parent_map(Operation::identity())
}

/// Conventional A1 (FCC) group: m-3m rotations with the face centerings
pub fn fcc_space_group() -> SpaceGroup {
    SpaceGroup::new(
        "A1",
        with_centerings(&[
            vector![0.0, 0.0, 0.0],
            vector![0.0, 0.5, 0.5],
            vector![0.5, 0.0, 0.5],
            vector![0.5, 0.5, 0.0],
        ]),
    )
}

/// Nearest-neighbour BCC pair
pub fn bcc_nn_pair() -> Cluster {
    Cluster::from_positions(vec![vector![0.0, 0.0, 0.0], vector![0.5, 0.5, 0.5]])
}

/// Second-neighbour BCC pair
pub fn bcc_2nn_pair() -> Cluster {
    Cluster::from_positions(vec![vector![0.0, 0.0, 0.0], vector![1.0, 0.0, 0.0]])
}

/// Nearest-neighbour FCC tetrahedron
pub fn fcc_tetrahedron() -> Cluster {
    Cluster::from_positions(vec![
        vector![0.0, 0.0, 0.0],
        vector![0.5, 0.5, 0.0],
        vector![0.5, 0.0, 0.5],
        vector![0.0, 0.5, 0.5],
    ])
}
