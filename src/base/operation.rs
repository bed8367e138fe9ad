use std::fmt;
use std::ops::Mul;

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use super::cluster::{Cluster, Site, Sublattice};
use super::position::Position;
use super::tolerance::EPS;

/// Rotation matrix in a crystallographic basis
pub type Rotation = Matrix3<f64>;
/// Translation vector in a crystallographic basis
pub type Translation = Vector3<f64>;

/// Affine symmetry operation r' = R r + t in fractional coordinates
#[derive(Clone, Serialize, Deserialize)]
pub struct Operation {
    pub rotation: Rotation,
    pub translation: Translation,
}

impl Operation {
    pub fn new(rotation: Rotation, translation: Translation) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Rotation::identity(), Translation::zeros())
    }

    pub fn apply_position(&self, position: &Position) -> Position {
        self.rotation * position + self.translation
    }

    /// Map a site, preserving its species symbol
    pub fn apply_site(&self, site: &Site) -> Site {
        Site::new(self.apply_position(&site.position), site.symbol.clone())
    }

    /// Map every site of a cluster, then restore canonical order
    pub fn apply_cluster(&self, cluster: &Cluster) -> Cluster {
        Cluster::new(
            cluster
                .sublattices
                .iter()
                .map(|sub| Sublattice::new(sub.sites.iter().map(|s| self.apply_site(s)).collect()))
                .collect(),
        )
        .canonicalized()
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols = ["x", "y", "z"];
        let format_coefficient = |value: f64| {
            if (value - value.round()).abs() < EPS {
                let rounded = value.round().abs();
                if rounded == 1.0 {
                    "".to_string()
                } else {
                    format!("{}", rounded)
                }
            } else {
                format!("{}", value.abs())
            }
        };
        let xyz = (0..3)
            .map(|i| {
                let row = (0..3)
                    .filter_map(|j| {
                        let entry = self.rotation[(i, j)];
                        if entry.abs() < EPS {
                            None
                        } else {
                            Some(format!(
                                "{}{}{}",
                                if entry > 0.0 { "+" } else { "-" },
                                format_coefficient(entry),
                                symbols[j]
                            ))
                        }
                    })
                    .collect::<Vec<_>>()
                    .concat();
                format!(
                    "{}{}{}",
                    row,
                    if self.translation[i] > 0.0 { "+" } else { "" },
                    if self.translation[i].abs() < EPS {
                        "".to_string()
                    } else {
                        self.translation[i].to_string()
                    }
                )
            })
            .collect::<Vec<_>>();
        write!(f, "{},{},{}", xyz[0], xyz[1], xyz[2])
    }
}

impl Mul for Operation {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        // (r1, t1) * (r2, t2) = (r1 * r2, r1 * t2 + t1)
        Self::new(
            self.rotation * rhs.rotation,
            self.rotation * rhs.translation + self.translation,
        )
    }
}

pub type Operations = Vec<Operation>;

/// A named set of symmetry operations, optionally carrying the affine map
/// from this (ordered) phase's frame into the disordered reference frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceGroup {
    pub name: String,
    pub operations: Operations,
    /// Ordered→disordered frame map; `None` for the disordered phase itself
    pub parent_map: Option<Operation>,
}

impl SpaceGroup {
    pub fn new(name: impl Into<String>, operations: Operations) -> Self {
        Self {
            name: name.into(),
            operations,
            parent_map: None,
        }
    }

    pub fn with_parent_map(mut self, parent_map: Operation) -> Self {
        self.parent_map = Some(parent_map);
        self
    }

    pub fn num_operations(&self) -> usize {
        self.operations.len()
    }
}
