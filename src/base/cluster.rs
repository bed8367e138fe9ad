use serde::{Deserialize, Serialize};

use super::position::{position_cmp, Position};

/// Default symbol for geometric (undecorated) sites
pub const DEFAULT_SYMBOL: &str = "s1";

/// A lattice site: fractional position plus a species symbol of the form
/// `"sα"` with α ≥ 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub position: Position,
    pub symbol: String,
}

impl Site {
    pub fn new(position: Position, symbol: impl Into<String>) -> Self {
        Self {
            position,
            symbol: symbol.into(),
        }
    }

    /// Site with the default `"s1"` symbol
    pub fn geometric(position: Position) -> Self {
        Self::new(position, DEFAULT_SYMBOL)
    }

    /// Parse the basis index α out of an `"sα"` symbol
    pub fn basis_index(&self) -> Option<usize> {
        let alpha = self.symbol.strip_prefix('s')?.parse::<usize>().ok()?;
        if alpha >= 1 {
            Some(alpha)
        } else {
            None
        }
    }
}

/// Ordered list of sites sharing one Wyckoff-position role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sublattice {
    pub sites: Vec<Site>,
}

impl Sublattice {
    pub fn new(sites: Vec<Site>) -> Self {
        Self { sites }
    }
}

/// An ordered tuple of sites partitioned into sublattices.
///
/// The empty cluster is represented by an empty sublattice list; induced
/// sub-clusters drop sublattices that lost all their sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub sublattices: Vec<Sublattice>,
}

impl Cluster {
    pub fn new(sublattices: Vec<Sublattice>) -> Self {
        Self { sublattices }
    }

    pub fn empty() -> Self {
        Self {
            sublattices: vec![],
        }
    }

    /// Single-sublattice cluster with default symbols, for geometric work
    pub fn from_positions(positions: Vec<Position>) -> Self {
        Self::new(vec![Sublattice::new(
            positions.into_iter().map(Site::geometric).collect(),
        )])
    }

    pub fn num_sites(&self) -> usize {
        self.sublattices.iter().map(|s| s.sites.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.num_sites() == 0
    }

    /// In-order concatenation of every sublattice's sites
    pub fn all_sites(&self) -> impl Iterator<Item = &Site> {
        self.sublattices.iter().flat_map(|s| s.sites.iter())
    }

    /// Per-sublattice site counts
    pub fn site_counts(&self) -> Vec<usize> {
        self.sublattices.iter().map(|s| s.sites.len()).collect()
    }

    /// Sort each sublattice by (x, y, z) ascending under the coordinate
    /// tolerance. The canonical form is the reference for all equivalence
    /// tests.
    pub fn canonicalize(&mut self) {
        for sublattice in self.sublattices.iter_mut() {
            sublattice
                .sites
                .sort_by(|a, b| position_cmp(&a.position, &b.position));
        }
    }

    pub fn canonicalized(mut self) -> Self {
        self.canonicalize();
        self
    }
}
