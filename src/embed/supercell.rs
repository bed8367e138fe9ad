use std::collections::HashMap;

use itertools::iproduct;
use log::debug;
use nalgebra::vector;

use crate::base::{Position, PositionKey};

/// Tolerance-keyed lookup from supercell positions to site indices.
///
/// Positions are reduced component-wise into [0, L) before keying, so any
/// integer-translated image of a stored position resolves to the same site.
#[derive(Debug)]
pub struct PositionIndex {
    map: HashMap<PositionKey, usize>,
    l: usize,
}

impl PositionIndex {
    /// `positions` are unit-cell fractional coordinates (not divided by L)
    pub fn new(positions: &[Position], l: usize) -> Self {
        let mut map = HashMap::with_capacity(positions.len());
        for (index, position) in positions.iter().enumerate() {
            map.entry(PositionKey::periodic(position, l)).or_insert(index);
        }
        if map.len() != positions.len() {
            debug!(
                "position index: {} duplicate positions collapsed",
                positions.len() - map.len()
            );
        }
        Self { map, l }
    }

    pub fn lookup(&self, position: &Position) -> Option<usize> {
        self.map.get(&PositionKey::periodic(position, self.l)).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Conventional-cell BCC positions for an L×L×L supercell: a corner and a
/// body centre per cell, N = 2·L³.
pub fn bcc_positions(l: usize) -> Vec<Position> {
    let mut positions = Vec::with_capacity(2 * l * l * l);
    for (a, b, c) in iproduct!(0..l, 0..l, 0..l) {
        let (a, b, c) = (a as f64, b as f64, c as f64);
        positions.push(vector![a, b, c]);
        positions.push(vector![a + 0.5, b + 0.5, c + 0.5]);
    }
    positions
}

#[cfg(test)]
mod tests {
    use nalgebra::vector;

    use super::*;

    #[test]
    fn test_bcc_generator_size() {
        let positions = bcc_positions(3);
        assert_eq!(positions.len(), 54);
    }

    #[test]
    fn test_lookup_wraps_into_supercell() {
        let l = 2;
        let positions = bcc_positions(l);
        let index = PositionIndex::new(&positions, l);
        assert_eq!(index.len(), positions.len());

        assert_eq!(index.lookup(&vector![0.0, 0.0, 0.0]), Some(0));
        // integer-translated images resolve to the stored site
        assert_eq!(index.lookup(&vector![2.0, -2.0, 4.0]), Some(0));
        assert_eq!(
            index.lookup(&vector![2.5, 0.5, -1.5]),
            index.lookup(&vector![0.5, 0.5, 0.5])
        );
        // off-lattice positions miss
        assert_eq!(index.lookup(&vector![0.25, 0.0, 0.0]), None);
    }
}
