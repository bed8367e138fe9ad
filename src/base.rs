mod cluster;
mod error;
mod operation;
mod position;
mod tolerance;

pub use cluster::{Cluster, Site, Sublattice, DEFAULT_SYMBOL};
pub use error::CemcError;
pub use operation::{Operation, Operations, Rotation, SpaceGroup, Translation};
pub use position::{
    is_integer_translation, position_cmp, position_eq, reduce_mod1, reduce_mod_l, Position,
    PositionKey,
};
pub use tolerance::{EPS, HASH_GRID};
