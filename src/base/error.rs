use thiserror::Error;

#[derive(Error, Debug, PartialEq, Clone)]
/// Error types for the **cemc** library
pub enum CemcError {
    #[error("Temperature must be positive, got {0}")]
    InvalidTemperature(f64),
    #[error("At least two components are required, got {0}")]
    InvalidComponentCount(usize),
    #[error("Composition must have one fraction per component and sum to one")]
    InvalidComposition,
    #[error("Chemical-potential vector must have one entry per component")]
    InvalidChemicalPotentials(usize),
    #[error("Gas constant must be positive, got {0}")]
    InvalidGasConstant(f64),
    #[error("Supercell repetition must be at least one")]
    InvalidSupercell,
    #[error("Custom lattice positions must not be empty")]
    EmptyLattice,
    #[error("Averaging phase needs at least one sweep")]
    InvalidSweepCount,
    #[error("More ECI entries than cluster types: {given} > {expected}")]
    InvalidEciLength { given: usize, expected: usize },
    #[error("Species symbol {0:?} does not have the form \"sα\"")]
    InvalidSpecieSymbol(String),
    #[error("Basis index {alpha} out of range for {num_components} components")]
    BasisIndexOutOfRange { alpha: usize, num_components: usize },
    #[error("Gram-Schmidt produced a near-zero norm at basis row {0}")]
    BasisConstructionError(usize),
    #[error("Ordered cluster type {0} matches no disordered orbit")]
    UnclassifiedOrderedCluster(usize),
    #[error("Ordered-phase input requires a parent frame map")]
    MissingParentMap,
    #[error("Identification cache serialization failed")]
    CacheSerializationError,
    #[error("Identification cache deserialization failed")]
    CacheDeserializationError,
}
