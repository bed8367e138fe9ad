/// Absolute tolerance for comparing fractional coordinates
pub const EPS: f64 = 1e-10;

/// Grid step used when rounding positions into hashable keys
pub const HASH_GRID: f64 = 1e-6;
