/// Numerical epsilon for near-zero comparisons
pub const EPSILON: f64 = 1e-10;

/// Largest admissible length of the last integration interval, as a multiple
/// of the nominal step, when an exact final time is requested. The last
/// interval then spans between 0.5 and 1.5 nominal steps instead of becoming
/// arbitrarily small; changing this alters the convergence order of the last
/// step only.
pub const MAX_LAST_INTERVAL_FACTOR: f64 = 1.5;
