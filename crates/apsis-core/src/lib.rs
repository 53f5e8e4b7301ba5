//! Frame-safe geometric algebra and symplectic integration for long-horizon
//! orbital mechanics.
//!
//! Physical quantities carry a compile-time dimension vector and multivectors
//! carry a compile-time reference-frame tag; mixing incompatible units, or
//! coordinates from two frames without an explicit transformation, is a type
//! error rather than a latent physics bug. On top of the algebra sits a
//! symplectic partitioned Runge–Kutta integrator with compensated summation,
//! built to run millions of fixed steps without secular energy drift.
//!
//! Zero I/O — pure math engine with no opinions about ephemerides,
//! persistence or transport. The N-body force field is supplied by the
//! caller as a pair of callbacks.

pub mod constants;
pub mod dimensions;
pub mod double_precision;
pub mod grassmann;
pub mod linear_map;
pub mod orthogonal;
pub mod quantity;
pub mod r3;
pub mod rotation;
pub mod sign;
pub mod sprk;

pub use double_precision::DoublePrecision;
pub use grassmann::{Bivector, InnerProduct, Trivector, Vector, Wedge, commutator, exp};
pub use linear_map::{Identity, LinearMap, MapScalar};
pub use orthogonal::OrthogonalMap;
pub use quantity::{
    Acceleration, Amount, Angle, AngularFrequency, Area, Current, Dimensionless, Energy, Force,
    Frequency, GravitationalParameter, Length, LuminousIntensity, Mass, Momentum, Product,
    Quantity, Quotient, SolidAngle, Speed, Temperature, Time, Variation, Volume, Winding, atan2,
    si,
};
pub use r3::R3Element;
pub use rotation::Rotation;
pub use sign::Sign;
pub use sprk::{Parameters, Scheme, SprkIntegrator, SystemState, VanishingCoefficients};
