//! Frame-to-frame linear maps.
//!
//! The implementors form a closed set — [`Identity`], [`Rotation`] and
//! [`OrthogonalMap`] — whose inverses and compositions stay within the set:
//! determinants are always ±1 and rotation quaternions stay unit-norm.
//!
//! [`Rotation`]: crate::rotation::Rotation
//! [`OrthogonalMap`]: crate::orthogonal::OrthogonalMap

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Mul, Neg, Sub};

use crate::grassmann::{Bivector, Trivector, Vector};
use crate::sign::Sign;

/// Scalar types that can pass through an orthogonal frame map: closed under
/// addition, subtraction, negation and scaling by a plain real.
pub trait MapScalar:
    Copy + Add<Output = Self> + Sub<Output = Self> + Neg<Output = Self> + Mul<f64, Output = Self>
{
}

impl<T> MapScalar for T where
    T: Copy + Add<Output = T> + Sub<Output = T> + Neg<Output = T> + Mul<f64, Output = T>
{
}

/// A linear map pulling multivector coordinates expressed in `FromFrame`
/// over to `ToFrame`.
pub trait LinearMap<FromFrame, ToFrame> {
    /// The signed determinant, always ±1.
    fn determinant(&self) -> Sign;

    fn apply_vector<S: MapScalar>(&self, vector: &Vector<S, FromFrame>) -> Vector<S, ToFrame>;

    fn apply_bivector<S: MapScalar>(
        &self,
        bivector: &Bivector<S, FromFrame>,
    ) -> Bivector<S, ToFrame>;

    fn apply_trivector<S: MapScalar>(
        &self,
        trivector: &Trivector<S, FromFrame>,
    ) -> Trivector<S, ToFrame>;
}

/// The zero-cost map between two frames known statically to coincide.
pub struct Identity<FromFrame, ToFrame> {
    frames: PhantomData<(FromFrame, ToFrame)>,
}

impl<FromFrame, ToFrame> Identity<FromFrame, ToFrame> {
    pub const fn new() -> Self {
        Self {
            frames: PhantomData,
        }
    }

    pub const fn inverse(&self) -> Identity<ToFrame, FromFrame> {
        Identity::new()
    }
}

impl<FromFrame, ToFrame> Default for Identity<FromFrame, ToFrame> {
    fn default() -> Self {
        Self::new()
    }
}

impl<FromFrame, ToFrame> Clone for Identity<FromFrame, ToFrame> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<FromFrame, ToFrame> Copy for Identity<FromFrame, ToFrame> {}

impl<FromFrame, ToFrame> fmt::Debug for Identity<FromFrame, ToFrame> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Identity")
    }
}

impl<FromFrame, ToFrame> LinearMap<FromFrame, ToFrame> for Identity<FromFrame, ToFrame> {
    fn determinant(&self) -> Sign {
        Sign::positive()
    }

    fn apply_vector<S: MapScalar>(&self, vector: &Vector<S, FromFrame>) -> Vector<S, ToFrame> {
        Vector::new(vector.coordinates())
    }

    fn apply_bivector<S: MapScalar>(
        &self,
        bivector: &Bivector<S, FromFrame>,
    ) -> Bivector<S, ToFrame> {
        Bivector::new(bivector.coordinates())
    }

    fn apply_trivector<S: MapScalar>(
        &self,
        trivector: &Trivector<S, FromFrame>,
    ) -> Trivector<S, ToFrame> {
        Trivector::new(trivector.coordinate())
    }
}

impl<FromFrame, ThroughFrame, ToFrame> Mul<Identity<FromFrame, ThroughFrame>>
    for Identity<ThroughFrame, ToFrame>
{
    type Output = Identity<FromFrame, ToFrame>;

    fn mul(self, _right: Identity<FromFrame, ThroughFrame>) -> Self::Output {
        Identity::new()
    }
}
