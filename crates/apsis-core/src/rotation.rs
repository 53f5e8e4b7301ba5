//! Rotations between frames, represented by unit quaternions.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::grassmann::{Bivector, Trivector, Vector};
use crate::linear_map::{LinearMap, MapScalar};
use crate::r3::R3Element;
use crate::sign::Sign;

/// A proper rotation taking `FromFrame` coordinates to `ToFrame` coordinates.
///
/// Stored as a unit quaternion: a real part and an imaginary part along the
/// rank-2 basis. Callers must supply a normalized quaternion; the type never
/// renormalizes, so a non-unit quaternion silently scales everything it is
/// applied to.
#[derive(Serialize, Deserialize)]
pub struct Rotation<FromFrame, ToFrame> {
    real_part: f64,
    imaginary_part: R3Element<f64>,
    #[serde(skip)]
    frames: PhantomData<(FromFrame, ToFrame)>,
}

impl<FromFrame, ToFrame> Rotation<FromFrame, ToFrame> {
    pub const fn new(real_part: f64, imaginary_part: R3Element<f64>) -> Self {
        Self {
            real_part,
            imaginary_part,
            frames: PhantomData,
        }
    }

    pub const fn identity() -> Self {
        Self::new(1.0, R3Element::new(0.0, 0.0, 0.0))
    }

    pub const fn real_part(&self) -> f64 {
        self.real_part
    }

    pub const fn imaginary_part(&self) -> R3Element<f64> {
        self.imaginary_part
    }

    /// The conjugate quaternion, rotating `ToFrame` back to `FromFrame`.
    pub fn inverse(&self) -> Rotation<ToFrame, FromFrame> {
        Rotation::new(self.real_part, -self.imaginary_part)
    }

    // Sandwich product q v q⁻¹ expanded to v + 2(w(u×v) + u×(u×v)), with
    // every product arranged to keep the dimensioned scalar on the left.
    fn rotate<S: MapScalar>(&self, r3_element: &R3Element<S>) -> R3Element<S> {
        let u = self.imaginary_part;
        let uxv = cross_with(u, *r3_element);
        let uxuxv = cross_with(u, uxv);
        *r3_element + (uxv * self.real_part + uxuxv) * 2.0
    }
}

fn cross_with<S: MapScalar>(left: R3Element<f64>, right: R3Element<S>) -> R3Element<S> {
    R3Element::new(
        right.z * left.y - right.y * left.z,
        right.x * left.z - right.z * left.x,
        right.y * left.x - right.x * left.y,
    )
}

fn quaternion_product(
    left_real: f64,
    left_imaginary: R3Element<f64>,
    right_real: f64,
    right_imaginary: R3Element<f64>,
) -> (f64, R3Element<f64>) {
    (
        left_real * right_real - left_imaginary.dot(right_imaginary),
        right_imaginary * left_real
            + left_imaginary * right_real
            + left_imaginary.cross(right_imaginary),
    )
}

impl<FromFrame, ToFrame> LinearMap<FromFrame, ToFrame> for Rotation<FromFrame, ToFrame> {
    fn determinant(&self) -> Sign {
        Sign::positive()
    }

    fn apply_vector<S: MapScalar>(&self, vector: &Vector<S, FromFrame>) -> Vector<S, ToFrame> {
        Vector::new(self.rotate(&vector.coordinates()))
    }

    fn apply_bivector<S: MapScalar>(
        &self,
        bivector: &Bivector<S, FromFrame>,
    ) -> Bivector<S, ToFrame> {
        Bivector::new(self.rotate(&bivector.coordinates()))
    }

    // Trivectors are invariant under proper rotation.
    fn apply_trivector<S: MapScalar>(
        &self,
        trivector: &Trivector<S, FromFrame>,
    ) -> Trivector<S, ToFrame> {
        Trivector::new(trivector.coordinate())
    }
}

impl<FromFrame, ThroughFrame, ToFrame> Mul<Rotation<FromFrame, ThroughFrame>>
    for Rotation<ThroughFrame, ToFrame>
{
    type Output = Rotation<FromFrame, ToFrame>;

    fn mul(self, right: Rotation<FromFrame, ThroughFrame>) -> Self::Output {
        let (real_part, imaginary_part) = quaternion_product(
            self.real_part,
            self.imaginary_part,
            right.real_part,
            right.imaginary_part,
        );
        Rotation::new(real_part, imaginary_part)
    }
}

impl<FromFrame, ToFrame> Clone for Rotation<FromFrame, ToFrame> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<FromFrame, ToFrame> Copy for Rotation<FromFrame, ToFrame> {}

impl<FromFrame, ToFrame> PartialEq for Rotation<FromFrame, ToFrame> {
    fn eq(&self, other: &Self) -> bool {
        self.real_part == other.real_part && self.imaginary_part == other.imaginary_part
    }
}

impl<FromFrame, ToFrame> fmt::Debug for Rotation<FromFrame, ToFrame> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rotation")
            .field("real_part", &self.real_part)
            .field("imaginary_part", &self.imaginary_part)
            .finish()
    }
}
