//! Orthogonal maps: rotations composed with an orientation sign.

use std::fmt;
use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::grassmann::{Bivector, Trivector, Vector};
use crate::linear_map::{LinearMap, MapScalar};
use crate::rotation::Rotation;
use crate::sign::Sign;

/// An orthogonal map from `FromFrame` to `ToFrame`: a proper rotation when
/// the determinant is positive, a rotoinversion when it is negative.
///
/// Vectors pick up the determinant sign, bivectors are axial and see only
/// the rotation, and trivectors scale by the determinant.
#[derive(Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct OrthogonalMap<FromFrame, ToFrame> {
    determinant: Sign,
    rotation: Rotation<FromFrame, ToFrame>,
}

impl<FromFrame, ToFrame> OrthogonalMap<FromFrame, ToFrame> {
    pub const fn new(determinant: Sign, rotation: Rotation<FromFrame, ToFrame>) -> Self {
        Self {
            determinant,
            rotation,
        }
    }

    pub const fn identity() -> Self {
        Self::new(Sign::positive(), Rotation::identity())
    }

    /// The rotation part of the map.
    pub const fn rotation(&self) -> Rotation<FromFrame, ToFrame> {
        self.rotation
    }

    pub fn inverse(&self) -> OrthogonalMap<ToFrame, FromFrame> {
        OrthogonalMap::new(self.determinant, self.rotation.inverse())
    }
}

impl<FromFrame, ToFrame> LinearMap<FromFrame, ToFrame> for OrthogonalMap<FromFrame, ToFrame> {
    fn determinant(&self) -> Sign {
        self.determinant
    }

    fn apply_vector<S: MapScalar>(&self, vector: &Vector<S, FromFrame>) -> Vector<S, ToFrame> {
        let rotated = self.rotation.apply_vector(vector);
        Vector::new(self.determinant * rotated.coordinates())
    }

    fn apply_bivector<S: MapScalar>(
        &self,
        bivector: &Bivector<S, FromFrame>,
    ) -> Bivector<S, ToFrame> {
        self.rotation.apply_bivector(bivector)
    }

    fn apply_trivector<S: MapScalar>(
        &self,
        trivector: &Trivector<S, FromFrame>,
    ) -> Trivector<S, ToFrame> {
        let coordinate = trivector.coordinate();
        Trivector::new(if self.determinant.is_negative() {
            -coordinate
        } else {
            coordinate
        })
    }
}

impl<FromFrame, ThroughFrame, ToFrame> Mul<OrthogonalMap<FromFrame, ThroughFrame>>
    for OrthogonalMap<ThroughFrame, ToFrame>
{
    type Output = OrthogonalMap<FromFrame, ToFrame>;

    fn mul(self, right: OrthogonalMap<FromFrame, ThroughFrame>) -> Self::Output {
        OrthogonalMap::new(self.determinant * right.determinant, self.rotation * right.rotation)
    }
}

impl<FromFrame, ToFrame> Clone for OrthogonalMap<FromFrame, ToFrame> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<FromFrame, ToFrame> Copy for OrthogonalMap<FromFrame, ToFrame> {}

impl<FromFrame, ToFrame> PartialEq for OrthogonalMap<FromFrame, ToFrame> {
    fn eq(&self, other: &Self) -> bool {
        self.determinant == other.determinant && self.rotation == other.rotation
    }
}

impl<FromFrame, ToFrame> fmt::Debug for OrthogonalMap<FromFrame, ToFrame> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrthogonalMap")
            .field("determinant", &self.determinant)
            .field("rotation", &self.rotation)
            .finish()
    }
}
