//! Grassmann algebra on an oriented three-dimensional inner product space.
//!
//! [`Vector`], [`Bivector`] and [`Trivector`] are the rank-1, rank-2 and
//! rank-3 elements of ⋀ⁿ over [`R3Element`] coordinates, tagged by a
//! reference frame `F`. The frame is a phantom marker type: coordinates
//! expressed in two different frames can only meet through an explicit
//! linear map, never by accident.
//!
//! The rank-2 elements form 𝖘𝔬(3) under [`commutator`], acting on rank-1
//! elements by left and right multiplication; [`exp`] maps an angle-valued
//! bivector to the corresponding [`Rotation`].

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::constants::EPSILON;
use crate::quantity::{Abs, Angle, Quantity, Sqrt, si};
use crate::r3::R3Element;
use crate::rotation::Rotation;

/// A rank-1 multivector: an element of ⋀¹ S³ in frame `F`.
#[derive(Serialize, Deserialize)]
pub struct Vector<S, F> {
    coordinates: R3Element<S>,
    #[serde(skip)]
    frame: PhantomData<F>,
}

/// A rank-2 multivector: an element of ⋀² S³ in frame `F`, stored in axial
/// coordinates (e₂₃, e₃₁, e₁₂).
#[derive(Serialize, Deserialize)]
pub struct Bivector<S, F> {
    coordinates: R3Element<S>,
    #[serde(skip)]
    frame: PhantomData<F>,
}

/// A rank-3 multivector, or pseudoscalar: an element of ⋀³ S³ in frame `F`,
/// a single coordinate along e₁₂₃.
#[derive(Serialize, Deserialize)]
pub struct Trivector<S, F> {
    coordinate: S,
    #[serde(skip)]
    frame: PhantomData<F>,
}

impl<S, F> Vector<S, F> {
    pub const fn new(coordinates: R3Element<S>) -> Self {
        Self {
            coordinates,
            frame: PhantomData,
        }
    }

    pub fn coordinates(&self) -> R3Element<S>
    where
        S: Copy,
    {
        self.coordinates
    }

    /// Euclidean norm of the coordinate triple.
    pub fn norm(&self) -> S
    where
        S: Copy + Mul<S>,
        <S as Mul<S>>::Output: Add<Output = <S as Mul<S>>::Output> + Sqrt<Output = S>,
    {
        self.coordinates.norm()
    }
}

impl<S, F> Bivector<S, F> {
    pub const fn new(coordinates: R3Element<S>) -> Self {
        Self {
            coordinates,
            frame: PhantomData,
        }
    }

    pub fn coordinates(&self) -> R3Element<S>
    where
        S: Copy,
    {
        self.coordinates
    }

    pub fn norm(&self) -> S
    where
        S: Copy + Mul<S>,
        <S as Mul<S>>::Output: Add<Output = <S as Mul<S>>::Output> + Sqrt<Output = S>,
    {
        self.coordinates.norm()
    }
}

impl<S, F> Trivector<S, F> {
    pub const fn new(coordinate: S) -> Self {
        Self {
            coordinate,
            frame: PhantomData,
        }
    }

    pub fn coordinate(&self) -> S
    where
        S: Copy,
    {
        self.coordinate
    }

    pub fn norm(&self) -> S
    where
        S: Copy + Abs<Output = S>,
    {
        self.coordinate.abs()
    }
}

/// Symmetric inner product of two same-grade multivectors.
pub trait InnerProduct<Rhs = Self> {
    type Output;

    fn inner_product(self, right: Rhs) -> Self::Output;
}

/// Antisymmetric exterior product; raises the grade.
pub trait Wedge<Rhs> {
    type Output;

    fn wedge(self, right: Rhs) -> Self::Output;
}

impl<L, R, F> InnerProduct<Vector<R, F>> for Vector<L, F>
where
    L: Copy + Mul<R>,
    R: Copy,
    <L as Mul<R>>::Output: Add<Output = <L as Mul<R>>::Output>,
{
    type Output = <L as Mul<R>>::Output;

    fn inner_product(self, right: Vector<R, F>) -> Self::Output {
        self.coordinates.dot(right.coordinates)
    }
}

impl<L, R, F> InnerProduct<Bivector<R, F>> for Bivector<L, F>
where
    L: Copy + Mul<R>,
    R: Copy,
    <L as Mul<R>>::Output: Add<Output = <L as Mul<R>>::Output>,
{
    type Output = <L as Mul<R>>::Output;

    fn inner_product(self, right: Bivector<R, F>) -> Self::Output {
        self.coordinates.dot(right.coordinates)
    }
}

impl<L, R, F> InnerProduct<Trivector<R, F>> for Trivector<L, F>
where
    L: Mul<R>,
{
    type Output = <L as Mul<R>>::Output;

    fn inner_product(self, right: Trivector<R, F>) -> Self::Output {
        self.coordinate * right.coordinate
    }
}

impl<L, R, F> Wedge<Vector<R, F>> for Vector<L, F>
where
    L: Copy + Mul<R>,
    R: Copy,
    <L as Mul<R>>::Output: Sub<Output = <L as Mul<R>>::Output>,
{
    type Output = Bivector<<L as Mul<R>>::Output, F>;

    fn wedge(self, right: Vector<R, F>) -> Self::Output {
        Bivector::new(self.coordinates.cross(right.coordinates))
    }
}

impl<L, R, F> Wedge<Bivector<R, F>> for Vector<L, F>
where
    L: Copy + Mul<R>,
    R: Copy,
    <L as Mul<R>>::Output: Add<Output = <L as Mul<R>>::Output>,
{
    type Output = Trivector<<L as Mul<R>>::Output, F>;

    fn wedge(self, right: Bivector<R, F>) -> Self::Output {
        Trivector::new(self.coordinates.dot(right.coordinates))
    }
}

impl<L, R, F> Wedge<Vector<R, F>> for Bivector<L, F>
where
    L: Copy + Mul<R>,
    R: Copy,
    <L as Mul<R>>::Output: Add<Output = <L as Mul<R>>::Output>,
{
    type Output = Trivector<<L as Mul<R>>::Output, F>;

    fn wedge(self, right: Vector<R, F>) -> Self::Output {
        Trivector::new(self.coordinates.dot(right.coordinates))
    }
}

/// Lie bracket on ⋀²V ≅ 𝖘𝔬(3).
pub fn commutator<L, R, F>(
    left: Bivector<L, F>,
    right: Bivector<R, F>,
) -> Bivector<<L as Mul<R>>::Output, F>
where
    L: Copy + Mul<R>,
    R: Copy,
    <L as Mul<R>>::Output: Sub<Output = <L as Mul<R>>::Output>,
{
    Bivector::new(left.coordinates.cross(right.coordinates))
}

/// Exponential map ⋀²V ≅ 𝖘𝔬(3) → SO(3).
///
/// The bivector's norm is the rotation angle and its direction the rotation
/// axis; the zero bivector maps to the identity rotation.
pub fn exp<F>(exponent: Bivector<Angle, F>) -> Rotation<F, F> {
    let angle = exponent.norm();
    if f64::from(angle / si::radian()) < EPSILON {
        return Rotation::identity();
    }
    let axis = exponent.coordinates().map(|a| f64::from(a / angle));
    let half_angle = angle * 0.5;
    Rotation::new(half_angle.cos(), axis * half_angle.sin())
}

// Left action of ⋀²V ≅ 𝖘𝔬(3) on V.
impl<L, R, F> Mul<Vector<R, F>> for Bivector<L, F>
where
    L: Copy + Mul<R>,
    R: Copy,
    <L as Mul<R>>::Output: Sub<Output = <L as Mul<R>>::Output>,
{
    type Output = Vector<<L as Mul<R>>::Output, F>;

    fn mul(self, right: Vector<R, F>) -> Self::Output {
        Vector::new(self.coordinates.cross(right.coordinates))
    }
}

// Right action of ⋀²V ≅ 𝖘𝔬(3) on V* ≅ V; the negative of the left action.
impl<L, R, F> Mul<Bivector<R, F>> for Vector<L, F>
where
    L: Copy + Mul<R>,
    R: Copy,
    <L as Mul<R>>::Output: Sub<Output = <L as Mul<R>>::Output>,
{
    type Output = Vector<<L as Mul<R>>::Output, F>;

    fn mul(self, right: Bivector<R, F>) -> Self::Output {
        Vector::new(self.coordinates.cross(right.coordinates))
    }
}

// Products with the pseudoscalar. The unit trivector is central and squares
// to −1, so bivectors map to their dual vectors with a sign flip and vectors
// map to their dual bivectors unchanged.
impl<L, R, F> Mul<Trivector<R, F>> for Bivector<L, F>
where
    L: Copy + Mul<R>,
    R: Copy,
    <L as Mul<R>>::Output: Neg<Output = <L as Mul<R>>::Output>,
{
    type Output = Vector<<L as Mul<R>>::Output, F>;

    fn mul(self, right: Trivector<R, F>) -> Self::Output {
        Vector::new(-(self.coordinates * right.coordinate))
    }
}

impl<L, R, F> Mul<Bivector<R, F>> for Trivector<L, F>
where
    L: Copy,
    R: Copy + Mul<L>,
    <R as Mul<L>>::Output: Neg<Output = <R as Mul<L>>::Output>,
{
    type Output = Vector<<R as Mul<L>>::Output, F>;

    fn mul(self, right: Bivector<R, F>) -> Self::Output {
        Vector::new(-(right.coordinates * self.coordinate))
    }
}

impl<L, R, F> Mul<Trivector<R, F>> for Vector<L, F>
where
    L: Copy + Mul<R>,
    R: Copy,
{
    type Output = Bivector<<L as Mul<R>>::Output, F>;

    fn mul(self, right: Trivector<R, F>) -> Self::Output {
        Bivector::new(self.coordinates * right.coordinate)
    }
}

impl<L, R, F> Mul<Vector<R, F>> for Trivector<L, F>
where
    L: Copy,
    R: Copy + Mul<L>,
{
    type Output = Bivector<<R as Mul<L>>::Output, F>;

    fn mul(self, right: Vector<R, F>) -> Self::Output {
        Bivector::new(right.coordinates * self.coordinate)
    }
}

macro_rules! componentwise_multivector_ops {
    ($multivector:ident, $inner:ident) => {
        impl<S: Clone, F> Clone for $multivector<S, F> {
            fn clone(&self) -> Self {
                Self {
                    $inner: self.$inner.clone(),
                    frame: PhantomData,
                }
            }
        }

        impl<S: Copy, F> Copy for $multivector<S, F> {}

        impl<S: Default, F> Default for $multivector<S, F> {
            fn default() -> Self {
                Self {
                    $inner: Default::default(),
                    frame: PhantomData,
                }
            }
        }

        impl<S: PartialEq, F> PartialEq for $multivector<S, F> {
            fn eq(&self, other: &Self) -> bool {
                self.$inner == other.$inner
            }
        }

        impl<S: fmt::Debug, F> fmt::Debug for $multivector<S, F> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($multivector)).field(&self.$inner).finish()
            }
        }

        impl<S: Add<Output = S>, F> Add for $multivector<S, F> {
            type Output = Self;

            fn add(self, right: Self) -> Self {
                Self {
                    $inner: self.$inner + right.$inner,
                    frame: PhantomData,
                }
            }
        }

        impl<S: Sub<Output = S>, F> Sub for $multivector<S, F> {
            type Output = Self;

            fn sub(self, right: Self) -> Self {
                Self {
                    $inner: self.$inner - right.$inner,
                    frame: PhantomData,
                }
            }
        }

        impl<S: Neg<Output = S>, F> Neg for $multivector<S, F> {
            type Output = Self;

            fn neg(self) -> Self {
                Self {
                    $inner: -self.$inner,
                    frame: PhantomData,
                }
            }
        }

        impl<S: Mul<f64, Output = S>, F> Mul<f64> for $multivector<S, F> {
            type Output = Self;

            fn mul(self, right: f64) -> Self {
                Self {
                    $inner: self.$inner * right,
                    frame: PhantomData,
                }
            }
        }

        impl<S: Div<f64, Output = S>, F> Div<f64> for $multivector<S, F> {
            type Output = Self;

            fn div(self, right: f64) -> Self {
                Self {
                    $inner: self.$inner / right,
                    frame: PhantomData,
                }
            }
        }

        impl<S, F> Mul<$multivector<S, F>> for f64
        where
            S: Mul<f64, Output = S>,
        {
            type Output = $multivector<S, F>;

            fn mul(self, right: $multivector<S, F>) -> $multivector<S, F> {
                $multivector {
                    $inner: right.$inner * self,
                    frame: PhantomData,
                }
            }
        }

        impl<S, D, F> Mul<Quantity<D>> for $multivector<S, F>
        where
            S: Mul<Quantity<D>>,
        {
            type Output = $multivector<<S as Mul<Quantity<D>>>::Output, F>;

            fn mul(self, right: Quantity<D>) -> Self::Output {
                $multivector {
                    $inner: self.$inner * right,
                    frame: PhantomData,
                }
            }
        }

        impl<S, D, F> Div<Quantity<D>> for $multivector<S, F>
        where
            S: Div<Quantity<D>>,
        {
            type Output = $multivector<<S as Div<Quantity<D>>>::Output, F>;

            fn div(self, right: Quantity<D>) -> Self::Output {
                $multivector {
                    $inner: self.$inner / right,
                    frame: PhantomData,
                }
            }
        }

        impl<S, D, F> Mul<$multivector<S, F>> for Quantity<D>
        where
            S: Mul<Quantity<D>>,
            Quantity<D>: Copy,
        {
            type Output = $multivector<<S as Mul<Quantity<D>>>::Output, F>;

            fn mul(self, right: $multivector<S, F>) -> Self::Output {
                $multivector {
                    $inner: right.$inner * self,
                    frame: PhantomData,
                }
            }
        }
    };
}

componentwise_multivector_ops!(Vector, coordinates);
componentwise_multivector_ops!(Bivector, coordinates);
componentwise_multivector_ops!(Trivector, coordinate);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::{Length, si};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    struct World;

    fn metres(x: f64, y: f64, z: f64) -> Vector<Length, World> {
        Vector::new(R3Element::new(
            x * si::metre(),
            y * si::metre(),
            z * si::metre(),
        ))
    }

    #[test]
    fn test_componentwise_arithmetic() {
        let v = metres(1.0, 2.0, 3.0);
        let w = metres(0.5, -2.0, 1.0);
        assert_eq!(v + w, metres(1.5, 0.0, 4.0));
        assert_eq!(v - w, metres(0.5, 4.0, 2.0));
        assert_eq!(-v, metres(-1.0, -2.0, -3.0));
        assert_eq!(v * 2.0, 2.0 * v);
        assert_ne!(v, w);
    }

    #[test]
    fn test_norm() {
        assert_relative_eq!(f64::from(metres(2.0, 3.0, 6.0).norm() / si::metre()), 7.0);
        let t: Trivector<f64, World> = Trivector::new(-4.0);
        assert_relative_eq!(t.norm(), 4.0);
    }

    #[test]
    fn test_inner_product_is_symmetric() {
        let v = metres(1.0, 2.0, 3.0);
        let w = metres(-1.0, 0.5, 2.0);
        assert_eq!(v.inner_product(w), w.inner_product(v));
        let a: Bivector<f64, World> = Bivector::new(R3Element::new(1.0, 0.0, 2.0));
        let b: Bivector<f64, World> = Bivector::new(R3Element::new(0.0, 3.0, -1.0));
        assert_eq!(a.inner_product(b), b.inner_product(a));
    }

    #[test]
    fn test_wedge_grades() {
        let x = metres(1.0, 0.0, 0.0);
        let y = metres(0.0, 1.0, 0.0);
        let plane = x.wedge(y);
        assert_relative_eq!(
            f64::from(plane.coordinates().z / (si::metre() * si::metre())),
            1.0
        );
        let volume = plane.wedge(metres(0.0, 0.0, 1.0));
        assert_relative_eq!(
            f64::from(volume.coordinate() / (si::metre() * si::metre() * si::metre())),
            1.0
        );
        assert_eq!(volume, metres(0.0, 0.0, 1.0).wedge(plane));
    }

    #[test]
    fn test_commutator_matches_so3_structure() {
        let e23: Bivector<f64, World> = Bivector::new(R3Element::new(1.0, 0.0, 0.0));
        let e31: Bivector<f64, World> = Bivector::new(R3Element::new(0.0, 1.0, 0.0));
        let e12: Bivector<f64, World> = Bivector::new(R3Element::new(0.0, 0.0, 1.0));
        assert_eq!(commutator(e23, e31), e12);
        assert_eq!(commutator(e31, e23), -e12);
    }

    #[test]
    fn test_bivector_action_on_vector() {
        let rotation_generator: Bivector<f64, World> = Bivector::new(R3Element::new(0.0, 0.0, 1.0));
        let v = metres(1.0, 0.0, 0.0);
        assert_eq!(rotation_generator * v, metres(0.0, 1.0, 0.0));
        assert_eq!(v * rotation_generator, metres(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_pseudoscalar_products() {
        let unit: Trivector<f64, World> = Trivector::new(1.0);
        let b: Bivector<f64, World> = Bivector::new(R3Element::new(1.0, 2.0, 3.0));
        let v: Vector<f64, World> = Vector::new(R3Element::new(1.0, 2.0, 3.0));
        // The pseudoscalar is central.
        assert_eq!(b * unit, unit * b);
        assert_eq!(v * unit, unit * v);
        // I² = −1: dualizing twice negates.
        assert_eq!((v * unit) * unit, -v);
        assert_eq!((b * unit) * unit, -b);
    }

    #[test]
    fn test_exp_of_zero_is_identity() {
        use crate::linear_map::LinearMap;

        let zero: Bivector<Angle, World> = Bivector::new(R3Element::new(
            0.0 * si::radian(),
            0.0 * si::radian(),
            0.0 * si::radian(),
        ));
        let rotation = exp(zero);
        let v = metres(1.0, 2.0, 3.0);
        assert_eq!(rotation.apply_vector(&v), v);
    }

    #[test]
    fn test_exp_of_half_turn_about_z() {
        use crate::linear_map::LinearMap;

        let half_turn: Bivector<Angle, World> = Bivector::new(R3Element::new(
            0.0 * si::radian(),
            0.0 * si::radian(),
            std::f64::consts::PI * si::radian(),
        ));
        let rotation = exp(half_turn);
        let rotated = rotation.apply_vector(&metres(1.0, 0.0, 0.0));
        assert_relative_eq!(
            f64::from(rotated.coordinates().x / si::metre()),
            -1.0,
            epsilon = 1e-15
        );
        assert_relative_eq!(
            f64::from(rotated.coordinates().y / si::metre()),
            0.0,
            epsilon = 1e-15
        );
    }

    proptest! {
        #[test]
        fn wedge_of_vector_with_itself_vanishes(
            x in -1e6f64..1e6,
            y in -1e6f64..1e6,
            z in -1e6f64..1e6,
        ) {
            let v = metres(x, y, z);
            prop_assert_eq!(v.wedge(v), Bivector::default());
        }

        #[test]
        fn inner_product_is_symmetric_for_all_vectors(
            a in proptest::array::uniform3(-1e3f64..1e3),
            b in proptest::array::uniform3(-1e3f64..1e3),
        ) {
            let v = metres(a[0], a[1], a[2]);
            let w = metres(b[0], b[1], b[2]);
            prop_assert_eq!(v.inner_product(w), w.inner_product(v));
        }
    }
}
