//! Dimensioned scalar quantities.
//!
//! A [`Quantity<D>`] is an `f64` magnitude in SI base units, tagged at
//! compile time by a dimension vector `D`. Addition requires identical
//! dimensions, multiplication and division combine them exponentwise, and
//! integer powers and roots scale them; all of this is resolved by the type
//! system, so there is no runtime dimension state and nothing to check or
//! report at run time.
//!
//! Division by zero is not trapped: it follows IEEE semantics and yields an
//! infinity or a NaN, which the physical model treats as an exceptional
//! numerical condition, not a logical one.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use typenum::{Integer, P1, P2, Z0};

use crate::dimensions::{
    Dimensions, DimensionsDiv, DimensionsMul, DimensionsPow, DimensionsRoot, Exponents,
    NoDimensions,
};

/// A scalar magnitude tagged by the dimension vector `D`.
pub struct Quantity<D> {
    magnitude: f64,
    dimensions: PhantomData<D>,
}

/// The dimensions of a product of quantities.
pub type Product<Left, Right> = <Left as Mul<Right>>::Output;

/// The dimensions of a quotient of quantities.
pub type Quotient<Left, Right> = <Left as Div<Right>>::Output;

/// The square root of a quantity type.
pub type SquareRoot<Q> = <Q as Sqrt>::Output;

/// The time derivative of a quantity type.
pub type Variation<T> = Quotient<T, Time>;

// Base quantities.
pub type Length = Quantity<Dimensions<P1, Z0, Z0, Z0, Z0, Z0, Z0, Z0, Z0, Z0>>;
pub type Mass = Quantity<Dimensions<Z0, P1, Z0, Z0, Z0, Z0, Z0, Z0, Z0, Z0>>;
pub type Time = Quantity<Dimensions<Z0, Z0, P1, Z0, Z0, Z0, Z0, Z0, Z0, Z0>>;
pub type Current = Quantity<Dimensions<Z0, Z0, Z0, P1, Z0, Z0, Z0, Z0, Z0, Z0>>;
pub type Temperature = Quantity<Dimensions<Z0, Z0, Z0, Z0, P1, Z0, Z0, Z0, Z0, Z0>>;
pub type Amount = Quantity<Dimensions<Z0, Z0, Z0, Z0, Z0, P1, Z0, Z0, Z0, Z0>>;
pub type LuminousIntensity = Quantity<Dimensions<Z0, Z0, Z0, Z0, Z0, Z0, P1, Z0, Z0, Z0>>;
// Winding counts cycles, keeping Frequency = Winding / Time distinct from
// AngularFrequency = Angle / Time. Angles and solid angles are strongly
// typed for the same reason.
pub type Winding = Quantity<Dimensions<Z0, Z0, Z0, Z0, Z0, Z0, Z0, P1, Z0, Z0>>;
pub type Angle = Quantity<Dimensions<Z0, Z0, Z0, Z0, Z0, Z0, Z0, Z0, P1, Z0>>;
pub type SolidAngle = Quantity<Dimensions<Z0, Z0, Z0, Z0, Z0, Z0, Z0, Z0, Z0, P1>>;

pub type Dimensionless = Quantity<NoDimensions>;

// Derived quantities.
pub type Area = Product<Length, Length>;
pub type Volume = Product<Area, Length>;
pub type Speed = Quotient<Length, Time>;
pub type Acceleration = Quotient<Speed, Time>;
pub type Momentum = Product<Mass, Speed>;
pub type Force = Quotient<Momentum, Time>;
pub type Energy = Product<Force, Length>;
pub type Frequency = Quotient<Winding, Time>;
pub type AngularFrequency = Quotient<Angle, Time>;
pub type GravitationalParameter = Quotient<Volume, Product<Time, Time>>;

impl<D> Quantity<D> {
    pub(crate) const fn new(magnitude: f64) -> Self {
        Self {
            magnitude,
            dimensions: PhantomData,
        }
    }

    /// The base or derived SI unit of this quantity, e.g.
    /// `Energy::si_unit()` is the joule.
    pub const fn si_unit() -> Self {
        Self::new(1.0)
    }

    pub fn abs(self) -> Self {
        Self::new(self.magnitude.abs())
    }

    pub fn min(self, other: Self) -> Self {
        Self::new(self.magnitude.min(other.magnitude))
    }

    pub fn max(self, other: Self) -> Self {
        Self::new(self.magnitude.max(other.magnitude))
    }

    /// Raises the quantity to the type-level integer power `Exp`,
    /// multiplying the dimension exponents by `Exp`.
    pub fn pow<Exp>(self) -> Quantity<<D as DimensionsPow<Exp>>::Output>
    where
        D: DimensionsPow<Exp>,
        Exp: Integer,
    {
        Quantity::new(self.magnitude.powi(Exp::I32))
    }

    /// The square root, halving the dimension exponents. Does not
    /// type-check for quantities with an odd exponent.
    pub fn sqrt(self) -> Quantity<<D as DimensionsRoot<P2>>::Output>
    where
        D: DimensionsRoot<P2>,
    {
        Quantity::new(self.magnitude.sqrt())
    }
}

impl Angle {
    /// Sine of the angle; the SI magnitude is in radians.
    pub fn sin(self) -> f64 {
        self.magnitude.sin()
    }

    /// Cosine of the angle.
    pub fn cos(self) -> f64 {
        self.magnitude.cos()
    }
}

/// Four-quadrant arc tangent of two quantities of the same dimensions.
pub fn atan2<D>(y: Quantity<D>, x: Quantity<D>) -> Angle {
    Quantity::new(y.magnitude.atan2(x.magnitude))
}

impl<D> Clone for Quantity<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Quantity<D> {}

impl<D> Default for Quantity<D> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<D> PartialEq for Quantity<D> {
    fn eq(&self, other: &Self) -> bool {
        self.magnitude == other.magnitude
    }
}

impl<D> PartialOrd for Quantity<D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.magnitude.partial_cmp(&other.magnitude)
    }
}

impl<D> Neg for Quantity<D> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.magnitude)
    }
}

impl<D> Add for Quantity<D> {
    type Output = Self;

    fn add(self, right: Self) -> Self {
        Self::new(self.magnitude + right.magnitude)
    }
}

impl<D> Sub for Quantity<D> {
    type Output = Self;

    fn sub(self, right: Self) -> Self {
        Self::new(self.magnitude - right.magnitude)
    }
}

impl<D> AddAssign for Quantity<D> {
    fn add_assign(&mut self, right: Self) {
        self.magnitude += right.magnitude;
    }
}

impl<D> SubAssign for Quantity<D> {
    fn sub_assign(&mut self, right: Self) {
        self.magnitude -= right.magnitude;
    }
}

impl<Dl, Dr> Mul<Quantity<Dr>> for Quantity<Dl>
where
    Dl: DimensionsMul<Dr>,
{
    type Output = Quantity<<Dl as DimensionsMul<Dr>>::Output>;

    fn mul(self, right: Quantity<Dr>) -> Self::Output {
        Quantity::new(self.magnitude * right.magnitude)
    }
}

impl<Dl, Dr> Div<Quantity<Dr>> for Quantity<Dl>
where
    Dl: DimensionsDiv<Dr>,
{
    type Output = Quantity<<Dl as DimensionsDiv<Dr>>::Output>;

    fn div(self, right: Quantity<Dr>) -> Self::Output {
        Quantity::new(self.magnitude / right.magnitude)
    }
}

impl<D> Mul<f64> for Quantity<D> {
    type Output = Self;

    fn mul(self, right: f64) -> Self {
        Self::new(self.magnitude * right)
    }
}

impl<D> Div<f64> for Quantity<D> {
    type Output = Self;

    fn div(self, right: f64) -> Self {
        Self::new(self.magnitude / right)
    }
}

impl<D> Mul<Quantity<D>> for f64 {
    type Output = Quantity<D>;

    fn mul(self, right: Quantity<D>) -> Quantity<D> {
        Quantity::new(self * right.magnitude)
    }
}

impl<D> Div<Quantity<D>> for f64
where
    NoDimensions: DimensionsDiv<D>,
{
    type Output = Quantity<<NoDimensions as DimensionsDiv<D>>::Output>;

    fn div(self, right: Quantity<D>) -> Self::Output {
        Quantity::new(self / right.magnitude)
    }
}

impl<D> MulAssign<f64> for Quantity<D> {
    fn mul_assign(&mut self, right: f64) {
        self.magnitude *= right;
    }
}

impl<D> DivAssign<f64> for Quantity<D> {
    fn div_assign(&mut self, right: f64) {
        self.magnitude /= right;
    }
}

// A dimensionless quantity is interchangeable with a plain real number.
impl From<f64> for Dimensionless {
    fn from(magnitude: f64) -> Self {
        Self::new(magnitude)
    }
}

impl From<Dimensionless> for f64 {
    fn from(quantity: Dimensionless) -> f64 {
        quantity.magnitude
    }
}

impl<D> Serialize for Quantity<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.magnitude.serialize(serializer)
    }
}

impl<'de, D> Deserialize<'de> for Quantity<D> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        f64::deserialize(deserializer).map(Self::new)
    }
}

const BASE_SYMBOLS: [&str; 10] = ["m", "kg", "s", "A", "K", "mol", "cd", "cycle", "rad", "sr"];

impl<D: Exponents> fmt::Display for Quantity<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.magnitude)?;
        for (exponent, symbol) in D::exponents().into_iter().zip(BASE_SYMBOLS) {
            match exponent {
                0 => {}
                1 => write!(f, " {symbol}")?,
                n => write!(f, " {symbol}^{n}")?,
            }
        }
        Ok(())
    }
}

impl<D: Exponents> fmt::Debug for Quantity<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A scalar whose absolute value can be taken.
pub trait Abs {
    type Output;

    fn abs(self) -> Self::Output;
}

/// A scalar closed under the square root, possibly changing dimensions.
pub trait Sqrt {
    type Output;

    fn sqrt(self) -> Self::Output;
}

impl Abs for f64 {
    type Output = f64;

    fn abs(self) -> f64 {
        f64::abs(self)
    }
}

impl Sqrt for f64 {
    type Output = f64;

    fn sqrt(self) -> f64 {
        f64::sqrt(self)
    }
}

impl<D> Abs for Quantity<D> {
    type Output = Self;

    fn abs(self) -> Self {
        Quantity::abs(self)
    }
}

impl<D: DimensionsRoot<P2>> Sqrt for Quantity<D> {
    type Output = Quantity<<D as DimensionsRoot<P2>>::Output>;

    fn sqrt(self) -> Self::Output {
        Quantity::sqrt(self)
    }
}

/// SI unit constructors; quantities are built as multiples of these, e.g.
/// `5.0 * si::metre() / si::second()`.
pub mod si {
    use super::*;

    pub fn metre() -> Length {
        Length::si_unit()
    }

    pub fn kilogram() -> Mass {
        Mass::si_unit()
    }

    pub fn second() -> Time {
        Time::si_unit()
    }

    pub fn ampere() -> Current {
        Current::si_unit()
    }

    pub fn kelvin() -> Temperature {
        Temperature::si_unit()
    }

    pub fn mole() -> Amount {
        Amount::si_unit()
    }

    pub fn candela() -> LuminousIntensity {
        LuminousIntensity::si_unit()
    }

    pub fn cycle() -> Winding {
        Winding::si_unit()
    }

    pub fn radian() -> Angle {
        Angle::si_unit()
    }

    pub fn steradian() -> SolidAngle {
        SolidAngle::si_unit()
    }

    pub fn newton() -> Force {
        Force::si_unit()
    }

    pub fn joule() -> Energy {
        Energy::si_unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use typenum::{N1, P3};

    #[test]
    fn test_product_combines_dimensions() {
        let area = (3.0 * si::metre()) * (4.0 * si::metre());
        assert_relative_eq!(f64::from(area / (si::metre() * si::metre())), 12.0);
    }

    #[test]
    fn test_quotient_of_same_dimensions_is_dimensionless() {
        let ratio: Dimensionless = (6.0 * si::second()) / (3.0 * si::second());
        assert_relative_eq!(f64::from(ratio), 2.0);
    }

    #[test]
    fn test_heterogeneous_product_and_quotient() {
        let speed: Speed = (10.0 * si::metre()) / (2.0 * si::second());
        let distance: Length = speed * (3.0 * si::second());
        assert_relative_eq!(f64::from(distance / si::metre()), 15.0);
    }

    #[test]
    fn test_pow_multiplies_exponents() {
        let volume: Volume = (2.0 * si::metre()).pow::<P3>();
        assert_relative_eq!(
            f64::from(volume / (si::metre() * si::metre() * si::metre())),
            8.0
        );
        let inverse: Quotient<Dimensionless, Time> = (4.0 * si::second()).pow::<N1>();
        assert_relative_eq!(f64::from(inverse * si::second()), 0.25);
    }

    #[test]
    fn test_sqrt_halves_exponents() {
        let side: Length = (9.0 * si::metre() * si::metre()).sqrt();
        assert_relative_eq!(f64::from(side / si::metre()), 3.0);
    }

    #[test]
    fn test_abs_min_max() {
        let a = -2.0 * si::kilogram();
        let b = 1.0 * si::kilogram();
        assert_eq!(a.abs(), 2.0 * si::kilogram());
        assert_eq!(a.min(b), a);
        assert_eq!(a.max(b), b);
    }

    #[test]
    fn test_comparisons_within_a_dimension() {
        assert!(1.0 * si::metre() < 2.0 * si::metre());
        assert!(2.0 * si::second() >= 2.0 * si::second());
    }

    #[test]
    fn test_si_unit_is_one() {
        assert_relative_eq!(f64::from(Energy::si_unit() / si::joule()), 1.0);
        assert_eq!(
            si::newton(),
            si::kilogram() * si::metre() / (si::second() * si::second())
        );
    }

    #[test]
    fn test_angle_trigonometry() {
        let right_angle = std::f64::consts::FRAC_PI_2 * si::radian();
        assert_relative_eq!(right_angle.sin(), 1.0);
        assert_relative_eq!(right_angle.cos(), 0.0, epsilon = 1e-15);
        assert_relative_eq!(
            f64::from(atan2(1.0 * si::metre(), 1.0 * si::metre()) / si::radian()),
            std::f64::consts::FRAC_PI_4
        );
    }

    #[test]
    fn test_display_prints_si_symbols() {
        let acceleration = 9.81 * si::metre() / (si::second() * si::second());
        assert_eq!(format!("{acceleration}"), "9.81 m s^-2");
        assert_eq!(format!("{}", 5.0 * si::cycle() / si::second()), "5 cycle s^-1");
        assert_eq!(format!("{}", Dimensionless::from(1.5)), "1.5");
    }

    #[test]
    fn test_serde_is_transparent() {
        let momentum = 3.5 * si::kilogram() * si::metre() / si::second();
        let json = serde_json::to_string(&momentum).unwrap();
        assert_eq!(json, "3.5");
        let back: Momentum = serde_json::from_str(&json).unwrap();
        assert_eq!(back, momentum);
    }

    proptest! {
        #[test]
        fn product_magnitude_is_product_of_magnitudes(x in -1e6f64..1e6, y in -1e6f64..1e6) {
            let product = (x * si::metre()) * (y * si::kilogram());
            prop_assert_eq!(f64::from(product / (si::metre() * si::kilogram())), x * y);
        }

        #[test]
        fn quotient_of_same_dimension_is_ratio(x in -1e6f64..1e6, y in 1e-6f64..1e6) {
            let ratio = (x * si::second()) / (y * si::second());
            prop_assert_eq!(f64::from(ratio), x / y);
        }
    }
}
