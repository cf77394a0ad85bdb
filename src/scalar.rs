//! The [`Scalar`] trait for writing AD-generic numeric code.
//!
//! Functions written as `fn f<T: Scalar>(x: T) -> Result<T>` work unchanged
//! with plain `f64`, `Dual<f64, N>` and `Node<'_, f64>`.

use std::fmt::{Debug, Display};
use std::ops::{Add, Mul, Neg, Sub};

use num_traits::Float as NumFloat;

use crate::dual::Dual;
use crate::error::{AdError, Result};
use crate::float::Float;
use crate::node::Node;

/// The central trait for AD-generic numeric code.
///
/// Total operations (`+ - *`, unary minus, `exp`, `sin`, ...) return `Self`.
/// Operations with a restricted domain return [`Result`], for plain floats as
/// well as for the AD types, so a generic function reports `sqrt(-1)` the
/// same way in every mode.
///
/// Division is exposed as [`Scalar::try_div`]; the `/` operator on the AD
/// types panics on a zero divisor and is left out of the bounds on purpose.
pub trait Scalar:
    Copy
    + Debug
    + Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// The underlying primitive float type.
    type Float: Float;

    /// Extract the primal value.
    fn value(&self) -> Self::Float;

    /// Lift a plain float into the same space as `self` (zero derivative).
    ///
    /// Takes a receiver because a reverse-mode constant has to live in the
    /// operand's graph.
    fn lift(&self, c: Self::Float) -> Self;

    fn try_div(self, rhs: Self) -> Result<Self>;
    fn pow(self, exponent: Self) -> Result<Self>;
    fn powi(self, n: i32) -> Self;
    fn sqrt(self) -> Result<Self>;
    fn exp(self) -> Self;
    fn ln(self) -> Result<Self>;
    /// Logarithm with a constant `base`.
    fn log(self, base: Self::Float) -> Result<Self>;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn tan(self) -> Result<Self>;
    fn asin(self) -> Result<Self>;
    fn acos(self) -> Result<Self>;
    fn atan(self) -> Self;
    fn sinh(self) -> Self;
    fn cosh(self) -> Self;
    fn tanh(self) -> Self;
    fn logistic(self) -> Self;
}

// Plain floats are constants: the same domain checks, no derivative.
// Calls go through `NumFloat` explicitly, since with this impl in scope both
// traits offer `sin`, `sqrt`, ... on every `F: Float`.
impl<F: Float> Scalar for F {
    type Float = F;

    #[inline]
    fn value(&self) -> F {
        *self
    }

    #[inline]
    fn lift(&self, c: F) -> F {
        c
    }

    #[inline]
    fn try_div(self, rhs: F) -> Result<F> {
        rhs.check_divisor()?;
        Ok(self / rhs)
    }

    /// Real power. Only a negative base with a non-integral exponent is
    /// rejected, since the result would not be real.
    #[inline]
    fn pow(self, exponent: F) -> Result<F> {
        if self < F::zero() && NumFloat::fract(exponent) != F::zero() {
            return Err(AdError::domain(
                "pow",
                self,
                "negative base with a fractional exponent",
            ));
        }
        Ok(NumFloat::powf(self, exponent))
    }

    #[inline]
    fn powi(self, n: i32) -> F {
        NumFloat::powi(self, n)
    }

    #[inline]
    fn sqrt(self) -> Result<F> {
        self.check_sqrt()?;
        Ok(NumFloat::sqrt(self))
    }

    #[inline]
    fn exp(self) -> F {
        NumFloat::exp(self)
    }

    #[inline]
    fn ln(self) -> Result<F> {
        self.check_ln()?;
        Ok(NumFloat::ln(self))
    }

    #[inline]
    fn log(self, base: F) -> Result<F> {
        base.check_log_base()?;
        self.check_ln()?;
        Ok(NumFloat::ln(self) / NumFloat::ln(base))
    }

    #[inline]
    fn sin(self) -> F {
        NumFloat::sin(self)
    }

    #[inline]
    fn cos(self) -> F {
        NumFloat::cos(self)
    }

    #[inline]
    fn tan(self) -> Result<F> {
        self.check_tan()?;
        Ok(NumFloat::tan(self))
    }

    #[inline]
    fn asin(self) -> Result<F> {
        self.check_unit_interval("asin")?;
        Ok(NumFloat::asin(self))
    }

    #[inline]
    fn acos(self) -> Result<F> {
        self.check_unit_interval("acos")?;
        Ok(NumFloat::acos(self))
    }

    #[inline]
    fn atan(self) -> F {
        NumFloat::atan(self)
    }

    #[inline]
    fn sinh(self) -> F {
        NumFloat::sinh(self)
    }

    #[inline]
    fn cosh(self) -> F {
        NumFloat::cosh(self)
    }

    #[inline]
    fn tanh(self) -> F {
        NumFloat::tanh(self)
    }

    #[inline]
    fn logistic(self) -> F {
        F::one() / (F::one() + NumFloat::exp(-self))
    }
}

// The AD impls forward to the inherent methods, which take precedence over
// trait methods of the same name; fully qualified paths keep that explicit.

impl<F: Float, const N: usize> Scalar for Dual<F, N> {
    type Float = F;

    #[inline]
    fn value(&self) -> F {
        self.re
    }

    #[inline]
    fn lift(&self, c: F) -> Self {
        Dual::constant(c)
    }

    #[inline]
    fn try_div(self, rhs: Self) -> Result<Self> {
        Dual::try_div(self, rhs)
    }

    #[inline]
    fn pow(self, exponent: Self) -> Result<Self> {
        Dual::pow(self, exponent)
    }

    #[inline]
    fn powi(self, n: i32) -> Self {
        Dual::powi(self, n)
    }

    #[inline]
    fn sqrt(self) -> Result<Self> {
        Dual::sqrt(self)
    }

    #[inline]
    fn exp(self) -> Self {
        Dual::exp(self)
    }

    #[inline]
    fn ln(self) -> Result<Self> {
        Dual::ln(self)
    }

    #[inline]
    fn log(self, base: F) -> Result<Self> {
        Dual::log(self, base)
    }

    #[inline]
    fn sin(self) -> Self {
        Dual::sin(self)
    }

    #[inline]
    fn cos(self) -> Self {
        Dual::cos(self)
    }

    #[inline]
    fn tan(self) -> Result<Self> {
        Dual::tan(self)
    }

    #[inline]
    fn asin(self) -> Result<Self> {
        Dual::asin(self)
    }

    #[inline]
    fn acos(self) -> Result<Self> {
        Dual::acos(self)
    }

    #[inline]
    fn atan(self) -> Self {
        Dual::atan(self)
    }

    #[inline]
    fn sinh(self) -> Self {
        Dual::sinh(self)
    }

    #[inline]
    fn cosh(self) -> Self {
        Dual::cosh(self)
    }

    #[inline]
    fn tanh(self) -> Self {
        Dual::tanh(self)
    }

    #[inline]
    fn logistic(self) -> Self {
        Dual::logistic(self)
    }
}

impl<'g, F: Float> Scalar for Node<'g, F> {
    type Float = F;

    #[inline]
    fn value(&self) -> F {
        Node::value(self)
    }

    #[inline]
    fn lift(&self, c: F) -> Self {
        Node::lift(self, c)
    }

    #[inline]
    fn try_div(self, rhs: Self) -> Result<Self> {
        Node::try_div(self, rhs)
    }

    #[inline]
    fn pow(self, exponent: Self) -> Result<Self> {
        Node::pow(self, exponent)
    }

    #[inline]
    fn powi(self, n: i32) -> Self {
        Node::powi(self, n)
    }

    #[inline]
    fn sqrt(self) -> Result<Self> {
        Node::sqrt(self)
    }

    #[inline]
    fn exp(self) -> Self {
        Node::exp(self)
    }

    #[inline]
    fn ln(self) -> Result<Self> {
        Node::ln(self)
    }

    #[inline]
    fn log(self, base: F) -> Result<Self> {
        Node::log(self, base)
    }

    #[inline]
    fn sin(self) -> Self {
        Node::sin(self)
    }

    #[inline]
    fn cos(self) -> Self {
        Node::cos(self)
    }

    #[inline]
    fn tan(self) -> Result<Self> {
        Node::tan(self)
    }

    #[inline]
    fn asin(self) -> Result<Self> {
        Node::asin(self)
    }

    #[inline]
    fn acos(self) -> Result<Self> {
        Node::acos(self)
    }

    #[inline]
    fn atan(self) -> Self {
        Node::atan(self)
    }

    #[inline]
    fn sinh(self) -> Self {
        Node::sinh(self)
    }

    #[inline]
    fn cosh(self) -> Self {
        Node::cosh(self)
    }

    #[inline]
    fn tanh(self) -> Self {
        Node::tanh(self)
    }

    #[inline]
    fn logistic(self) -> Self {
        Node::logistic(self)
    }
}
