use std::fmt::{Debug, Display};

use num_traits::{Float as NumFloat, FloatConst, FromPrimitive};

use crate::error::{AdError, Result};

/// Marker trait for base floating-point types (`f32`, `f64`).
///
/// Bundles the numeric traits the AD types need, plus the domain checks that
/// forward and reverse mode share. Only primitive floats implement this; the
/// AD wrapper types do not.
pub trait Float:
    NumFloat + FloatConst + FromPrimitive + Copy + Send + Sync + Default + Debug + Display + 'static
{
    /// `2`, spelled without a fallible conversion.
    #[inline]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Whether `cos(self)` vanishes to within rounding, i.e. `self` sits on an
    /// odd multiple of π/2 where `tan` has a pole.
    #[inline]
    fn is_tan_pole(self) -> bool {
        self.cos().abs() <= Self::epsilon() * self.abs().max(Self::one())
    }

    /// Rejects a zero divisor.
    #[inline]
    fn check_divisor(self) -> Result<()> {
        if self == Self::zero() {
            return Err(AdError::domain("div", self, "division by zero"));
        }
        Ok(())
    }

    #[inline]
    fn check_sqrt(self) -> Result<()> {
        if self < Self::zero() {
            return Err(AdError::domain("sqrt", self, "negative operand"));
        }
        Ok(())
    }

    #[inline]
    fn check_ln(self) -> Result<()> {
        if self <= Self::zero() {
            return Err(AdError::domain("log", self, "non-positive operand"));
        }
        Ok(())
    }

    /// A logarithm base must be positive and not one.
    #[inline]
    fn check_log_base(self) -> Result<()> {
        if self <= Self::zero() || self == Self::one() {
            return Err(AdError::domain("log", self, "base must be positive and not 1"));
        }
        Ok(())
    }

    /// `asin`/`acos` accept the closed interval [-1, 1].
    #[inline]
    fn check_unit_interval(self, op: &'static str) -> Result<()> {
        if self.abs() > Self::one() || self.is_nan() {
            return Err(AdError::domain(op, self, "operand outside [-1, 1]"));
        }
        Ok(())
    }

    #[inline]
    fn check_tan(self) -> Result<()> {
        if self.is_tan_pole() {
            return Err(AdError::domain("tan", self, "odd multiple of pi/2"));
        }
        Ok(())
    }

    /// Convert a front-end literal into this float type.
    #[inline]
    fn from_literal(n: f64) -> Result<Self> {
        <Self as FromPrimitive>::from_f64(n)
            .ok_or_else(|| AdError::type_mismatch(std::any::type_name::<Self>(), n.to_string()))
    }
}

impl Float for f32 {}
impl Float for f64 {}
