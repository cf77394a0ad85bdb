use std::fmt::{self, Display};

use crate::error::{AdError, Result};
use crate::Float;

/// Forward-mode dual number: a value paired with one tangent per tracked variable.
///
/// `Dual { re, eps }` represents `re + Σ eps[k]·ε_k` where `ε_j·ε_k = 0`.
/// `eps[k]` holds ∂(this expression)/∂(variable k). Every dual in one
/// expression shares the same `N`, which the type system enforces.
///
/// Values are immutable: each operation returns a fresh dual whose tangents
/// have already been pushed through the chain rule, so no separate pass is
/// needed to read a derivative.
#[derive(Clone, Copy, Debug)]
pub struct Dual<F: Float, const N: usize = 1> {
    /// Primal (real) value.
    pub re: F,
    /// Tangent (derivative) values, one per tracked variable.
    pub eps: [F; N],
}

/// `tangent · partial`, where a zero tangent contributes exactly zero even
/// when the partial is infinite (`sqrt` at 0, `0^y`).
#[inline(always)]
pub(crate) fn scale<F: Float>(tangent: F, partial: F) -> F {
    if tangent == F::zero() {
        F::zero()
    } else {
        tangent * partial
    }
}

impl<F: Float, const N: usize> Default for Dual<F, N> {
    fn default() -> Self {
        Dual::constant(F::zero())
    }
}

impl<F: Float, const N: usize> Display for Dual<F, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.re)?;
        for (k, e) in self.eps.iter().enumerate() {
            write!(f, " + {}\u{03b5}{}", e, k)?;
        }
        Ok(())
    }
}

impl<F: Float, const N: usize> From<F> for Dual<F, N> {
    #[inline]
    fn from(re: F) -> Self {
        Dual::constant(re)
    }
}

impl<F: Float> Dual<F, 1> {
    /// Create a variable (unit derivative) for single-variable differentiation.
    #[inline]
    pub fn variable(re: F) -> Self {
        Dual { re, eps: [F::one()] }
    }

    /// The single tangent of a one-variable dual.
    #[inline]
    pub fn deriv(&self) -> F {
        self.eps[0]
    }
}

impl<F: Float, const N: usize> Dual<F, N> {
    /// Create a dual number from a value and an explicit seed vector.
    #[inline]
    pub fn new(re: F, eps: [F; N]) -> Self {
        Dual { re, eps }
    }

    /// Create a constant (zero derivative in every lane).
    #[inline]
    pub fn constant(re: F) -> Self {
        Dual {
            re,
            eps: [F::zero(); N],
        }
    }

    /// Create variable `lane`: unit derivative in that lane, zero elsewhere.
    #[inline]
    pub fn with_tangent(re: F, lane: usize) -> Self {
        Dual {
            re,
            eps: std::array::from_fn(|k| if k == lane { F::one() } else { F::zero() }),
        }
    }

    #[inline]
    pub fn value(&self) -> F {
        self.re
    }

    #[inline]
    pub fn derivative(&self) -> [F; N] {
        self.eps
    }

    /// `true` when every tangent lane is zero.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.eps.iter().all(|&e| e == F::zero())
    }

    /// Apply the chain rule: given `f(self.re)` and `f'(self.re)`, produce the dual result.
    #[inline(always)]
    fn chain(self, f_val: F, f_deriv: F) -> Self {
        Dual {
            re: f_val,
            eps: std::array::from_fn(|k| scale(self.eps[k], f_deriv)),
        }
    }

    /// Quotient rule, failing when the divisor's value is zero.
    #[inline]
    pub fn try_div(self, rhs: Self) -> Result<Self> {
        rhs.re.check_divisor()?;
        let inv = F::one() / rhs.re;
        Ok(Dual {
            re: self.re * inv,
            eps: std::array::from_fn(|k| {
                (scale(self.eps[k], rhs.re) - scale(rhs.eps[k], self.re)) * inv * inv
            }),
        })
    }

    // ── Powers ──

    /// Generalized power rule `x^y · (y' ln x + y x'/x)`.
    ///
    /// A base below zero is rejected only when the exponent carries a
    /// derivative, since only then is `ln(base)` needed. A zero base adds no
    /// logarithmic term.
    pub fn pow(self, exponent: Self) -> Result<Self> {
        if exponent.is_constant() {
            return Ok(self.powf(exponent.re));
        }
        if self.re < F::zero() {
            return Err(AdError::domain(
                "pow",
                self.re,
                "negative base with a differentiable exponent",
            ));
        }
        let val = self.re.powf(exponent.re);
        let d_base = exponent.re * self.re.powf(exponent.re - F::one());
        let d_exp = if self.re == F::zero() {
            F::zero()
        } else {
            val * self.re.ln()
        };
        Ok(Dual {
            re: val,
            eps: std::array::from_fn(|k| {
                scale(self.eps[k], d_base) + scale(exponent.eps[k], d_exp)
            }),
        })
    }

    /// Power with a constant exponent: `y · x^(y-1) · x'`. Negative bases are allowed.
    #[inline]
    pub fn powf(self, n: F) -> Self {
        let val = self.re.powf(n);
        let deriv = if n == F::zero() {
            F::zero()
        } else {
            n * self.re.powf(n - F::one())
        };
        self.chain(val, deriv)
    }

    #[inline]
    pub fn powi(self, n: i32) -> Self {
        let val = self.re.powi(n);
        let deriv = if n == 0 {
            F::zero()
        } else {
            F::from_i32(n).unwrap_or_else(F::nan) * self.re.powi(n - 1)
        };
        self.chain(val, deriv)
    }

    /// A plain scalar raised to a dual exponent, `base^x`.
    #[inline]
    pub fn scalar_pow(base: F, exponent: Self) -> Result<Self> {
        Dual::constant(base).pow(exponent)
    }

    #[inline]
    pub fn sqrt(self) -> Result<Self> {
        self.re.check_sqrt()?;
        let s = self.re.sqrt();
        Ok(self.chain(s, F::one() / (F::two() * s)))
    }

    // ── Exp/Log ──

    #[inline]
    pub fn exp(self) -> Self {
        let e = self.re.exp();
        self.chain(e, e)
    }

    #[inline]
    pub fn ln(self) -> Result<Self> {
        self.re.check_ln()?;
        Ok(self.chain(self.re.ln(), F::one() / self.re))
    }

    /// Logarithm in an arbitrary constant `base`.
    #[inline]
    pub fn log(self, base: F) -> Result<Self> {
        base.check_log_base()?;
        self.re.check_ln()?;
        let ln_base = base.ln();
        Ok(self.chain(self.re.ln() / ln_base, F::one() / (self.re * ln_base)))
    }

    // ── Trig ──

    #[inline]
    pub fn sin(self) -> Self {
        self.chain(self.re.sin(), self.re.cos())
    }

    #[inline]
    pub fn cos(self) -> Self {
        self.chain(self.re.cos(), -self.re.sin())
    }

    #[inline]
    pub fn tan(self) -> Result<Self> {
        self.re.check_tan()?;
        let c = self.re.cos();
        Ok(self.chain(self.re.tan(), F::one() / (c * c)))
    }

    #[inline]
    pub fn asin(self) -> Result<Self> {
        self.re.check_unit_interval("asin")?;
        Ok(self.chain(
            self.re.asin(),
            F::one() / (F::one() - self.re * self.re).sqrt(),
        ))
    }

    #[inline]
    pub fn acos(self) -> Result<Self> {
        self.re.check_unit_interval("acos")?;
        Ok(self.chain(
            self.re.acos(),
            -F::one() / (F::one() - self.re * self.re).sqrt(),
        ))
    }

    #[inline]
    pub fn atan(self) -> Self {
        self.chain(self.re.atan(), F::one() / (F::one() + self.re * self.re))
    }

    // ── Hyperbolic ──

    #[inline]
    pub fn sinh(self) -> Self {
        self.chain(self.re.sinh(), self.re.cosh())
    }

    #[inline]
    pub fn cosh(self) -> Self {
        self.chain(self.re.cosh(), self.re.sinh())
    }

    #[inline]
    pub fn tanh(self) -> Self {
        let c = self.re.cosh();
        self.chain(self.re.tanh(), F::one() / (c * c))
    }

    /// Logistic sigmoid `1 / (1 + e^-x)`, with derivative `s(1 - s)`.
    #[inline]
    pub fn logistic(self) -> Self {
        let s = F::one() / (F::one() + (-self.re).exp());
        self.chain(s, s * (F::one() - s))
    }
}
