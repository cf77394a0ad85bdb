//! `std::ops` arithmetic for [`Dual`] and [`Node`].
//!
//! Mixing an AD type with a plain `f32`/`f64` promotes the scalar first: to a
//! zero-derivative constant for duals, to a leaf of the operand's graph for
//! nodes. Division panics on a zero divisor, like integer division in `std`;
//! use `try_div` for a `Result`.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::dual::{scale, Dual};
use crate::float::Float;
use crate::node::Node;

// ──────────────────────────────────────────────
//  Dual<F, N> operators
// ──────────────────────────────────────────────

impl<F: Float, const N: usize> Add for Dual<F, N> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Dual {
            re: self.re + rhs.re,
            eps: std::array::from_fn(|k| self.eps[k] + rhs.eps[k]),
        }
    }
}

impl<F: Float, const N: usize> Sub for Dual<F, N> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Dual {
            re: self.re - rhs.re,
            eps: std::array::from_fn(|k| self.eps[k] - rhs.eps[k]),
        }
    }
}

impl<F: Float, const N: usize> Mul for Dual<F, N> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Dual {
            re: self.re * rhs.re,
            eps: std::array::from_fn(|k| scale(rhs.eps[k], self.re) + scale(self.eps[k], rhs.re)),
        }
    }
}

impl<F: Float, const N: usize> Div for Dual<F, N> {
    type Output = Self;
    /// # Panics
    ///
    /// Panics if `rhs` has a zero value.
    #[inline]
    fn div(self, rhs: Self) -> Self {
        match self.try_div(rhs) {
            Ok(q) => q,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<F: Float, const N: usize> Neg for Dual<F, N> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Dual {
            re: -self.re,
            eps: std::array::from_fn(|k| -self.eps[k]),
        }
    }
}

impl<F: Float, const N: usize> AddAssign for Dual<F, N> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<F: Float, const N: usize> SubAssign for Dual<F, N> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<F: Float, const N: usize> MulAssign for Dual<F, N> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<F: Float, const N: usize> DivAssign for Dual<F, N> {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

/// Value and every tangent lane must match.
impl<F: Float, const N: usize> PartialEq for Dual<F, N> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.re == other.re && self.eps == other.eps
    }
}

// Mixed ops: Dual<F, N> with primitive floats.
// We generate these for f32 and f64 via a macro.
macro_rules! impl_dual_scalar_ops {
    ($f:ty) => {
        impl<const N: usize> Add<$f> for Dual<$f, N> {
            type Output = Dual<$f, N>;
            #[inline]
            fn add(self, rhs: $f) -> Dual<$f, N> {
                Dual {
                    re: self.re + rhs,
                    eps: self.eps,
                }
            }
        }

        impl<const N: usize> Add<Dual<$f, N>> for $f {
            type Output = Dual<$f, N>;
            #[inline]
            fn add(self, rhs: Dual<$f, N>) -> Dual<$f, N> {
                Dual {
                    re: self + rhs.re,
                    eps: rhs.eps,
                }
            }
        }

        impl<const N: usize> Sub<$f> for Dual<$f, N> {
            type Output = Dual<$f, N>;
            #[inline]
            fn sub(self, rhs: $f) -> Dual<$f, N> {
                Dual {
                    re: self.re - rhs,
                    eps: self.eps,
                }
            }
        }

        impl<const N: usize> Sub<Dual<$f, N>> for $f {
            type Output = Dual<$f, N>;
            #[inline]
            fn sub(self, rhs: Dual<$f, N>) -> Dual<$f, N> {
                Dual {
                    re: self - rhs.re,
                    eps: rhs.eps.map(|e| -e),
                }
            }
        }

        impl<const N: usize> Mul<$f> for Dual<$f, N> {
            type Output = Dual<$f, N>;
            #[inline]
            fn mul(self, rhs: $f) -> Dual<$f, N> {
                Dual {
                    re: self.re * rhs,
                    eps: self.eps.map(|e| e * rhs),
                }
            }
        }

        impl<const N: usize> Mul<Dual<$f, N>> for $f {
            type Output = Dual<$f, N>;
            #[inline]
            fn mul(self, rhs: Dual<$f, N>) -> Dual<$f, N> {
                Dual {
                    re: self * rhs.re,
                    eps: rhs.eps.map(|e| self * e),
                }
            }
        }

        impl<const N: usize> Div<$f> for Dual<$f, N> {
            type Output = Dual<$f, N>;
            /// # Panics
            ///
            /// Panics if `rhs` is zero.
            #[inline]
            fn div(self, rhs: $f) -> Dual<$f, N> {
                self / Dual::constant(rhs)
            }
        }

        impl<const N: usize> Div<Dual<$f, N>> for $f {
            type Output = Dual<$f, N>;
            /// # Panics
            ///
            /// Panics if `rhs` has a zero value.
            #[inline]
            fn div(self, rhs: Dual<$f, N>) -> Dual<$f, N> {
                Dual::constant(self) / rhs
            }
        }

        impl<const N: usize> AddAssign<$f> for Dual<$f, N> {
            #[inline]
            fn add_assign(&mut self, rhs: $f) {
                *self = *self + rhs;
            }
        }

        impl<const N: usize> SubAssign<$f> for Dual<$f, N> {
            #[inline]
            fn sub_assign(&mut self, rhs: $f) {
                *self = *self - rhs;
            }
        }

        impl<const N: usize> MulAssign<$f> for Dual<$f, N> {
            #[inline]
            fn mul_assign(&mut self, rhs: $f) {
                *self = *self * rhs;
            }
        }

        impl<const N: usize> DivAssign<$f> for Dual<$f, N> {
            #[inline]
            fn div_assign(&mut self, rhs: $f) {
                *self = *self / rhs;
            }
        }

        /// A dual never equals a plain scalar: the comparison is not
        /// promoted and always yields `false`.
        impl<const N: usize> PartialEq<$f> for Dual<$f, N> {
            #[inline]
            fn eq(&self, _other: &$f) -> bool {
                false
            }
        }

        impl<const N: usize> PartialEq<Dual<$f, N>> for $f {
            #[inline]
            fn eq(&self, _other: &Dual<$f, N>) -> bool {
                false
            }
        }
    };
}

impl_dual_scalar_ops!(f32);
impl_dual_scalar_ops!(f64);

// ──────────────────────────────────────────────
//  Node<'g, F> operators
// ──────────────────────────────────────────────

impl<'g, F: Float> Add for Node<'g, F> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.binary(rhs, self.value() + rhs.value(), F::one(), F::one())
    }
}

impl<'g, F: Float> Sub for Node<'g, F> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.binary(rhs, self.value() - rhs.value(), F::one(), -F::one())
    }
}

impl<'g, F: Float> Mul for Node<'g, F> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.binary(rhs, self.value() * rhs.value(), rhs.value(), self.value())
    }
}

impl<'g, F: Float> Div for Node<'g, F> {
    type Output = Self;
    /// # Panics
    ///
    /// Panics if `rhs` has a zero value.
    #[inline]
    fn div(self, rhs: Self) -> Self {
        match self.try_div(rhs) {
            Ok(q) => q,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<'g, F: Float> Neg for Node<'g, F> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.unary(-self.value(), -F::one())
    }
}

impl<'g, F: Float> AddAssign for Node<'g, F> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<'g, F: Float> SubAssign for Node<'g, F> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<'g, F: Float> MulAssign for Node<'g, F> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<'g, F: Float> DivAssign for Node<'g, F> {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

// Mixed ops: the scalar becomes a leaf of the node's graph, then the
// ordinary node-node rule applies.
macro_rules! impl_node_scalar_ops {
    ($f:ty) => {
        impl<'g> Add<$f> for Node<'g, $f> {
            type Output = Node<'g, $f>;
            #[inline]
            fn add(self, rhs: $f) -> Node<'g, $f> {
                self + self.lift(rhs)
            }
        }

        impl<'g> Add<Node<'g, $f>> for $f {
            type Output = Node<'g, $f>;
            #[inline]
            fn add(self, rhs: Node<'g, $f>) -> Node<'g, $f> {
                rhs.lift(self) + rhs
            }
        }

        impl<'g> Sub<$f> for Node<'g, $f> {
            type Output = Node<'g, $f>;
            #[inline]
            fn sub(self, rhs: $f) -> Node<'g, $f> {
                self - self.lift(rhs)
            }
        }

        impl<'g> Sub<Node<'g, $f>> for $f {
            type Output = Node<'g, $f>;
            #[inline]
            fn sub(self, rhs: Node<'g, $f>) -> Node<'g, $f> {
                rhs.lift(self) - rhs
            }
        }

        impl<'g> Mul<$f> for Node<'g, $f> {
            type Output = Node<'g, $f>;
            #[inline]
            fn mul(self, rhs: $f) -> Node<'g, $f> {
                self * self.lift(rhs)
            }
        }

        impl<'g> Mul<Node<'g, $f>> for $f {
            type Output = Node<'g, $f>;
            #[inline]
            fn mul(self, rhs: Node<'g, $f>) -> Node<'g, $f> {
                rhs.lift(self) * rhs
            }
        }

        impl<'g> Div<$f> for Node<'g, $f> {
            type Output = Node<'g, $f>;
            /// # Panics
            ///
            /// Panics if `rhs` is zero.
            #[inline]
            fn div(self, rhs: $f) -> Node<'g, $f> {
                self / self.lift(rhs)
            }
        }

        impl<'g> Div<Node<'g, $f>> for $f {
            type Output = Node<'g, $f>;
            /// # Panics
            ///
            /// Panics if `rhs` has a zero value.
            #[inline]
            fn div(self, rhs: Node<'g, $f>) -> Node<'g, $f> {
                rhs.lift(self) / rhs
            }
        }
    };
}

impl_node_scalar_ops!(f32);
impl_node_scalar_ops!(f64);
