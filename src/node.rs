use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use crate::error::{AdError, Result};
use crate::graph::{Adjoints, Edge, Graph, Slot, Traversal};
use crate::Float;

/// Reverse-mode AD variable: a handle into a [`Graph`].
///
/// Just a value, an arena index and a shared borrow of the graph, so it is
/// `Copy`. Arithmetic records one new node per operation holding only the
/// local partials; nothing is chained until [`Node::reverse`] runs.
///
/// Equality and hashing use node identity (graph and index), not value: two
/// distinct nodes can carry the same value at different points of the graph.
#[derive(Clone, Copy)]
pub struct Node<'g, F: Float> {
    graph: &'g Graph<F>,
    index: usize,
    value: F,
}

impl<'g, F: Float> Node<'g, F> {
    #[inline]
    pub(crate) fn from_graph(graph: &'g Graph<F>, index: usize, value: F) -> Self {
        Node {
            graph,
            index,
            value,
        }
    }

    #[inline]
    pub fn value(&self) -> F {
        self.value
    }

    /// Arena index of this node.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn graph(&self) -> &'g Graph<F> {
        self.graph
    }

    /// Parent edges in operand order. Leaves have none.
    pub fn parents(&self) -> [Option<Edge<F>>; 2] {
        self.graph.parents(self.index)
    }

    /// Local partial towards the operand in `slot`, if that slot is occupied.
    pub fn local_derivative(&self, slot: Slot) -> Option<F> {
        self.graph.local_derivative(self.index, slot)
    }

    pub fn is_leaf(&self) -> bool {
        self.parents().iter().all(Option::is_none)
    }

    /// Run the reverse pass from this node with the default [`Traversal`].
    pub fn reverse(&self) -> Adjoints<'g, F> {
        self.reverse_with(Traversal::default())
    }

    pub fn reverse_with(&self, traversal: Traversal) -> Adjoints<'g, F> {
        self.graph.reverse(self.index, traversal)
    }

    /// Promote a plain scalar to a leaf of this node's graph.
    #[inline]
    pub fn lift(&self, value: F) -> Self {
        self.graph.constant(value)
    }

    #[inline]
    pub(crate) fn unary(self, value: F, partial: F) -> Self {
        let index = self.graph.push_unary(value, self.index, partial);
        Node::from_graph(self.graph, index, value)
    }

    #[inline]
    pub(crate) fn binary(self, rhs: Self, value: F, lhs_partial: F, rhs_partial: F) -> Self {
        assert!(
            std::ptr::eq(self.graph, rhs.graph),
            "cannot combine nodes from different graphs"
        );
        let index = self
            .graph
            .push_binary(value, self.index, lhs_partial, rhs.index, rhs_partial);
        Node::from_graph(self.graph, index, value)
    }

    /// Quotient, failing when the divisor's value is zero.
    #[inline]
    pub fn try_div(self, rhs: Self) -> Result<Self> {
        rhs.value.check_divisor()?;
        let inv = F::one() / rhs.value;
        Ok(self.binary(rhs, self.value * inv, inv, -self.value * inv * inv))
    }

    // ── Powers ──

    /// `self^exponent`. The base must be strictly positive because the
    /// exponent slot's local partial is `x^y · ln x`, recorded unconditionally.
    pub fn pow(self, exponent: Self) -> Result<Self> {
        if self.value <= F::zero() {
            return Err(AdError::domain("pow", self.value, "base must be positive"));
        }
        let val = self.value.powf(exponent.value);
        let d_base = exponent.value * self.value.powf(exponent.value - F::one());
        let d_exp = val * self.value.ln();
        Ok(self.binary(exponent, val, d_base, d_exp))
    }

    /// Power with a plain exponent, promoted to a leaf first.
    #[inline]
    pub fn powf(self, n: F) -> Result<Self> {
        self.pow(self.lift(n))
    }

    /// Integer power. Records a single-parent node, so negative bases are fine.
    #[inline]
    pub fn powi(self, n: i32) -> Self {
        let partial = if n == 0 {
            F::zero()
        } else {
            F::from_i32(n).unwrap_or_else(F::nan) * self.value.powi(n - 1)
        };
        self.unary(self.value.powi(n), partial)
    }

    /// A plain scalar raised to a node exponent, `base^x`.
    #[inline]
    pub fn scalar_pow(base: F, exponent: Self) -> Result<Self> {
        exponent.lift(base).pow(exponent)
    }

    #[inline]
    pub fn sqrt(self) -> Result<Self> {
        self.value.check_sqrt()?;
        let s = self.value.sqrt();
        Ok(self.unary(s, F::one() / (F::two() * s)))
    }

    // ── Exp/Log ──

    #[inline]
    pub fn exp(self) -> Self {
        let e = self.value.exp();
        self.unary(e, e)
    }

    #[inline]
    pub fn ln(self) -> Result<Self> {
        self.value.check_ln()?;
        Ok(self.unary(self.value.ln(), F::one() / self.value))
    }

    #[inline]
    pub fn log(self, base: F) -> Result<Self> {
        base.check_log_base()?;
        self.value.check_ln()?;
        let ln_base = base.ln();
        Ok(self.unary(self.value.ln() / ln_base, F::one() / (self.value * ln_base)))
    }

    // ── Trig ──

    #[inline]
    pub fn sin(self) -> Self {
        self.unary(self.value.sin(), self.value.cos())
    }

    #[inline]
    pub fn cos(self) -> Self {
        self.unary(self.value.cos(), -self.value.sin())
    }

    #[inline]
    pub fn tan(self) -> Result<Self> {
        self.value.check_tan()?;
        let c = self.value.cos();
        Ok(self.unary(self.value.tan(), F::one() / (c * c)))
    }

    #[inline]
    pub fn asin(self) -> Result<Self> {
        self.value.check_unit_interval("asin")?;
        let d = F::one() / (F::one() - self.value * self.value).sqrt();
        Ok(self.unary(self.value.asin(), d))
    }

    #[inline]
    pub fn acos(self) -> Result<Self> {
        self.value.check_unit_interval("acos")?;
        let d = -F::one() / (F::one() - self.value * self.value).sqrt();
        Ok(self.unary(self.value.acos(), d))
    }

    #[inline]
    pub fn atan(self) -> Self {
        self.unary(
            self.value.atan(),
            F::one() / (F::one() + self.value * self.value),
        )
    }

    // ── Hyperbolic ──

    #[inline]
    pub fn sinh(self) -> Self {
        self.unary(self.value.sinh(), self.value.cosh())
    }

    #[inline]
    pub fn cosh(self) -> Self {
        self.unary(self.value.cosh(), self.value.sinh())
    }

    #[inline]
    pub fn tanh(self) -> Self {
        let c = self.value.cosh();
        self.unary(self.value.tanh(), F::one() / (c * c))
    }

    #[inline]
    pub fn logistic(self) -> Self {
        let s = F::one() / (F::one() + (-self.value).exp());
        self.unary(s, s * (F::one() - s))
    }
}

impl<'g, F: Float> fmt::Debug for Node<'g, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("index", &self.index)
            .field("value", &self.value)
            .finish()
    }
}

impl<'g, F: Float> Display for Node<'g, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<'g, F: Float> PartialEq for Node<'g, F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.index == other.index
    }
}

impl<'g, F: Float> Eq for Node<'g, F> {}

impl<'g, F: Float> Hash for Node<'g, F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.graph, state);
        self.index.hash(state);
    }
}
