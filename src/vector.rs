//! Vector-valued functions: one scalar output per component.
//!
//! [`DualVector`] reads the Jacobian straight off forward-mode outputs.
//! [`NodeVector`] runs one reverse traversal per component and keeps each
//! component's adjoints in its own accumulator.

use crate::dual::Dual;
use crate::error::{AdError, Result};
use crate::float::Float;
use crate::graph::{Adjoints, Traversal};
use crate::node::Node;

fn component<T>(items: &[T], index: usize) -> Result<&T> {
    items.get(index).ok_or(AdError::ComponentOutOfRange {
        index,
        len: items.len(),
    })
}

/// Forward-mode outputs of a vector-valued function.
///
/// Forward mode already carries every partial, so the Jacobian needs no
/// further computation.
#[derive(Clone, Debug, PartialEq)]
pub struct DualVector<F: Float, const N: usize = 1> {
    components: Vec<Dual<F, N>>,
}

impl<F: Float, const N: usize> DualVector<F, N> {
    pub fn new(components: Vec<Dual<F, N>>) -> Self {
        DualVector { components }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[Dual<F, N>] {
        &self.components
    }

    /// Values of every component, in order.
    pub fn values(&self) -> Vec<F> {
        self.components.iter().map(|d| d.re).collect()
    }

    /// One gradient row per component: `J[i][k] = ∂fᵢ/∂xₖ`.
    pub fn jacobian(&self) -> Vec<Vec<F>> {
        self.components.iter().map(|d| d.eps.to_vec()).collect()
    }

    pub fn value(&self, index: usize) -> Result<F> {
        component(&self.components, index).map(|d| d.re)
    }

    pub fn gradient(&self, index: usize) -> Result<[F; N]> {
        component(&self.components, index).map(|d| d.eps)
    }
}

impl<F: Float, const N: usize> FromIterator<Dual<F, N>> for DualVector<F, N> {
    fn from_iter<I: IntoIterator<Item = Dual<F, N>>>(iter: I) -> Self {
        DualVector::new(iter.into_iter().collect())
    }
}

/// Reverse-mode outputs of a vector-valued function, all in one graph.
#[derive(Clone, Debug)]
pub struct NodeVector<'g, F: Float> {
    components: Vec<Node<'g, F>>,
}

impl<'g, F: Float> NodeVector<'g, F> {
    pub fn new(components: Vec<Node<'g, F>>) -> Self {
        NodeVector { components }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[Node<'g, F>] {
        &self.components
    }

    pub fn values(&self) -> Vec<F> {
        self.components.iter().map(Node::value).collect()
    }

    pub fn value(&self, index: usize) -> Result<F> {
        component(&self.components, index).map(Node::value)
    }

    /// Reverse traversal of every component with the default [`Traversal`].
    pub fn reverse(&self) -> NodeJacobian<'g, F> {
        self.reverse_with(Traversal::default())
    }

    pub fn reverse_with(&self, traversal: Traversal) -> NodeJacobian<'g, F> {
        let rows: Vec<Adjoints<'g, F>> = self
            .components
            .iter()
            .map(|c| c.reverse_with(traversal))
            .collect();
        tracing::debug!(components = rows.len(), ?traversal, "vector reverse complete");
        NodeJacobian { rows }
    }
}

impl<'g, F: Float> FromIterator<Node<'g, F>> for NodeVector<'g, F> {
    fn from_iter<I: IntoIterator<Item = Node<'g, F>>>(iter: I) -> Self {
        NodeVector::new(iter.into_iter().collect())
    }
}

/// Per-component adjoints produced by [`NodeVector::reverse`].
#[derive(Clone, Debug)]
pub struct NodeJacobian<'g, F: Float> {
    rows: Vec<Adjoints<'g, F>>,
}

impl<'g, F: Float> NodeJacobian<'g, F> {
    /// Number of components.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw accumulator of component `index`.
    pub fn adjoints(&self, index: usize) -> Result<&Adjoints<'g, F>> {
        component(&self.rows, index)
    }

    /// ∂fᵢ/∂`var`.
    ///
    /// A variable that component `index` does not depend on is never
    /// reached by its traversal and reports [`AdError::UnknownNode`].
    pub fn gradient(&self, index: usize, var: &Node<'g, F>) -> Result<F> {
        self.adjoints(index)?.wrt(var)
    }

    /// Gradient row of component `index` over `vars`.
    pub fn row(&self, index: usize, vars: &[Node<'g, F>]) -> Result<Vec<F>> {
        self.adjoints(index)?.gradient(vars)
    }

    /// Dense Jacobian over `vars`; a component that does not reach a
    /// variable gets `0` there.
    pub fn matrix(&self, vars: &[Node<'g, F>]) -> Vec<Vec<F>> {
        self.rows
            .iter()
            .map(|adj| {
                vars.iter()
                    .map(|v| adj.wrt(v).unwrap_or_else(|_| F::zero()))
                    .collect()
            })
            .collect()
    }
}
