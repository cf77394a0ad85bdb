//! Arena-backed computation graph for reverse-mode AD.
//!
//! Every arithmetic operation on a [`Node`] appends one record to its
//! [`Graph`]. A record stores the operation's value and, for each operand,
//! the operand's arena index together with the *local* partial derivative of
//! the result with respect to that operand. Parents are always appended
//! before their children, so arena order is a topological order and the
//! graph is acyclic by construction.
//!
//! The reverse pass never mutates the arena. It builds a fresh accumulator
//! ([`Adjoints`]) indexed by the same handles, which makes repeated traversal
//! of one root idempotent.

use std::cell::RefCell;
use std::fmt;

use crate::error::{AdError, Result};
use crate::node::Node;
use crate::Float;

/// Operand position of a parent edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Left operand of a binary operation, or the operand of a unary one.
    First,
    /// Right operand of a binary operation.
    Second,
}

impl Slot {
    #[inline]
    fn position(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }
}

/// A parent reference and the local partial derivative towards it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge<F: Float> {
    /// Arena index of the parent node.
    pub parent: usize,
    /// ∂(child)/∂(parent), evaluated at the values seen during construction.
    pub partial: F,
}

#[derive(Clone, Copy, Debug)]
struct Record<F: Float> {
    value: F,
    parents: [Option<Edge<F>>; 2],
}

/// How [`Graph::reverse`] walks the graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Traversal {
    /// Depth-first walk that pushes each incoming contribution down every
    /// parent edge independently, revisiting a shared node once per path.
    ///
    /// This reproduces the reference accumulation order exactly but costs
    /// time exponential in the depth of nested diamonds. An explicit work
    /// stack replaces recursion, so deep expressions cannot overflow the
    /// call stack.
    PerPath,
    /// One pass over the arena in reverse topological order, visiting each
    /// reachable node exactly once.
    #[default]
    Sweep,
}

/// Arena of computation-graph records.
///
/// Nodes borrow the graph shared (`&Graph`) so arithmetic can append records
/// while many handles are alive; the arena itself sits behind a `RefCell`.
/// Dropping the graph discards every record.
pub struct Graph<F: Float> {
    records: RefCell<Vec<Record<F>>>,
}

impl<F: Float> Default for Graph<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> fmt::Debug for Graph<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph").field("len", &self.len()).finish()
    }
}

impl<F: Float> Graph<F> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Graph {
            records: RefCell::new(Vec::new()),
        }
    }

    /// Create a graph with room for `est_ops` records.
    pub fn with_capacity(est_ops: usize) -> Self {
        Graph {
            records: RefCell::new(Vec::with_capacity(est_ops)),
        }
    }

    /// Number of recorded nodes, leaves included.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Register an independent variable as a parentless leaf.
    pub fn variable(&self, value: F) -> Node<'_, F> {
        let index = self.push(value, [None, None]);
        Node::from_graph(self, index, value)
    }

    /// Register a constant. Structurally identical to a variable: a leaf whose
    /// adjoint is still reported after the reverse pass.
    pub fn constant(&self, value: F) -> Node<'_, F> {
        self.variable(value)
    }

    #[inline]
    fn push(&self, value: F, parents: [Option<Edge<F>>; 2]) -> usize {
        let mut records = self.records.borrow_mut();
        records.push(Record { value, parents });
        records.len() - 1
    }

    /// Record `result = f(operand)` with `partial = df/d(operand)`.
    #[inline]
    pub(crate) fn push_unary(&self, value: F, operand: usize, partial: F) -> usize {
        self.push(
            value,
            [
                Some(Edge {
                    parent: operand,
                    partial,
                }),
                None,
            ],
        )
    }

    /// Record `result = f(lhs, rhs)` with both local partials.
    #[inline]
    pub(crate) fn push_binary(
        &self,
        value: F,
        lhs: usize,
        lhs_partial: F,
        rhs: usize,
        rhs_partial: F,
    ) -> usize {
        self.push(
            value,
            [
                Some(Edge {
                    parent: lhs,
                    partial: lhs_partial,
                }),
                Some(Edge {
                    parent: rhs,
                    partial: rhs_partial,
                }),
            ],
        )
    }

    /// Value stored at `index`, if it exists.
    pub fn value(&self, index: usize) -> Option<F> {
        self.records.borrow().get(index).map(|r| r.value)
    }

    /// Parent edges of the node at `index`. Leaves and unknown indices have none.
    pub fn parents(&self, index: usize) -> [Option<Edge<F>>; 2] {
        self.records
            .borrow()
            .get(index)
            .map_or([None, None], |r| r.parents)
    }

    /// Local partial of node `index` towards the operand in `slot`.
    pub fn local_derivative(&self, index: usize, slot: Slot) -> Option<F> {
        self.parents(index)[slot.position()].map(|e| e.partial)
    }

    /// Accumulate adjoints of `root` into every node reachable from it.
    ///
    /// The root is seeded with 1. Each visited node passes
    /// `incoming × local partial` to each parent, adding to (never
    /// overwriting) the parent's entry so that a node reachable along several
    /// paths receives the sum over all of them.
    pub fn reverse(&self, root: usize, traversal: Traversal) -> Adjoints<'_, F> {
        let records = self.records.borrow();
        let mut acc: Vec<Option<F>> = vec![None; records.len()];
        if root >= records.len() {
            return Adjoints {
                graph: self,
                root,
                values: acc,
            };
        }
        acc[root] = Some(F::one());

        let visits = match traversal {
            Traversal::PerPath => per_path(&records, root, &mut acc),
            Traversal::Sweep => sweep(&records, root, &mut acc),
        };
        tracing::debug!(
            root,
            nodes = records.len(),
            visits,
            ?traversal,
            "reverse traversal complete"
        );

        Adjoints {
            graph: self,
            root,
            values: acc,
        }
    }

    /// Reverse sweep seeded with an explicit adjoint per output node.
    ///
    /// Computes `Σ wᵢ · ∂outputᵢ/∂node` for every node in one pass; this is
    /// the vector-Jacobian product. Repeated outputs add their seeds, and
    /// indices past the end of the arena are ignored. The reported
    /// [`Adjoints::root`] is the highest seeded index.
    pub fn reverse_seeded(&self, seeds: &[(usize, F)]) -> Adjoints<'_, F> {
        let records = self.records.borrow();
        let mut acc: Vec<Option<F>> = vec![None; records.len()];
        let mut top = None;
        for &(index, weight) in seeds.iter().filter(|(i, _)| *i < records.len()) {
            accumulate(&mut acc[index], weight);
            top = top.max(Some(index));
        }
        let Some(top) = top else {
            return Adjoints {
                graph: self,
                root: 0,
                values: acc,
            };
        };

        let visits = sweep(&records, top, &mut acc);
        tracing::debug!(
            seeds = seeds.len(),
            nodes = records.len(),
            visits,
            "seeded reverse sweep complete"
        );

        Adjoints {
            graph: self,
            root: top,
            values: acc,
        }
    }
}

#[inline]
fn accumulate<F: Float>(slot: &mut Option<F>, contribution: F) {
    *slot = Some(slot.map_or(contribution, |prev| prev + contribution));
}

/// Path-by-path propagation. Children are pushed in reverse slot order so
/// the first operand's subtree is fully processed before the second's, the
/// same order a recursive walk would take.
fn per_path<F: Float>(records: &[Record<F>], root: usize, acc: &mut [Option<F>]) -> usize {
    let mut stack: Vec<(usize, F)> = Vec::new();
    let mut visits = 0usize;

    let push_parents = |stack: &mut Vec<(usize, F)>, node: usize, incoming: F| {
        for edge in records[node].parents.iter().rev().flatten() {
            stack.push((edge.parent, incoming * edge.partial));
        }
    };

    push_parents(&mut stack, root, F::one());
    while let Some((node, contribution)) = stack.pop() {
        visits += 1;
        accumulate(&mut acc[node], contribution);
        push_parents(&mut stack, node, contribution);
    }
    visits
}

/// Single reverse-topological sweep. Arena order is topological, so every
/// consumer of a node has a larger index and has already pushed its full
/// contribution by the time the node itself is processed.
fn sweep<F: Float>(records: &[Record<F>], root: usize, acc: &mut [Option<F>]) -> usize {
    let mut visits = 0usize;
    for node in (0..=root).rev() {
        let Some(adjoint) = acc[node] else {
            continue;
        };
        visits += 1;
        for edge in records[node].parents.iter().flatten() {
            accumulate(&mut acc[edge.parent], adjoint * edge.partial);
        }
    }
    visits
}

/// Gradient accumulator produced by one reverse traversal.
///
/// Entry `i` holds the total derivative of the root's value with respect to
/// node `i`, or nothing if `i` is not reachable from the root.
#[derive(Clone)]
pub struct Adjoints<'g, F: Float> {
    graph: &'g Graph<F>,
    root: usize,
    values: Vec<Option<F>>,
}

impl<'g, F: Float> fmt::Debug for Adjoints<'g, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adjoints")
            .field("root", &self.root)
            .field("values", &self.values)
            .finish()
    }
}

impl<'g, F: Float> Adjoints<'g, F> {
    /// Arena index of the traversal root.
    pub fn root(&self) -> usize {
        self.root
    }

    /// Adjoint stored for arena index `index`.
    pub fn get(&self, index: usize) -> Option<F> {
        self.values.get(index).copied().flatten()
    }

    /// ∂root/∂`node`.
    ///
    /// Fails with [`AdError::UnknownNode`] if `node` belongs to another graph
    /// or was not reached from the root.
    pub fn wrt(&self, node: &Node<'g, F>) -> Result<F> {
        if !std::ptr::eq(self.graph, node.graph()) {
            return Err(AdError::UnknownNode {
                index: node.index(),
            });
        }
        self.get(node.index()).ok_or(AdError::UnknownNode {
            index: node.index(),
        })
    }

    /// Gradient with respect to each of `vars`, in order.
    pub fn gradient(&self, vars: &[Node<'g, F>]) -> Result<Vec<F>> {
        vars.iter().map(|v| self.wrt(v)).collect()
    }

    /// Iterate `(index, adjoint)` over every reached node, root included.
    pub fn reached(&self) -> impl Iterator<Item = (usize, F)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.map(|a| (i, a)))
    }
}
