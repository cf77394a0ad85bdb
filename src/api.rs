use crate::dual::Dual;
use crate::error::Result;
use crate::float::Float;
use crate::graph::Graph;
use crate::node::Node;
use crate::vector::{DualVector, NodeVector};

/// Which AD strategy to run for a function `f : Rⁿ → Rᵐ`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// One dual-number pass per input.
    Forward,
    /// One graph, one reverse traversal per output.
    Reverse,
}

impl Mode {
    /// Forward mode when there are no more inputs than outputs, reverse
    /// mode otherwise.
    pub fn select(inputs: usize, outputs: usize) -> Self {
        if inputs <= outputs {
            Mode::Forward
        } else {
            Mode::Reverse
        }
    }
}

fn leaves<'g, F: Float>(graph: &'g Graph<F>, x: &[F]) -> Vec<Node<'g, F>> {
    x.iter().map(|&xi| graph.variable(xi)).collect()
}

/// Compute the gradient of a scalar function `f : Rⁿ → R` using reverse mode.
///
/// ```
/// let g = chainrule::grad(|x| Ok(x[0] * x[0] + x[1] * x[1]), &[3.0_f64, 4.0]).unwrap();
/// assert!((g[0] - 6.0).abs() < 1e-10);
/// assert!((g[1] - 8.0).abs() < 1e-10);
/// ```
///
/// An input the output does not depend on gets a zero partial.
pub fn grad<F: Float>(
    f: impl for<'g> FnOnce(&[Node<'g, F>]) -> Result<Node<'g, F>>,
    x: &[F],
) -> Result<Vec<F>> {
    let graph = Graph::with_capacity(x.len() * 10);
    let inputs = leaves(&graph, x);
    let output = f(&inputs)?;

    let adjoints = output.reverse();
    let g = inputs
        .iter()
        .map(|v| adjoints.get(v.index()).unwrap_or_else(F::zero))
        .collect();
    Ok(g)
}

/// Jacobian-vector product (forward mode): `(f(x), J·v)`.
///
/// Evaluates `f` at `x` and computes the directional derivative in direction `v`.
pub fn jvp<F: Float>(
    f: impl FnOnce(&[Dual<F>]) -> Result<Vec<Dual<F>>>,
    x: &[F],
    v: &[F],
) -> Result<(Vec<F>, Vec<F>)> {
    assert_eq!(x.len(), v.len(), "x and v must have the same length");
    let inputs: Vec<Dual<F>> = x
        .iter()
        .zip(v.iter())
        .map(|(&xi, &vi)| Dual::new(xi, [vi]))
        .collect();
    let outputs = f(&inputs)?;
    let values = outputs.iter().map(|d| d.re).collect();
    let tangents = outputs.iter().map(|d| d.deriv()).collect();
    Ok((values, tangents))
}

/// Vector-Jacobian product (reverse mode): `(f(x), wᵀ·J)`.
///
/// Evaluates `f` at `x` and computes the adjoint product with weights `w`
/// in a single seeded sweep.
pub fn vjp<F: Float>(
    f: impl for<'g> FnOnce(&[Node<'g, F>]) -> Result<Vec<Node<'g, F>>>,
    x: &[F],
    w: &[F],
) -> Result<(Vec<F>, Vec<F>)> {
    let graph = Graph::with_capacity(x.len() * 10);
    let inputs = leaves(&graph, x);
    let outputs = f(&inputs)?;

    assert_eq!(
        outputs.len(),
        w.len(),
        "output length must match weight vector length"
    );

    let values: Vec<F> = outputs.iter().map(Node::value).collect();
    let seeds: Vec<(usize, F)> = outputs
        .iter()
        .zip(w.iter())
        .map(|(y, &wi)| (y.index(), wi))
        .collect();
    let adjoints = graph.reverse_seeded(&seeds);

    let g = inputs
        .iter()
        .map(|v| adjoints.get(v.index()).unwrap_or_else(F::zero))
        .collect();
    Ok((values, g))
}

/// Compute the full Jacobian of `f : Rⁿ → Rᵐ` using forward mode.
///
/// Returns `(f(x), J)` where `J[i][j] = ∂fᵢ/∂xⱼ`. Runs one pass per input.
pub fn jacobian<F: Float>(
    f: impl Fn(&[Dual<F>]) -> Result<Vec<Dual<F>>>,
    x: &[F],
) -> Result<(Vec<F>, Vec<Vec<F>>)> {
    let n = x.len();

    // First pass to get output dimension and values.
    let const_inputs: Vec<Dual<F>> = x.iter().map(|&xi| Dual::constant(xi)).collect();
    let values = DualVector::new(f(&const_inputs)?).values();
    let m = values.len();

    let mut jac = vec![vec![F::zero(); n]; m];
    for j in 0..n {
        let inputs: Vec<Dual<F>> = x
            .iter()
            .enumerate()
            .map(|(k, &xi)| {
                if k == j {
                    Dual::variable(xi)
                } else {
                    Dual::constant(xi)
                }
            })
            .collect();
        let outputs = f(&inputs)?;
        for (row, out) in jac.iter_mut().zip(outputs.iter()) {
            row[j] = out.deriv();
        }
    }

    tracing::debug!(inputs = n, outputs = m, "forward jacobian complete");
    Ok((values, jac))
}

/// Forward-mode Jacobian in a single pass, carrying all `N` tangents at once.
pub fn jacobian_vec<F: Float, const N: usize>(
    f: impl FnOnce(&[Dual<F, N>]) -> Result<Vec<Dual<F, N>>>,
    x: &[F; N],
) -> Result<(Vec<F>, Vec<Vec<F>>)> {
    let inputs: Vec<Dual<F, N>> = x
        .iter()
        .enumerate()
        .map(|(k, &xi)| Dual::with_tangent(xi, k))
        .collect();
    let outputs = DualVector::new(f(&inputs)?);
    Ok((outputs.values(), outputs.jacobian()))
}

/// Reverse-mode Jacobian: one graph, one reverse sweep per output.
pub fn jacobian_reverse<F: Float>(
    f: impl for<'g> FnOnce(&[Node<'g, F>]) -> Result<Vec<Node<'g, F>>>,
    x: &[F],
) -> Result<(Vec<F>, Vec<Vec<F>>)> {
    let graph = Graph::with_capacity(x.len() * 10);
    let inputs = leaves(&graph, x);
    let outputs = NodeVector::new(f(&inputs)?);

    let values = outputs.values();
    let jac = outputs.reverse().matrix(&inputs);
    tracing::debug!(
        inputs = x.len(),
        outputs = values.len(),
        nodes = graph.len(),
        "reverse jacobian complete"
    );
    Ok((values, jac))
}
