//! Automatic differentiation in two modes.
//!
//! Forward mode propagates derivatives alongside values in [`Dual`] numbers.
//! Reverse mode records a [`Graph`] of [`Node`]s and accumulates adjoints
//! from an output back to every input in one traversal.
//!
//! # Errors
//!
//! Operations with a restricted domain (`sqrt`, `ln`, `log`, `tan`, `asin`,
//! `acos`, `pow`) return [`Result`] and report an [`AdError`] at the point of
//! failure. Division follows the same rule through `try_div`:
//!
//! ```
//! use chainrule::Dual64;
//!
//! let x = Dual64::variable(1.0);
//! let zero = Dual64::constant(0.0);
//! assert!(x.try_div(zero).unwrap_err().is_domain_error());
//! ```
//!
//! The `/` operator is a convenience for divisors known to be non-zero and
//! panics otherwise, like integer division. Prefer `try_div` (or
//! [`Scalar::try_div`] in generic code) whenever the divisor can vanish.

pub mod api;
pub mod dual;
pub mod error;
pub mod expr;
pub mod float;
pub mod graph;
pub mod node;
pub mod scalar;
pub mod vector;
mod traits;

pub use api::{grad, jacobian, jacobian_reverse, jacobian_vec, jvp, vjp, Mode};
pub use dual::Dual;
pub use error::{AdError, Result};
pub use expr::{Evaluation, VectorFunction};
pub use float::Float;
pub use graph::{Adjoints, Graph, Slot, Traversal};
pub use node::Node;
pub use scalar::Scalar;
pub use vector::{DualVector, NodeJacobian, NodeVector};

/// Type alias for forward-mode dual numbers over `f64`.
pub type Dual64 = Dual<f64>;
/// Type alias for forward-mode dual numbers over `f32`.
pub type Dual32 = Dual<f32>;
/// Type alias for reverse-mode nodes over `f64`.
pub type Node64<'g> = Node<'g, f64>;
/// Type alias for reverse-mode nodes over `f32`.
pub type Node32<'g> = Node<'g, f32>;
