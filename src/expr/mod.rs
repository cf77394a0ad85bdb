//! Text front end: parse `"x**2 + sin(y)"`-style expressions and
//! differentiate them with either mode.
//!
//! Expressions are parsed once into an [`Expr`] tree with variables already
//! resolved to indices, then interpreted directly over [`Dual`] or [`Node`]
//! values. User text is never evaluated as code.

pub mod eval;
pub mod lexer;
pub mod parser;

use std::fmt;

use crate::api::Mode;
use crate::dual::Dual;
use crate::error::{AdError, Result};
use crate::float::Float;
use crate::graph::Graph;
use crate::node::Node;
use crate::vector::NodeVector;

use eval::Operand;
use parser::Parser;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Elementary functions callable from expression text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    Sin,
    Cos,
    Tan,
    Exp,
    /// Natural log, or `log(x, base)` with a second argument.
    Log,
    Sqrt,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Logistic,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Builtin::Sin,
            "cos" => Builtin::Cos,
            "tan" => Builtin::Tan,
            "exp" => Builtin::Exp,
            "log" | "ln" => Builtin::Log,
            "sqrt" => Builtin::Sqrt,
            "arcsin" | "asin" => Builtin::Asin,
            "arccos" | "acos" => Builtin::Acos,
            "arctan" | "atan" => Builtin::Atan,
            "sinh" => Builtin::Sinh,
            "cosh" => Builtin::Cosh,
            "tanh" => Builtin::Tanh,
            "logistic" => Builtin::Logistic,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Sin => "sin",
            Builtin::Cos => "cos",
            Builtin::Tan => "tan",
            Builtin::Exp => "exp",
            Builtin::Log => "log",
            Builtin::Sqrt => "sqrt",
            Builtin::Asin => "arcsin",
            Builtin::Acos => "arccos",
            Builtin::Atan => "arctan",
            Builtin::Sinh => "sinh",
            Builtin::Cosh => "cosh",
            Builtin::Tanh => "tanh",
            Builtin::Logistic => "logistic",
        }
    }

    /// Inclusive argument-count range.
    pub fn arity(self) -> (usize, usize) {
        match self {
            Builtin::Log => (1, 2),
            _ => (1, 1),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parsed expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    /// Index into the declared variable list.
    Variable(usize),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Builtin,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Whether any variable occurs in the tree.
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Number(_) => true,
            Expr::Variable(_) => false,
            Expr::Neg(e) => e.is_constant(),
            Expr::Binary { lhs, rhs, .. } => lhs.is_constant() && rhs.is_constant(),
            Expr::Call { args, .. } => args.iter().all(Expr::is_constant),
        }
    }
}

/// A vector-valued function `Rⁿ → Rᵐ` given as `m` expressions over `n`
/// named variables.
#[derive(Clone, Debug)]
pub struct VectorFunction {
    variables: Vec<String>,
    components: Vec<Expr>,
}

impl VectorFunction {
    /// Parse each expression against the declared variable names.
    ///
    /// Fails on malformed text, on a name that is neither declared nor a
    /// known constant, and on a variable declared twice.
    pub fn parse(exprs: &[&str], variables: &[&str]) -> Result<Self> {
        let variables: Vec<String> = variables.iter().map(|v| v.to_string()).collect();
        for (i, name) in variables.iter().enumerate() {
            if variables[..i].contains(name) {
                return Err(AdError::Parse {
                    message: format!("variable '{name}' declared twice"),
                    position: 0,
                });
            }
        }

        let components = exprs
            .iter()
            .map(|src| Parser::from_source(src, &variables)?.parse())
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            inputs = variables.len(),
            outputs = components.len(),
            "parsed vector function"
        );
        Ok(VectorFunction {
            variables,
            components,
        })
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn components(&self) -> &[Expr] {
        &self.components
    }

    /// Evaluate at `point` in the mode [`Mode::select`] prefers for this shape.
    pub fn evaluate<F: Float>(&self, point: &[F]) -> Result<Evaluation<F>> {
        self.evaluate_with(point, Mode::select(self.variables.len(), self.components.len()))
    }

    pub fn evaluate_with<F: Float>(&self, point: &[F], mode: Mode) -> Result<Evaluation<F>> {
        if point.len() != self.variables.len() {
            return Err(AdError::type_mismatch(
                format!("{} coordinates", self.variables.len()),
                point.len().to_string(),
            ));
        }
        let (values, jacobian) = match mode {
            Mode::Forward => self.forward(point)?,
            Mode::Reverse => self.reverse(point)?,
        };
        tracing::debug!(?mode, outputs = values.len(), "evaluated vector function");
        Ok(Evaluation {
            mode,
            variables: self.variables.clone(),
            values,
            jacobian,
        })
    }

    /// One pass per variable, seeding that variable's tangent with 1.
    fn forward<F: Float>(&self, point: &[F]) -> Result<(Vec<F>, Vec<Vec<F>>)> {
        let n = point.len();
        let mut values = vec![F::zero(); self.components.len()];
        let mut jacobian = vec![vec![F::zero(); n]; self.components.len()];

        // With no variables there is nothing to seed, but values still need a pass.
        for seed in 0..n.max(1) {
            let inputs: Vec<Dual<F>> = point
                .iter()
                .enumerate()
                .map(|(k, &xk)| {
                    if k == seed {
                        Dual::variable(xk)
                    } else {
                        Dual::constant(xk)
                    }
                })
                .collect();
            for (i, expr) in self.components.iter().enumerate() {
                match eval::evaluate(expr, &inputs)? {
                    Operand::Constant(c) => values[i] = c,
                    Operand::Active(d) => {
                        values[i] = d.re;
                        if seed < n {
                            jacobian[i][seed] = d.deriv();
                        }
                    }
                }
            }
        }
        Ok((values, jacobian))
    }

    /// One graph for all components, one reverse sweep per component.
    fn reverse<F: Float>(&self, point: &[F]) -> Result<(Vec<F>, Vec<Vec<F>>)> {
        let graph = Graph::new();
        let inputs: Vec<Node<'_, F>> = point.iter().map(|&x| graph.variable(x)).collect();

        let mut outputs = Vec::with_capacity(self.components.len());
        for expr in &self.components {
            // a constant component becomes a leaf that no input reaches
            outputs.push(match eval::evaluate(expr, &inputs)? {
                Operand::Constant(c) => graph.constant(c),
                Operand::Active(node) => node,
            });
        }
        let outputs = NodeVector::new(outputs);

        let values = outputs.values();
        let jacobian = outputs.reverse().matrix(&inputs);
        Ok((values, jacobian))
    }
}

/// Values and Jacobian of a [`VectorFunction`] at one point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation<F> {
    pub mode: Mode,
    pub variables: Vec<String>,
    pub values: Vec<F>,
    /// `jacobian[i][k] = ∂fᵢ/∂xₖ`.
    pub jacobian: Vec<Vec<F>>,
}

impl<F: Float> Evaluation<F> {
    pub fn value(&self, index: usize) -> Result<F> {
        self.values
            .get(index)
            .copied()
            .ok_or(AdError::ComponentOutOfRange {
                index,
                len: self.values.len(),
            })
    }

    /// Gradient row of component `index`.
    pub fn gradient(&self, index: usize) -> Result<&[F]> {
        self.jacobian
            .get(index)
            .map(Vec::as_slice)
            .ok_or(AdError::ComponentOutOfRange {
                index,
                len: self.jacobian.len(),
            })
    }

    /// ∂fᵢ/∂`name`.
    pub fn partial(&self, index: usize, name: &str) -> Result<F> {
        let k = self
            .variables
            .iter()
            .position(|v| v == name)
            .ok_or_else(|| AdError::UnknownVariable(name.to_string()))?;
        Ok(self.gradient(index)?[k])
    }
}
