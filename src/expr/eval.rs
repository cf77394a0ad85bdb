//! Tree interpreter over any [`Scalar`].
//!
//! Operands are either plain constants or active AD values. Constant
//! sub-expressions are folded as plain floats; a constant meets an active
//! value only through [`Scalar::lift`], chosen by matching on both shapes
//! before the operation runs.

use num_traits::{Float as NumFloat, ToPrimitive};

use super::{BinaryOp, Builtin, Expr};
use crate::error::{AdError, Result};
use crate::float::Float;
use crate::scalar::Scalar;

/// A value produced while interpreting an expression.
#[derive(Clone, Copy, Debug)]
pub enum Operand<T: Scalar> {
    /// No dependence on any variable.
    Constant(T::Float),
    /// Carries derivative information.
    Active(T),
}

impl<T: Scalar> Operand<T> {
    pub fn value(&self) -> T::Float {
        match self {
            Operand::Constant(c) => *c,
            Operand::Active(t) => t.value(),
        }
    }

    /// The active value, lifting a constant next to `like`.
    pub fn into_active(self, like: &T) -> T {
        match self {
            Operand::Constant(c) => like.lift(c),
            Operand::Active(t) => t,
        }
    }
}

/// Evaluate `expr` with variable `i` bound to `inputs[i]`.
///
/// A variable index past the end of `inputs` is a type error.
pub fn evaluate<T: Scalar>(expr: &Expr, inputs: &[T]) -> Result<Operand<T>> {
    match expr {
        Expr::Number(n) => Ok(Operand::Constant(<T::Float as Float>::from_literal(*n)?)),
        Expr::Variable(i) => inputs.get(*i).copied().map(Operand::Active).ok_or_else(|| {
            AdError::type_mismatch(
                format!("a value for variable {i}"),
                format!("{} inputs", inputs.len()),
            )
        }),
        Expr::Neg(operand) => Ok(match evaluate(operand, inputs)? {
            Operand::Constant(c) => Operand::Constant(-c),
            Operand::Active(t) => Operand::Active(-t),
        }),
        Expr::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs, inputs)?;
            let rhs = evaluate(rhs, inputs)?;
            binary(*op, lhs, rhs)
        }
        Expr::Call { func, args } => {
            let operands = args
                .iter()
                .map(|a| evaluate(a, inputs))
                .collect::<Result<Vec<_>>>()?;
            match (*func, operands.as_slice()) {
                (Builtin::Log, &[arg, base]) => log_base(arg, base),
                (func, &[Operand::Constant(c)]) => builtin(func, c).map(Operand::Constant),
                (func, &[Operand::Active(t)]) => builtin(func, t).map(Operand::Active),
                (func, _) => Err(AdError::Parse {
                    message: format!("{} called with {} argument(s)", func.name(), args.len()),
                    position: 0,
                }),
            }
        }
    }
}

fn binary<T: Scalar>(op: BinaryOp, lhs: Operand<T>, rhs: Operand<T>) -> Result<Operand<T>> {
    match (lhs, rhs) {
        (Operand::Constant(a), Operand::Constant(b)) => apply(op, a, b).map(Operand::Constant),
        (Operand::Active(a), Operand::Constant(b)) => match integer_exponent(op, b) {
            Some(n) => Ok(Operand::Active(a.powi(n))),
            None => apply(op, a, a.lift(b)).map(Operand::Active),
        },
        (Operand::Constant(a), Operand::Active(b)) => apply(op, b.lift(a), b).map(Operand::Active),
        (Operand::Active(a), Operand::Active(b)) => apply(op, a, b).map(Operand::Active),
    }
}

/// `x ** n` with a constant integral `n` lowers to `powi`, which accepts a
/// negative base in both modes.
fn integer_exponent<F: Float>(op: BinaryOp, exponent: F) -> Option<i32> {
    if op != BinaryOp::Pow || NumFloat::fract(exponent) != F::zero() {
        return None;
    }
    ToPrimitive::to_i32(&exponent)
}

fn apply<S: Scalar>(op: BinaryOp, a: S, b: S) -> Result<S> {
    match op {
        BinaryOp::Add => Ok(a + b),
        BinaryOp::Sub => Ok(a - b),
        BinaryOp::Mul => Ok(a * b),
        BinaryOp::Div => a.try_div(b),
        BinaryOp::Pow => a.pow(b),
    }
}

fn builtin<S: Scalar>(func: Builtin, x: S) -> Result<S> {
    match func {
        Builtin::Sin => Ok(x.sin()),
        Builtin::Cos => Ok(x.cos()),
        Builtin::Tan => x.tan(),
        Builtin::Exp => Ok(x.exp()),
        Builtin::Log => x.ln(),
        Builtin::Sqrt => x.sqrt(),
        Builtin::Asin => x.asin(),
        Builtin::Acos => x.acos(),
        Builtin::Atan => Ok(x.atan()),
        Builtin::Sinh => Ok(x.sinh()),
        Builtin::Cosh => Ok(x.cosh()),
        Builtin::Tanh => Ok(x.tanh()),
        Builtin::Logistic => Ok(x.logistic()),
    }
}

/// `log(x, base)`. A constant base uses the closed form; an active base
/// falls back to `ln(x) / ln(base)`.
fn log_base<T: Scalar>(arg: Operand<T>, base: Operand<T>) -> Result<Operand<T>> {
    match (arg, base) {
        (Operand::Constant(x), Operand::Constant(b)) => Scalar::log(x, b).map(Operand::Constant),
        (Operand::Active(x), Operand::Constant(b)) => Scalar::log(x, b).map(Operand::Active),
        (arg, Operand::Active(b)) => {
            let x = arg.into_active(&b);
            x.ln()?.try_div(b.ln()?).map(Operand::Active)
        }
    }
}
