#![allow(dead_code)]

use chainrule::{Float, Result, Scalar};

fn c<T: Scalar>(like: &T, v: f64) -> T {
    like.lift(<T::Float as Float>::from_literal(v).unwrap())
}

// ─── Rosenbrock ────────────────────────────────────────────────────────────

pub fn rosenbrock<T: Scalar>(x: &[T]) -> Result<T> {
    let mut sum = c(&x[0], 0.0);
    for i in 0..x.len() - 1 {
        let t1 = c(&x[i], 1.0) - x[i];
        let t2 = x[i + 1] - x[i] * x[i];
        sum = sum + t1 * t1 + c(&x[i], 100.0) * t2 * t2;
    }
    Ok(sum)
}

pub fn rosenbrock_f64(x: &[f64]) -> f64 {
    let mut sum = 0.0;
    for i in 0..x.len() - 1 {
        let t1 = 1.0 - x[i];
        let t2 = x[i + 1] - x[i] * x[i];
        sum += t1 * t1 + 100.0 * t2 * t2;
    }
    sum
}

// ─── Rastrigin ─────────────────────────────────────────────────────────────
// f(x) = 10n + Σ[x_i² - 10·cos(2π·x_i)]

pub fn rastrigin<T: Scalar>(x: &[T]) -> Result<T> {
    let two_pi = c(&x[0], 2.0 * std::f64::consts::PI);
    let ten = c(&x[0], 10.0);
    let mut sum = c(&x[0], 10.0 * x.len() as f64);
    for &xi in x {
        sum = sum + xi * xi - ten * (two_pi * xi).cos();
    }
    Ok(sum)
}

// ─── Layered diamond ───────────────────────────────────────────────────────
// Every layer uses the previous node twice, so the number of paths from the
// output back to the input doubles per layer.

pub fn diamond<T: Scalar>(x: &[T], layers: usize) -> Result<T> {
    let mut v = x[0];
    for _ in 0..layers {
        let s = v.sin();
        let q = v * c(&v, 0.5);
        v = s + q;
    }
    Ok(v)
}

pub fn finite_diff_gradient(f: fn(&[f64]) -> f64, x: &[f64], h: f64) -> Vec<f64> {
    let n = x.len();
    let mut grad = vec![0.0; n];
    for i in 0..n {
        let mut xp = x.to_vec();
        let mut xm = x.to_vec();
        xp[i] += h;
        xm[i] -= h;
        grad[i] = (f(&xp) - f(&xm)) / (2.0 * h);
    }
    grad
}

pub fn make_input(n: usize) -> Vec<f64> {
    (0..n).map(|i| 0.5 + 0.01 * i as f64).collect()
}
