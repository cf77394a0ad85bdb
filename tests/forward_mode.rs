use approx::assert_relative_eq;
use chainrule::{Dual, Dual32, Dual64};

/// Central finite difference: (f(x+h) - f(x-h)) / 2h
fn finite_diff(f: impl Fn(f64) -> f64, x: f64) -> f64 {
    let h = 1e-7;
    (f(x + h) - f(x - h)) / (2.0 * h)
}

/// Test a dual elemental against finite differences.
fn check_elemental(
    f_dual: impl Fn(Dual64) -> Dual64,
    f_f64: impl Fn(f64) -> f64,
    x: f64,
    tol: f64,
) {
    let d = f_dual(Dual::variable(x));
    let expected_deriv = finite_diff(&f_f64, x);
    assert_relative_eq!(d.re, f_f64(x), max_relative = 1e-12);
    assert_relative_eq!(d.deriv(), expected_deriv, max_relative = tol);
}

// ── Scenarios ──

#[test]
fn affine_sine_at_zero() {
    let x = Dual64::new(0.0, [1.0]);
    let y = 2.0 * x.sin() + 3.0;
    assert_eq!(y.re, 3.0);
    assert_eq!(y.deriv(), 2.0);
}

#[test]
fn polynomial_at_one() {
    let x = Dual64::new(1.0, [1.0]);
    let y = 10.0 * x.powi(3) + 3.0 * x.powi(5);
    assert_relative_eq!(y.re, 13.0);
    assert_relative_eq!(y.deriv(), 45.0);

    // the same through the general power rule
    let y = 10.0 * x.powf(3.0) + 3.0 * x.powf(5.0);
    assert_relative_eq!(y.re, 13.0, max_relative = 1e-12);
    assert_relative_eq!(y.deriv(), 45.0, max_relative = 1e-12);
}

#[test]
fn seeded_derivative_scales_result() {
    let x = Dual64::new(0.5, [3.0]);
    let y = x.exp();
    assert_relative_eq!(y.deriv(), 3.0 * 0.5_f64.exp(), max_relative = 1e-12);
}

// ── Arithmetic ──

#[test]
fn sum_rule() {
    let a = Dual64::new(3.0, [1.0]);
    let b = Dual64::new(4.0, [2.0]);
    let c = a + b;
    assert_relative_eq!(c.re, 7.0);
    assert_relative_eq!(c.deriv(), 3.0);
}

#[test]
fn difference_rule() {
    let a = Dual64::new(3.0, [1.0]);
    let b = Dual64::new(4.0, [2.0]);
    let c = a - b;
    assert_relative_eq!(c.re, -1.0);
    assert_relative_eq!(c.deriv(), -1.0);
}

#[test]
fn product_rule() {
    // (3 + ε)(4 + ε) = 12 + 7ε
    let a = Dual64::new(3.0, [1.0]);
    let b = Dual64::new(4.0, [1.0]);
    let c = a * b;
    assert_relative_eq!(c.re, 12.0);
    assert_relative_eq!(c.deriv(), 7.0);
}

#[test]
fn quotient_rule() {
    // d/dx (x / (x+1)) at x=2: 1/(x+1)^2 = 1/9
    let x = Dual::variable(2.0);
    let one = Dual::constant(1.0);
    let y = x / (x + one);
    assert_relative_eq!(y.re, 2.0 / 3.0, max_relative = 1e-12);
    assert_relative_eq!(y.deriv(), 1.0 / 9.0, max_relative = 1e-12);
}

#[test]
fn negation() {
    let y = -Dual::variable(2.0);
    assert_relative_eq!(y.re, -2.0);
    assert_relative_eq!(y.deriv(), -1.0);
}

#[test]
fn mixed_scalar_ops() {
    let x = Dual::<f64>::variable(3.0);
    let y = x * 2.0;
    assert_relative_eq!(y.re, 6.0);
    assert_relative_eq!(y.deriv(), 2.0);

    let z = 2.0 * x;
    assert_relative_eq!(z.re, 6.0);
    assert_relative_eq!(z.deriv(), 2.0);

    let w = 1.0 / x;
    assert_relative_eq!(w.re, 1.0 / 3.0, max_relative = 1e-12);
    assert_relative_eq!(w.deriv(), -1.0 / 9.0, max_relative = 1e-12);

    let v = 10.0 - x;
    assert_relative_eq!(v.re, 7.0);
    assert_relative_eq!(v.deriv(), -1.0);
}

#[test]
fn assign_ops() {
    let mut x = Dual::<f64>::variable(2.0);
    x += 1.0;
    x *= Dual::variable(2.0);
    x -= 1.0;
    x /= 2.0;
    // ((x + 1) * x - 1) / 2 at x = 2 → value 2.5, derivative (2x + 1) / 2
    assert_relative_eq!(x.re, 2.5);
    assert_relative_eq!(x.deriv(), 2.5);
}

#[test]
fn try_div_by_zero_is_domain_error() {
    let x = Dual::<f64>::variable(1.0);
    let err = x.try_div(Dual::constant(0.0)).unwrap_err();
    assert!(err.is_domain_error());
}

#[test]
#[should_panic(expected = "division by zero")]
fn div_operator_panics_on_zero() {
    let x = Dual::<f64>::variable(1.0);
    let _ = x / 0.0;
}

// ── Powers ──

#[test]
fn sqrt() {
    check_elemental(|x| x.sqrt().unwrap(), f64::sqrt, 4.0, 1e-5);
}

#[test]
fn powi() {
    check_elemental(|x| x.powi(3), |x| x.powi(3), 2.0, 1e-5);
}

#[test]
fn powf() {
    let x = Dual::variable(2.0);
    let y = x.powf(3.5);
    let expected = finite_diff(|v| v.powf(3.5), 2.0);
    assert_relative_eq!(y.re, 2.0_f64.powf(3.5), max_relative = 1e-12);
    assert_relative_eq!(y.deriv(), expected, max_relative = 1e-5);
}

#[test]
fn powf_negative_base_with_constant_exponent() {
    let y = Dual::<f64>::variable(-2.0).powf(2.0);
    assert_relative_eq!(y.re, 4.0);
    assert_relative_eq!(y.deriv(), -4.0);

    // a constant dual exponent takes the same path
    let y = Dual::<f64>::variable(-2.0)
        .pow(Dual::constant(3.0))
        .unwrap();
    assert_relative_eq!(y.re, -8.0);
    assert_relative_eq!(y.deriv(), 12.0);
}

#[test]
fn pow_both_active() {
    // d/dx x^x = x^x (ln x + 1)
    let x = Dual::<f64>::variable(1.5);
    let y = x.pow(x).unwrap();
    let expected = finite_diff(|v| v.powf(v), 1.5);
    assert_relative_eq!(y.re, 1.5_f64.powf(1.5), max_relative = 1e-12);
    assert_relative_eq!(y.deriv(), expected, max_relative = 1e-5);
}

#[test]
fn pow_negative_base_active_exponent_is_domain_error() {
    let base = Dual::<f64>::constant(-2.0);
    let err = base.pow(Dual::variable(2.0)).unwrap_err();
    assert!(err.is_domain_error());
}

#[test]
fn pow_zero_base_drops_log_term() {
    let y = Dual::<f64>::constant(0.0).pow(Dual::variable(2.0)).unwrap();
    assert_eq!(y.re, 0.0);
    assert_eq!(y.deriv(), 0.0);
}

#[test]
fn zero_base_with_fractional_exponent_has_zero_derivative() {
    // the base partial y·0^(y-1) is infinite, but the base carries no tangent
    let y = Dual64::constant(0.0).pow(Dual64::variable(0.5)).unwrap();
    assert_eq!(y.re, 0.0);
    assert_eq!(y.deriv(), 0.0);
}

#[test]
fn infinite_partial_leaves_inactive_lanes_at_zero() {
    let s = Dual64::constant(0.0).sqrt().unwrap();
    assert_eq!(s.deriv(), 0.0);
    assert_eq!(Dual64::constant(0.0).powf(0.5).deriv(), 0.0);

    let x = Dual::<f64, 2>::with_tangent(0.0, 0);
    let s = x.sqrt().unwrap();
    assert!(s.eps[0].is_infinite());
    assert_eq!(s.eps[1], 0.0);

    // x0 · sqrt(x1) at (2, 0): ∂/∂x0 = sqrt(0) = 0
    let x0 = Dual::<f64, 2>::with_tangent(2.0, 0);
    let x1 = Dual::<f64, 2>::with_tangent(0.0, 1);
    let y = x0 * x1.sqrt().unwrap();
    assert_eq!(y.eps[0], 0.0);
    assert!(y.eps[1].is_infinite());
}

#[test]
fn scalar_base_power() {
    // d/dx 3^x = 3^x ln 3
    let x = Dual::<f64>::variable(2.0);
    let y = Dual::scalar_pow(3.0, x).unwrap();
    assert_relative_eq!(y.re, 9.0, max_relative = 1e-12);
    assert_relative_eq!(y.deriv(), 9.0 * 3.0_f64.ln(), max_relative = 1e-12);
}

// ── Exp/Log ──

#[test]
fn exp() {
    for &x in &[-1.0_f64, 0.0, 0.7, 2.0] {
        let d = Dual::<f64>::variable(x).exp();
        assert_relative_eq!(d.deriv(), x.exp(), max_relative = 1e-12);
    }
}

#[test]
fn ln() {
    for &x in &[0.1_f64, 1.0, 2.0, 10.0] {
        let d = Dual::<f64>::variable(x).ln().unwrap();
        assert_relative_eq!(d.deriv(), 1.0 / x, max_relative = 1e-12);
    }
}

#[test]
fn log_with_base() {
    check_elemental(|x| x.log(2.0).unwrap(), f64::log2, 3.0, 1e-5);
    check_elemental(|x| x.log(10.0).unwrap(), f64::log10, 3.0, 1e-5);
}

#[test]
fn log_rejects_non_positive() {
    assert!(Dual64::variable(0.0).ln().unwrap_err().is_domain_error());
    assert!(Dual64::variable(-1.0).log(2.0).unwrap_err().is_domain_error());
    assert!(Dual64::variable(2.0).log(1.0).unwrap_err().is_domain_error());
}

#[test]
fn logistic() {
    let s = Dual64::variable(0.0).logistic();
    assert_relative_eq!(s.re, 0.5);
    assert_relative_eq!(s.deriv(), 0.25);
    check_elemental(
        |x| x.logistic(),
        |x| 1.0 / (1.0 + (-x).exp()),
        1.3,
        1e-5,
    );
}

// ── Trig ──

#[test]
fn sin_cos_derivatives() {
    for &x in &[-2.0_f64, 0.0, 0.3, 1.0, 4.0] {
        let s = Dual::<f64>::variable(x).sin();
        let c = Dual::<f64>::variable(x).cos();
        assert_relative_eq!(s.deriv(), x.cos(), max_relative = 1e-12);
        assert_relative_eq!(c.deriv(), -x.sin(), max_relative = 1e-12);
    }
}

#[test]
fn tan() {
    check_elemental(|x| x.tan().unwrap(), f64::tan, 0.5, 1e-5);
}

#[test]
fn tan_at_pole_is_domain_error() {
    let x = Dual64::variable(std::f64::consts::FRAC_PI_2 + std::f64::consts::PI);
    assert!(x.tan().unwrap_err().is_domain_error());
    assert!(Dual64::variable(std::f64::consts::FRAC_PI_2)
        .tan()
        .is_err());
}

#[test]
fn asin() {
    check_elemental(|x| x.asin().unwrap(), f64::asin, 0.5, 1e-5);
}

#[test]
fn acos() {
    check_elemental(|x| x.acos().unwrap(), f64::acos, 0.5, 1e-5);
}

#[test]
fn acos_outside_unit_interval_is_domain_error() {
    let err = Dual64::new(-3.0, [1.0]).acos().unwrap_err();
    assert!(err.is_domain_error());
    assert!(Dual64::variable(1.5).asin().is_err());
}

#[test]
fn atan() {
    check_elemental(|x| x.atan(), f64::atan, 1.0, 1e-5);
}

// ── Hyperbolic ──

#[test]
fn sinh() {
    check_elemental(|x| x.sinh(), f64::sinh, 1.0, 1e-5);
}

#[test]
fn cosh() {
    check_elemental(|x| x.cosh(), f64::cosh, 1.0, 1e-5);
}

#[test]
fn tanh() {
    check_elemental(|x| x.tanh(), f64::tanh, 1.0, 1e-5);
}

// ── Compositions ──

#[test]
fn sin_of_exp() {
    check_elemental(|x| x.exp().sin(), |x| x.exp().sin(), 0.5, 1e-5);
}

#[test]
fn nested_chain() {
    // f(x) = sqrt(1 + tanh(x)^2) · ln(2 + cos x)
    let f = |x: f64| (1.0 + x.tanh().powi(2)).sqrt() * (2.0 + x.cos()).ln();
    let fd = |x: Dual64| {
        (1.0 + x.tanh().powi(2)).sqrt().unwrap() * (2.0 + x.cos()).ln().unwrap()
    };
    check_elemental(fd, f, 0.8, 1e-5);
}

// ── Multiple tangents ──

#[test]
fn two_lane_gradient() {
    // f(x, y) = x² y + sin(y)
    let x = Dual::<f64, 2>::with_tangent(1.5, 0);
    let y = Dual::<f64, 2>::with_tangent(-0.5, 1);
    let f = x * x * y + y.sin();
    let [dx, dy] = f.derivative();
    assert_relative_eq!(dx, 2.0 * 1.5 * -0.5, max_relative = 1e-12);
    assert_relative_eq!(dy, 1.5 * 1.5 + (-0.5_f64).cos(), max_relative = 1e-12);
}

#[test]
fn constant_has_no_derivative() {
    let c = Dual::<f64, 3>::constant(4.0);
    assert!(c.is_constant());
    assert!(!Dual::<f64, 3>::with_tangent(4.0, 2).is_constant());
}

// ── Equality ──

#[test]
fn equality_compares_value_and_derivative() {
    let a = Dual64::new(2.0, [1.0]);
    let b = Dual64::new(2.0, [1.0]);
    let c = Dual64::new(2.0, [0.5]);
    assert_eq!(a, a);
    assert_eq!(a, b);
    assert_eq!(b, a);
    assert_ne!(a, c);
    assert_ne!(a, Dual64::new(2.5, [1.0]));
}

#[test]
fn equality_with_plain_scalar_is_false() {
    // no promotion: even a matching constant compares unequal
    assert!(Dual64::constant(2.0) != 2.0);
    assert!(2.0_f64 != Dual64::constant(2.0));
    assert!(Dual64::variable(2.0) != 2.0);
    assert!(Dual32::constant(0.0) != 0.0_f32);
    // between duals, value and derivative still decide
    assert_eq!(Dual64::constant(2.0), Dual64::new(2.0, [0.0]));
}

#[test]
fn display() {
    assert_eq!(Dual64::new(1.5, [2.0]).to_string(), "1.5 + 2ε0");
}

// ── Determinism ──

#[test]
fn repeated_evaluation_is_bit_identical() {
    let run = || {
        let x = Dual64::variable(0.37);
        (x.sin() * x.exp() + x.powi(3)).atan()
    };
    let a = run();
    let b = run();
    assert_eq!(a.re.to_bits(), b.re.to_bits());
    assert_eq!(a.deriv().to_bits(), b.deriv().to_bits());
}

// ── f32 ──

#[test]
fn f32_duals() {
    let x = Dual::<f32>::variable(2.0);
    let y = x * x + 1.0;
    assert_relative_eq!(y.re, 5.0_f32);
    assert_relative_eq!(y.deriv(), 4.0_f32);
}
