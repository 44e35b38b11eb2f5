//! expression::calculus — symbolic derivative and antiderivative.
//!
//! Purpose
//! -------
//! Differentiate and integrate a canonical [`Form`] with respect to the main
//! variable, so a compiled function can be replaced by its derivative or
//! antiderivative without leaving the expression language.
//!
//! Key behaviors
//! -------------
//! - [`derivative`] applies sum, product, power and chain rules with a
//!   table of outer derivatives for every namespace function that has one.
//! - [`antiderivative`] is rule-based: constants, linearity, powers of
//!   linear forms, exponentials with linear exponents, elementary functions
//!   of linear arguments, and expansion of products or integer powers of
//!   sums. The constant of integration is omitted.
//!
//! Invariants & assumptions
//! ------------------------
//! - A function of the main variable without a closed-form result
//!   (`abs`, `re`, `im`, `conjugate`, `arg`, `digamma`, `zeta`, `eta` for
//!   differentiation; anything outside the rules above for integration)
//!   yields [`ExprError::NoClosedForm`] rather than an unevaluable result.
//! - Subexpressions free of the main variable are treated as constants and
//!   never inspected.
use std::f64::consts::PI;

use super::{
    algebra::Form,
    ast::Func,
    errors::{ExprError, ExprResult},
};

fn num(v: f64) -> Form {
    Form::Num(v)
}

fn no_closed_form(operation: &'static str, detail: String) -> ExprError {
    ExprError::NoClosedForm { operation, detail }
}

fn square(f: &Form) -> Form {
    Form::pow(f.clone(), num(2.0))
}

fn one_minus_square(x: &Form) -> Form {
    Form::add(vec![num(1.0), Form::neg(square(x))])
}

/// `d/dx func(x)` as a function of `x`, or `None` when no closed form exists.
fn outer_derivative(func: Func, x: &Form) -> Option<Form> {
    let call = |f: Func| Form::call(f, x.clone());
    let d = match func {
        Func::Sin => call(Func::Cos),
        Func::Cos => Form::neg(call(Func::Sin)),
        Func::Tan => Form::add(vec![num(1.0), square(&call(Func::Tan))]),
        Func::Cot => Form::neg(Form::add(vec![num(1.0), square(&call(Func::Cot))])),
        Func::Sec => Form::mul(vec![call(Func::Sec), call(Func::Tan)]),
        Func::Csc => Form::neg(Form::mul(vec![call(Func::Csc), call(Func::Cot)])),
        Func::Asin => Form::pow(one_minus_square(x), num(-0.5)),
        Func::Acos => Form::neg(Form::pow(one_minus_square(x), num(-0.5))),
        Func::Atan => Form::recip(Form::add(vec![num(1.0), square(x)])),
        Func::Sinh => call(Func::Cosh),
        Func::Cosh => call(Func::Sinh),
        Func::Tanh => Form::add(vec![num(1.0), Form::neg(square(&call(Func::Tanh)))]),
        Func::Asinh => Form::pow(Form::add(vec![square(x), num(1.0)]), num(-0.5)),
        Func::Acosh => Form::pow(Form::add(vec![square(x), num(-1.0)]), num(-0.5)),
        Func::Atanh => Form::recip(one_minus_square(x)),
        Func::Exp => call(Func::Exp),
        Func::Log => Form::recip(x.clone()),
        Func::Sqrt => Form::mul(vec![num(0.5), Form::pow(x.clone(), num(-0.5))]),
        Func::Gamma => Form::mul(vec![call(Func::Gamma), call(Func::Digamma)]),
        Func::Erf => Form::mul(vec![
            num(2.0 / PI.sqrt()),
            Form::call(Func::Exp, Form::neg(square(x))),
        ]),
        Func::LambertW => {
            let w = call(Func::LambertW);
            Form::mul(vec![
                w.clone(),
                Form::recip(x.clone()),
                Form::recip(Form::add(vec![w, num(1.0)])),
            ])
        }
        Func::Sinc => Form::add(vec![
            Form::mul(vec![call(Func::Cos), Form::recip(x.clone())]),
            Form::neg(Form::mul(vec![call(Func::Sin), Form::pow(x.clone(), num(-2.0))])),
        ]),
        Func::Abs
        | Func::Re
        | Func::Im
        | Func::Conjugate
        | Func::Arg
        | Func::Digamma
        | Func::Zeta
        | Func::Eta => return None,
    };
    Some(d)
}

/// Derivative of `form` with respect to the symbol `var`.
pub fn derivative(form: &Form, var: &str) -> ExprResult<Form> {
    if !form.has_symbol(var) {
        return Ok(num(0.0));
    }
    match form {
        Form::Num(_) | Form::Const(_) => Ok(num(0.0)),
        Form::Sym(_) => Ok(num(1.0)),
        Form::Add(terms) => {
            let parts = terms.iter().map(|t| derivative(t, var)).collect::<ExprResult<Vec<_>>>()?;
            Ok(Form::add(parts))
        }
        Form::Mul(factors) => {
            let mut parts = Vec::with_capacity(factors.len());
            for (i, f) in factors.iter().enumerate() {
                if !f.has_symbol(var) {
                    continue;
                }
                let mut product = factors.clone();
                product[i] = derivative(f, var)?;
                parts.push(Form::mul(product));
            }
            Ok(Form::add(parts))
        }
        Form::Pow(b, e) => {
            let (b, e) = (b.as_ref(), e.as_ref());
            if !e.has_symbol(var) {
                // e·b^(e-1)·b'
                return Ok(Form::mul(vec![
                    e.clone(),
                    Form::pow(b.clone(), Form::add(vec![e.clone(), num(-1.0)])),
                    derivative(b, var)?,
                ]));
            }
            // b^e·(e'·ln b + e·b'/b)
            let log_b = Form::call(Func::Log, b.clone());
            Ok(Form::mul(vec![
                form.clone(),
                Form::add(vec![
                    Form::mul(vec![derivative(e, var)?, log_b]),
                    Form::mul(vec![e.clone(), derivative(b, var)?, Form::recip(b.clone())]),
                ]),
            ]))
        }
        Form::Call(func, arg) => {
            let outer = outer_derivative(*func, arg).ok_or_else(|| {
                no_closed_form("derivative", format!("{}({arg}) is not differentiable symbolically", func.name()))
            })?;
            Ok(Form::mul(vec![outer, derivative(arg, var)?]))
        }
    }
}

/// Slope of `x` in `var` when `x` is linear in it (`d x / d var` is a
/// nonzero constant).
fn linear_slope(x: &Form, var: &str) -> Option<Form> {
    let d = derivative(x, var).ok()?;
    if d.has_symbol(var) || d == num(0.0) {
        None
    } else {
        Some(d)
    }
}

/// Antiderivative of `func(x)` in `x`, before dividing by the slope.
fn outer_antiderivative(func: Func, x: &Form) -> Option<Form> {
    let call = |f: Func| Form::call(f, x.clone());
    let log = |f: Form| Form::call(Func::Log, f);
    let sqrt_one_minus_square = || Form::pow(one_minus_square(x), num(0.5));
    let anti = match func {
        Func::Sin => Form::neg(call(Func::Cos)),
        Func::Cos => call(Func::Sin),
        Func::Tan => Form::neg(log(call(Func::Cos))),
        Func::Cot => log(call(Func::Sin)),
        Func::Sec => log(Form::add(vec![call(Func::Sec), call(Func::Tan)])),
        Func::Csc => Form::neg(log(Form::add(vec![call(Func::Csc), call(Func::Cot)]))),
        Func::Sinh => call(Func::Cosh),
        Func::Cosh => call(Func::Sinh),
        Func::Tanh => log(call(Func::Cosh)),
        Func::Exp => call(Func::Exp),
        Func::Log => Form::add(vec![Form::mul(vec![x.clone(), call(Func::Log)]), Form::neg(x.clone())]),
        Func::Asin => Form::add(vec![Form::mul(vec![x.clone(), call(Func::Asin)]), sqrt_one_minus_square()]),
        Func::Acos => Form::add(vec![
            Form::mul(vec![x.clone(), call(Func::Acos)]),
            Form::neg(sqrt_one_minus_square()),
        ]),
        Func::Atan => Form::add(vec![
            Form::mul(vec![x.clone(), call(Func::Atan)]),
            Form::mul(vec![num(-0.5), log(Form::add(vec![square(x), num(1.0)]))]),
        ]),
        Func::Erf => Form::add(vec![
            Form::mul(vec![x.clone(), call(Func::Erf)]),
            Form::mul(vec![num(1.0 / PI.sqrt()), Form::call(Func::Exp, Form::neg(square(x)))]),
        ]),
        _ => return None,
    };
    Some(anti)
}

/// Antiderivative of `form` with respect to the symbol `var`.
pub fn antiderivative(form: &Form, var: &str) -> ExprResult<Form> {
    let unsupported = || no_closed_form("antiderivative", format!("cannot integrate {form}"));

    if !form.has_symbol(var) {
        return Ok(Form::mul(vec![form.clone(), Form::sym(var)]));
    }
    match form {
        Form::Sym(_) => Ok(Form::mul(vec![num(0.5), Form::pow(form.clone(), num(2.0))])),
        Form::Add(terms) => {
            let parts = terms.iter().map(|t| antiderivative(t, var)).collect::<ExprResult<Vec<_>>>()?;
            Ok(Form::add(parts))
        }
        Form::Mul(factors) => {
            let (constant, dependent): (Vec<Form>, Vec<Form>) =
                factors.iter().cloned().partition(|f| !f.has_symbol(var));
            if !constant.is_empty() {
                let mut out = constant;
                out.push(antiderivative(&Form::mul(dependent), var)?);
                return Ok(Form::mul(out));
            }
            match form.expand() {
                expanded @ Form::Add(_) => antiderivative(&expanded, var),
                _ => Err(unsupported()),
            }
        }
        Form::Pow(b, e) => {
            let (b, e) = (b.as_ref(), e.as_ref());
            if !e.has_symbol(var) {
                if let Some(k) = linear_slope(b, var) {
                    let inv_k = Form::recip(k);
                    if *e == num(-1.0) {
                        return Ok(Form::mul(vec![inv_k, Form::call(Func::Log, b.clone())]));
                    }
                    let e1 = Form::add(vec![e.clone(), num(1.0)]);
                    return Ok(Form::mul(vec![inv_k, Form::recip(e1.clone()), Form::pow(b.clone(), e1)]));
                }
                if let Form::Add(_) = b {
                    if let Form::Num(n) = e {
                        if *n > 0.0 && n.fract() == 0.0 {
                            return antiderivative(&form.expand(), var);
                        }
                    }
                }
                return Err(unsupported());
            }
            if !b.has_symbol(var) {
                if let Some(k) = linear_slope(e, var) {
                    // b^e / (ln b · k)
                    return Ok(Form::mul(vec![
                        form.clone(),
                        Form::recip(Form::call(Func::Log, b.clone())),
                        Form::recip(k),
                    ]));
                }
            }
            Err(unsupported())
        }
        Form::Call(func, arg) => {
            let k = linear_slope(arg, var).ok_or_else(unsupported)?;
            let anti = outer_antiderivative(*func, arg).ok_or_else(unsupported)?;
            Ok(Form::mul(vec![anti, Form::recip(k)]))
        }
        Form::Num(_) | Form::Const(_) => Err(unsupported()),
    }
}
