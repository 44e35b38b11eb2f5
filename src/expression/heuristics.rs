//! expression::heuristics — slider defaults for expression parameters.
//!
//! Purpose
//! -------
//! Decide whether a parameter acts as a multiplicative scale of the main
//! variable (natural default `1.0`) or as something else, such as an offset
//! (natural default `0.0`).
//!
//! Key behaviors
//! -------------
//! - [`multiplies_var`] expands the expression, then for every operand `t`
//!   containing the main variable checks each sibling operand `f` that is the
//!   parameter itself or a power involving it; if the product `t·f` occurs
//!   in the expanded expression the answer is `true`.
//! - Otherwise it recurses (re-expanding) into every such `t` other than the
//!   bare main variable.
//!
//! Invariants & assumptions
//! ------------------------
//! - Occurrence uses [`Form::contains`], where a product pattern matches any
//!   product holding all of its factors.
//! - The boundary behavior is pinned by regression cases; changing it moves
//!   slider defaults for existing expressions.
use super::algebra::Form;

/// Whether `param` multiplies a subexpression containing `main` in `form`.
pub fn multiplies_var(main: &str, param: &str, form: &Form) -> bool {
    multiplies_var_expanded(main, param, &form.expand())
}

fn multiplies_var_expanded(main: &str, param: &str, expr: &Form) -> bool {
    let operands = expr.args();
    let mut with_main = Vec::new();
    for &t in &operands {
        if !t.has_symbol(main) {
            continue;
        }
        with_main.push(t);
        for &f in &operands {
            let scales = f.is_symbol(param) || (matches!(f, Form::Pow(..)) && f.has_symbol(param));
            if scales && expr.contains(&Form::mul(vec![t.clone(), f.clone()])) {
                return true;
            }
        }
    }
    with_main.into_iter().filter(|t| !t.is_symbol(main)).any(|t| multiplies_var(main, param, t))
}

/// Default slider value for `param`: `1.0` for a scale, `0.0` otherwise.
pub fn default_value(main: &str, param: &str, form: &Form) -> f64 {
    if multiplies_var(main, param, form) {
        1.0
    } else {
        0.0
    }
}
