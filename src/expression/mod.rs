//! expression — from a user string to a vectorized complex function.
//!
//! Purpose
//! -------
//! Parse expressions such as `a*sin(w*z)` or `zeta(k*(z - w))`, designate one
//! symbol as the main variable, infer the rest as parameters with sensible
//! defaults, and compile the result into an evaluator over complex arrays.
//!
//! Key behaviors
//! -------------
//! - [`lexer`] / [`parser`] build an [`Expr`] tree; failures carry line and
//!   column.
//! - [`algebra`] holds the canonical [`Form`] used for expansion, occurrence
//!   tests and symbolic calculus ([`calculus`]).
//! - [`heuristics`] decides the default of each parameter
//!   ([`multiplies_var`]).
//! - [`compile`] emits a postfix [`Program`]; named calls resolve through a
//!   [`FunctionNamespace`] whose `zeta` / `eta` are the series engines of
//!   [`crate::special`].
//! - [`function`] ties it together as [`FunctionCompiler`] →
//!   [`CompiledFunction`]; [`presets`] lists the built-in catalogue.
//!
//! Conventions
//! -----------
//! - Exponentiation is written `**` (`^` is accepted on input); rendered
//!   strings always use `**`.
//! - Multiplication is always explicit: `2z` is a parse error.
//! - `I`, `pi` and `E` are constants and cannot be used as symbols.
//!
//! Testing notes
//! -------------
//! - Each file carries unit tests; the regression cases for default
//!   inference live in `heuristics`.

pub mod algebra;
pub mod ast;
pub mod calculus;
pub mod compile;
pub mod errors;
pub mod function;
pub mod heuristics;
pub mod latex;
pub(crate) mod lexer;
pub mod namespace;
pub mod parser;
pub mod presets;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::algebra::Form;
pub use self::ast::{BinaryOp, Constant, Expr, Func, UnaryOp};
pub use self::calculus::{antiderivative, derivative};
pub use self::compile::{Program, Value};
pub use self::errors::{ExprError, ExprResult, ParseError};
pub use self::function::{CompiledFunction, CompilerOptions, FunctionCompiler};
pub use self::heuristics::{default_value, multiplies_var};
pub use self::latex::to_latex;
pub use self::namespace::FunctionNamespace;
pub use self::parser::{parse, MAX_NESTING_DEPTH};
pub use self::presets::{preset, Preset, PresetView, PRESETS, PRESET_VARIABLE};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::{
        parse, preset, CompiledFunction, CompilerOptions, Expr, ExprError, ExprResult,
        FunctionCompiler, Preset, PRESETS,
    };
}
