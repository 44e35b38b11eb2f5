//! expression::ast — the tagged expression tree produced by the parser.
//!
//! Purpose
//! -------
//! Represent a user expression as literal / constant / symbol / unary /
//! binary / call nodes, independent of how it is simplified or evaluated.
//!
//! Key behaviors
//! -------------
//! - [`Func`] is the closed set of callable names; [`Func::from_ident`]
//!   resolves spellings and aliases (`ln`, `psi`, `LambertW`, ...).
//! - [`Expr::free_symbols`] lists symbols in first-occurrence order
//!   (left-to-right, depth-first), the order used for parameter lists.
//! - `Display` renders with minimal parentheses and `**` for powers; the
//!   output parses back to an equal tree modulo redundant parentheses.
//!
//! Conventions
//! -----------
//! - `pi`, `E` and `I` are constants; every other identifier not followed by
//!   `(` is a symbol.
//! - All functions take exactly one argument.
use std::fmt;

/// Named mathematical constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constant {
    Pi,
    E,
    I,
}

impl Constant {
    pub fn from_ident(name: &str) -> Option<Constant> {
        match name {
            "pi" => Some(Constant::Pi),
            "E" => Some(Constant::E),
            "I" => Some(Constant::I),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "E",
            Constant::I => "I",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => " + ",
            BinaryOp::Sub => " - ",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Pow => 4,
        }
    }
}

/// Functions available to expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Exp,
    Log,
    Sqrt,
    Abs,
    Re,
    Im,
    Conjugate,
    Arg,
    Gamma,
    Erf,
    Digamma,
    LambertW,
    Sinc,
    Zeta,
    Eta,
}

impl Func {
    pub fn from_ident(name: &str) -> Option<Func> {
        let func = match name {
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "cot" => Func::Cot,
            "sec" => Func::Sec,
            "csc" => Func::Csc,
            "asin" | "arcsin" => Func::Asin,
            "acos" | "arccos" => Func::Acos,
            "atan" | "arctan" => Func::Atan,
            "sinh" => Func::Sinh,
            "cosh" => Func::Cosh,
            "tanh" => Func::Tanh,
            "asinh" | "arcsinh" => Func::Asinh,
            "acosh" | "arccosh" => Func::Acosh,
            "atanh" | "arctanh" => Func::Atanh,
            "exp" => Func::Exp,
            "log" | "ln" => Func::Log,
            "sqrt" => Func::Sqrt,
            "abs" | "Abs" => Func::Abs,
            "re" => Func::Re,
            "im" => Func::Im,
            "conjugate" | "conj" => Func::Conjugate,
            "arg" => Func::Arg,
            "gamma" => Func::Gamma,
            "erf" => Func::Erf,
            "psi" | "digamma" => Func::Digamma,
            "lambertw" | "LambertW" => Func::LambertW,
            "sinc" => Func::Sinc,
            "zeta" => Func::Zeta,
            "eta" => Func::Eta,
            _ => return None,
        };
        Some(func)
    }

    /// Canonical spelling, accepted back by [`Func::from_ident`].
    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Cot => "cot",
            Func::Sec => "sec",
            Func::Csc => "csc",
            Func::Asin => "asin",
            Func::Acos => "acos",
            Func::Atan => "atan",
            Func::Sinh => "sinh",
            Func::Cosh => "cosh",
            Func::Tanh => "tanh",
            Func::Asinh => "asinh",
            Func::Acosh => "acosh",
            Func::Atanh => "atanh",
            Func::Exp => "exp",
            Func::Log => "log",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
            Func::Re => "re",
            Func::Im => "im",
            Func::Conjugate => "conjugate",
            Func::Arg => "arg",
            Func::Gamma => "gamma",
            Func::Erf => "erf",
            Func::Digamma => "digamma",
            Func::LambertW => "lambertw",
            Func::Sinc => "sinc",
            Func::Zeta => "zeta",
            Func::Eta => "eta",
        }
    }

    pub fn arity(self) -> usize {
        1
    }
}

/// Expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Const(Constant),
    Sym(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Func, Vec<Expr>),
}

impl Expr {
    pub fn sym(name: &str) -> Expr {
        Expr::Sym(name.to_string())
    }

    pub fn neg(e: Expr) -> Expr {
        Expr::Unary(UnaryOp::Neg, Box::new(e))
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn call(func: Func, arg: Expr) -> Expr {
        Expr::Call(func, vec![arg])
    }

    /// Distinct symbols in first-occurrence order.
    pub fn free_symbols(&self) -> Vec<String> {
        fn walk(e: &Expr, out: &mut Vec<String>) {
            match e {
                Expr::Num(_) | Expr::Const(_) => {}
                Expr::Sym(name) => {
                    if !out.iter().any(|s| s == name) {
                        out.push(name.clone());
                    }
                }
                Expr::Unary(_, inner) => walk(inner, out),
                Expr::Binary(_, lhs, rhs) => {
                    walk(lhs, out);
                    walk(rhs, out);
                }
                Expr::Call(_, args) => args.iter().for_each(|a| walk(a, out)),
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }

    pub fn contains_symbol(&self, name: &str) -> bool {
        match self {
            Expr::Num(_) | Expr::Const(_) => false,
            Expr::Sym(s) => s == name,
            Expr::Unary(_, inner) => inner.contains_symbol(name),
            Expr::Binary(_, lhs, rhs) => lhs.contains_symbol(name) || rhs.contains_symbol(name),
            Expr::Call(_, args) => args.iter().any(|a| a.contains_symbol(name)),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Num(v) if *v < 0.0 => 2,
            Expr::Num(_) | Expr::Const(_) | Expr::Sym(_) | Expr::Call(..) => 5,
            Expr::Unary(UnaryOp::Neg, _) => 2,
            Expr::Binary(op, ..) => op.precedence(),
        }
    }

    fn is_negative(&self) -> bool {
        matches!(self, Expr::Unary(UnaryOp::Neg, _)) || matches!(self, Expr::Num(v) if *v < 0.0)
    }
}

/// Shortest decimal form; integral values print without a fractional part.
pub(crate) fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, e: &Expr, min_prec: u8) -> fmt::Result {
    if e.precedence() < min_prec {
        write!(f, "({e})")
    } else {
        write!(f, "{e}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(v) => f.write_str(&format_number(*v)),
            Expr::Const(c) => f.write_str(c.name()),
            Expr::Sym(s) => f.write_str(s),
            Expr::Unary(UnaryOp::Neg, inner) => {
                f.write_str("-")?;
                // -(a + b) needs parentheses, -a*b does not
                write_operand(f, inner, 2)
            }
            Expr::Binary(op, lhs, rhs) => {
                let prec = op.precedence();
                let (left_min, right_min) = match op {
                    BinaryOp::Add | BinaryOp::Mul => (prec, prec),
                    BinaryOp::Sub | BinaryOp::Div => (prec, prec + 1),
                    BinaryOp::Pow => (prec + 1, prec),
                };
                write_operand(f, lhs, left_min)?;
                f.write_str(op.symbol())?;
                if rhs.is_negative() {
                    write!(f, "({rhs})")
                } else {
                    write_operand(f, rhs, right_min)
                }
            }
            Expr::Call(func, args) => {
                write!(f, "{}(", func.name())?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{a}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z() -> Expr {
        Expr::sym("z")
    }

    #[test]
    fn free_symbols_keep_first_occurrence_order() {
        // w*(a + z) + a*k
        let e = Expr::binary(
            BinaryOp::Add,
            Expr::binary(BinaryOp::Mul, Expr::sym("w"), Expr::binary(BinaryOp::Add, Expr::sym("a"), z())),
            Expr::binary(BinaryOp::Mul, Expr::sym("a"), Expr::sym("k")),
        );
        assert_eq!(e.free_symbols(), vec!["w", "a", "z", "k"]);
        assert!(e.contains_symbol("k"));
        assert!(!e.contains_symbol("b"));
    }

    #[test]
    // Purpose
    // -------
    // Rendering inserts parentheses only where precedence or associativity
    // requires them.
    fn display_uses_minimal_parentheses() {
        let sum = Expr::binary(BinaryOp::Add, Expr::sym("a"), z());
        let prod = Expr::binary(BinaryOp::Mul, Expr::sym("w"), sum.clone());
        assert_eq!(prod.to_string(), "w*(a + z)");

        let diff = Expr::binary(BinaryOp::Sub, Expr::sym("x"), sum.clone());
        assert_eq!(diff.to_string(), "x - (a + z)");

        let pow = Expr::binary(BinaryOp::Pow, sum, Expr::Num(2.0));
        assert_eq!(pow.to_string(), "(a + z)**2");

        let neg_exp = Expr::binary(BinaryOp::Pow, z(), Expr::Num(-1.5));
        assert_eq!(neg_exp.to_string(), "z**(-1.5)");

        let div = Expr::binary(
            BinaryOp::Div,
            Expr::Num(1.0),
            Expr::binary(BinaryOp::Mul, Expr::sym("a"), z()),
        );
        assert_eq!(div.to_string(), "1/(a*z)");

        let neg = Expr::neg(Expr::binary(BinaryOp::Pow, z(), Expr::Num(2.0)));
        assert_eq!(neg.to_string(), "-z**2");

        let call = Expr::call(Func::Sin, Expr::binary(BinaryOp::Mul, Expr::Const(Constant::Pi), z()));
        assert_eq!(call.to_string(), "sin(pi*z)");
    }

    #[test]
    fn func_aliases_resolve_to_canonical_names() {
        assert_eq!(Func::from_ident("ln"), Some(Func::Log));
        assert_eq!(Func::from_ident("psi"), Some(Func::Digamma));
        assert_eq!(Func::from_ident("LambertW"), Some(Func::LambertW));
        assert_eq!(Func::from_ident("foo"), None);
        for f in [Func::Zeta, Func::Abs, Func::Conjugate, Func::Digamma] {
            assert_eq!(Func::from_ident(f.name()), Some(f));
        }
    }

    #[test]
    fn format_number_drops_integral_fraction() {
        assert_eq!(format_number(45.0), "45");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(0.25), "0.25");
    }
}
