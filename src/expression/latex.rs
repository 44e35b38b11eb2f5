//! expression::latex — LaTeX rendering of expression trees for titles and
//! labels.
use super::ast::{format_number, BinaryOp, Constant, Expr, Func, UnaryOp};

const GREEK: [&str; 24] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi",
    "psi", "omega",
];

fn symbol(name: &str) -> String {
    let (stem, digits) = match name.find(|c: char| c.is_ascii_digit()) {
        Some(i) if name[i..].chars().all(|c| c.is_ascii_digit()) && i > 0 => name.split_at(i),
        _ => (name, ""),
    };
    let stem = if GREEK.contains(&stem) || GREEK.contains(&stem.to_ascii_lowercase().as_str()) {
        let mut s = String::from("\\");
        s.push_str(stem);
        s
    } else {
        stem.to_string()
    };
    if digits.is_empty() {
        stem
    } else {
        format!("{stem}_{{{digits}}}")
    }
}

fn func_name(func: Func) -> &'static str {
    match func {
        Func::Sin => "\\sin",
        Func::Cos => "\\cos",
        Func::Tan => "\\tan",
        Func::Cot => "\\cot",
        Func::Sec => "\\sec",
        Func::Csc => "\\csc",
        Func::Asin => "\\arcsin",
        Func::Acos => "\\arccos",
        Func::Atan => "\\arctan",
        Func::Sinh => "\\sinh",
        Func::Cosh => "\\cosh",
        Func::Tanh => "\\tanh",
        Func::Asinh => "\\operatorname{asinh}",
        Func::Acosh => "\\operatorname{acosh}",
        Func::Atanh => "\\operatorname{atanh}",
        Func::Log => "\\log",
        Func::Re => "\\operatorname{re}",
        Func::Im => "\\operatorname{im}",
        Func::Arg => "\\arg",
        Func::Gamma => "\\Gamma",
        Func::Erf => "\\operatorname{erf}",
        Func::Digamma => "\\psi",
        Func::LambertW => "W",
        Func::Sinc => "\\operatorname{sinc}",
        Func::Zeta => "\\zeta",
        Func::Eta => "\\eta",
        // rendered structurally in `render`
        Func::Exp | Func::Sqrt | Func::Abs | Func::Conjugate => "",
    }
}

fn precedence(e: &Expr) -> u8 {
    match e {
        Expr::Num(v) if *v < 0.0 => 1,
        Expr::Unary(..) => 1,
        Expr::Binary(BinaryOp::Add | BinaryOp::Sub, ..) => 1,
        Expr::Binary(BinaryOp::Mul | BinaryOp::Div, ..) => 2,
        Expr::Binary(BinaryOp::Pow, ..) => 3,
        Expr::Call(Func::Exp, _) => 3,
        _ => 4,
    }
}

fn wrapped(e: &Expr, min: u8) -> String {
    if precedence(e) < min {
        format!("\\left({}\\right)", render(e))
    } else {
        render(e)
    }
}

fn render(e: &Expr) -> String {
    match e {
        Expr::Num(v) => format_number(*v),
        Expr::Const(Constant::Pi) => "\\pi".to_string(),
        Expr::Const(Constant::E) => "e".to_string(),
        Expr::Const(Constant::I) => "i".to_string(),
        Expr::Sym(name) => symbol(name),
        Expr::Unary(UnaryOp::Neg, inner) => format!("- {}", wrapped(inner, 2)),
        Expr::Binary(op, lhs, rhs) => match op {
            BinaryOp::Add => format!("{} + {}", render(lhs), wrapped(rhs, 2)),
            BinaryOp::Sub => format!("{} - {}", render(lhs), wrapped(rhs, 2)),
            BinaryOp::Mul => {
                let sep = match rhs.as_ref() {
                    Expr::Num(_) => " \\cdot ",
                    _ => " ",
                };
                format!("{}{sep}{}", wrapped(lhs, 2), wrapped(rhs, 2))
            }
            BinaryOp::Div => format!("\\frac{{{}}}{{{}}}", render(lhs), render(rhs)),
            BinaryOp::Pow => format!("{}^{{{}}}", wrapped(lhs, 4), render(rhs)),
        },
        Expr::Call(func, args) => {
            let arg = args.iter().map(render).collect::<Vec<_>>().join(", ");
            match func {
                Func::Exp => format!("e^{{{arg}}}"),
                Func::Sqrt => format!("\\sqrt{{{arg}}}"),
                Func::Abs => format!("\\left|{arg}\\right|"),
                Func::Conjugate => format!("\\overline{{{arg}}}"),
                _ => format!("{}{{\\left({arg} \\right)}}", func_name(*func)),
            }
        }
    }
}

/// LaTeX source (without math delimiters) for `expr`.
pub fn to_latex(expr: &Expr) -> String {
    render(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::parser::parse;

    fn latex(src: &str) -> String {
        to_latex(&parse(src).unwrap())
    }

    #[test]
    fn renders_common_forms() {
        assert_eq!(latex("a*sin(w*z)"), "a \\sin{\\left(w z \\right)}");
        assert_eq!(latex("w/(z - a)"), "\\frac{w}{z - a}");
        assert_eq!(latex("(z + 1)**2"), "\\left(z + 1\\right)^{2}");
        assert_eq!(latex("exp(-z**2)"), "e^{- z^{2}}");
        assert_eq!(latex("sqrt(abs(z))"), "\\sqrt{\\left|z\\right|}");
        assert_eq!(latex("zeta(k*(z - w))"), "\\zeta{\\left(k \\left(z - w\\right) \\right)}");
    }

    #[test]
    fn greek_names_and_subscripts() {
        assert_eq!(latex("sigma*pi"), "\\sigma \\pi");
        assert_eq!(latex("a1 + Omega"), "a_{1} + \\Omega");
        assert_eq!(latex("z*2"), "z \\cdot 2");
    }
}
