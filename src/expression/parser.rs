//! expression::parser — recursive-descent parser over lexer tokens.
//!
//! Grammar (lowest to highest binding):
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := '-' unary | '+' unary | power
//! power  := atom ('^' unary)?          (right-associative; -z**2 = -(z**2))
//! atom   := number | constant | symbol | ident '(' args ')' | '(' expr ')'
//! ```
//!
//! There is no implicit multiplication: `2z` is a trailing-token error.
//! Every cycle of the grammar passes through `unary`, which caps nesting at
//! [`MAX_NESTING_DEPTH`] and reports a parse error beyond it.
use super::{
    ast::{BinaryOp, Constant, Expr},
    errors::{ExprError, ExprResult},
    lexer::{parse_err, tokenize, Span, Token, TokenKind},
};
use crate::expression::ast::Func;

/// Deepest accepted nesting of parentheses, calls, unary signs and
/// exponents.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parse a complete expression string.
pub fn parse(input: &str) -> ExprResult<Expr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(input, &tokens);
    let expr = parser.parse_expr()?;
    if let Some(t) = parser.peek() {
        return Err(parse_err(input, t.span, format!("unexpected token after expression: {:?}", t.kind)).into());
    }
    Ok(expr)
}

struct Parser<'a> {
    input: &'a str,
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, tokens: &'a [Token]) -> Self {
        Self { input, tokens, pos: 0, depth: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn end_span(&self) -> Span {
        Span { start: self.input.len(), end: self.input.len() }
    }

    fn error(&self, span: Span, message: String) -> ExprError {
        parse_err(self.input, span, message).into()
    }

    fn expect(&mut self, expected: TokenKind) -> ExprResult<()> {
        match self.advance() {
            Some(t) if t.kind == expected => Ok(()),
            Some(t) => Err(self.error(t.span, format!("expected {expected:?}, got {:?}", t.kind))),
            None => Err(self.error(self.end_span(), format!("expected {expected:?}, got end of input"))),
        }
    }

    fn parse_expr(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> ExprResult<Expr> {
        if self.depth >= MAX_NESTING_DEPTH {
            let span = self.peek().map_or_else(|| self.end_span(), |t| t.span);
            return Err(self.error(span, format!("expression nested deeper than {MAX_NESTING_DEPTH} levels")));
        }
        self.depth += 1;
        let result = self.parse_signed();
        self.depth -= 1;
        result
    }

    fn parse_signed(&mut self) -> ExprResult<Expr> {
        match self.peek_kind() {
            Some(TokenKind::Minus) => {
                self.advance();
                let inner = self.parse_unary()?;
                Ok(match inner {
                    Expr::Num(v) => Expr::Num(-v),
                    other => Expr::neg(other),
                })
            }
            Some(TokenKind::Plus) => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> ExprResult<Expr> {
        let base = self.parse_atom()?;
        if matches!(self.peek_kind(), Some(TokenKind::Caret)) {
            self.advance();
            let exponent = self.parse_unary()?;
            return Ok(Expr::binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> ExprResult<Expr> {
        match self.advance() {
            Some(Token { kind: TokenKind::Num(n), .. }) => Ok(Expr::Num(n)),
            Some(Token { kind: TokenKind::LParen, span }) => {
                let e = self.parse_expr()?;
                match self.peek() {
                    Some(t) if t.kind == TokenKind::RParen => {
                        self.advance();
                        Ok(e)
                    }
                    Some(t) => Err(self.error(t.span, format!("expected ')', got {:?}", t.kind))),
                    None => Err(self.error(span, "unclosed '('".to_string())),
                }
            }
            Some(Token { kind: TokenKind::Ident(name), span }) => {
                if matches!(self.peek_kind(), Some(TokenKind::LParen)) {
                    self.advance();
                    let func = Func::from_ident(&name).ok_or(ExprError::UnknownFunction { name })?;
                    let mut args = Vec::new();
                    if !matches!(self.peek_kind(), Some(TokenKind::RParen)) {
                        args.push(self.parse_expr()?);
                        while matches!(self.peek_kind(), Some(TokenKind::Comma)) {
                            self.advance();
                            args.push(self.parse_expr()?);
                        }
                    }
                    self.expect(TokenKind::RParen)?;
                    if args.len() != func.arity() {
                        return Err(ExprError::Arity {
                            function: func.name(),
                            expected: func.arity(),
                            got: args.len(),
                        });
                    }
                    Ok(Expr::Call(func, args))
                } else if let Some(c) = Constant::from_ident(&name) {
                    Ok(Expr::Const(c))
                } else if Func::from_ident(&name).is_some() {
                    Err(self.error(span, format!("function '{name}' used without arguments")))
                } else {
                    Ok(Expr::Sym(name))
                }
            }
            Some(Token { kind, span }) => Err(self.error(
                span,
                format!("expected number, identifier, or '(', got {kind:?}"),
            )),
            None => Err(self.error(self.end_span(), "expected expression, got end of input".to_string())),
        }
    }
}
