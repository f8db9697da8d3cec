use std::f64::consts::{E, PI};

use crate::{
    BinOp, Expr, Func, ParseError,
    lex::{Token, TokenKind, tokenize},
};

/// Module prefixes accepted (and ignored) on function and constant names.
const QUALIFIERS: [&str; 3] = ["np.", "numpy.", "math."];

/// Deepest nesting the parser accepts, counted both while descending into
/// parentheses, calls, and unary operators and in the height of the tree it
/// builds. Evaluation and printing recurse over the tree, so this also bounds
/// their stack use.
pub const MAX_DEPTH: usize = 256;

/// Parses expression text into an [`Expr`].
///
/// Grammar, loosest binding first:
///
/// ```text
/// expr    = term  (("+" | "-") term)*
/// term    = unary (("*" | "/") unary)*
/// unary   = ("-" | "+") unary | power
/// power   = primary ("^" unary)?
/// primary = number | name | name "(" expr ")" | "(" expr ")"
/// ```
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem found, including
/// [`ParseError::TooDeep`] for input nested past [`MAX_DEPTH`].
pub fn parse(src: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(src)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser {
        tokens,
        index: 0,
        depth: 0,
    };
    let (expr, _) = parser.expr()?;

    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(ParseError::Trailing { pos: token.pos }),
    }
}

/// A parsed subtree and its height.
type Parsed = Result<(Expr, usize), ParseError>;

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().is_some_and(|t| &t.kind == kind) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Position of the next token, or of the last one at the end of input.
    fn pos(&self) -> usize {
        self.peek().or(self.tokens.last()).map_or(0, |t| t.pos)
    }

    /// Height of a node whose tallest child has height `child`.
    fn grow(&self, child: usize) -> Result<usize, ParseError> {
        let height = child + 1;
        if height > MAX_DEPTH {
            return Err(ParseError::TooDeep { pos: self.pos() });
        }
        Ok(height)
    }

    /// Runs `rule` one nesting level deeper.
    fn nested(&mut self, rule: fn(&mut Self) -> Parsed) -> Parsed {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep { pos: self.pos() });
        }
        self.depth += 1;
        let parsed = rule(self);
        self.depth -= 1;
        parsed
    }

    fn binary(&self, op: BinOp, (lhs, l): (Expr, usize), (rhs, r): (Expr, usize)) -> Parsed {
        let height = self.grow(l.max(r))?;
        Ok((Expr::binary(op, lhs, rhs), height))
    }

    fn expr(&mut self) -> Parsed {
        let mut lhs = self.term()?;
        loop {
            let op = if self.eat(&TokenKind::Plus) {
                BinOp::Add
            } else if self.eat(&TokenKind::Minus) {
                BinOp::Sub
            } else {
                return Ok(lhs);
            };
            let rhs = self.term()?;
            lhs = self.binary(op, lhs, rhs)?;
        }
    }

    fn term(&mut self) -> Parsed {
        let mut lhs = self.unary()?;
        loop {
            let op = if self.eat(&TokenKind::Star) {
                BinOp::Mul
            } else if self.eat(&TokenKind::Slash) {
                BinOp::Div
            } else {
                return Ok(lhs);
            };
            let rhs = self.unary()?;
            lhs = self.binary(op, lhs, rhs)?;
        }
    }

    fn unary(&mut self) -> Parsed {
        self.nested(|parser| {
            if parser.eat(&TokenKind::Minus) {
                let (operand, height) = parser.unary()?;
                let height = parser.grow(height)?;
                return Ok((Expr::Neg(Box::new(operand)), height));
            }
            if parser.eat(&TokenKind::Plus) {
                return parser.unary();
            }
            parser.power()
        })
    }

    fn power(&mut self) -> Parsed {
        let base = self.primary()?;
        if self.eat(&TokenKind::Caret) {
            let exponent = self.unary()?;
            return self.binary(BinOp::Pow, base, exponent);
        }
        Ok(base)
    }

    fn primary(&mut self) -> Parsed {
        let Token { kind, pos } = self.next().ok_or(ParseError::UnexpectedEnd)?;

        match kind {
            TokenKind::Num(value) => Ok((Expr::Num(value), 1)),
            TokenKind::LParen => {
                let inner = self.nested(Self::expr)?;
                self.close()?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                let name = unqualified(&name);
                if self.eat(&TokenKind::LParen) {
                    let func = Func::from_name(name).ok_or_else(|| ParseError::UnknownFunction {
                        name: name.to_string(),
                        pos,
                    })?;
                    let (arg, height) = self.nested(Self::expr)?;
                    self.close()?;
                    let height = self.grow(height)?;
                    return Ok((Expr::call(func, arg), height));
                }
                let leaf = match name {
                    "x" => Expr::Var,
                    "pi" => Expr::Num(PI),
                    "e" => Expr::Num(E),
                    _ => {
                        return Err(ParseError::UnknownName {
                            name: name.to_string(),
                            pos,
                        });
                    }
                };
                Ok((leaf, 1))
            }
            _ => Err(ParseError::Expected {
                expected: "a number, name, or '('",
                pos,
            }),
        }
    }

    fn close(&mut self) -> Result<(), ParseError> {
        if self.eat(&TokenKind::RParen) {
            return Ok(());
        }
        match self.peek() {
            Some(token) => Err(ParseError::Expected {
                expected: "')'",
                pos: token.pos,
            }),
            None => Err(ParseError::UnexpectedEnd),
        }
    }
}

fn unqualified(name: &str) -> &str {
    QUALIFIERS
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}
