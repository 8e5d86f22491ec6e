//! A recursive-descent parser from infix text to [`Expr`].
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/') unary)*
//! unary := '-' unary | power
//! power := atom ('^' unary)?
//! atom  := number | ident | ident '(' expr ')' | '(' expr ')'
//! ```
//!
//! Integer tokens become structural constants, tokens with a fraction or an exponent become
//! literals, and identifiers become variables holding the value bound to their name.

use std::{collections::HashMap, str::FromStr};

use log::trace;

use crate::{error::ParseError, Expr, Scalar};

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Int(String),
    Float(String),
    Ident(String),
    Op(char),
}

impl Token {
    fn text(&self) -> String {
        match self {
            Token::Int(s) | Token::Float(s) | Token::Ident(s) => s.clone(),
            Token::Op(c) => c.to_string(),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, ParseError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = vec![];
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let start = i;
        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).map_or(false, char::is_ascii_digit)) {
            let mut float = false;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if chars.get(i) == Some(&'.') {
                float = true;
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            if matches!(chars.get(i), Some('e' | 'E')) {
                let digits_at = match chars.get(i + 1) {
                    Some('+' | '-') => i + 2,
                    _ => i + 1,
                };
                if chars.get(digits_at).map_or(false, char::is_ascii_digit) {
                    float = true;
                    i = digits_at;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let s: String = chars[start..i].iter().collect();
            tokens.push((start, if float { Token::Float(s) } else { Token::Int(s) }));
        } else if c.is_alphabetic() || c == '_' {
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push((start, Token::Ident(chars[start..i].iter().collect())));
        } else if "+-*/^()".contains(c) {
            tokens.push((start, Token::Op(c)));
            i += 1;
        } else {
            return Err(ParseError::UnexpectedChar { pos: start, ch: c });
        }
    }
    Ok(tokens)
}

struct Parser<'a, T> {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    bindings: &'a HashMap<String, T>,
}

impl<'a, T: Scalar + FromStr> Parser<'a, T> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, tok)| tok)
    }

    fn next(&mut self) -> Result<(usize, Token), ParseError> {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(ParseError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(tok)
    }

    fn eat(&mut self, op: char) -> bool {
        if self.peek() == Some(&Token::Op(op)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, op: char) -> Result<(), ParseError> {
        match self.next()? {
            (_, Token::Op(c)) if c == op => Ok(()),
            (pos, tok) => Err(ParseError::UnexpectedToken {
                pos,
                found: tok.text(),
            }),
        }
    }

    fn expr(&mut self) -> Result<Expr<T>, ParseError> {
        let mut lhs = self.term()?;
        loop {
            if self.eat('+') {
                lhs = Expr::add(lhs, self.term()?);
            } else if self.eat('-') {
                lhs = Expr::sub(lhs, self.term()?);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn term(&mut self) -> Result<Expr<T>, ParseError> {
        let mut lhs = self.unary()?;
        loop {
            if self.eat('*') {
                lhs = Expr::mul(lhs, self.unary()?);
            } else if self.eat('/') {
                lhs = Expr::div(lhs, self.unary()?);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn unary(&mut self) -> Result<Expr<T>, ParseError> {
        if self.eat('-') {
            Ok(Expr::neg(self.unary()?))
        } else {
            self.power()
        }
    }

    fn power(&mut self) -> Result<Expr<T>, ParseError> {
        let base = self.atom()?;
        if self.eat('^') {
            Ok(Expr::pow(base, self.unary()?))
        } else {
            Ok(base)
        }
    }

    fn atom(&mut self) -> Result<Expr<T>, ParseError> {
        match self.next()? {
            (_, Token::Int(s)) => s
                .parse::<i64>()
                .map(Expr::constant)
                .map_err(|_| ParseError::InvalidNumber(s)),
            (_, Token::Float(s)) => s
                .parse::<T>()
                .map(Expr::lit)
                .map_err(|_| ParseError::InvalidNumber(s)),
            (_, Token::Ident(name)) => {
                if self.eat('(') {
                    let arg = self.expr()?;
                    self.expect(')')?;
                    match name.as_str() {
                        "log" | "ln" => Ok(Expr::log(arg)),
                        _ => Err(ParseError::UnknownFunction(name)),
                    }
                } else {
                    let data = self
                        .bindings
                        .get(&name)
                        .cloned()
                        .ok_or_else(|| ParseError::UnboundVariable(name.clone()))?;
                    Ok(Expr::var(name, data))
                }
            }
            (_, Token::Op('(')) => {
                let inner = self.expr()?;
                self.expect(')')?;
                Ok(inner)
            }
            (pos, tok) => Err(ParseError::UnexpectedToken {
                pos,
                found: tok.text(),
            }),
        }
    }
}

/// Parse `text` into an expression, looking up variable values in `bindings`.
pub fn parse<T: Scalar + FromStr>(
    text: &str,
    bindings: &HashMap<String, T>,
) -> Result<Expr<T>, ParseError> {
    let tokens = tokenize(text)?;
    trace!("parse: {} tokens", tokens.len());
    let mut parser = Parser {
        tokens,
        pos: 0,
        bindings,
    };
    let expr = parser.expr()?;
    match parser.tokens.get(parser.pos) {
        Some((pos, tok)) => Err(ParseError::UnexpectedToken {
            pos: *pos,
            found: tok.text(),
        }),
        None => Ok(expr),
    }
}
