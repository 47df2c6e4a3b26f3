//! Integer expressions in operands.
//!
//! ```text
//! Or    -> Xor   ( '|' Xor )*
//! Xor   -> And   ( '^' And )*
//! And   -> Shift ( '&' Shift )*
//! Shift -> Add   ( ('<<' | '>>') Add )?
//! Add   -> Mul   ( ('+' | '-') Mul )*
//! Mul   -> Unary ( ('*' | '/' | '%') Unary )*
//! Unary -> ('+' | '-' | '~')? Atom
//! Atom  -> Identifier | IntLiteral | CharLiteral | '(' Or ')'
//! ```

use crate::error::Error;
use crate::symbol::Symbols;
use crate::token::{tokenize, Token};

/// Maximum parenthesis depth of one expression.
pub const MAX_DEPTH: usize = 64;

/// Evaluate an operand: a symbol name, a char literal or an expression.
pub fn value(text: &str, symbols: &Symbols) -> Result<i64, Error> {
    if text.is_empty() {
        return Err(Error::syntax("missing operand"));
    }
    if let Some(value) = symbols.get(text) {
        return Ok(value);
    }
    if let [b'\'', ch, b'\''] = text.as_bytes() {
        return Ok(*ch as i64);
    }
    eval(text, symbols)
}

pub fn eval(text: &str, symbols: &Symbols) -> Result<i64, Error> {
    let mut parser = Parser {
        tokens: tokenize(text, symbols)?,
        pos: 0,
        depth: 0,
    };
    let value = parser.or()?;
    match parser.peek() {
        Token::End => Ok(value),
        _ => Err(Error::InvalidExpression),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Token {
        self.tokens.get(self.pos).copied().unwrap_or(Token::End)
    }

    /// Step past the current token. Stepping past `End` is an error.
    fn advance(&mut self) -> Result<(), Error> {
        if self.pos >= self.tokens.len() - 1 {
            return Err(Error::InvalidExpression);
        }
        self.pos += 1;
        Ok(())
    }

    fn or(&mut self) -> Result<i64, Error> {
        let mut lhs = self.xor()?;
        while self.peek() == Token::Or {
            self.advance()?;
            lhs |= self.xor()?;
        }
        Ok(lhs)
    }

    fn xor(&mut self) -> Result<i64, Error> {
        let mut lhs = self.and()?;
        while self.peek() == Token::Xor {
            self.advance()?;
            lhs ^= self.and()?;
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<i64, Error> {
        let mut lhs = self.shift()?;
        while self.peek() == Token::And {
            self.advance()?;
            lhs &= self.shift()?;
        }
        Ok(lhs)
    }

    // Only one shift per level; chaining needs parentheses.
    fn shift(&mut self) -> Result<i64, Error> {
        let lhs = self.add()?;
        match self.peek() {
            Token::ShiftLeft => {
                self.advance()?;
                let count = shift_count(self.add()?)?;
                Ok(lhs.wrapping_shl(count))
            }
            Token::ShiftRight => {
                self.advance()?;
                let count = shift_count(self.add()?)?;
                Ok(lhs >> count)
            }
            _ => Ok(lhs),
        }
    }

    fn add(&mut self) -> Result<i64, Error> {
        let mut lhs = self.mul()?;
        loop {
            match self.peek() {
                Token::Plus => {
                    self.advance()?;
                    lhs = lhs.wrapping_add(self.mul()?);
                }
                Token::Minus => {
                    self.advance()?;
                    lhs = lhs.wrapping_sub(self.mul()?);
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn mul(&mut self) -> Result<i64, Error> {
        let mut lhs = self.unary()?;
        loop {
            match self.peek() {
                Token::Multiply => {
                    self.advance()?;
                    lhs = lhs.wrapping_mul(self.unary()?);
                }
                Token::Divide => {
                    self.advance()?;
                    lhs = floor_div(lhs, self.unary()?)?;
                }
                Token::Modulus => {
                    self.advance()?;
                    lhs = floor_mod(lhs, self.unary()?)?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn unary(&mut self) -> Result<i64, Error> {
        match self.peek() {
            Token::Plus => {
                self.advance()?;
                self.atom()
            }
            Token::Minus => {
                self.advance()?;
                Ok(self.atom()?.wrapping_neg())
            }
            Token::Not => {
                self.advance()?;
                Ok(!self.atom()?)
            }
            _ => self.atom(),
        }
    }

    fn atom(&mut self) -> Result<i64, Error> {
        match self.peek() {
            Token::Value(value) => {
                self.advance()?;
                Ok(value)
            }
            Token::LParen => {
                if self.depth >= MAX_DEPTH {
                    return Err(Error::TooDeep);
                }
                self.advance()?;
                self.depth += 1;
                let value = self.or()?;
                self.depth -= 1;
                if self.peek() != Token::RParen {
                    return Err(Error::MissingRightParen);
                }
                self.advance()?;
                Ok(value)
            }
            _ => Err(Error::InvalidExpression),
        }
    }
}

fn shift_count(count: i64) -> Result<u32, Error> {
    match u32::try_from(count) {
        Ok(n) if n < i64::BITS => Ok(n),
        _ => Err(Error::InvalidShift(count)),
    }
}

/// Division rounding toward negative infinity.
fn floor_div(lhs: i64, rhs: i64) -> Result<i64, Error> {
    if rhs == 0 {
        return Err(Error::DivisionByZero);
    }
    let quot = lhs.wrapping_div(rhs);
    if lhs.wrapping_rem(rhs) != 0 && (lhs < 0) != (rhs < 0) {
        Ok(quot - 1)
    } else {
        Ok(quot)
    }
}

/// Remainder taking the sign of the divisor.
fn floor_mod(lhs: i64, rhs: i64) -> Result<i64, Error> {
    if rhs == 0 {
        return Err(Error::DivisionByZero);
    }
    let rem = lhs.wrapping_rem(rhs);
    if rem != 0 && (rem < 0) != (rhs < 0) {
        Ok(rem + rhs)
    } else {
        Ok(rem)
    }
}
