use std::iter::Peekable;
use std::str::Chars;

use crate::error::Error;
use crate::symbol::Symbols;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Value(i64),
    Plus,       // '+'
    Minus,      // '-'
    Not,        // '~'
    And,        // '&'
    Or,         // '|'
    Xor,        // '^'
    Multiply,   // '*'
    Divide,     // '/'
    Modulus,    // '%'
    ShiftLeft,  // '<<'
    ShiftRight, // '>>'
    LParen,     // '('
    RParen,     // ')'
    End,
}

/// Split an expression into tokens. Symbols are looked up here, so every
/// identifier must already be defined. The result always ends with `End`.
pub fn tokenize(text: &str, symbols: &Symbols) -> Result<Vec<Token>, Error> {
    Lexer {
        iter: text.chars().peekable(),
        symbols,
    }
    .parse()
}

struct Lexer<'a> {
    iter: Peekable<Chars<'a>>,
    symbols: &'a Symbols,
}

impl<'a> Lexer<'a> {
    fn parse(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.iter.next() {
            let token = match ch {
                c if c.is_whitespace() => continue,
                c if c.is_alphabetic() => self.ident(c)?,
                c if c.is_ascii_digit() => Token::Value(self.number(c)?),
                '\'' => Token::Value(self.char_lit()?),
                '+' => Token::Plus,
                '-' => Token::Minus,
                '~' => Token::Not,
                '&' => Token::And,
                '|' => Token::Or,
                '^' => Token::Xor,
                '*' => Token::Multiply,
                '/' => Token::Divide,
                '%' => Token::Modulus,
                '(' => Token::LParen,
                ')' => Token::RParen,
                '<' if self.iter.next_if_eq(&'<').is_some() => Token::ShiftLeft,
                '>' if self.iter.next_if_eq(&'>').is_some() => Token::ShiftRight,
                _ => return Err(Error::InvalidExpression),
            };
            tokens.push(token);
        }
        tokens.push(Token::End);
        Ok(tokens)
    }

    fn ident(&mut self, first: char) -> Result<Token, Error> {
        let mut name = String::from(first);
        while let Some(ch) = self
            .iter
            .next_if(|c| c.is_alphanumeric() || *c == '_' || *c == '.')
        {
            name.push(ch);
        }
        let name = name.to_uppercase();
        match self.symbols.get(&name) {
            Some(value) => Ok(Token::Value(value)),
            None => Err(Error::UndefinedSymbol(name)),
        }
    }

    fn number(&mut self, first: char) -> Result<i64, Error> {
        let mut text = String::from(first);

        let radix = match (first, self.iter.peek()) {
            ('0', Some('x' | 'X')) => 16,
            ('0', Some('o' | 'O')) => 8,
            ('0', Some('b' | 'B')) => 2,
            _ => 10,
        };

        let mut value: i64 = 0;
        let mut count = 0;
        if radix == 10 {
            value = first as i64 - '0' as i64;
            count = 1;
        } else if let Some(prefix) = self.iter.next() {
            text.push(prefix);
        }

        while let Some(ch) = self.iter.next_if(|c| *c == '_' || c.is_digit(radix)) {
            text.push(ch);
            if let Some(digit) = ch.to_digit(radix) {
                value = value
                    .checked_mul(radix as i64)
                    .and_then(|v| v.checked_add(digit as i64))
                    .ok_or_else(|| Error::InvalidNumber(text.clone()))?;
                count += 1;
            }
        }

        if count == 0 {
            return Err(Error::InvalidNumber(text));
        }
        Ok(value)
    }

    fn char_lit(&mut self) -> Result<i64, Error> {
        let ch = self.iter.next().ok_or(Error::MissingCharQuote)?;
        if !ch.is_ascii() {
            return Err(Error::InvalidChar(ch));
        }
        match self.iter.next() {
            Some('\'') => Ok(ch as i64),
            _ => Err(Error::MissingCharQuote),
        }
    }
}
