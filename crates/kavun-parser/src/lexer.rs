use crate::token::{keyword, Token};
use kavun_errors::{Result, RuntimeError};
use std::iter::Peekable;
use std::str::Chars;

/// Turns a shielded, translated expression into a token stream. String
/// placeholders (`__KAVUN_STR_<n>__`, produced by [`crate::shield`]) become
/// `Token::Str(n)`; everything else is read directly off the source text.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { chars: source.chars().peekable() }
    }

    pub fn tokenize(source: &str) -> Result<Vec<Token>> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token(source)?;
            let done = tok == Token::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn next_token(&mut self, source: &str) -> Result<Token> {
        self.skip_whitespace();
        let Some(&c) = self.chars.peek() else {
            return Ok(Token::Eof);
        };

        if c.is_ascii_digit() {
            return Ok(self.read_number());
        }
        if c == '_' || c.is_alphabetic() {
            return Ok(self.read_identifier());
        }

        self.chars.next();
        Ok(match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => {
                if self.chars.peek() == Some(&'*') {
                    self.chars.next();
                    Token::StarStar
                } else {
                    Token::Star
                }
            }
            '/' => {
                if self.chars.peek() == Some(&'/') {
                    self.chars.next();
                    Token::SlashSlash
                } else {
                    Token::Slash
                }
            }
            '%' => Token::Percent,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            '=' => {
                if self.chars.peek() == Some(&'=') {
                    self.chars.next();
                    Token::EqEq
                } else {
                    return Err(RuntimeError::InvalidExpression {
                        expr: source.to_string(),
                        reason: "tek başına '=' geçersiz, 'eşittir' veya '==' kullanın".into(),
                    });
                }
            }
            '!' if self.chars.peek() == Some(&'=') => {
                self.chars.next();
                Token::NotEq
            }
            '<' => {
                if self.chars.peek() == Some(&'=') {
                    self.chars.next();
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            '>' => {
                if self.chars.peek() == Some(&'=') {
                    self.chars.next();
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            other => {
                return Err(RuntimeError::InvalidExpression {
                    expr: source.to_string(),
                    reason: format!("beklenmeyen karakter: {other:?}"),
                })
            }
        })
    }

    fn read_number(&mut self) -> Token {
        let mut text = String::new();
        let mut is_float = false;
        while matches!(self.chars.peek(), Some(c) if c.is_ascii_digit()) {
            text.push(self.chars.next().unwrap());
        }
        if self.chars.peek() == Some(&'.') {
            is_float = true;
            text.push(self.chars.next().unwrap());
            while matches!(self.chars.peek(), Some(c) if c.is_ascii_digit()) {
                text.push(self.chars.next().unwrap());
            }
        }
        if is_float {
            Token::Float(text.parse().unwrap_or(0.0))
        } else {
            Token::Int(text.parse().unwrap_or(0))
        }
    }

    fn read_identifier(&mut self) -> Token {
        let mut text = String::new();
        while matches!(self.chars.peek(), Some(c) if c.is_alphanumeric() || *c == '_') {
            text.push(self.chars.next().unwrap());
        }

        if let Some(rest) = text.strip_prefix("__KAVUN_STR_") {
            if let Some(index) = rest.strip_suffix("__").and_then(|n| n.parse::<usize>().ok()) {
                return Token::Str(index);
            }
        }

        keyword(&text).unwrap_or(Token::Ident(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_numbers_and_operators() {
        let tokens = Lexer::tokenize("3 + 4.5 * x").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Int(3),
                Token::Plus,
                Token::Float(4.5),
                Token::Star,
                Token::Ident("x".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn recognizes_turkish_keywords() {
        let tokens = Lexer::tokenize("a büyüktür b ve doğru").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("a".into()),
                Token::Gt,
                Token::Ident("b".into()),
                Token::And,
                Token::True,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn recognizes_string_placeholder_tokens() {
        let tokens = Lexer::tokenize("__KAVUN_STR_0__ + __KAVUN_STR_1__").unwrap();
        assert_eq!(tokens, vec![Token::Str(0), Token::Plus, Token::Str(1), Token::Eof]);
    }
}
