//! Tokenizer and token whitelist for the expression engine.
//!
//! Tokenization doubles as validation: only the token kinds below can be
//! produced. A bare identifier surviving substitution, an unknown operator,
//! or any other character is a [`FormulaError::Malformed`] -- the expression
//! fails closed before evaluation is ever attempted.

use crate::types::FormulaError;

/// The complete token vocabulary of the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Text(String),
    Bool(bool),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    And,
    Or,
    Not,
}

/// Tokenizes an already-substituted expression string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, FormulaError> {
    let chars: Vec<char> = input.chars().collect();
    let len = chars.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < len {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\r' | '\n' => i += 1,

            '0'..='9' => {
                let start = i;
                let mut seen_dot = false;
                while i < len && (chars[i].is_ascii_digit() || (chars[i] == '.' && !seen_dot)) {
                    if chars[i] == '.' {
                        seen_dot = true;
                    }
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| FormulaError::malformed(input, format!("bad number '{text}'")))?;
                tokens.push(Token::Number(value));
            }

            '\'' | '"' => {
                let quote = c;
                let start = i + 1;
                let mut j = start;
                while j < len && chars[j] != quote {
                    j += 1;
                }
                if j >= len {
                    return Err(FormulaError::malformed(input, "unterminated string literal"));
                }
                tokens.push(Token::Text(chars[start..j].iter().collect()));
                i = j + 1;
            }

            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }

            '<' => {
                if i + 1 < len && chars[i + 1] == '=' {
                    tokens.push(Token::Le);
                    i += 2;
                } else {
                    tokens.push(Token::Lt);
                    i += 1;
                }
            }
            '>' => {
                if i + 1 < len && chars[i + 1] == '=' {
                    tokens.push(Token::Ge);
                    i += 2;
                } else {
                    tokens.push(Token::Gt);
                    i += 1;
                }
            }
            '=' => {
                if i + 1 < len && chars[i + 1] == '=' {
                    tokens.push(Token::EqEq);
                    i += 2;
                } else {
                    return Err(FormulaError::malformed(input, "single '=' is not allowed"));
                }
            }
            '!' => {
                if i + 1 < len && chars[i + 1] == '=' {
                    tokens.push(Token::NotEq);
                    i += 2;
                } else {
                    tokens.push(Token::Not);
                    i += 1;
                }
            }
            '&' => {
                if i + 1 < len && chars[i + 1] == '&' {
                    tokens.push(Token::And);
                    i += 2;
                } else {
                    return Err(FormulaError::malformed(input, "single '&' is not allowed"));
                }
            }
            '|' => {
                if i + 1 < len && chars[i + 1] == '|' {
                    tokens.push(Token::Or);
                    i += 2;
                } else {
                    return Err(FormulaError::malformed(input, "single '|' is not allowed"));
                }
            }

            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < len && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                match word.to_ascii_lowercase().as_str() {
                    "and" => tokens.push(Token::And),
                    "or" => tokens.push(Token::Or),
                    "not" => tokens.push(Token::Not),
                    "true" => tokens.push(Token::Bool(true)),
                    "false" => tokens.push(Token::Bool(false)),
                    // Any other identifier means a variable the context did
                    // not substitute. Fail closed.
                    _ => {
                        return Err(FormulaError::malformed(
                            input,
                            format!("disallowed token '{word}'"),
                        ));
                    }
                }
            }

            other => {
                return Err(FormulaError::malformed(
                    input,
                    format!("disallowed character '{other}'"),
                ));
            }
        }
    }

    Ok(tokens)
}
