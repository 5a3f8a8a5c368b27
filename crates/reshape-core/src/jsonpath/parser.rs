//! JSONPath expression parser
//!
//! A small recursive descent parser covering the subset of JSONPath used by
//! transform rules: `$` and `@` roots, dot and bracket children, positive and
//! negative indices, wildcards and recursive descent.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::ast::*;
use super::error::JSONPathError;
use crate::Result;

/// JSONPath expression parser
pub struct Parser<'a> {
    /// Input string being parsed
    input: &'a str,
    /// Input characters
    chars: Vec<char>,
    /// Current position in `chars`
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input
    pub fn new(input: &'a str) -> Result<Self> {
        if input.trim().is_empty() {
            return Err(JSONPathError::parse("Empty JSONPath expression", 0, input).into());
        }

        Ok(Self {
            input,
            chars: input.trim().chars().collect(),
            position: 0,
        })
    }

    /// Parse the JSONPath expression into an AST
    pub fn parse(mut self) -> Result<Expression> {
        let root = self.parse_root()?;
        let mut selectors = Vec::new();

        while !self.is_at_end() {
            self.parse_selector(&mut selectors)?;
        }

        Ok(Expression::new(root, selectors))
    }

    /// Parse the root selector (`$` or `@`)
    fn parse_root(&mut self) -> Result<Root> {
        let root = match self.current_char() {
            Some('$') => Root::Document,
            Some('@') => Root::Current,
            other => {
                return Err(self.syntax_error("JSONPath must start with $ or @", &["$", "@"], other))
            }
        };
        self.advance();
        Ok(root)
    }

    /// Parse one selector, pushing it (and for `..x`, its target) onto `selectors`
    fn parse_selector(&mut self, selectors: &mut Vec<Selector>) -> Result<()> {
        match self.current_char() {
            Some('.') => {
                self.advance();
                if self.current_char() == Some('.') {
                    self.advance();
                    selectors.push(Selector::RecursiveDescent);
                    match self.current_char() {
                        Some('[') => return Ok(()),
                        Some('*') => {
                            self.advance();
                            selectors.push(Selector::Wildcard);
                        }
                        _ => selectors.push(Selector::Child(self.parse_identifier()?)),
                    }
                    return Ok(());
                }

                if self.current_char() == Some('*') {
                    self.advance();
                    selectors.push(Selector::Wildcard);
                } else {
                    selectors.push(Selector::Child(self.parse_identifier()?));
                }
                Ok(())
            }
            Some('[') => {
                let selector = self.parse_bracket_selector()?;
                selectors.push(selector);
                Ok(())
            }
            other => Err(self.syntax_error("Unexpected character in selector", &[".", "["], other)),
        }
    }

    /// Parse bracket notation selector
    fn parse_bracket_selector(&mut self) -> Result<Selector> {
        self.advance(); // consume '['
        self.skip_whitespace();

        let selector = match self.current_char() {
            Some('\'') | Some('"') => Selector::Child(self.parse_quoted_string()?),
            Some('*') => {
                self.advance();
                Selector::Wildcard
            }
            Some(c) if c == '-' || c.is_ascii_digit() => Selector::Index(self.parse_index()?),
            other => {
                return Err(self.syntax_error(
                    "Unsupported bracket selector",
                    &["'name'", "index", "*"],
                    other,
                ))
            }
        };

        self.skip_whitespace();
        self.expect_char(']')?;
        Ok(selector)
    }

    /// Parse a property name used with dot notation
    fn parse_identifier(&mut self) -> Result<String> {
        let start = self.position;
        while let Some(c) = self.current_char() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                self.advance();
            } else {
                break;
            }
        }

        if self.position == start {
            let found = self.current_char();
            return Err(self.syntax_error("Expected property name", &["identifier", "*"], found));
        }

        Ok(self.chars[start..self.position].iter().collect())
    }

    /// Parse a single or double quoted property name
    fn parse_quoted_string(&mut self) -> Result<String> {
        let quote = self.current_char();
        self.advance();

        let mut value = String::new();
        loop {
            match self.current_char() {
                None => {
                    return Err(
                        JSONPathError::parse("Unterminated string", self.position, self.input).into(),
                    )
                }
                Some('\\') => {
                    self.advance();
                    match self.current_char() {
                        Some(escaped) => {
                            value.push(escaped);
                            self.advance();
                        }
                        None => {
                            return Err(JSONPathError::parse(
                                "Dangling escape",
                                self.position,
                                self.input,
                            )
                            .into())
                        }
                    }
                }
                Some(c) if Some(c) == quote => {
                    self.advance();
                    return Ok(value);
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    /// Parse an array index, optionally negative
    fn parse_index(&mut self) -> Result<IndexSelector> {
        let negative = self.current_char() == Some('-');
        if negative {
            self.advance();
        }

        let start = self.position;
        while matches!(self.current_char(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }

        let digits: String = self.chars[start..self.position].iter().collect();
        let index = digits
            .parse::<usize>()
            .map_err(|_| JSONPathError::parse("Invalid array index", start, self.input))?;

        match (negative, index) {
            (false, index) => Ok(IndexSelector::Positive(index)),
            (true, 0) => Err(JSONPathError::parse("Index -0 is not valid", start, self.input).into()),
            (true, index) => Ok(IndexSelector::Negative(index)),
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<()> {
        if self.current_char() == Some(expected) {
            self.advance();
            Ok(())
        } else {
            let found = self.current_char();
            let token = expected.to_string();
            Err(self.syntax_error("Unexpected character", &[token.as_str()], found))
        }
    }

    fn syntax_error(&self, message: &str, expected: &[&str], found: Option<char>) -> crate::Error {
        JSONPathError::syntax(
            message,
            self.position,
            self.input,
            expected,
            found.map(|c| c.to_string()).unwrap_or_else(|| "EOF".to_string()),
        )
        .into()
    }

    fn current_char(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current_char(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }
}
