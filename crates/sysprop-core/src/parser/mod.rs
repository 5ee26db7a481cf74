//! Schema parser - tokenizer and recursive descent parser
//!
//! Converts schema text (protobuf text format restricted to the sysprop
//! message shape) into a [`Schema`]. Omitted fields take their zero value.
//!
//! ```text
//! schema   := field*
//! field    := IDENT ':' value sep? | IDENT ':'? '{' field* '}' sep?
//! value    := STRING+ | IDENT | INTEGER
//! sep      := ',' | ';'
//! ```

pub mod tokenizer;

use std::collections::HashSet;

use crate::{Access, Error, NamedEnum, Owner, Property, PropertyType, Result, Schema, Scope};
use tokenizer::{Span, SpannedToken, Token, Tokenizer};

/// Parse schema text into an unvalidated [`Schema`].
///
/// # Guarantees
/// - Deterministic: same input always produces the same schema
/// - Property order follows declaration order
///
/// # Errors
/// Returns `Error::Schema` with line:column for syntax violations,
/// unknown fields or enum constants, and repeated singular fields.
pub fn parse(input: &str) -> Result<Schema> {
    let tokens = Tokenizer::new(input).tokenize()?;
    Parser::new(tokens).parse_schema()
}

struct Parser {
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Parser {
            tokens,
            position: 0,
        }
    }

    // ── Token helpers ──────────────────────────────────────

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.position)
            .map(|t| &t.token)
            .unwrap_or(&Token::Eof)
    }

    fn span(&self) -> Span {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map(|t| t.span.clone())
            .unwrap_or(Span {
                line: 1,
                column: 1,
                offset: 0,
            })
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == token {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.unexpected(&token.to_string()))
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        Error::schema(format!(
            "Expected {}, found {} at {}",
            expected,
            self.peek(),
            self.span()
        ))
    }

    fn skip_separator(&mut self) {
        if !self.eat(&Token::Comma) {
            self.eat(&Token::Semicolon);
        }
    }

    /// Read a field name and record it, rejecting repeats of singular fields
    fn field_name(&mut self, seen: &mut HashSet<String>, repeated: &[&str]) -> Result<(String, Span)> {
        let span = self.span();
        let name = match self.advance() {
            Token::Identifier(name) => name,
            other => {
                return Err(Error::schema(format!(
                    "Expected field name, found {} at {}",
                    other, span
                )))
            }
        };
        if !repeated.contains(&name.as_str()) && !seen.insert(name.clone()) {
            return Err(Error::schema(format!(
                "Non-repeated field \"{}\" is specified multiple times at {}",
                name, span
            )));
        }
        Ok((name, span))
    }

    // ── Values ─────────────────────────────────────────────

    fn string_value(&mut self) -> Result<String> {
        self.expect(&Token::Colon)?;
        let mut value = match self.peek() {
            Token::StringLiteral(s) => s.clone(),
            _ => return Err(self.unexpected("string")),
        };
        self.advance();
        // Adjacent literals concatenate
        while let Token::StringLiteral(next) = self.peek() {
            value.push_str(next);
            self.advance();
        }
        Ok(value)
    }

    fn enum_value<T: NamedEnum>(&mut self, field: &str) -> Result<T> {
        self.expect(&Token::Colon)?;
        let span = self.span();
        let found = match self.peek() {
            Token::Identifier(name) => T::from_name(name).ok_or_else(|| name.clone()),
            Token::IntegerLiteral(i) => T::from_index(*i).ok_or_else(|| i.to_string()),
            _ => return Err(self.unexpected(&format!("value for \"{}\"", field))),
        };
        self.advance();
        found.map_err(|value| {
            Error::schema(format!(
                "Unknown enumeration value \"{}\" for field \"{}\" at {}",
                value, field, span
            ))
        })
    }

    fn bool_value(&mut self, field: &str) -> Result<bool> {
        self.expect(&Token::Colon)?;
        let span = self.span();
        match self.advance() {
            Token::Identifier(name) => match name.as_str() {
                "true" | "True" | "t" => Ok(true),
                "false" | "False" | "f" => Ok(false),
                _ => Err(Error::schema(format!(
                    "Invalid value \"{}\" for boolean field \"{}\" at {}",
                    name, field, span
                ))),
            },
            Token::IntegerLiteral(1) => Ok(true),
            Token::IntegerLiteral(0) => Ok(false),
            other => Err(Error::schema(format!(
                "Invalid value {} for boolean field \"{}\" at {}",
                other, field, span
            ))),
        }
    }

    // ── Messages ───────────────────────────────────────────

    fn parse_schema(mut self) -> Result<Schema> {
        let mut schema = Schema::default();
        let mut seen = HashSet::new();

        while self.peek() != &Token::Eof {
            let (name, span) = self.field_name(&mut seen, &["prop"])?;
            match name.as_str() {
                "owner" => schema.owner = self.enum_value::<Owner>("owner")?,
                "module" => schema.module = self.string_value()?,
                "prop" => {
                    self.eat(&Token::Colon);
                    let prop = self.parse_property()?;
                    schema.props.push(prop);
                }
                _ => return Err(unknown_field("Properties", &name, &span)),
            }
            self.skip_separator();
        }

        Ok(schema)
    }

    fn parse_property(&mut self) -> Result<Property> {
        let open = self.span();
        self.expect(&Token::LBrace)?;
        let mut prop = Property::default();
        let mut seen = HashSet::new();

        loop {
            match self.peek() {
                Token::RBrace => {
                    self.advance();
                    break;
                }
                Token::Eof => {
                    return Err(Error::schema(format!(
                        "Unterminated prop block starting at {}",
                        open
                    )));
                }
                _ => {}
            }

            let (name, span) = self.field_name(&mut seen, &[])?;
            match name.as_str() {
                "api_name" => prop.api_name = self.string_value()?,
                "prop_name" => {
                    let value = self.string_value()?;
                    prop.prop_name = (!value.is_empty()).then_some(value);
                }
                "enum_values" => prop.enum_values = self.string_value()?,
                "type" => prop.prop_type = self.enum_value::<PropertyType>("type")?,
                "access" => prop.access = self.enum_value::<Access>("access")?,
                "scope" => prop.scope = self.enum_value::<Scope>("scope")?,
                "integer_as_bool" => prop.integer_as_bool = self.bool_value("integer_as_bool")?,
                _ => return Err(unknown_field("Property", &name, &span)),
            }
            self.skip_separator();
        }

        Ok(prop)
    }
}

fn unknown_field(message: &str, name: &str, span: &Span) -> Error {
    Error::schema(format!(
        "Message type \"sysprop.{}\" has no field named \"{}\" at {}",
        message, name, span
    ))
}
