use std::str::FromStr;

use crate::error::TypeParseError;
use crate::placement::Placement;
use crate::types::{ComputationType, Container, DType, FederatedType, StructType, TensorType};

impl FromStr for ComputationType {
    type Err = TypeParseError;

    /// Parse a type string such as `(<x=int32@SERVER> -> {float32[?]}@CLIENTS)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeParser::new(s);
        let parsed = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos < s.len() {
            return Err(TypeParseError::TrailingInput {
                offset: parser.pos,
                rest: s[parser.pos..].to_string(),
            });
        }
        Ok(parsed)
    }
}

/// Deepest nesting of `<`, `(`, `{` and suffixes the parser accepts
pub(crate) const MAX_NESTING_DEPTH: usize = 256;

/// Recursive descent parser over the type-string grammar:
///
/// ```text
/// type     := primary suffix*
/// suffix   := '*' | '@' PLACEMENT
/// primary  := '(' [type] '->' type ')'
///           | '{' type '}'              (must be followed by '@' PLACEMENT)
///           | [IDENT] '<' [element (',' element)*] '>'
///           | DTYPE ['[' [dim (',' dim)*] ']']
/// element  := [IDENT '='] type
/// dim      := NUMBER | '?'
/// ```
struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> TypeParser<'a> {
    fn new(input: &'a str) -> Self {
        TypeParser { input, pos: 0, depth: 0 }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_raw() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn peek_raw(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.peek_raw()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char, what: &'static str) -> Result<(), TypeParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(TypeParseError::UnexpectedChar {
                found: c,
                offset: self.pos,
                expected: what,
            }),
            None => Err(TypeParseError::UnexpectedEnd { expected: what }),
        }
    }

    /// Consume `[A-Za-z_][A-Za-z0-9_]*`, or return `None` without moving.
    fn identifier(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let input = self.input;
        let rest = &input[self.pos..];
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return None,
        }
        let end = chars
            .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += end;
        Some(&rest[..end])
    }

    fn parse_type(&mut self) -> Result<ComputationType, TypeParseError> {
        self.skip_whitespace();
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(TypeParseError::TooDeep {
                offset: self.pos,
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let parsed = self.parse_nested_type();
        self.depth -= 1;
        parsed
    }

    fn parse_nested_type(&mut self) -> Result<ComputationType, TypeParseError> {
        let start = self.pos;
        let (mut parsed, mut braced) = self.parse_primary()?;

        if braced && self.peek() != Some('@') {
            return Err(TypeParseError::MissingPlacement { offset: start });
        }

        loop {
            if self.eat('*') {
                parsed = ComputationType::sequence(parsed);
            } else if self.eat('@') {
                let placement = self.parse_placement()?;
                // Only the '@' directly after `{T}` marks a non-all-equal value
                parsed = FederatedType::new(parsed, placement)
                    .with_all_equal(!braced)
                    .into();
                braced = false;
            } else {
                break;
            }
        }

        Ok(parsed)
    }

    fn parse_placement(&mut self) -> Result<Placement, TypeParseError> {
        self.skip_whitespace();
        let offset = self.pos;
        match self.identifier() {
            Some(name) => name.parse().map_err(|e: TypeParseError| e.at_offset(offset)),
            None => match self.peek() {
                Some(c) => Err(TypeParseError::UnexpectedChar {
                    found: c,
                    offset: self.pos,
                    expected: "a placement",
                }),
                None => Err(TypeParseError::UnexpectedEnd { expected: "a placement" }),
            },
        }
    }

    /// Returns the parsed type and whether it was written as `{T}`.
    fn parse_primary(&mut self) -> Result<(ComputationType, bool), TypeParseError> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                self.parse_function().map(|t| (t, false))
            }
            Some('{') => {
                self.pos += 1;
                let member = self.parse_type()?;
                self.expect('}', "'}'")?;
                Ok((member, true))
            }
            Some('<') => {
                self.pos += 1;
                self.parse_struct_body(None).map(|t| (t, false))
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let offset = self.pos;
                let ident = self.identifier().ok_or(TypeParseError::UnexpectedChar {
                    found: c,
                    offset,
                    expected: "a type",
                })?;
                if self.eat('<') {
                    let container = Container::from_name(ident);
                    return self.parse_struct_body(Some(container)).map(|t| (t, false));
                }
                let dtype: DType = ident.parse().map_err(|e: TypeParseError| e.at_offset(offset))?;
                let shape = if self.eat('[') { self.parse_dims()? } else { Vec::new() };
                Ok((TensorType::new(dtype, shape).into(), false))
            }
            Some(c) => Err(TypeParseError::UnexpectedChar {
                found: c,
                offset: self.pos,
                expected: "a type",
            }),
            None => Err(TypeParseError::UnexpectedEnd { expected: "a type" }),
        }
    }

    /// Parses after the opening '('.
    fn parse_function(&mut self) -> Result<ComputationType, TypeParseError> {
        let parameter = if self.at_arrow() {
            None
        } else {
            Some(self.parse_type()?)
        };
        self.expect('-', "'->'")?;
        self.expect('>', "'->'")?;
        let result = self.parse_type()?;
        self.expect(')', "')'")?;
        Ok(ComputationType::function(parameter, result))
    }

    fn at_arrow(&mut self) -> bool {
        self.peek() == Some('-')
    }

    /// Parses after the opening '<'.
    fn parse_struct_body(&mut self, container: Option<Container>) -> Result<ComputationType, TypeParseError> {
        let mut elements: Vec<(Option<String>, ComputationType)> = Vec::new();
        if !self.eat('>') {
            loop {
                let name = self.element_name();
                let value = self.parse_type()?;
                elements.push((name, value));
                if self.eat(',') {
                    continue;
                }
                self.expect('>', "',' or '>'")?;
                break;
            }
        }
        let mut st = StructType::new(elements);
        if let Some(container) = container {
            st = st.with_container(container);
        }
        Ok(st.into())
    }

    /// Consume `IDENT '='` if present, otherwise leave the input untouched.
    fn element_name(&mut self) -> Option<String> {
        let checkpoint = self.pos;
        if let Some(ident) = self.identifier() {
            if self.eat('=') {
                return Some(ident.to_string());
            }
        }
        self.pos = checkpoint;
        None
    }

    /// Parses after the opening '['.
    fn parse_dims(&mut self) -> Result<Vec<Option<u64>>, TypeParseError> {
        let mut dims = Vec::new();
        if self.eat(']') {
            return Ok(dims);
        }
        loop {
            self.skip_whitespace();
            let offset = self.pos;
            let rest = &self.input[offset..];
            let end = rest
                .find(|c: char| c == ',' || c == ']' || c.is_whitespace())
                .unwrap_or(rest.len());
            let token = &rest[..end];
            if token.is_empty() {
                return Err(match rest.chars().next() {
                    Some(found) => TypeParseError::UnexpectedChar {
                        found,
                        offset,
                        expected: "a dimension",
                    },
                    None => TypeParseError::UnexpectedEnd {
                        expected: "a dimension or ']'",
                    },
                });
            }
            let dim = match token {
                "?" => None,
                digits => Some(digits.parse::<u64>().map_err(|_| TypeParseError::InvalidDimension {
                    token: digits.to_string(),
                    offset,
                })?),
            };
            self.pos += end;
            dims.push(dim);
            if self.eat(',') {
                continue;
            }
            self.expect(']', "',' or ']'")?;
            return Ok(dims);
        }
    }
}
