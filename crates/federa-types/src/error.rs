use thiserror::Error;

/// Errors produced while parsing a type string such as `<a=int32>@SERVER`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeParseError {
    /// The input ended while more was expected
    #[error("unexpected end of type string, expected {expected}")]
    UnexpectedEnd {
        /// What the parser was looking for
        expected: &'static str,
    },

    /// A character that cannot start or continue the current production
    #[error("unexpected '{found}' at offset {offset}, expected {expected}")]
    UnexpectedChar {
        /// The offending character
        found: char,
        /// Byte offset into the input
        offset: usize,
        /// What the parser was looking for
        expected: &'static str,
    },

    /// Identifier that is neither a dtype nor followed by a struct body
    #[error("unknown dtype '{name}' at offset {offset}")]
    UnknownDType {
        /// The unrecognized identifier
        name: String,
        /// Byte offset of the identifier
        offset: usize,
    },

    /// Placement name other than SERVER or CLIENTS
    #[error("unknown placement '{name}' at offset {offset}")]
    UnknownPlacement {
        /// The unrecognized placement name
        name: String,
        /// Byte offset of the name
        offset: usize,
    },

    /// Tensor dimension that is neither a number nor '?'
    #[error("invalid tensor dimension '{token}' at offset {offset}")]
    InvalidDimension {
        /// The offending token
        token: String,
        /// Byte offset of the token
        offset: usize,
    },

    /// A `{T}` member written without the `@PLACEMENT` that must follow it
    #[error("'{{...}}' at offset {offset} must be followed by a placement")]
    MissingPlacement {
        /// Byte offset of the opening brace
        offset: usize,
    },

    /// Nesting deeper than the parser accepts
    #[error("type nested deeper than {limit} levels at offset {offset}")]
    TooDeep {
        /// Byte offset where the limit was exceeded
        offset: usize,
        /// The nesting limit
        limit: usize,
    },

    /// A complete type was parsed but input remains
    #[error("trailing input at offset {offset}: '{rest}'")]
    TrailingInput {
        /// Byte offset where the trailing input starts
        offset: usize,
        /// The unparsed remainder
        rest: String,
    },
}

impl TypeParseError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            TypeParseError::UnexpectedEnd { .. } => "ERR_TYPE_UNEXPECTED_END",
            TypeParseError::UnexpectedChar { .. } => "ERR_TYPE_UNEXPECTED_CHAR",
            TypeParseError::UnknownDType { .. } => "ERR_TYPE_UNKNOWN_DTYPE",
            TypeParseError::UnknownPlacement { .. } => "ERR_TYPE_UNKNOWN_PLACEMENT",
            TypeParseError::InvalidDimension { .. } => "ERR_TYPE_INVALID_DIMENSION",
            TypeParseError::MissingPlacement { .. } => "ERR_TYPE_MISSING_PLACEMENT",
            TypeParseError::TooDeep { .. } => "ERR_TYPE_TOO_DEEP",
            TypeParseError::TrailingInput { .. } => "ERR_TYPE_TRAILING_INPUT",
        }
    }

    /// Move a name-level error to where the name starts in the input
    pub(crate) fn at_offset(self, offset: usize) -> Self {
        match self {
            TypeParseError::UnknownDType { name, .. } => TypeParseError::UnknownDType { name, offset },
            TypeParseError::UnknownPlacement { name, .. } => TypeParseError::UnknownPlacement { name, offset },
            other => other,
        }
    }
}
