use federa_types::{ComputationType, FunctionType};
use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::error::SignatureError;

/// A typed computation handle.
///
/// Templates only look at the type signature; how (or whether) the
/// computation runs is up to the implementor.
pub trait Computation: Debug + Send + Sync {
    /// Name used in logs and error reports
    fn name(&self) -> &str;

    /// The function type of the computation
    fn type_signature(&self) -> &FunctionType;
}

/// Shared handle to a computation, as stored by process templates
pub type ComputationRef = Arc<dyn Computation>;

/// A computation known only by its name and signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedComputation {
    name: String,
    type_signature: FunctionType,
}

impl TypedComputation {
    pub fn new(name: impl Into<String>, type_signature: FunctionType) -> Self {
        TypedComputation {
            name: name.into(),
            type_signature,
        }
    }

    /// Build a computation from a function type string such as
    /// `( -> int32@SERVER)`.
    pub fn parse(name: impl Into<String>, signature: &str) -> Result<Self, SignatureError> {
        let parsed: ComputationType = signature.parse()?;
        match parsed {
            ComputationType::Function(func) => Ok(Self::new(name, func)),
            other => Err(SignatureError::NotAFunction(other.to_string())),
        }
    }

    /// Wrap in the shared handle templates expect
    pub fn into_ref(self) -> ComputationRef {
        Arc::new(self)
    }
}

impl Computation for TypedComputation {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_signature(&self) -> &FunctionType {
        &self.type_signature
    }
}

impl fmt::Display for TypedComputation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.type_signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use federa_types::DType;

    #[test]
    fn test_parse_function_signature() {
        let comp = TypedComputation::parse("init", "( -> int32@SERVER)").unwrap();
        assert_eq!(comp.name(), "init");
        assert!(comp.type_signature().parameter().is_none());
        assert_eq!(
            comp.type_signature().result(),
            &ComputationType::at_server(ComputationType::scalar(DType::Int32))
        );
        assert_eq!(comp.to_string(), "init: ( -> int32@SERVER)");
    }

    #[test]
    fn test_parse_rejects_non_function() {
        let err = TypedComputation::parse("init", "int32@SERVER").unwrap_err();
        assert_eq!(err, SignatureError::NotAFunction("int32@SERVER".to_string()));
    }

    #[test]
    fn test_parse_reports_type_errors() {
        let err = TypedComputation::parse("init", "( -> float128)").unwrap_err();
        assert!(matches!(err, SignatureError::Parse(_)));
    }
}
