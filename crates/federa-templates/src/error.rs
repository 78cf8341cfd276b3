use federa_types::TypeParseError;
use thiserror::Error;

/// Stable error codes for template construction failures
pub mod error_codes {
    /// A type in the initializer result or step signature has no placement
    pub const NOT_FEDERATED: &str = "ERR_TEMPLATE_NOT_FEDERATED";

    /// A value is placed somewhere other than where the template requires
    pub const PLACEMENT: &str = "ERR_TEMPLATE_PLACEMENT";

    /// The step parameter is not a struct or has the wrong number of elements
    pub const NEXT_FN_NUM_ARGS: &str = "ERR_TEMPLATE_NEXT_FN_NUM_ARGS";

    /// The initializer takes a parameter
    pub const INIT_FN_PARAM_NOT_EMPTY: &str = "ERR_TEMPLATE_INIT_FN_PARAM_NOT_EMPTY";

    /// Initializer and step disagree on the state type
    pub const STATE_NOT_ASSIGNABLE: &str = "ERR_TEMPLATE_STATE_NOT_ASSIGNABLE";

    /// The step result is not `<state,result,measurements>`
    pub const NOT_MEASURED_PROCESS_OUTPUT: &str = "ERR_TEMPLATE_NOT_MEASURED_PROCESS_OUTPUT";

    /// The model weights argument does not carry the ModelWeights container
    pub const MODEL_WEIGHTS_TYPE: &str = "ERR_FINALIZER_MODEL_WEIGHTS_TYPE";

    /// The finalizer result cannot be assigned back into the model weights
    pub const FINALIZER_RESULT_TYPE: &str = "ERR_FINALIZER_RESULT_TYPE";
}

/// Errors raised while constructing a process template.
///
/// Every variant is a permanent rejection of the computation pair; the
/// message embeds the offending type signatures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A type that must be federated has no placement
    #[error("Not federated: {0}")]
    NotFederated(String),

    /// A federated value is at the wrong placement
    #[error("Placement error: {0}")]
    Placement(String),

    /// The step parameter is not a struct of the expected arity
    #[error("Wrong number of next_fn arguments: {0}")]
    NextFnNumArgs(String),

    /// The initializer is not a no-arg computation
    #[error("initialize_fn takes parameters: {0}")]
    InitFnParamNotEmpty(String),

    /// The state produced by the initializer does not flow through the step
    #[error("State not assignable: {0}")]
    StateNotAssignable(String),

    /// The step result does not have the measured process output shape
    #[error("Not a measured process output: {0}")]
    NotMeasuredProcessOutput(String),

    /// The model weights argument is not the ModelWeights container
    #[error("Model weights type error: {0}")]
    ModelWeightsType(String),

    /// The produced result does not fit the declared model weights
    #[error("Finalizer result type error: {0}")]
    FinalizerResultType(String),
}

impl TemplateError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            TemplateError::NotFederated(_) => error_codes::NOT_FEDERATED,
            TemplateError::Placement(_) => error_codes::PLACEMENT,
            TemplateError::NextFnNumArgs(_) => error_codes::NEXT_FN_NUM_ARGS,
            TemplateError::InitFnParamNotEmpty(_) => error_codes::INIT_FN_PARAM_NOT_EMPTY,
            TemplateError::StateNotAssignable(_) => error_codes::STATE_NOT_ASSIGNABLE,
            TemplateError::NotMeasuredProcessOutput(_) => error_codes::NOT_MEASURED_PROCESS_OUTPUT,
            TemplateError::ModelWeightsType(_) => error_codes::MODEL_WEIGHTS_TYPE,
            TemplateError::FinalizerResultType(_) => error_codes::FINALIZER_RESULT_TYPE,
        }
    }

    /// The human-readable message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            TemplateError::NotFederated(msg)
            | TemplateError::Placement(msg)
            | TemplateError::NextFnNumArgs(msg)
            | TemplateError::InitFnParamNotEmpty(msg)
            | TemplateError::StateNotAssignable(msg)
            | TemplateError::NotMeasuredProcessOutput(msg)
            | TemplateError::ModelWeightsType(msg)
            | TemplateError::FinalizerResultType(msg) => msg,
        }
    }
}

/// Errors turning a type string into a computation signature
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The type string does not parse
    #[error("invalid type signature: {0}")]
    Parse(#[from] TypeParseError),

    /// The type string parses but is not a function type
    #[error("type signature must be a function type, but found {0}")]
    NotAFunction(String),
}

impl SignatureError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            SignatureError::Parse(err) => err.error_code(),
            SignatureError::NotAFunction(_) => "ERR_SIGNATURE_NOT_A_FUNCTION",
        }
    }
}
