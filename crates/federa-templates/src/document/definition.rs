use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A process document as written in YAML.
/// This is the top-level structure listing every declared process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessDocument {
    /// The document format version (e.g., "1.0")
    pub version: String,

    /// Declared processes
    #[serde(default)]
    pub processes: Vec<ProcessDefinition>,
}

/// One declared process: a template kind plus its two computations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessDefinition {
    /// Unique name of the process
    pub name: String,

    /// Which template validates the computations
    pub kind: ProcessKind,

    /// Optional human-readable description
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the step takes a struct of arguments with the state first.
    /// Finalizers are always multi-arg.
    #[serde(default)]
    pub multi_arg: bool,

    /// The initializer
    pub initialize_fn: ComputationDefinition,

    /// The step function
    pub next_fn: ComputationDefinition,

    /// Optional metadata for this process (arbitrary key-value pairs)
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// A computation declared by name and function type string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationDefinition {
    /// Name of the computation
    pub name: String,

    /// Function type string, e.g. `( -> int32@SERVER)`
    pub type_signature: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessKind {
    Iterative,
    Measured,
    Finalizer,
}

impl ProcessKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessKind::Iterative => "iterative",
            ProcessKind::Measured => "measured",
            ProcessKind::Finalizer => "finalizer",
        }
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
