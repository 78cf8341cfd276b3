use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypeParseError;
use crate::placement::Placement;

/// Element type of a tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    Float32,
    Float64,
    String,
}

impl DType {
    const ALL: [DType; 13] = [
        DType::Bool,
        DType::Int8,
        DType::Int16,
        DType::Int32,
        DType::Int64,
        DType::UInt8,
        DType::UInt16,
        DType::UInt32,
        DType::UInt64,
        DType::Float16,
        DType::Float32,
        DType::Float64,
        DType::String,
    ];

    /// Name used in type strings (e.g., "float32")
    pub fn as_str(&self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Float16 => "float16",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::String => "string",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DType {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DType::ALL
            .iter()
            .copied()
            .find(|dtype| dtype.as_str() == s)
            .ok_or_else(|| TypeParseError::UnknownDType {
                name: s.to_string(),
                offset: 0,
            })
    }
}

/// A dense tensor. Each dimension is either known or unknown (`None`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TensorType {
    pub dtype: DType,
    pub shape: Vec<Option<u64>>,
}

impl TensorType {
    pub fn new(dtype: DType, shape: impl Into<Vec<Option<u64>>>) -> Self {
        TensorType {
            dtype,
            shape: shape.into(),
        }
    }

    pub fn scalar(dtype: DType) -> Self {
        TensorType {
            dtype,
            shape: Vec::new(),
        }
    }

    /// Tensor with every dimension known
    pub fn with_dims(dtype: DType, dims: &[u64]) -> Self {
        TensorType {
            dtype,
            shape: dims.iter().map(|&d| Some(d)).collect(),
        }
    }
}

/// Structural tag attached to a struct, identifying what kind of container
/// the struct stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Container {
    /// Model parameters split into trainable and non-trainable groups
    ModelWeights,
    /// Any other named container
    Named(String),
}

impl Container {
    /// Name written in front of the struct body in type strings
    pub fn name(&self) -> &str {
        match self {
            Container::ModelWeights => "ModelWeights",
            Container::Named(name) => name,
        }
    }

    pub(crate) fn from_name(name: &str) -> Self {
        match name {
            "ModelWeights" => Container::ModelWeights,
            other => Container::Named(other.to_string()),
        }
    }
}

/// One (optionally named) element of a struct
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructElement {
    pub name: Option<String>,
    pub value_type: ComputationType,
}

/// An ordered sequence of optionally named elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StructType {
    elements: Vec<StructElement>,
    container: Option<Container>,
}

impl StructType {
    pub fn new<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = (Option<S>, ComputationType)>,
        S: Into<String>,
    {
        StructType {
            elements: elements
                .into_iter()
                .map(|(name, value_type)| StructElement {
                    name: name.map(Into::into),
                    value_type,
                })
                .collect(),
            container: None,
        }
    }

    /// Struct whose elements are all named
    pub fn named<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = (S, ComputationType)>,
        S: Into<String>,
    {
        Self::new(elements.into_iter().map(|(name, t)| (Some(name), t)))
    }

    /// Struct whose elements are all positional
    pub fn unnamed<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = ComputationType>,
    {
        Self::new(elements.into_iter().map(|t| (None::<String>, t)))
    }

    /// `ModelWeights<trainable=..., non_trainable=...>`
    pub fn model_weights(trainable: ComputationType, non_trainable: ComputationType) -> Self {
        Self::named([("trainable", trainable), ("non_trainable", non_trainable)])
            .with_container(Container::ModelWeights)
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.container = Some(container);
        self
    }

    pub fn container(&self) -> Option<&Container> {
        self.container.as_ref()
    }

    /// Whether this struct carries the given container tag
    pub fn has_container(&self, container: &Container) -> bool {
        self.container.as_ref() == Some(container)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[StructElement] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<&ComputationType> {
        self.elements.get(index).map(|e| &e.value_type)
    }

    /// Look up an element by name
    pub fn field(&self, name: &str) -> Option<&ComputationType> {
        self.elements
            .iter()
            .find(|e| e.name.as_deref() == Some(name))
            .map(|e| &e.value_type)
    }

    /// Element names in order; positional elements yield `None`
    pub fn names(&self) -> impl Iterator<Item = Option<&str>> {
        self.elements.iter().map(|e| e.name.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComputationType> {
        self.elements.iter().map(|e| &e.value_type)
    }
}

/// A value placed at SERVER or CLIENTS
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FederatedType {
    pub member: Box<ComputationType>,
    pub placement: Placement,
    /// Whether every participant at the placement holds the same member
    pub all_equal: bool,
}

impl FederatedType {
    /// Federated type with the placement's default all-equal bit
    pub fn new(member: ComputationType, placement: Placement) -> Self {
        FederatedType {
            member: Box::new(member),
            placement,
            all_equal: placement.default_all_equal(),
        }
    }

    pub fn with_all_equal(mut self, all_equal: bool) -> Self {
        self.all_equal = all_equal;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub parameter: Option<Box<ComputationType>>,
    pub result: Box<ComputationType>,
}

impl FunctionType {
    pub fn new(parameter: Option<ComputationType>, result: ComputationType) -> Self {
        FunctionType {
            parameter: parameter.map(Box::new),
            result: Box::new(result),
        }
    }

    pub fn parameter(&self) -> Option<&ComputationType> {
        self.parameter.as_deref()
    }

    pub fn result(&self) -> &ComputationType {
        &self.result
    }
}

/// Type metadata of a value or computation.
///
/// Serializes as its type string (see the crate docs for the syntax).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ComputationType {
    Tensor(TensorType),
    Struct(StructType),
    Sequence(Box<ComputationType>),
    Function(FunctionType),
    Federated(FederatedType),
}

impl ComputationType {
    pub fn scalar(dtype: DType) -> Self {
        ComputationType::Tensor(TensorType::scalar(dtype))
    }

    pub fn tensor(dtype: DType, dims: &[u64]) -> Self {
        ComputationType::Tensor(TensorType::with_dims(dtype, dims))
    }

    pub fn sequence(element: ComputationType) -> Self {
        ComputationType::Sequence(Box::new(element))
    }

    pub fn function(parameter: Option<ComputationType>, result: ComputationType) -> Self {
        ComputationType::Function(FunctionType::new(parameter, result))
    }

    pub fn federated(member: ComputationType, placement: Placement) -> Self {
        ComputationType::Federated(FederatedType::new(member, placement))
    }

    /// Shorthand for `member@SERVER`
    pub fn at_server(member: ComputationType) -> Self {
        Self::federated(member, Placement::Server)
    }

    /// Shorthand for `{member}@CLIENTS`
    pub fn at_clients(member: ComputationType) -> Self {
        Self::federated(member, Placement::Clients)
    }

    pub fn named_struct<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = (S, ComputationType)>,
        S: Into<String>,
    {
        ComputationType::Struct(StructType::named(elements))
    }

    pub fn unnamed_struct<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = ComputationType>,
    {
        ComputationType::Struct(StructType::unnamed(elements))
    }

    pub fn is_federated(&self) -> bool {
        matches!(self, ComputationType::Federated(_))
    }

    /// Placement of a federated type, `None` for anything else
    pub fn placement(&self) -> Option<Placement> {
        match self {
            ComputationType::Federated(fed) => Some(fed.placement),
            _ => None,
        }
    }

    /// Whether this is a federated type placed at `placement`
    pub fn is_placed_at(&self, placement: Placement) -> bool {
        self.placement() == Some(placement)
    }

    /// Member type of a federated type
    pub fn federated_member(&self) -> Option<&ComputationType> {
        match self {
            ComputationType::Federated(fed) => Some(&fed.member),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            ComputationType::Struct(st) => Some(st),
            _ => None,
        }
    }
}

impl From<TensorType> for ComputationType {
    fn from(t: TensorType) -> Self {
        ComputationType::Tensor(t)
    }
}

impl From<StructType> for ComputationType {
    fn from(t: StructType) -> Self {
        ComputationType::Struct(t)
    }
}

impl From<FederatedType> for ComputationType {
    fn from(t: FederatedType) -> Self {
        ComputationType::Federated(t)
    }
}

impl From<FunctionType> for ComputationType {
    fn from(t: FunctionType) -> Self {
        ComputationType::Function(t)
    }
}

impl fmt::Display for TensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dtype)?;
        if self.shape.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, dim) in self.shape.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match dim {
                Some(d) => write!(f, "{}", d)?,
                None => f.write_str("?")?,
            }
        }
        f.write_str("]")
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(container) = &self.container {
            f.write_str(container.name())?;
        }
        f.write_str("<")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if let Some(name) = &element.name {
                write!(f, "{}=", name)?;
            }
            write!(f, "{}", element.value_type)?;
        }
        f.write_str(">")
    }
}

impl fmt::Display for FederatedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.all_equal {
            write!(f, "{}@{}", self.member, self.placement)
        } else {
            write!(f, "{{{}}}@{}", self.member, self.placement)
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parameter {
            Some(parameter) => write!(f, "({} -> {})", parameter, self.result),
            None => write!(f, "( -> {})", self.result),
        }
    }
}

impl fmt::Display for ComputationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputationType::Tensor(t) => fmt::Display::fmt(t, f),
            ComputationType::Struct(t) => fmt::Display::fmt(t, f),
            ComputationType::Sequence(element) => write!(f, "{}*", element),
            ComputationType::Function(t) => fmt::Display::fmt(t, f),
            ComputationType::Federated(t) => fmt::Display::fmt(t, f),
        }
    }
}

impl TryFrom<String> for ComputationType {
    type Error = TypeParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ComputationType> for String {
    fn from(t: ComputationType) -> Self {
        t.to_string()
    }
}
