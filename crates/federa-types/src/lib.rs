//! # Federa Types
//!
//! Type metadata for federated computations: placements, tensors, structs,
//! sequences, functions and federated (placed) values. Types are pure
//! descriptors; nothing here holds or moves data.
//!
//! ## Type strings
//!
//! Every type has a compact textual form, produced by `Display` and accepted
//! by `FromStr`:
//!
//! | form                          | meaning                                   |
//! |-------------------------------|-------------------------------------------|
//! | `float32`, `int64[10,?]`      | tensor with optional shape                |
//! | `<a=int32,float32>`           | struct with named and positional elements |
//! | `ModelWeights<trainable=...>` | struct tagged with a container            |
//! | `int32*`                      | sequence                                  |
//! | `int32@SERVER`                | federated, one value shared by all        |
//! | `{int32}@CLIENTS`             | federated, one value per participant      |
//! | `(int32 -> bool)`, `( -> T)`  | function, with or without a parameter     |
//!
//! ```
//! use federa_types::{ComputationType, Placement};
//!
//! let t: ComputationType = "<lr=float32>@SERVER".parse().unwrap();
//! assert!(t.is_placed_at(Placement::Server));
//! assert_eq!(t.to_string(), "<lr=float32>@SERVER");
//! ```

#![forbid(unsafe_code)]

mod assignability;
mod error;
mod parser;
mod placement;
mod structure;
mod types;

pub use error::TypeParseError;
pub use placement::Placement;
pub use types::{
    ComputationType, Container, DType, FederatedType, FunctionType, StructElement, StructType,
    TensorType,
};

/// Returns a version string for the Federa types crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
