//! # Federa Templates
//!
//! Stateful process templates for federated learning. A template pairs an
//! initializer computation with a step computation and checks, when the
//! process is built, that their type signatures fit the template's contract.
//! Nothing is executed; a successfully built process is proof that the
//! signatures line up.
//!
//! ## Templates
//!
//! * [`IterativeProcess`]: state produced by the initializer flows through the step
//! * [`MeasuredProcess`]: the step returns `<state,result,measurements>`
//! * [`FinalizerProcess`]: the server-side step applying an aggregated update
//!   to `ModelWeights`
//!
//! ## Example
//!
//! ```
//! use federa_templates::{FinalizerProcess, StatefulProcess, TypedComputation};
//!
//! let init = TypedComputation::parse("init", "( -> <lr=float32>@SERVER)").unwrap();
//! let next = TypedComputation::parse(
//!     "next",
//!     "(<<lr=float32>@SERVER,\
//!        ModelWeights<trainable=<float32[10]>,non_trainable=<>>@SERVER,\
//!        <float32[10]>@SERVER> -> \
//!      <state=<lr=float32>@SERVER,\
//!       result=ModelWeights<trainable=<float32[10]>,non_trainable=<>>@SERVER,\
//!       measurements=<update_norm=float32>@SERVER>)",
//! )
//! .unwrap();
//!
//! let finalizer = FinalizerProcess::new(init.into_ref(), next.into_ref()).unwrap();
//! assert_eq!(finalizer.state_type().to_string(), "<lr=float32>@SERVER");
//! ```

#![forbid(unsafe_code)]

mod computation;
mod error;
mod finalizer;
mod iterative;
mod measured;
mod process;

pub mod document;

pub use computation::{Computation, ComputationRef, TypedComputation};
pub use document::{parse_and_validate_process_document, DocumentError};
pub use error::{error_codes, SignatureError, TemplateError};
pub use finalizer::FinalizerProcess;
pub use iterative::IterativeProcess;
pub use measured::{MeasuredProcess, MEASURED_OUTPUT_FIELDS};
pub use process::StatefulProcess;

/// Returns a version string for the Federa templates crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
