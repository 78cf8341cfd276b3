//! Finalization of a round of federated training.
//!
//! A finalizer is the server-side step that runs after client model updates
//! have been aggregated. Its computations must have the signatures
//!
//! ```text
//! initialize_fn: ( -> S@SERVER)
//! next_fn:       (<S@SERVER,
//!                  ModelWeights<trainable=T,non_trainable=N>@SERVER,
//!                  U@SERVER>
//!                 ->
//!                 <state=S@SERVER,
//!                  result=ModelWeights<trainable=T,non_trainable=N>@SERVER,
//!                  measurements=M@SERVER>)
//! ```
//!
//! The second argument of `next_fn` carries the model weights to update and
//! must be tagged with the `ModelWeights` container. The third argument is the
//! information used to update them, often shaped like the trainable weights.
//! The `result` output holds the finalized weights and must be assignable to
//! the second argument's member type.

mod checks;

use federa_types::ComputationType;
use tracing::{debug, info, warn};

use crate::computation::ComputationRef;
use crate::error::TemplateError;
use crate::measured::MeasuredProcess;
use crate::process::StatefulProcess;
use checks::{FinalizerSignature, FINALIZER_CHECKS, MODEL_WEIGHTS_INDEX, UPDATE_INDEX};

/// A validated finalizer process.
///
/// Only obtainable through [`FinalizerProcess::new`], so holding one means
/// every contract check passed.
#[derive(Debug, Clone)]
pub struct FinalizerProcess {
    process: MeasuredProcess,
    model_weights_type: ComputationType,
    update_type: ComputationType,
}

impl FinalizerProcess {
    /// Validate the computation pair and build the process.
    ///
    /// The measured process base checks run first (no-arg initializer, state
    /// consistency, `<state,result,measurements>` output), then the finalizer
    /// checks in order. The first failure is returned.
    ///
    /// # Errors
    ///
    /// * `NotFederated` if the initializer result, or any flattened leaf of
    ///   the step parameter or result, has no placement
    /// * `Placement` if the state, the second or third argument, or the
    ///   `result` or `measurements` outputs are not at SERVER
    /// * `NextFnNumArgs` if the step parameter is not a 3-element struct
    /// * `ModelWeightsType` if the second argument is not a `ModelWeights` struct
    /// * `FinalizerResultType` if the `result` output does not fit the weights
    pub fn new(initialize_fn: ComputationRef, next_fn: ComputationRef) -> Result<Self, TemplateError> {
        let process = MeasuredProcess::new_multi_arg(initialize_fn, next_fn).map_err(|err| {
            warn!(code = err.error_code(), "finalizer rejected by measured process checks");
            err
        })?;

        let signature = FinalizerSignature {
            init: process.initialize_fn().type_signature(),
            next: process.next_fn().type_signature(),
        };
        for check in FINALIZER_CHECKS.iter() {
            debug!(check = check.name, "running finalizer check");
            if let Err(err) = (check.run)(&signature) {
                warn!(
                    check = check.name,
                    code = err.error_code(),
                    next_fn = process.next_fn().name(),
                    "finalizer signature rejected"
                );
                return Err(err);
            }
        }
        let model_weights_type = checks::next_param(&signature, MODEL_WEIGHTS_INDEX)?.clone();
        let update_type = checks::next_param(&signature, UPDATE_INDEX)?.clone();

        info!(
            initialize_fn = process.initialize_fn().name(),
            next_fn = process.next_fn().name(),
            state = %process.state_type(),
            "finalizer process constructed"
        );
        Ok(FinalizerProcess {
            process,
            model_weights_type,
            update_type,
        })
    }

    /// Type of the model weights argument, e.g. `ModelWeights<...>@SERVER`
    pub fn model_weights_type(&self) -> &ComputationType {
        &self.model_weights_type
    }

    /// Type of the update argument
    pub fn update_type(&self) -> &ComputationType {
        &self.update_type
    }

    /// Type of the `result` output
    pub fn result_type(&self) -> &ComputationType {
        self.process.result_type()
    }

    /// Type of the `measurements` output
    pub fn measurements_type(&self) -> &ComputationType {
        self.process.measurements_type()
    }
}

impl StatefulProcess for FinalizerProcess {
    fn initialize_fn(&self) -> &ComputationRef {
        self.process.initialize_fn()
    }

    fn next_fn(&self) -> &ComputationRef {
        self.process.next_fn()
    }

    fn state_type(&self) -> &ComputationType {
        self.process.state_type()
    }
}
