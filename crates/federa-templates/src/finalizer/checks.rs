use federa_types::{ComputationType, Container, FunctionType, Placement, StructType};

use crate::error::TemplateError;
use crate::measured::measured_output;

/// The signatures a finalizer check looks at
pub(crate) struct FinalizerSignature<'a> {
    pub init: &'a FunctionType,
    pub next: &'a FunctionType,
}

/// A single named contract check
pub(crate) struct SignatureCheck {
    pub name: &'static str,
    pub run: fn(&FinalizerSignature<'_>) -> Result<(), TemplateError>,
}

/// Finalizer contract checks, in the order they are applied. Later checks may
/// rely on the shape guaranteed by earlier ones.
pub(crate) static FINALIZER_CHECKS: [SignatureCheck; 10] = [
    SignatureCheck {
        name: "init_result_federated",
        run: check_init_result_federated,
    },
    SignatureCheck {
        name: "next_fn_federated",
        run: check_next_fn_federated,
    },
    SignatureCheck {
        name: "state_at_server",
        run: check_state_at_server,
    },
    SignatureCheck {
        name: "next_fn_arity",
        run: check_next_fn_arity,
    },
    SignatureCheck {
        name: "model_weights_at_server",
        run: check_model_weights_at_server,
    },
    SignatureCheck {
        name: "model_weights_container",
        run: check_model_weights_container,
    },
    SignatureCheck {
        name: "update_at_server",
        run: check_update_at_server,
    },
    SignatureCheck {
        name: "result_at_server",
        run: check_result_at_server,
    },
    SignatureCheck {
        name: "result_assignable_to_weights",
        run: check_result_assignable,
    },
    SignatureCheck {
        name: "measurements_at_server",
        run: check_measurements_at_server,
    },
];

/// Number of arguments the finalizer step takes
const NEXT_FN_ARITY: usize = 3;
pub(crate) const MODEL_WEIGHTS_INDEX: usize = 1;
pub(crate) const UPDATE_INDEX: usize = 2;

fn check_init_result_federated(sig: &FinalizerSignature<'_>) -> Result<(), TemplateError> {
    let result = sig.init.result();
    if result.is_federated() {
        return Ok(());
    }
    Err(TemplateError::NotFederated(format!(
        "Provided `initialize_fn` must return a federated type, but found return type:\n{}\n\
         Tip: If you see a collection of federated types, try zipping them into a single \
         federated value before returning.",
        result
    )))
}

fn check_next_fn_federated(sig: &FinalizerSignature<'_>) -> Result<(), TemplateError> {
    let mut leaves = sig.next.parameter().map(ComputationType::flatten).unwrap_or_default();
    leaves.extend(sig.next.result().flatten());

    let offending: Vec<String> = leaves
        .into_iter()
        .filter(|t| !t.is_federated())
        .map(ToString::to_string)
        .collect();
    if offending.is_empty() {
        return Ok(());
    }
    Err(TemplateError::NotFederated(format!(
        "Provided `next_fn` must be a *federated* computation, that is, operate on federated \
         types, but found\nnext_fn with type signature:\n{}\nThe non-federated types are:\n- {}",
        sig.next,
        offending.join("\n- ")
    )))
}

fn check_state_at_server(sig: &FinalizerSignature<'_>) -> Result<(), TemplateError> {
    let result = sig.init.result();
    if result.is_placed_at(Placement::Server) {
        return Ok(());
    }
    Err(TemplateError::Placement(format!(
        "The state controlled by a finalizer process must be placed at the SERVER, but found \
         type: {}.",
        result
    )))
}

fn check_next_fn_arity(sig: &FinalizerSignature<'_>) -> Result<(), TemplateError> {
    next_params(sig).map(|_| ())
}

fn check_model_weights_at_server(sig: &FinalizerSignature<'_>) -> Result<(), TemplateError> {
    let weights = next_param(sig, MODEL_WEIGHTS_INDEX)?;
    if weights.is_placed_at(Placement::Server) {
        return Ok(());
    }
    Err(TemplateError::Placement(format!(
        "The second input argument of `next_fn` must be placed at SERVER but found {}.",
        weights
    )))
}

fn check_model_weights_container(sig: &FinalizerSignature<'_>) -> Result<(), TemplateError> {
    let weights = next_param(sig, MODEL_WEIGHTS_INDEX)?;
    let tagged = weights
        .federated_member()
        .and_then(ComputationType::as_struct)
        .map_or(false, |st| st.has_container(&Container::ModelWeights));
    if tagged {
        return Ok(());
    }
    Err(TemplateError::ModelWeightsType(format!(
        "The second input argument of `next_fn` must have the `ModelWeights` container but \
         found {}",
        weights
    )))
}

fn check_update_at_server(sig: &FinalizerSignature<'_>) -> Result<(), TemplateError> {
    let update = next_param(sig, UPDATE_INDEX)?;
    if update.is_placed_at(Placement::Server) {
        return Ok(());
    }
    Err(TemplateError::Placement(format!(
        "The third input argument of `next_fn` must be placed at SERVER but found {}.",
        update
    )))
}

fn check_result_at_server(sig: &FinalizerSignature<'_>) -> Result<(), TemplateError> {
    let result = measured_output(sig.next.result())?.result;
    if result.is_placed_at(Placement::Server) {
        return Ok(());
    }
    Err(TemplateError::Placement(format!(
        "The \"result\" attribute of the return type of `next_fn` must be placed at SERVER, \
         but found {}.",
        result
    )))
}

fn check_result_assignable(sig: &FinalizerSignature<'_>) -> Result<(), TemplateError> {
    let weights = next_param(sig, MODEL_WEIGHTS_INDEX)?;
    let result = measured_output(sig.next.result())?.result;
    let weights_member = weights.federated_member().unwrap_or(weights);
    let result_member = result.federated_member().unwrap_or(result);
    if weights_member.is_assignable_from(result_member) {
        return Ok(());
    }
    Err(TemplateError::FinalizerResultType(format!(
        "The second input argument of `next_fn` must match the \"result\" attribute of the \
         return type of `next_fn`. Found:\nSecond input argument: {}\nResult attribute: {}.",
        weights_member, result_member
    )))
}

fn check_measurements_at_server(sig: &FinalizerSignature<'_>) -> Result<(), TemplateError> {
    let measurements = measured_output(sig.next.result())?.measurements;
    if measurements.is_placed_at(Placement::Server) {
        return Ok(());
    }
    Err(TemplateError::Placement(format!(
        "The \"measurements\" attribute of the return type of `next_fn` must be placed at \
         SERVER, but found {}.",
        measurements
    )))
}

fn next_params<'a>(sig: &FinalizerSignature<'a>) -> Result<&'a StructType, TemplateError> {
    let parameter = match sig.next.parameter() {
        Some(parameter) => parameter,
        None => {
            return Err(TemplateError::NextFnNumArgs(format!(
                "The `next_fn` must have exactly three input arguments, but found a no-arg \
                 function {}.",
                sig.next
            )))
        }
    };
    let params = parameter.as_struct().ok_or_else(|| {
        TemplateError::NextFnNumArgs(format!(
            "The `next_fn` must have exactly three input arguments, but found the following \
             input type which is not a struct: {}.",
            parameter
        ))
    })?;
    if params.len() != NEXT_FN_ARITY {
        let listed: Vec<String> = params.iter().map(ToString::to_string).collect();
        return Err(TemplateError::NextFnNumArgs(format!(
            "The `next_fn` must have exactly three input arguments, but found {} input \
             arguments:\n- {}",
            params.len(),
            listed.join("\n- ")
        )));
    }
    Ok(params)
}

pub(crate) fn next_param<'a>(
    sig: &FinalizerSignature<'a>,
    index: usize,
) -> Result<&'a ComputationType, TemplateError> {
    let params = next_params(sig)?;
    params.get(index).ok_or_else(|| {
        TemplateError::NextFnNumArgs(format!("The `next_fn` has no input argument at position {}.", index))
    })
}
