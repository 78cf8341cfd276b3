use federa_types::{ComputationType, FunctionType};
use tracing::debug;

use crate::computation::ComputationRef;
use crate::error::TemplateError;
use crate::process::StatefulProcess;

/// A process whose step function threads a state produced by the initializer.
///
/// Construction checks that the initializer takes no parameter and that the
/// state it returns is accepted by, and returned from, the step function. In
/// multi-arg mode the state is the first element of the step's parameter
/// struct; otherwise it is the whole parameter.
#[derive(Debug, Clone)]
pub struct IterativeProcess {
    initialize_fn: ComputationRef,
    next_fn: ComputationRef,
    state_type: ComputationType,
    next_is_multi_arg: bool,
}

impl IterativeProcess {
    /// Step function takes the state as its only argument
    pub fn new(initialize_fn: ComputationRef, next_fn: ComputationRef) -> Result<Self, TemplateError> {
        Self::build(initialize_fn, next_fn, false)
    }

    /// Step function takes a struct of arguments whose first element is the state
    pub fn new_multi_arg(initialize_fn: ComputationRef, next_fn: ComputationRef) -> Result<Self, TemplateError> {
        Self::build(initialize_fn, next_fn, true)
    }

    pub(crate) fn build(
        initialize_fn: ComputationRef,
        next_fn: ComputationRef,
        next_is_multi_arg: bool,
    ) -> Result<Self, TemplateError> {
        let state_type = check_state_contract(
            initialize_fn.type_signature(),
            next_fn.type_signature(),
            next_is_multi_arg,
        )?;

        debug!(
            initialize_fn = initialize_fn.name(),
            next_fn = next_fn.name(),
            state = %state_type,
            "iterative process state contract satisfied"
        );

        Ok(IterativeProcess {
            initialize_fn,
            next_fn,
            state_type,
            next_is_multi_arg,
        })
    }

    pub fn next_is_multi_arg(&self) -> bool {
        self.next_is_multi_arg
    }
}

impl StatefulProcess for IterativeProcess {
    fn initialize_fn(&self) -> &ComputationRef {
        &self.initialize_fn
    }

    fn next_fn(&self) -> &ComputationRef {
        &self.next_fn
    }

    fn state_type(&self) -> &ComputationType {
        &self.state_type
    }
}

/// Check the initializer/step state contract and return the state type.
fn check_state_contract(
    init: &FunctionType,
    next: &FunctionType,
    next_is_multi_arg: bool,
) -> Result<ComputationType, TemplateError> {
    if let Some(parameter) = init.parameter() {
        return Err(TemplateError::InitFnParamNotEmpty(format!(
            "Provided `initialize_fn` must be a no-arg function, but found input parameters {}.",
            parameter
        )));
    }
    let state_type = init.result().clone();

    let state_param = state_parameter(next, next_is_multi_arg)?;
    if !state_param.is_assignable_from(&state_type) {
        return Err(TemplateError::StateNotAssignable(format!(
            "The return type of `initialize_fn` must be assignable to the first input argument \
             of `next_fn`, but found\n`initialize_fn` which returns type:\n{}\n\
             which is not assignable to the first input argument of `next_fn`:\n{}",
            state_type, state_param
        )));
    }

    let mut next_state = next.result();
    if !state_param.is_equivalent_to(next_state) {
        // Multiple outputs: the state is expected to come first
        if let Some(first) = next_state.as_struct().and_then(|st| st.get(0)) {
            next_state = first;
        }
        if !state_param.is_equivalent_to(next_state) {
            return Err(TemplateError::StateNotAssignable(format!(
                "The first input argument and the state output of `next_fn` must be \
                 equivalent, but found\nfirst input argument:\n{}\nstate output:\n{}",
                state_param, next_state
            )));
        }
    }

    Ok(state_type)
}

fn state_parameter(next: &FunctionType, next_is_multi_arg: bool) -> Result<&ComputationType, TemplateError> {
    let parameter = next.parameter().ok_or_else(|| {
        TemplateError::NextFnNumArgs(format!(
            "The `next_fn` must take the state as an argument, but found a no-arg function {}.",
            next
        ))
    })?;

    if !next_is_multi_arg {
        return Ok(parameter);
    }

    parameter
        .as_struct()
        .and_then(|st| st.get(0))
        .ok_or_else(|| {
            TemplateError::NextFnNumArgs(format!(
                "The `next_fn` must take a struct of arguments whose first element is the \
                 state, but found input type {}.",
                parameter
            ))
        })
}
