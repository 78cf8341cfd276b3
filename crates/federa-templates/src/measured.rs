use federa_types::ComputationType;
use tracing::debug;

use crate::computation::ComputationRef;
use crate::error::TemplateError;
use crate::iterative::IterativeProcess;
use crate::process::StatefulProcess;

/// Field names of a measured process step output, in order
pub const MEASURED_OUTPUT_FIELDS: [&str; 3] = ["state", "result", "measurements"];

/// An iterative process whose step also reports measurements.
///
/// The step function must return `<state=S,result=R,measurements=M>`.
#[derive(Debug, Clone)]
pub struct MeasuredProcess {
    process: IterativeProcess,
    result_type: ComputationType,
    measurements_type: ComputationType,
}

impl MeasuredProcess {
    pub fn new(initialize_fn: ComputationRef, next_fn: ComputationRef) -> Result<Self, TemplateError> {
        Self::build(initialize_fn, next_fn, false)
    }

    pub fn new_multi_arg(initialize_fn: ComputationRef, next_fn: ComputationRef) -> Result<Self, TemplateError> {
        Self::build(initialize_fn, next_fn, true)
    }

    fn build(
        initialize_fn: ComputationRef,
        next_fn: ComputationRef,
        next_is_multi_arg: bool,
    ) -> Result<Self, TemplateError> {
        let process = IterativeProcess::build(initialize_fn, next_fn, next_is_multi_arg)?;
        let output = measured_output(process.next_fn().type_signature().result())?;
        let result_type = output.result.clone();
        let measurements_type = output.measurements.clone();
        debug!(next_fn = process.next_fn().name(), "measured process output shape satisfied");
        Ok(MeasuredProcess {
            process,
            result_type,
            measurements_type,
        })
    }

    pub fn next_is_multi_arg(&self) -> bool {
        self.process.next_is_multi_arg()
    }

    /// Type of the `result` field of the step output
    pub fn result_type(&self) -> &ComputationType {
        &self.result_type
    }

    /// Type of the `measurements` field of the step output
    pub fn measurements_type(&self) -> &ComputationType {
        &self.measurements_type
    }
}

impl StatefulProcess for MeasuredProcess {
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

/// The `result` and `measurements` fields of a measured process step output
pub(crate) struct MeasuredOutput<'a> {
    pub result: &'a ComputationType,
    pub measurements: &'a ComputationType,
}

/// Check that a step result is `<state=...,result=...,measurements=...>`.
pub(crate) fn measured_output(output: &ComputationType) -> Result<MeasuredOutput<'_>, TemplateError> {
    let elements = output.as_struct().map(|st| st.elements()).unwrap_or_default();
    let names_match = elements
        .iter()
        .map(|e| e.name.as_deref())
        .eq(MEASURED_OUTPUT_FIELDS.iter().map(|&name| Some(name)));

    match elements {
        [_, result, measurements] if names_match => Ok(MeasuredOutput {
            result: &result.value_type,
            measurements: &measurements.value_type,
        }),
        _ => Err(TemplateError::NotMeasuredProcessOutput(format!(
            "The `next_fn` of a measured process must return a struct with fields `state`, \
             `result` and `measurements`, but found return type:\n{}",
            output
        ))),
    }
}
