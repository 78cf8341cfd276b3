use federa_types::ComputationType;

use crate::computation::ComputationRef;

/// Common interface of every validated process template.
///
/// A process pairs an initializer, which produces the initial state, with a
/// step function, which consumes the state (plus any further inputs) and
/// produces the next state.
pub trait StatefulProcess {
    /// The no-arg computation producing the initial state
    fn initialize_fn(&self) -> &ComputationRef;

    /// The step computation
    fn next_fn(&self) -> &ComputationRef;

    /// The state type shared by the initializer result and the step function
    fn state_type(&self) -> &ComputationType;
}
