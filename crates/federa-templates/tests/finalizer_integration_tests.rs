use federa_templates::{
    error_codes, ComputationRef, FinalizerProcess, StatefulProcess, TemplateError, TypedComputation,
};
use federa_types::{ComputationType, DType, FunctionType, Placement, StructType};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const STATE: &str = "<lr=float32>@SERVER";
const WEIGHTS: &str = "ModelWeights<trainable=<float32[2,3],float32[3]>,non_trainable=<>>@SERVER";
const UPDATE: &str = "<float32[2,3],float32[3]>@SERVER";
const RESULT: &str = "ModelWeights<trainable=<float32[2,3],float32[3]>,non_trainable=<>>@SERVER";
const MEASUREMENTS: &str = "<update_norm=float32>@SERVER";

fn comp(name: &str, signature: &str) -> ComputationRef {
    TypedComputation::parse(name, signature)
        .unwrap_or_else(|e| panic!("bad test signature {:?}: {}", signature, e))
        .into_ref()
}

fn init_fn(result: &str) -> ComputationRef {
    comp("initialize", &format!("( -> {})", result))
}

fn next_fn(params: &[&str], state: &str, result: &str, measurements: &str) -> ComputationRef {
    comp(
        "next",
        &format!(
            "(<{}> -> <state={},result={},measurements={}>)",
            params.join(","),
            state,
            result,
            measurements
        ),
    )
}

fn valid_next() -> ComputationRef {
    next_fn(&[STATE, WEIGHTS, UPDATE], STATE, RESULT, MEASUREMENTS)
}

fn expect_err(init: ComputationRef, next: ComputationRef) -> TemplateError {
    match FinalizerProcess::new(init, next) {
        Ok(process) => panic!("expected rejection, got {:?}", process),
        Err(err) => err,
    }
}

#[test]
fn test_valid_finalizer_keeps_the_given_computations() {
    let init = init_fn(STATE);
    let next = valid_next();

    let process = FinalizerProcess::new(init.clone(), next.clone()).unwrap();

    assert!(Arc::ptr_eq(process.initialize_fn(), &init));
    assert!(Arc::ptr_eq(process.next_fn(), &next));
    assert_eq!(process.state_type().to_string(), STATE);
    assert_eq!(process.model_weights_type().to_string(), WEIGHTS);
    assert_eq!(process.update_type().to_string(), UPDATE);
    assert_eq!(process.result_type().to_string(), RESULT);
    assert_eq!(process.measurements_type().to_string(), MEASUREMENTS);
}

#[test]
fn test_valid_finalizer_built_from_types() {
    let weights_member: ComputationType = StructType::model_weights(
        ComputationType::unnamed_struct([ComputationType::tensor(DType::Float32, &[4])]),
        ComputationType::unnamed_struct(Vec::new()),
    )
    .into();
    let weights = ComputationType::at_server(weights_member);
    let state = ComputationType::at_server(ComputationType::scalar(DType::Int32));
    let update = ComputationType::at_server(ComputationType::tensor(DType::Float32, &[4]));
    let measurements = ComputationType::at_server(ComputationType::unnamed_struct(Vec::new()));

    let init = TypedComputation::new("init", FunctionType::new(None, state.clone())).into_ref();
    let next = TypedComputation::new(
        "next",
        FunctionType::new(
            Some(ComputationType::unnamed_struct([state.clone(), weights.clone(), update])),
            ComputationType::named_struct([
                ("state", state),
                ("result", weights),
                ("measurements", measurements),
            ]),
        ),
    )
    .into_ref();

    assert!(FinalizerProcess::new(init, next).is_ok());
}

#[test]
fn test_non_federated_initializer_result() {
    let init = init_fn("<lr=float32>");
    let next = next_fn(&["<lr=float32>", WEIGHTS, UPDATE], "<lr=float32>", RESULT, MEASUREMENTS);

    let err = expect_err(init, next);
    assert_eq!(err.error_code(), error_codes::NOT_FEDERATED);
    assert!(err.message().contains("`initialize_fn` must return a federated type"));
    assert!(err.message().contains("<lr=float32>"));
}

#[test]
fn test_non_federated_step_leaves_are_listed() {
    let init = init_fn(STATE);
    let next = next_fn(&[STATE, WEIGHTS, "<float32[2,3],float32[3]>"], STATE, RESULT, "<update_norm=float32>");

    let err = expect_err(init, next);
    assert!(matches!(err, TemplateError::NotFederated(_)));
    let message = err.message();
    assert!(message.contains("The non-federated types are:\n- float32[2,3]\n- float32[3]\n- float32"));
}

#[test]
fn test_state_placed_at_clients() {
    let state = "{<lr=float32>}@CLIENTS";
    let init = init_fn(state);
    let next = next_fn(&[state, WEIGHTS, UPDATE], state, RESULT, MEASUREMENTS);

    let err = expect_err(init, next);
    assert!(matches!(err, TemplateError::Placement(_)));
    assert!(err.message().contains("state"));
    assert!(err.message().contains(state));
}

#[test]
fn test_wrong_number_of_step_arguments() {
    for params in [vec![STATE, WEIGHTS], vec![STATE, WEIGHTS, UPDATE, UPDATE]] {
        let err = expect_err(init_fn(STATE), next_fn(&params, STATE, RESULT, MEASUREMENTS));
        assert!(matches!(err, TemplateError::NextFnNumArgs(_)), "got {:?}", err);
        assert!(err
            .message()
            .contains(&format!("found {} input arguments", params.len())));
    }
}

#[test]
fn test_model_weights_placed_at_clients() {
    let clients_weights = "{ModelWeights<trainable=<float32[2,3],float32[3]>,non_trainable=<>>}@CLIENTS";
    let err = expect_err(
        init_fn(STATE),
        next_fn(&[STATE, clients_weights, UPDATE], STATE, RESULT, MEASUREMENTS),
    );
    assert!(matches!(err, TemplateError::Placement(_)));
    assert!(err.message().contains("second input argument"));
}

#[test]
fn test_model_weights_without_container() {
    let untagged = "<trainable=<float32[2,3],float32[3]>,non_trainable=<>>@SERVER";
    let err = expect_err(
        init_fn(STATE),
        next_fn(&[STATE, untagged, UPDATE], STATE, RESULT, MEASUREMENTS),
    );
    assert_eq!(err.error_code(), error_codes::MODEL_WEIGHTS_TYPE);
    assert!(err.message().contains(untagged));
}

#[test]
fn test_update_placed_at_clients() {
    let clients_update = "{<float32[2,3],float32[3]>}@CLIENTS";
    let err = expect_err(
        init_fn(STATE),
        next_fn(&[STATE, WEIGHTS, clients_update], STATE, RESULT, MEASUREMENTS),
    );
    assert!(matches!(err, TemplateError::Placement(_)));
    assert!(err.message().contains("third input argument"));
    assert!(err.message().contains(clients_update));
}

#[test]
fn test_result_placed_at_clients() {
    let clients_result = "{ModelWeights<trainable=<float32[2,3],float32[3]>,non_trainable=<>>}@CLIENTS";
    let err = expect_err(
        init_fn(STATE),
        next_fn(&[STATE, WEIGHTS, UPDATE], STATE, clients_result, MEASUREMENTS),
    );
    assert!(matches!(err, TemplateError::Placement(_)));
    assert!(err.message().contains("\"result\""));
}

#[test]
fn test_result_not_assignable_to_weights() {
    let other_result = "ModelWeights<trainable=<float32[2,3]>,non_trainable=<>>@SERVER";
    let err = expect_err(
        init_fn(STATE),
        next_fn(&[STATE, WEIGHTS, UPDATE], STATE, other_result, MEASUREMENTS),
    );
    assert_eq!(err.error_code(), error_codes::FINALIZER_RESULT_TYPE);
    assert!(err
        .message()
        .contains("Second input argument: ModelWeights<trainable=<float32[2,3],float32[3]>,non_trainable=<>>"));
    assert!(err
        .message()
        .contains("Result attribute: ModelWeights<trainable=<float32[2,3]>,non_trainable=<>>"));
}

#[test]
fn test_result_without_container_is_still_assignable() {
    let plain_result = "<trainable=<float32[2,3],float32[3]>,non_trainable=<>>@SERVER";
    let init = init_fn(STATE);
    let next = next_fn(&[STATE, WEIGHTS, UPDATE], STATE, plain_result, MEASUREMENTS);
    assert!(FinalizerProcess::new(init, next).is_ok());
}

#[test]
fn test_measurements_placed_at_clients() {
    let err = expect_err(
        init_fn(STATE),
        next_fn(&[STATE, WEIGHTS, UPDATE], STATE, RESULT, "{<update_norm=float32>}@CLIENTS"),
    );
    assert!(matches!(err, TemplateError::Placement(_)));
    assert!(err.message().contains("\"measurements\""));
}

#[test]
fn test_measured_output_shape_is_required() {
    let init = init_fn(STATE);
    let next = comp(
        "next",
        &format!("(<{},{},{}> -> <state={},result={}>)", STATE, WEIGHTS, UPDATE, STATE, RESULT),
    );
    let err = expect_err(init, next);
    assert_eq!(err.error_code(), error_codes::NOT_MEASURED_PROCESS_OUTPUT);
}

#[test]
fn test_state_mismatch_is_reported_by_base_checks() {
    let init = init_fn("<lr=float64>@SERVER");
    let err = expect_err(init, valid_next());
    assert_eq!(err.error_code(), error_codes::STATE_NOT_ASSIGNABLE);
}

#[test]
fn test_checks_run_in_order() {
    // Non-federated update and a wrong container: the federated check comes first
    let untagged = "<trainable=<float32[2,3],float32[3]>,non_trainable=<>>@SERVER";
    let err = expect_err(
        init_fn(STATE),
        next_fn(&[STATE, untagged, "float32"], STATE, RESULT, MEASUREMENTS),
    );
    assert!(matches!(err, TemplateError::NotFederated(_)));

    // Weights at CLIENTS and untagged: placement is checked before the container
    let clients_untagged = "{<trainable=<float32[2,3],float32[3]>,non_trainable=<>>}@CLIENTS";
    let err = expect_err(
        init_fn(STATE),
        next_fn(&[STATE, clients_untagged, UPDATE], STATE, RESULT, MEASUREMENTS),
    );
    assert!(matches!(err, TemplateError::Placement(_)));
}

#[test]
fn test_finalizer_is_shareable_across_threads() {
    let process = Arc::new(FinalizerProcess::new(init_fn(STATE), valid_next()).unwrap());
    let handle = {
        let process = Arc::clone(&process);
        std::thread::spawn(move || process.state_type().is_placed_at(Placement::Server))
    };
    assert!(handle.join().unwrap());
}
