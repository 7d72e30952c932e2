//! The `celFmt` call contract, independent of the JavaScript host.

use celfmt::{Bridge, BridgeState, CallResult, HostValue};
use pretty_assertions::assert_eq;

fn call(args: &[HostValue]) -> CallResult {
    let mut bridge = Bridge::new();
    let result = bridge.call(args);
    assert_eq!(bridge.state(), BridgeState::Idle);
    result
}

fn source(text: &str) -> HostValue {
    HostValue::String(text.to_string())
}

#[test]
fn zero_arguments() {
    assert_eq!(
        call(&[]),
        CallResult::Error("celFmt requires one argument".to_string())
    );
}

#[test]
fn too_many_arguments() {
    assert_eq!(
        call(&[source("1"), source("2")]),
        CallResult::Error("celFmt requires one argument".to_string())
    );
}

#[test]
fn non_string_argument() {
    for arg in [
        HostValue::Number(42.0),
        HostValue::Boolean(true),
        HostValue::Null,
        HostValue::Undefined,
        HostValue::Other,
    ] {
        assert_eq!(
            call(&[arg]),
            CallResult::Error("celFmt argument must be a string".to_string())
        );
    }
}

#[test]
fn formats_source() {
    assert_eq!(call(&[source("1+1")]), CallResult::Source("1 + 1".to_string()));
    assert_eq!(
        call(&[source("[1,2,3]")]),
        CallResult::Source("[1, 2, 3]".to_string())
    );
}

#[test]
fn undeclared_reference() {
    assert_eq!(
        call(&[source("undeclared_var")]),
        CallResult::Error(
            "failed to parse program: 1:1: undeclared reference to 'undeclared_var'".to_string()
        )
    );
}

#[test]
fn syntax_error() {
    let result = call(&[source("1 +")]);
    match result {
        CallResult::Error(message) => {
            assert!(message.starts_with("failed to parse program: 1:"), "{}", message)
        }
        other => panic!("expected an error, got {:?}", other),
    }
}

fn is_recursion_error(result: &CallResult) -> bool {
    match result {
        CallResult::Error(message) => {
            message.starts_with("failed to parse program: ")
                && message.contains("expression recursion limit exceeded: 64")
        }
        CallResult::Source(_) => false,
    }
}

#[test]
fn nesting_up_to_the_limit_formats() {
    for text in [
        format!("{}1{}", "[".repeat(63), "]".repeat(63)),
        format!("{}true", "!".repeat(63)),
        vec!["1"; 64].join("+"),
        format!("state{}", ".a".repeat(63)),
    ] {
        let result = call(&[source(&text)]);
        assert!(!result.is_error(), "{:?}", result);
    }
}

#[test]
fn nesting_past_the_limit_is_an_error() {
    for text in [
        format!("{}1{}", "[".repeat(64), "]".repeat(64)),
        format!("{}true", "!".repeat(64)),
        vec!["1"; 65].join("+"),
        format!("state{}", ".a".repeat(64)),
    ] {
        let result = call(&[source(&text)]);
        assert!(is_recursion_error(&result), "{:?}", result);
    }
}

#[test]
fn very_deep_input_is_an_error() {
    for text in [
        format!("{}true", "!".repeat(500)),
        vec!["1"; 1000].join("+"),
        format!("state{}", ".a".repeat(3000)),
        format!("{}1{}", "[".repeat(240), "]".repeat(240)),
    ] {
        let result = call(&[source(&text)]);
        assert!(is_recursion_error(&result), "{:?}", result);
    }
}

#[test]
fn consecutive_calls_are_independent() {
    let mut bridge = Bridge::new();
    assert!(bridge.call(&[source("nope")]).is_error());
    assert_eq!(
        bridge.call(&[source("state.a&&state.b")]),
        CallResult::Source("state.a && state.b".to_string())
    );
    assert_eq!(bridge.state(), BridgeState::Idle);
}

#[test]
fn records_serialize_to_wire_shape() {
    let ok = serde_json::to_value(call(&[source("1+1")])).unwrap();
    assert_eq!(ok, serde_json::json!({ "source": "1 + 1" }));

    let err = serde_json::to_value(call(&[])).unwrap();
    assert_eq!(
        err,
        serde_json::json!({ "error": "celFmt requires one argument" })
    );
}
