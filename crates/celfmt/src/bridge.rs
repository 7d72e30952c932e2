//! Host-agnostic entry point behind the `celFmt` global.
//!
//! The host hands over its arguments as [`HostValue`]s and gets back a
//! [`CallResult`]; translating to and from JavaScript values happens in the
//! `wasm` module only.

use serde::Serialize;
use tracing::{debug, warn};

use crate::env::Env;
use crate::error::{CallError, CelFmtError};
use crate::format::{format, FormatOptions};

/// An argument as passed by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
    Other,
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        HostValue::String(value.to_string())
    }
}

/// Outcome of one call: either formatted source or an error message.
///
/// Serializes as `{"source": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallResult {
    Source(String),
    Error(String),
}

impl CallResult {
    pub fn is_error(&self) -> bool {
        matches!(self, CallResult::Error(_))
    }

    /// The record field and its value.
    pub fn field(&self) -> (&'static str, &str) {
        match self {
            CallResult::Source(source) => ("source", source.as_str()),
            CallResult::Error(message) => ("error", message.as_str()),
        }
    }
}

impl From<Result<String, CelFmtError>> for CallResult {
    fn from(result: Result<String, CelFmtError>) -> Self {
        match result {
            Ok(source) => CallResult::Source(source),
            Err(err) => CallResult::Error(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BridgeState {
    #[default]
    Idle,
    Handling,
}

/// Serves `celFmt` calls one at a time.
#[derive(Debug, Clone, Default)]
pub struct Bridge {
    state: BridgeState,
    options: FormatOptions,
}

impl Bridge {
    /// A bridge formatting with pretty layout and trailing commas.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FormatOptions) -> Self {
        Self {
            state: BridgeState::Idle,
            options,
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Validate the arguments, then compile and format the source.
    ///
    /// Every failure is reported in the returned record.
    pub fn call(&mut self, args: &[HostValue]) -> CallResult {
        self.state = BridgeState::Handling;
        let result = self.handle(args);
        self.state = BridgeState::Idle;

        if let Err(err) = &result {
            warn!(error = %err, "celFmt call failed");
        }
        result.into()
    }

    fn handle(&self, args: &[HostValue]) -> Result<String, CelFmtError> {
        let source = source_argument(args)?;
        debug!(bytes = source.len(), "formatting program");
        compile_and_format(source, &self.options)
    }
}

/// The single string argument of a call.
pub fn source_argument(args: &[HostValue]) -> Result<&str, CallError> {
    match args {
        [HostValue::String(source)] => Ok(source.as_str()),
        [_] => Err(CallError::NotAString),
        _ => Err(CallError::Arity),
    }
}

/// Compile `source` in the shared environment and format the result.
pub fn compile_and_format(source: &str, options: &FormatOptions) -> Result<String, CelFmtError> {
    let env = Env::shared()?;
    let ast = env.compile(source)?;
    Ok(format(&ast, options)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_validation() {
        assert_eq!(source_argument(&[]), Err(CallError::Arity));
        assert_eq!(
            source_argument(&["a".into(), "b".into()]),
            Err(CallError::Arity)
        );
        assert_eq!(
            source_argument(&[HostValue::Number(1.0)]),
            Err(CallError::NotAString)
        );
        assert_eq!(
            source_argument(&[HostValue::Undefined]),
            Err(CallError::NotAString)
        );
        assert_eq!(source_argument(&["1+1".into()]), Ok("1+1"));
    }

    #[test]
    fn test_call_returns_to_idle() {
        let mut bridge = Bridge::new();
        assert_eq!(bridge.state(), BridgeState::Idle);
        let result = bridge.call(&["1+1".into()]);
        assert_eq!(result, CallResult::Source("1 + 1".to_string()));
        assert_eq!(bridge.state(), BridgeState::Idle);

        assert!(bridge.call(&[]).is_error());
        assert_eq!(bridge.state(), BridgeState::Idle);
    }

    #[test]
    fn test_record_shape() {
        let ok = serde_json::to_string(&CallResult::Source("1 + 1".into())).unwrap();
        assert_eq!(ok, r#"{"source":"1 + 1"}"#);

        let err = CallResult::from(Err::<String, _>(CelFmtError::from(CallError::Arity)));
        assert_eq!(err.field(), ("error", "celFmt requires one argument"));
        assert_eq!(
            serde_json::to_string(&err).unwrap(),
            r#"{"error":"celFmt requires one argument"}"#
        );
    }

    #[test]
    fn test_compact_bridge() {
        let mut bridge = Bridge::with_options(FormatOptions::compact());
        assert_eq!(
            bridge.call(&["{'a':1} // c".into()]),
            CallResult::Source("{'a': 1}".to_string())
        );
    }
}
