//! Canonical formatter for CEL expressions.
//!
//! Sources are compiled against a fixed environment (a dynamic `state`
//! variable, every extension library and optional types) and printed back
//! in a canonical layout. Compiled to WebAssembly, the crate defines the
//! JavaScript global `celFmt(source)`, which returns `{source}` on success
//! and `{error}` otherwise.
//!
//! # Example
//!
//! ```
//! use celfmt::{Bridge, CallResult, HostValue};
//!
//! let mut bridge = Bridge::new();
//! let result = bridge.call(&[HostValue::String("[1,2,3]".into())]);
//! assert_eq!(result, CallResult::Source("[1, 2, 3]".into()));
//! ```

pub mod ast;
pub mod bridge;
pub mod env;
pub mod error;
pub mod format;
pub mod logging;
pub mod metadata;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use celfmt_common::CelType;

pub use ast::Ast;
pub use bridge::{compile_and_format, Bridge, BridgeState, CallResult, HostValue};
pub use env::{Env, EnvBuilder, Library, MAX_OPTIONAL_TYPES_VERSION};
pub use error::{CallError, CelFmtError, CompileError, ConfigError, FormatError};
pub use format::{format, FormatOptions, Style};
pub use metadata::BuildMetadata;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
