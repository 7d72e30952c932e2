//! CEL type checker.
//!
//! Resolves identifiers and function calls of a parsed expression against
//! declared variables and functions, producing a `type_map` and a
//! `reference_map` keyed by expression id.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use celfmt_checker::{check, CelType, STANDARD_LIBRARY};
//!
//! let ast = celfmt_parser::parse("x + 1").ast.unwrap();
//!
//! let functions: HashMap<_, _> = STANDARD_LIBRARY
//!     .iter()
//!     .map(|f| (f.name.clone(), f.clone()))
//!     .collect();
//! let variables = HashMap::from([("x".to_string(), CelType::Int)]);
//!
//! let result = check(&ast, &variables, &functions, "");
//! assert!(result.is_ok());
//! ```

mod checker;
mod errors;
mod overload;
mod scope;
mod standard_library;

pub use celfmt_common::{CelType, FunctionDecl, OverloadDecl, VariableDecl};
pub use checker::{check, CheckResult, Checker, ReferenceInfo};
pub use errors::{CheckError, CheckErrorKind};
pub use overload::{resolve_overload, OverloadResult};
pub use scope::{Scope, ScopeStack};
pub use standard_library::{type_constants, STANDARD_LIBRARY};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
