//! Try extension library.
//!
//! # Functions
//!
//! - `try(<dyn>) -> dyn`
//! - `try(<dyn>, <string>) -> dyn`
//! - `is_error(<dyn>) -> bool`

use super::{decl, function};
use crate::{CelType, FunctionDecl};

/// Returns the try extension library function declarations.
pub fn try_extension() -> Vec<FunctionDecl> {
    vec![
        decl(
            "try",
            vec![
                function("try_dyn", &[CelType::Dyn], CelType::Dyn),
                function("try_dyn_string", &[CelType::Dyn, CelType::String], CelType::Dyn),
            ],
        ),
        decl(
            "is_error",
            vec![function("is_error_dyn", &[CelType::Dyn], CelType::Bool)],
        ),
    ]
}
