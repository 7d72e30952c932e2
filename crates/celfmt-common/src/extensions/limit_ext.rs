//! Rate limit extension library.
//!
//! # Functions
//!
//! - `rate_limit(<map>, <string>, <duration>) -> map<string, dyn>`
//! - `rate_limit(<map>, <string>, <bool>, <bool>, <duration>, <int>) -> map<string, dyn>`
//!
//! The first form reads a named policy's headers; the second computes a
//! limit from explicit parameters.

use super::{decl, function};
use crate::{CelType, FunctionDecl};

/// Returns the limit extension library function declarations.
pub fn limit_extension() -> Vec<FunctionDecl> {
    let result = CelType::map(CelType::String, CelType::Dyn);
    vec![decl(
        "rate_limit",
        vec![
            function(
                "rate_limit_map_string_duration",
                &[CelType::dyn_map(), CelType::String, CelType::Duration],
                result.clone(),
            ),
            function(
                "rate_limit_map_string_bool_bool_duration_int",
                &[
                    CelType::dyn_map(),
                    CelType::String,
                    CelType::Bool,
                    CelType::Bool,
                    CelType::Duration,
                    CelType::Int,
                ],
                result,
            ),
        ],
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_overloads() {
        let funcs = limit_extension();
        assert_eq!(funcs[0].name, "rate_limit");
        assert_eq!(funcs[0].overloads.len(), 2);
    }
}
