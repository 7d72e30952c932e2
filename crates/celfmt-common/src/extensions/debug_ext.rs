//! Debug extension library.
//!
//! `debug(<string>, <dyn>) -> dyn` returns its second argument. The logging
//! hook it reports to is chosen by the host; the formatter never calls it.

use super::{decl, function};
use crate::{CelType, FunctionDecl};

/// Returns the debug extension library function declarations.
pub fn debug_extension() -> Vec<FunctionDecl> {
    vec![decl(
        "debug",
        vec![function(
            "debug_string_dyn",
            &[CelType::String, CelType::type_param("T")],
            CelType::type_param("T"),
        )
        .with_type_params(vec!["T".into()])],
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_passes_value_type_through() {
        let funcs = debug_extension();
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].overloads[0].result, CelType::type_param("T"));
    }
}
