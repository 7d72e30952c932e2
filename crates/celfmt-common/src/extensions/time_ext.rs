//! Time extension library.
//!
//! # Functions
//!
//! - `now() -> timestamp`
//! - `<timestamp>.format(<string>) -> string`
//! - `<string>.parse_time(<string>) -> timestamp`, also with a list of layouts
//! - `<timestamp>.is_zero() -> bool`
//!
//! # Variables
//!
//! - `now: timestamp`
//! - `time_layout: map<string, string>`

use super::{decl, function, method};
use crate::{CelType, FunctionDecl, VariableDecl};

/// Returns the time extension library function declarations.
pub fn time_extension() -> Vec<FunctionDecl> {
    vec![
        decl("now", vec![function("now", &[], CelType::Timestamp)]),
        decl(
            "format",
            vec![method(
                "timestamp_format_string",
                CelType::Timestamp,
                &[CelType::String],
                CelType::String,
            )],
        ),
        decl(
            "parse_time",
            vec![
                method(
                    "string_parse_time_string",
                    CelType::String,
                    &[CelType::String],
                    CelType::Timestamp,
                ),
                method(
                    "string_parse_time_list_string",
                    CelType::String,
                    &[CelType::list(CelType::String)],
                    CelType::Timestamp,
                ),
            ],
        ),
        decl(
            "is_zero",
            vec![method("timestamp_is_zero", CelType::Timestamp, &[], CelType::Bool)],
        ),
    ]
}

/// Returns the variables the time extension declares.
pub fn time_variables() -> Vec<VariableDecl> {
    vec![
        VariableDecl::new("now", CelType::Timestamp),
        VariableDecl::new(
            "time_layout",
            CelType::map(CelType::String, CelType::String),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::find;

    #[test]
    fn test_now_is_nullary() {
        let funcs = time_extension();
        let now = find(&funcs, "now");
        assert!(now.overloads[0].params.is_empty());
        assert_eq!(now.overloads[0].result, CelType::Timestamp);
    }

    #[test]
    fn test_time_variables() {
        let vars = time_variables();
        let names: Vec<_> = vars.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["now", "time_layout"]);
    }
}
