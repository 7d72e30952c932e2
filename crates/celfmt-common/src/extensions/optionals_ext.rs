//! Optionals extension library.
//!
//! # Functions
//!
//! - `optional.of(T) -> optional<T>` - Wrap a value in an optional
//! - `optional.none() -> optional<dyn>` - Create an empty optional
//! - `optional.ofNonZeroValue(T) -> optional<T>` - Wrap if non-zero
//!
//! # Methods
//!
//! - `.hasValue() -> bool` - Check if optional has a value
//! - `.value() -> T` - Get the value (errors if absent)
//! - `.or(optional<T>) -> optional<T>` - Return first present optional
//! - `.orValue(T) -> T` - Return value or default

use crate::{CelType, FunctionDecl, OverloadDecl};

fn t() -> CelType {
    CelType::type_param("T")
}

fn opt_t() -> CelType {
    CelType::optional(t())
}

/// Returns the optionals extension library function declarations.
pub fn optionals_extension() -> Vec<FunctionDecl> {
    vec![
        FunctionDecl::new("optional.of").with_overload(
            OverloadDecl::function("optional_of", vec![t()], opt_t())
                .with_type_params(vec!["T".to_string()]),
        ),
        FunctionDecl::new("optional.none").with_overload(OverloadDecl::function(
            "optional_none",
            vec![],
            CelType::optional(CelType::Dyn),
        )),
        FunctionDecl::new("optional.ofNonZeroValue").with_overload(
            OverloadDecl::function("optional_of_non_zero_value", vec![t()], opt_t())
                .with_type_params(vec!["T".to_string()]),
        ),
        FunctionDecl::new("hasValue").with_overload(
            OverloadDecl::method("optional_has_value", vec![opt_t()], CelType::Bool)
                .with_type_params(vec!["T".to_string()]),
        ),
        FunctionDecl::new("value").with_overload(
            OverloadDecl::method("optional_value", vec![opt_t()], t())
                .with_type_params(vec!["T".to_string()]),
        ),
        FunctionDecl::new("or").with_overload(
            OverloadDecl::method("optional_or_optional", vec![opt_t(), opt_t()], opt_t())
                .with_type_params(vec!["T".to_string()]),
        ),
        FunctionDecl::new("orValue").with_overload(
            OverloadDecl::method("optional_or_value", vec![opt_t(), t()], t())
                .with_type_params(vec!["T".to_string()]),
        ),
    ]
}
