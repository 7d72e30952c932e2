//! HTTP extension library.
//!
//! # Functions
//!
//! - `get(<string>) -> map<string, dyn>`, `head(<string>) -> map<string, dyn>`
//! - `post(<string>, <string>, <bytes|string>) -> map<string, dyn>`
//! - `request(<string>, <string>) -> map<string, dyn>`, also with a body
//! - `get_request(<string>)`, `head_request(<string>)`, `post_request(...)`
//! - `<map>.do_request() -> map<string, dyn>`
//! - `<map>.basic_authentication(<string>, <string>) -> map<string, dyn>`
//! - `<string>.parse_url() -> map<string, dyn>`, `<map>.format_url() -> string`
//! - `<string>.parse_query() -> map<string, list<string>>`
//! - `<map>.format_query() -> string`

use super::{decl, function, method};
use crate::{CelType, FunctionDecl};

fn response() -> CelType {
    CelType::map(CelType::String, CelType::Dyn)
}

/// Returns the HTTP extension library function declarations.
pub fn http_extension() -> Vec<FunctionDecl> {
    let s = || CelType::String;
    let query = || CelType::map(CelType::String, CelType::list(CelType::String));

    let mut funcs = Vec::new();
    for name in ["get", "head"] {
        funcs.push(decl(
            name,
            vec![function(&format!("{}_string", name), &[s()], response())],
        ));
        funcs.push(decl(
            &format!("{}_request", name),
            vec![function(&format!("{}_request_string", name), &[s()], response())],
        ));
    }
    for name in ["post", "post_request"] {
        funcs.push(decl(
            name,
            vec![
                function(&format!("{}_string_string_bytes", name), &[s(), s(), CelType::Bytes], response()),
                function(&format!("{}_string_string_string", name), &[s(), s(), s()], response()),
            ],
        ));
    }
    funcs.push(decl(
        "request",
        vec![
            function("request_string_string", &[s(), s()], response()),
            function(
                "request_string_string_bytes",
                &[s(), s(), CelType::Bytes],
                response(),
            ),
            function("request_string_string_string", &[s(), s(), s()], response()),
        ],
    ));
    funcs.push(decl(
        "do_request",
        vec![method("map_do_request", CelType::dyn_map(), &[], response())],
    ));
    funcs.push(decl(
        "basic_authentication",
        vec![method(
            "map_basic_authentication_string_string",
            CelType::dyn_map(),
            &[s(), s()],
            response(),
        )],
    ));
    funcs.push(decl(
        "parse_url",
        vec![method("string_parse_url", s(), &[], response())],
    ));
    funcs.push(decl(
        "format_url",
        vec![method("map_format_url", CelType::dyn_map(), &[], s())],
    ));
    funcs.push(decl(
        "parse_query",
        vec![method("string_parse_query", s(), &[], query())],
    ));
    funcs.push(decl(
        "format_query",
        vec![method("map_format_query", CelType::dyn_map(), &[], s())],
    ));
    funcs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::find;

    #[test]
    fn test_http_extension_names() {
        let funcs = http_extension();
        for name in [
            "get",
            "head",
            "post",
            "request",
            "get_request",
            "head_request",
            "post_request",
            "do_request",
            "basic_authentication",
            "parse_url",
            "format_url",
            "parse_query",
            "format_query",
        ] {
            find(&funcs, name);
        }
    }

    #[test]
    fn test_request_arity() {
        let funcs = http_extension();
        let arities: Vec<_> = find(&funcs, "request")
            .overloads
            .iter()
            .map(|o| o.params.len())
            .collect();
        assert_eq!(arities, vec![2, 3, 3]);
    }
}
