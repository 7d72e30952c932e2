//! Declaration-only extension libraries.
//!
//! Each extension returns the `FunctionDecl`s (and, where the library
//! defines them, `VariableDecl`s) it contributes to an environment. No
//! extension carries an implementation; expressions are only checked and
//! formatted, never evaluated.
//!
//! # Available Extensions
//!
//! - **collections**: `collate`, `drop`, `flatten`, `keys`, `with`, `zip`, ...
//! - **crypto**: `base64`, `hex`, `sha256`, `hmac`, `uuid`, ...
//! - **json**: `encode_json`, `decode_json`, `decode_json_stream`
//! - **time**: `now`, `format`, `parse_time`, `is_zero`, `time_layout`
//! - **try**: `try`, `is_error`
//! - **debug**: `debug`
//! - **file**: `file`, `dir`
//! - **mime**: `mime`
//! - **http**: `get`, `post`, `request`, `do_request`, `parse_url`, ...
//! - **limit**: `rate_limit`
//! - **strings**: `has_prefix`, `to_lower`, `split`, `join`, ...
//! - **xml**: `decode_xml`
//! - **optionals**: `optional.of`, `optional.none`, `hasValue`, `orValue`, ...

mod collections_ext;
mod crypto_ext;
mod debug_ext;
mod file_ext;
mod http_ext;
mod json_ext;
mod limit_ext;
mod mime_ext;
mod optionals_ext;
mod strings_ext;
mod time_ext;
mod try_ext;
mod xml_ext;

pub use collections_ext::collections_extension;
pub use crypto_ext::crypto_extension;
pub use debug_ext::debug_extension;
pub use file_ext::file_extension;
pub use http_ext::http_extension;
pub use json_ext::json_extension;
pub use limit_ext::limit_extension;
pub use mime_ext::mime_extension;
pub use optionals_ext::optionals_extension;
pub use strings_ext::strings_extension;
pub use time_ext::{time_extension, time_variables};
pub use try_ext::try_extension;
pub use xml_ext::{xml_extension, XmlSchemaError};

use crate::{CelType, FunctionDecl, OverloadDecl};

/// Shorthand for a member overload: `receiver.name(args...) -> result`.
fn method(id: &str, receiver: CelType, args: &[CelType], result: CelType) -> OverloadDecl {
    let mut params = Vec::with_capacity(args.len() + 1);
    params.push(receiver);
    params.extend_from_slice(args);
    OverloadDecl::method(id, params, result)
}

/// Shorthand for a global overload: `name(args...) -> result`.
fn function(id: &str, args: &[CelType], result: CelType) -> OverloadDecl {
    OverloadDecl::function(id, args.to_vec(), result)
}

/// Group overloads under one function name.
fn decl(name: &str, overloads: Vec<OverloadDecl>) -> FunctionDecl {
    FunctionDecl::new(name).with_overloads(overloads)
}

#[cfg(test)]
pub(crate) fn find<'a>(funcs: &'a [FunctionDecl], name: &str) -> &'a FunctionDecl {
    funcs
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("missing function {}", name))
}
