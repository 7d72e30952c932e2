//! JSON extension library.
//!
//! # Functions
//!
//! - `<dyn>.encode_json() -> string`, `encode_json(<dyn>) -> string`
//! - `<bytes|string>.decode_json() -> dyn`, `decode_json(<bytes|string>) -> dyn`
//! - `<bytes|string>.decode_json_stream() -> list<dyn>`

use super::{decl, function, method};
use crate::{CelType, FunctionDecl};

/// Returns the JSON extension library function declarations.
pub fn json_extension() -> Vec<FunctionDecl> {
    vec![
        decl(
            "encode_json",
            vec![
                method("dyn_encode_json", CelType::Dyn, &[], CelType::String),
                function("encode_json_dyn", &[CelType::Dyn], CelType::String),
            ],
        ),
        decl(
            "decode_json",
            vec![
                method("bytes_decode_json", CelType::Bytes, &[], CelType::Dyn),
                method("string_decode_json", CelType::String, &[], CelType::Dyn),
                function("decode_json_bytes", &[CelType::Bytes], CelType::Dyn),
                function("decode_json_string", &[CelType::String], CelType::Dyn),
            ],
        ),
        decl(
            "decode_json_stream",
            vec![
                method("bytes_decode_json_stream", CelType::Bytes, &[], CelType::dyn_list()),
                method("string_decode_json_stream", CelType::String, &[], CelType::dyn_list()),
            ],
        ),
    ]
}
