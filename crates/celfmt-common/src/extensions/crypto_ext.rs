//! Crypto extension library.
//!
//! # Functions
//!
//! - `<bytes|string>.base64() -> string`, `<string>.base64_decode() -> bytes`
//! - `<bytes|string>.base64_raw() -> string`, `<string>.base64_raw_decode() -> bytes`
//! - `<bytes|string>.hex() -> string`
//! - `<bytes|string>.md5() / sha1() / sha256() -> bytes`
//! - `<bytes|string>.hmac(<string>, <bytes>) -> bytes`
//! - `uuid() -> string`

use super::{decl, function, method};
use crate::{CelType, FunctionDecl};

/// Returns the crypto extension library function declarations.
pub fn crypto_extension() -> Vec<FunctionDecl> {
    let encoders = [
        ("base64", CelType::String),
        ("base64_raw", CelType::String),
        ("hex", CelType::String),
        ("md5", CelType::Bytes),
        ("sha1", CelType::Bytes),
        ("sha256", CelType::Bytes),
    ];

    let mut funcs: Vec<FunctionDecl> = encoders
        .into_iter()
        .map(|(name, result)| {
            decl(
                name,
                vec![
                    method(&format!("bytes_{}", name), CelType::Bytes, &[], result.clone()),
                    method(&format!("string_{}", name), CelType::String, &[], result),
                ],
            )
        })
        .collect();

    for name in ["base64_decode", "base64_raw_decode"] {
        funcs.push(decl(
            name,
            vec![
                method(&format!("string_{}", name), CelType::String, &[], CelType::Bytes),
                method(&format!("bytes_{}", name), CelType::Bytes, &[], CelType::Bytes),
            ],
        ));
    }

    funcs.push(decl(
        "hmac",
        vec![
            method(
                "bytes_hmac_string_bytes",
                CelType::Bytes,
                &[CelType::String, CelType::Bytes],
                CelType::Bytes,
            ),
            method(
                "string_hmac_string_bytes",
                CelType::String,
                &[CelType::String, CelType::Bytes],
                CelType::Bytes,
            ),
        ],
    ));
    funcs.push(decl("uuid", vec![function("uuid", &[], CelType::String)]));

    funcs
}
