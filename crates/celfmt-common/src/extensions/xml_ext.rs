//! XML extension library.
//!
//! # Functions
//!
//! - `<bytes|string>.decode_xml() -> dyn`
//! - `<bytes|string>.decode_xml(<string>) -> dyn` (named schema)
//!
//! Schemas are supplied as `(name, source)` pairs when the library is
//! built. Construction fails if a schema is malformed, which is the only
//! way an extension library can fail to initialize.

use thiserror::Error;

use super::{decl, method};
use crate::{CelType, FunctionDecl};

/// Errors raised while building the XML library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlSchemaError {
    #[error("xml schema name {0:?} is not a valid identifier")]
    InvalidName(String),

    #[error("xml schema {0:?} is declared more than once")]
    Duplicate(String),

    #[error("xml schema {name:?} is not an XSD document")]
    NotXsd { name: String },
}

/// Returns the XML extension library function declarations.
///
/// Each schema is validated for a usable name and an XSD root element.
pub fn xml_extension(schemas: &[(&str, &str)]) -> Result<Vec<FunctionDecl>, XmlSchemaError> {
    let mut seen = Vec::with_capacity(schemas.len());
    for (name, source) in schemas {
        if !is_identifier(name) {
            return Err(XmlSchemaError::InvalidName(name.to_string()));
        }
        if seen.contains(name) {
            return Err(XmlSchemaError::Duplicate(name.to_string()));
        }
        if !looks_like_xsd(source) {
            return Err(XmlSchemaError::NotXsd {
                name: name.to_string(),
            });
        }
        seen.push(*name);
    }

    Ok(vec![decl(
        "decode_xml",
        vec![
            method("bytes_decode_xml", CelType::Bytes, &[], CelType::Dyn),
            method("string_decode_xml", CelType::String, &[], CelType::Dyn),
            method(
                "bytes_decode_xml_string",
                CelType::Bytes,
                &[CelType::String],
                CelType::Dyn,
            ),
            method(
                "string_decode_xml_string",
                CelType::String,
                &[CelType::String],
                CelType::Dyn,
            ),
        ],
    )])
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// Skips an optional XML declaration and comments, then requires a
/// `schema` root element in any namespace prefix.
fn looks_like_xsd(source: &str) -> bool {
    let mut rest = source.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("<?") {
            match after.find("?>") {
                Some(end) => rest = after[end + 2..].trim_start(),
                None => return false,
            }
        } else if let Some(after) = rest.strip_prefix("<!--") {
            match after.find("-->") {
                Some(end) => rest = after[end + 3..].trim_start(),
                None => return false,
            }
        } else {
            break;
        }
    }

    let Some(tag) = rest.strip_prefix('<') else {
        return false;
    };
    let name_end = tag
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(tag.len());
    let name = &tag[..name_end];
    name == "schema" || name.rsplit_once(':').is_some_and(|(_, local)| local == "schema")
}
