//! MIME extension library.
//!
//! `<bytes>.mime(<string>) -> dyn` decodes bytes according to a MIME type.

use super::{decl, method};
use crate::{CelType, FunctionDecl};

/// Returns the MIME extension library function declarations.
pub fn mime_extension() -> Vec<FunctionDecl> {
    vec![decl(
        "mime",
        vec![method(
            "bytes_mime_string",
            CelType::Bytes,
            &[CelType::String],
            CelType::Dyn,
        )],
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_is_member_on_bytes() {
        let funcs = mime_extension();
        assert_eq!(funcs[0].overloads[0].receiver_type(), Some(&CelType::Bytes));
    }
}
