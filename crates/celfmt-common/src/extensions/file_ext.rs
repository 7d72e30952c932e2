//! File extension library.
//!
//! # Functions
//!
//! - `file(<string>) -> bytes`
//! - `file(<string>, <string>) -> dyn` (path, MIME type)
//! - `dir(<string>) -> list<dyn>`

use super::{decl, function};
use crate::{CelType, FunctionDecl};

/// Returns the file extension library function declarations.
pub fn file_extension() -> Vec<FunctionDecl> {
    vec![
        decl(
            "file",
            vec![
                function("file_string", &[CelType::String], CelType::Bytes),
                function(
                    "file_string_string",
                    &[CelType::String, CelType::String],
                    CelType::Dyn,
                ),
            ],
        ),
        decl(
            "dir",
            vec![function("dir_string", &[CelType::String], CelType::dyn_list())],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::find;

    #[test]
    fn test_file_overloads() {
        let funcs = file_extension();
        assert_eq!(find(&funcs, "file").overloads.len(), 2);
        assert_eq!(find(&funcs, "dir").overloads[0].result, CelType::dyn_list());
    }
}
