//! Strings extension library.
//!
//! Receiver-style string functions:
//!
//! - predicates: `contains_substr`, `contains_any`, `equal_fold`,
//!   `has_prefix`, `has_suffix`, `valid_utf8`
//! - searches: `compare`, `count`, `index`, `index_any`, `last_index`,
//!   `last_index_any`
//! - transforms: `repeat`, `replace`, `replace_all`, `substr`, `to_lower`,
//!   `to_title`, `to_upper`, `to_valid_utf8`, `trim`, `trim_left`,
//!   `trim_prefix`, `trim_right`, `trim_space`, `trim_suffix`
//! - splits: `fields`, `split`, `split_after`, `split_after_n`, `split_n`
//! - `<list<string>>.join() / join(<string>) -> string`

use super::{decl, method};
use crate::{CelType, FunctionDecl};

/// Returns the strings extension library function declarations.
pub fn strings_extension() -> Vec<FunctionDecl> {
    use CelType::{Bool, Int, String as Str};
    let strs = || CelType::list(Str);

    let signatures: Vec<(&str, Vec<CelType>, CelType)> = vec![
        ("compare", vec![Str], Int),
        ("contains_substr", vec![Str], Bool),
        ("contains_any", vec![Str], Bool),
        ("count", vec![Str], Int),
        ("equal_fold", vec![Str], Bool),
        ("fields", vec![], strs()),
        ("has_prefix", vec![Str], Bool),
        ("has_suffix", vec![Str], Bool),
        ("index", vec![Str], Int),
        ("index_any", vec![Str], Int),
        ("last_index", vec![Str], Int),
        ("last_index_any", vec![Str], Int),
        ("repeat", vec![Int], Str),
        ("replace", vec![Str, Str, Int], Str),
        ("replace_all", vec![Str, Str], Str),
        ("split", vec![Str], strs()),
        ("split_after", vec![Str], strs()),
        ("split_after_n", vec![Str, Int], strs()),
        ("split_n", vec![Str, Int], strs()),
        ("substr", vec![Int, Int], Str),
        ("to_lower", vec![], Str),
        ("to_title", vec![], Str),
        ("to_upper", vec![], Str),
        ("to_valid_utf8", vec![Str], Str),
        ("trim", vec![Str], Str),
        ("trim_left", vec![Str], Str),
        ("trim_prefix", vec![Str], Str),
        ("trim_right", vec![Str], Str),
        ("trim_space", vec![], Str),
        ("trim_suffix", vec![Str], Str),
        ("valid_utf8", vec![], Bool),
    ];

    let mut funcs: Vec<FunctionDecl> = signatures
        .into_iter()
        .map(|(name, args, result)| {
            let id = args.iter().fold(format!("string_{}", name), |id, arg| {
                format!("{}_{}", id, arg.display_name())
            });
            decl(name, vec![method(&id, Str, &args, result)])
        })
        .collect();

    funcs.push(decl(
        "join",
        vec![
            method("list_string_join", strs(), &[], Str),
            method("list_string_join_string", strs(), &[Str], Str),
        ],
    ));
    funcs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::find;

    #[test]
    fn test_all_string_functions_are_members() {
        for func in strings_extension() {
            assert!(
                !func.has_standalone_overloads(),
                "expected {} to be member-only",
                func.name
            );
        }
    }

    #[test]
    fn test_overload_ids_encode_argument_types() {
        let funcs = strings_extension();
        assert_eq!(
            find(&funcs, "replace").overloads[0].id,
            "string_replace_string_string_int"
        );
        assert_eq!(find(&funcs, "to_upper").overloads[0].id, "string_to_upper");
    }

    #[test]
    fn test_join_receiver_is_string_list() {
        let funcs = strings_extension();
        let join = find(&funcs, "join");
        assert_eq!(
            join.overloads[0].receiver_type(),
            Some(&CelType::list(CelType::String))
        );
    }
}
