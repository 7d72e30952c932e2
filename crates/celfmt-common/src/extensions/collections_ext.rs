//! Collections extension library.
//!
//! # Functions
//!
//! - `<list<map>>.collate(<string>) -> list<dyn>`, also with a list of paths
//! - `<map>.collate(<string>) -> list<dyn>`
//! - `<map>.drop(<string>) -> map`, also with a list of keys
//! - `<list>.drop(<string>) -> list`
//! - `<dyn>.drop_empty() -> dyn`
//! - `<list>.flatten() -> list<dyn>`
//! - `<map<K, V>>.keys() -> list<K>`
//! - `<map<K, V>>.values() -> list<V>`
//! - `<list>.max() / min() / sum()`, also as globals
//! - `<map>.with(<map>) / with_replace(<map>) / with_update(<map>) -> map`
//! - `<list<K>>.zip(<list<V>>) -> map<K, V>`
//! - `<list<T>>.tail() -> list<T>`, `tail(<list<T>>)`
//! - `<list<T>>.front(<int>) -> list<T>`
//!
//! The library also contributes the receiver macro `<dyn>.as(<ident>, <expr>)`,
//! which is registered with the parser rather than declared here.

use super::{decl, function, method};
use crate::{CelType, FunctionDecl};

/// Returns the collections extension library function declarations.
pub fn collections_extension() -> Vec<FunctionDecl> {
    let dyn_list = CelType::dyn_list;
    let dyn_map = CelType::dyn_map;
    let t = || CelType::type_param("T");
    let k = || CelType::type_param("K");
    let v = || CelType::type_param("V");

    vec![
        decl(
            "collate",
            vec![
                method("list_collate_string", dyn_list(), &[CelType::String], dyn_list()),
                method(
                    "list_collate_list_string",
                    dyn_list(),
                    &[CelType::list(CelType::String)],
                    dyn_list(),
                ),
                method("map_collate_string", dyn_map(), &[CelType::String], dyn_list()),
                method(
                    "map_collate_list_string",
                    dyn_map(),
                    &[CelType::list(CelType::String)],
                    dyn_list(),
                ),
            ],
        ),
        decl(
            "drop",
            vec![
                method("map_drop_string", dyn_map(), &[CelType::String], dyn_map()),
                method(
                    "map_drop_list_string",
                    dyn_map(),
                    &[CelType::list(CelType::String)],
                    dyn_map(),
                ),
                method("list_drop_string", dyn_list(), &[CelType::String], dyn_list()),
                method(
                    "list_drop_list_string",
                    dyn_list(),
                    &[CelType::list(CelType::String)],
                    dyn_list(),
                ),
            ],
        ),
        decl(
            "drop_empty",
            vec![method("dyn_drop_empty", CelType::Dyn, &[], CelType::Dyn)],
        ),
        decl(
            "flatten",
            vec![method("list_flatten", dyn_list(), &[], dyn_list())],
        ),
        decl(
            "keys",
            vec![method("map_keys", CelType::map(k(), v()), &[], CelType::list(k()))
                .with_type_params(vec!["K".into(), "V".into()])],
        ),
        decl(
            "values",
            vec![method("map_values", CelType::map(k(), v()), &[], CelType::list(v()))
                .with_type_params(vec!["K".into(), "V".into()])],
        ),
        decl(
            "max",
            vec![
                method("list_max", CelType::list(t()), &[], t())
                    .with_type_params(vec!["T".into()]),
                function("max_list", &[CelType::list(t())], t())
                    .with_type_params(vec!["T".into()]),
            ],
        ),
        decl(
            "min",
            vec![
                method("list_min", CelType::list(t()), &[], t())
                    .with_type_params(vec!["T".into()]),
                function("min_list", &[CelType::list(t())], t())
                    .with_type_params(vec!["T".into()]),
            ],
        ),
        decl(
            "sum",
            vec![
                method("list_sum", CelType::list(t()), &[], t())
                    .with_type_params(vec!["T".into()]),
                function("sum_list", &[CelType::list(t())], t())
                    .with_type_params(vec!["T".into()]),
            ],
        ),
        decl(
            "with",
            vec![method("map_with_map", dyn_map(), &[dyn_map()], dyn_map())],
        ),
        decl(
            "with_replace",
            vec![method("map_with_replace_map", dyn_map(), &[dyn_map()], dyn_map())],
        ),
        decl(
            "with_update",
            vec![method("map_with_update_map", dyn_map(), &[dyn_map()], dyn_map())],
        ),
        decl(
            "zip",
            vec![method(
                "list_zip_list",
                CelType::list(k()),
                &[CelType::list(v())],
                CelType::map(k(), v()),
            )
            .with_type_params(vec!["K".into(), "V".into()])],
        ),
        decl(
            "tail",
            vec![
                method("list_tail", CelType::list(t()), &[], CelType::list(t()))
                    .with_type_params(vec!["T".into()]),
                function("tail_list", &[CelType::list(t())], CelType::list(t()))
                    .with_type_params(vec!["T".into()]),
            ],
        ),
        decl(
            "front",
            vec![method(
                "list_front_int",
                CelType::list(t()),
                &[CelType::Int],
                CelType::list(t()),
            )
            .with_type_params(vec!["T".into()])],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::find;

    #[test]
    fn test_collections_extension_names() {
        let funcs = collections_extension();
        for name in [
            "collate", "drop", "drop_empty", "flatten", "keys", "values", "max", "min", "sum",
            "with", "with_replace", "with_update", "zip", "tail", "front",
        ] {
            find(&funcs, name);
        }
    }

    #[test]
    fn test_keys_is_generic_member() {
        let funcs = collections_extension();
        let keys = find(&funcs, "keys");
        assert!(keys.overloads[0].is_member);
        assert_eq!(keys.overloads[0].type_params, vec!["K", "V"]);
        assert_eq!(
            keys.overloads[0].result,
            CelType::list(CelType::type_param("K"))
        );
    }

    #[test]
    fn test_max_has_member_and_global_forms() {
        let funcs = collections_extension();
        let max = find(&funcs, "max");
        assert!(max.has_member_overloads());
        assert!(max.has_standalone_overloads());
    }
}
