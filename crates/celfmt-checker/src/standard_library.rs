//! CEL standard library declarations.
//!
//! Operators are declared under their internal function names (`_+_`,
//! `@in`, `_?_:_`) so the checker resolves them like any other call.

use std::sync::LazyLock;

use celfmt_common::{CelType, FunctionDecl, OverloadDecl};

/// The CEL standard library: operators, conversions and built-in functions.
pub static STANDARD_LIBRARY: LazyLock<Vec<FunctionDecl>> = LazyLock::new(build_standard_library);

/// Identifiers that denote types, e.g. `type(x) == int`.
pub fn type_constants() -> Vec<(&'static str, CelType)> {
    use CelType::*;
    [
        ("bool", Bool),
        ("int", Int),
        ("uint", UInt),
        ("double", Double),
        ("string", String),
        ("bytes", Bytes),
        ("list", CelType::dyn_list()),
        ("map", CelType::dyn_map()),
        ("null_type", Null),
        ("type", CelType::type_of(Dyn)),
        ("dyn", Dyn),
        ("google.protobuf.Timestamp", Timestamp),
        ("google.protobuf.Duration", Duration),
    ]
    .into_iter()
    .map(|(name, ty)| (name, CelType::type_of(ty)))
    .collect()
}

fn t() -> CelType {
    CelType::type_param("T")
}

fn generic(id: &str, params: Vec<CelType>, result: CelType, names: &[&str]) -> OverloadDecl {
    OverloadDecl::function(id, params, result)
        .with_type_params(names.iter().map(|n| n.to_string()).collect())
}

/// One overload per type, each taking two operands of that type.
fn homogeneous(name: &str, prefix: &str, types: &[CelType], result: Option<CelType>) -> FunctionDecl {
    FunctionDecl::new(name).with_overloads(types.iter().map(|ty| {
        OverloadDecl::function(
            format!("{}_{}", prefix, overload_suffix(ty)),
            vec![ty.clone(), ty.clone()],
            result.clone().unwrap_or_else(|| ty.clone()),
        )
    }))
}

/// Ordering between distinct numeric types, e.g. `less_int64_double`.
fn cross_numeric(prefix: &str) -> Vec<OverloadDecl> {
    use CelType::{Double, Int, UInt};

    let pairs = [
        (Int, Double),
        (Int, UInt),
        (UInt, Double),
        (UInt, Int),
        (Double, Int),
        (Double, UInt),
    ];
    pairs
        .into_iter()
        .map(|(lhs, rhs)| {
            OverloadDecl::function(
                format!(
                    "{}_{}_{}",
                    prefix,
                    overload_suffix(&lhs),
                    overload_suffix(&rhs)
                ),
                vec![lhs, rhs],
                CelType::Bool,
            )
        })
        .collect()
}

/// Conversion function `name(T) -> target` for each source type.
fn conversion(name: &str, target: CelType, sources: &[CelType]) -> FunctionDecl {
    FunctionDecl::new(name).with_overloads(sources.iter().map(|src| {
        OverloadDecl::function(
            format!("{}_to_{}", overload_suffix(src), name),
            vec![src.clone()],
            target.clone(),
        )
    }))
}

fn overload_suffix(ty: &CelType) -> &'static str {
    match ty {
        CelType::Bool => "bool",
        CelType::Int => "int64",
        CelType::UInt => "uint64",
        CelType::Double => "double",
        CelType::String => "string",
        CelType::Bytes => "bytes",
        CelType::Timestamp => "timestamp",
        CelType::Duration => "duration",
        _ => "dyn",
    }
}

fn build_standard_library() -> Vec<FunctionDecl> {
    use CelType::{Bool, Bytes, Double, Duration, Int, String as Str, Timestamp, UInt};

    let numeric = [Int, UInt, Double];
    let ordered = [Bool, Int, UInt, Double, Str, Bytes, Timestamp, Duration];
    let list_t = || CelType::list(t());
    let map_kv = || CelType::map(CelType::type_param("K"), CelType::type_param("V"));

    let mut funcs = vec![
        homogeneous("_+_", "add", &[Int, UInt, Double, Str, Bytes, Duration], None).with_overloads([
            generic("add_list", vec![list_t(), list_t()], list_t(), &["T"]),
            OverloadDecl::function(
                "add_timestamp_duration",
                vec![Timestamp, Duration],
                Timestamp,
            ),
            OverloadDecl::function(
                "add_duration_timestamp",
                vec![Duration, Timestamp],
                Timestamp,
            ),
        ]),
        homogeneous("_-_", "subtract", &[Int, UInt, Double, Duration], None).with_overloads([
            OverloadDecl::function(
                "subtract_timestamp_timestamp",
                vec![Timestamp, Timestamp],
                Duration,
            ),
            OverloadDecl::function(
                "subtract_timestamp_duration",
                vec![Timestamp, Duration],
                Timestamp,
            ),
        ]),
        homogeneous("_*_", "multiply", &numeric, None),
        homogeneous("_/_", "divide", &numeric, None),
        homogeneous("_%_", "modulo", &[Int, UInt], None),
        FunctionDecl::new("-_").with_overloads([
            OverloadDecl::function("negate_int64", vec![Int], Int),
            OverloadDecl::function("negate_double", vec![Double], Double),
        ]),
        FunctionDecl::new("!_").with_overload(OverloadDecl::function(
            "logical_not",
            vec![Bool],
            Bool,
        )),
        FunctionDecl::new("_&&_").with_overload(OverloadDecl::function(
            "logical_and",
            vec![Bool, Bool],
            Bool,
        )),
        FunctionDecl::new("_||_").with_overload(OverloadDecl::function(
            "logical_or",
            vec![Bool, Bool],
            Bool,
        )),
        FunctionDecl::new("_==_").with_overload(generic("equals", vec![t(), t()], Bool, &["T"])),
        FunctionDecl::new("_!=_").with_overload(generic(
            "not_equals",
            vec![t(), t()],
            Bool,
            &["T"],
        )),
        homogeneous("_<_", "less", &ordered, Some(Bool)).with_overloads(cross_numeric("less")),
        homogeneous("_<=_", "less_equals", &ordered, Some(Bool))
            .with_overloads(cross_numeric("less_equals")),
        homogeneous("_>_", "greater", &ordered, Some(Bool))
            .with_overloads(cross_numeric("greater")),
        homogeneous("_>=_", "greater_equals", &ordered, Some(Bool))
            .with_overloads(cross_numeric("greater_equals")),
        FunctionDecl::new("@in").with_overloads([
            generic("in_list", vec![t(), list_t()], Bool, &["T"]),
            generic(
                "in_map",
                vec![CelType::type_param("K"), map_kv()],
                Bool,
                &["K", "V"],
            ),
        ]),
        FunctionDecl::new("_?_:_").with_overload(generic(
            "conditional",
            vec![Bool, t(), t()],
            t(),
            &["T"],
        )),
        FunctionDecl::new("_[_]").with_overloads([
            generic("index_list", vec![list_t(), Int], t(), &["T"]),
            generic(
                "index_map",
                vec![map_kv(), CelType::type_param("K")],
                CelType::type_param("V"),
                &["K", "V"],
            ),
        ]),
        // Conversions
        conversion("bool", Bool, &[Bool, Str]),
        conversion("bytes", Bytes, &[Bytes, Str]),
        conversion("double", Double, &[Double, Int, UInt, Str]),
        conversion("duration", Duration, &[Duration, Str]),
        conversion("int", Int, &[Int, UInt, Double, Str, Timestamp]),
        conversion("string", Str, &[Str, Bool, Int, UInt, Double, Bytes, Timestamp, Duration]),
        conversion("timestamp", Timestamp, &[Timestamp, Str, Int]),
        conversion("uint", UInt, &[UInt, Int, Double, Str]),
        FunctionDecl::new("dyn").with_overload(generic("to_dyn", vec![t()], CelType::Dyn, &["T"])),
        FunctionDecl::new("type").with_overload(generic(
            "type",
            vec![t()],
            CelType::type_of(t()),
            &["T"],
        )),
    ];

    // size() as both a global function and a method.
    let sized = [Str, Bytes, list_t(), map_kv()];
    let mut size = FunctionDecl::new("size");
    for ty in sized {
        let suffix = match &ty {
            CelType::List(_) => "list",
            CelType::Map(_, _) => "map",
            other => overload_suffix(other),
        };
        let names: &[&str] = match &ty {
            CelType::List(_) => &["T"],
            CelType::Map(_, _) => &["K", "V"],
            _ => &[],
        };
        size = size.with_overloads([
            generic(&format!("size_{}", suffix), vec![ty.clone()], Int, names),
            OverloadDecl::method(format!("{}_size", suffix), vec![ty], Int)
                .with_type_params(names.iter().map(|n| n.to_string()).collect()),
        ]);
    }
    funcs.push(size);

    // String predicates.
    for (name, id) in [
        ("contains", "contains_string"),
        ("endsWith", "ends_with_string"),
        ("startsWith", "starts_with_string"),
        ("matches", "matches_string"),
    ] {
        funcs.push(FunctionDecl::new(name).with_overload(OverloadDecl::method(
            format!("string_{}", id),
            vec![Str, Str],
            Bool,
        )));
    }
    if let Some(matches) = funcs.iter_mut().find(|f| f.name == "matches") {
        matches.overloads.push(OverloadDecl::function(
            "matches_string",
            vec![Str, Str],
            Bool,
        ));
    }

    // Timestamp and duration accessors, with an optional time zone for timestamps.
    let timestamp_only = [
        "getFullYear",
        "getMonth",
        "getDayOfYear",
        "getDayOfMonth",
        "getDate",
        "getDayOfWeek",
    ];
    let shared = ["getHours", "getMinutes", "getSeconds", "getMilliseconds"];
    for name in timestamp_only.iter().chain(shared.iter()) {
        let mut func = FunctionDecl::new(*name).with_overloads([
            OverloadDecl::method(format!("timestamp_{}", name), vec![Timestamp], Int),
            OverloadDecl::method(
                format!("timestamp_{}_with_tz", name),
                vec![Timestamp, Str],
                Int,
            ),
        ]);
        if shared.contains(name) {
            func = func.with_overload(OverloadDecl::method(
                format!("duration_{}", name),
                vec![Duration],
                Int,
            ));
        }
        funcs.push(func);
    }

    funcs
}
