//! Property tests over generated expressions.
//!
//! Sources are built from fully parenthesized pieces so every generated
//! string parses. They are only parsed, not type checked, which lets the
//! generator combine operands freely.

mod common;

use celfmt::{format, FormatOptions};
use proptest::prelude::*;

const RESERVED: &[&str] = &[
    "as", "break", "const", "continue", "else", "false", "for", "function", "if", "import", "in",
    "let", "loop", "namespace", "null", "package", "return", "true", "var", "void", "while",
];

fn ident() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,7}")
        .expect("valid regex")
        .prop_filter("not reserved", |s| !RESERVED.contains(&s.as_str()))
}

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        (0i64..100_000).prop_map(|n| n.to_string()),
        (0u64..1000).prop_map(|n| format!("{}u", n)),
        (0.0f64..100.0).prop_map(|f| format!("{:.2}", f)),
        prop::string::string_regex("[a-z ]{0,8}")
            .expect("valid regex")
            .prop_map(|s| format!("'{}'", s)),
        Just("true".to_string()),
        Just("null".to_string()),
        ident().prop_map(|f| format!("state.{}", f)),
        ident().prop_map(|f| format!("state.?{}", f)),
        ident(),
    ]
}

fn binary_op() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "+", "-", "*", "/", "%", "==", "!=", "<", "<=", ">", ">=", "in", "&&", "||",
    ])
}

/// Separator between elements, sometimes carrying a comment.
fn separator() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        4 => Just(", "),
        1 => Just(", // note\n"),
        1 => Just(",\n"),
    ]
}

fn join(items: Vec<String>, seps: Vec<&'static str>) -> String {
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(seps.get(i - 1).copied().unwrap_or(", "));
        }
        out.push_str(&item);
    }
    out
}

fn expr() -> impl Strategy<Value = String> {
    leaf().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            (inner.clone(), binary_op(), inner.clone())
                .prop_map(|(l, op, r)| format!("({}) {} ({})", l, op, r)),
            (prop::sample::select(vec!["-", "!"]), inner.clone())
                .prop_map(|(op, e)| format!("{}({})", op, e)),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(c, t, e)| format!("({}) ? ({}) : ({})", c, t, e)),
            (
                prop::collection::vec(inner.clone(), 0..5),
                prop::collection::vec(separator(), 4)
            )
                .prop_map(|(items, seps)| format!("[{}]", join(items, seps))),
            (
                prop::collection::vec((ident(), inner.clone()), 0..4),
                prop::collection::vec(separator(), 3)
            )
                .prop_map(|(entries, seps)| {
                    let items = entries
                        .into_iter()
                        .map(|(k, v)| format!("'{}': {}", k, v))
                        .collect();
                    format!("{{{}}}", join(items, seps))
                }),
            (ident(), prop::collection::vec(inner.clone(), 0..4))
                .prop_map(|(f, args)| format!("fn_{}({})", f, args.join(", "))),
            (inner.clone(), ident()).prop_map(|(e, f)| format!("({}).{}", e, f)),
            (inner.clone(), inner.clone()).prop_map(|(e, i)| format!("({})[{}]", e, i)),
            (inner.clone(), ident(), inner.clone())
                .prop_map(|(e, v, body)| format!("({}).map({}, {})", e, v, body)),
            (inner.clone(), ident(), inner.clone())
                .prop_map(|(e, v, body)| format!("({}).all({}, {})", e, v, body)),
            (inner.clone(), ident()).prop_map(|(e, f)| format!("has(({}).{})", e, f)),
            (inner.clone(), ident(), inner)
                .prop_map(|(e, v, body)| format!("({}).optMap({}, {})", e, v, body)),
        ]
    })
}

fn program() -> impl Strategy<Value = String> {
    (
        prop::option::of(Just("// leading\n")),
        expr(),
        prop::option::of(Just(" // trailing")),
    )
        .prop_map(|(lead, body, trail)| {
            format!("{}{}{}", lead.unwrap_or(""), body, trail.unwrap_or(""))
        })
}

fn pretty(source: &str) -> String {
    common::pretty(&common::parse(source))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_format_is_idempotent(source in program()) {
        let first = pretty(&source);
        let second = pretty(&first);
        prop_assert_eq!(&first, &second, "source:\n{}", source);
    }

    #[test]
    fn prop_format_preserves_meaning(source in program()) {
        let before = common::parse(&source);
        let formatted = pretty(&source);
        let after = common::parse(&formatted);
        prop_assert!(
            before.expr().node.structurally_eq(&after.expr().node),
            "source:\n{}\nformatted:\n{}",
            source,
            formatted
        );
    }

    #[test]
    fn prop_format_keeps_every_comment(source in program()) {
        let before = common::parse(&source);
        let after = common::parse(&pretty(&source));
        prop_assert_eq!(before.comments().len(), after.comments().len());
    }

    #[test]
    fn prop_compact_is_one_line(source in program()) {
        let ast = common::parse(&source);
        let compact = format(&ast, &FormatOptions::compact()).unwrap();
        prop_assert!(!compact.contains('\n'));
        let reparsed = common::parse(&compact);
        prop_assert!(ast.expr().node.structurally_eq(&reparsed.expr().node));
    }
}
