//! Property tests for the plain/decorated round trip.

use params_yaml::{emit, emit_node, parse};
use proptest::prelude::*;
use yaml_params::{merge, to_plain, ParamMap, ParamValue};

/// Strings that stress quoting: indicators, quotes, line breaks, and words
/// other YAML readers type as booleans or numbers.
fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[ -~é中]{0,12}",
        1 => "[a-z #:'\n-]{0,8}",
        1 => prop::sample::select(vec![
            "", "~", "null", "yes", "No", "on", "-", "- x", "? x", ":x", "#x", "'q'", "\"q\"",
            "1e3", "0x1F", "1.", ".inf", "a: b", "a #b", "it's # x", "---", "x\ny",
        ])
        .prop_map(String::from),
    ]
}

fn leaf() -> impl Strategy<Value = ParamValue> {
    prop_oneof![
        Just(ParamValue::Null),
        any::<bool>().prop_map(ParamValue::Bool),
        any::<i64>().prop_map(ParamValue::Int),
        prop::num::f64::NORMAL.prop_map(ParamValue::Float),
        text().prop_map(ParamValue::String),
    ]
}

fn value() -> impl Strategy<Value = ParamValue> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(ParamValue::List),
            prop::collection::vec((text(), inner), 0..4)
                .prop_map(|entries| entries.into_iter().collect::<ParamValue>()),
        ]
    })
}

fn params() -> impl Strategy<Value = ParamValue> {
    prop::collection::vec((text(), value()), 0..6)
        .prop_map(|entries| entries.into_iter().collect::<ParamValue>())
}

/// Longer than any key `text()` produces.
const EXTRA_KEY: &str = "extra key outside the generated ones";

proptest! {
    #[test]
    fn merge_into_nothing_round_trips(plain in params()) {
        prop_assert_eq!(to_plain(&merge(&plain, None)), plain);
    }

    #[test]
    fn emitted_text_reads_back(plain in params()) {
        let text = emit_node(&merge(&plain, None));
        let document = parse(&text).unwrap();
        prop_assert_eq!(to_plain(document.root()), plain, "text:\n{}", text);
    }

    #[test]
    fn reparsed_text_emits_unchanged(plain in params()) {
        let text = emit_node(&merge(&plain, None));
        let document = parse(&text).unwrap();
        prop_assert_eq!(emit(&document), text);
    }

    #[test]
    fn second_merge_changes_nothing(plain in params()) {
        let once = merge(&plain, None);
        let twice = merge(&plain, Some(once.clone()));
        prop_assert_eq!(emit_node(&twice), emit_node(&once));
    }

    #[test]
    fn merge_never_drops_keys(plain in params(), extra in leaf()) {
        let mut with_extra: ParamMap = plain.as_map().cloned().unwrap_or_default();
        with_extra.insert(EXTRA_KEY.into(), extra.clone());
        let existing = merge(&ParamValue::Map(with_extra), None);

        let merged = to_plain(&merge(&plain, Some(existing)));
        prop_assert_eq!(merged.get(EXTRA_KEY), Some(&extra));
    }
}
