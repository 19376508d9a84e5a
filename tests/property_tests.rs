//! Property-based tests over generated documents.
//!
//! Each property builds Skopik text from generated parts, parses it and
//! checks a structural guarantee of the resulting tree.

use proptest::prelude::*;
use skopik::{parse_str, Error, Kind, Value};

fn parse_value(src: &str) -> Value {
    match parse_str(src) {
        Ok(root) => Value::Scope(root),
        Err(e) => panic!("{src:?} failed to parse: {e}"),
    }
}

/// One array element: either a plain value or an explicit `[gap + next]:` jump.
#[derive(Clone, Debug)]
enum Element {
    Plain(i32),
    Jump(usize, i32),
}

fn element() -> impl Strategy<Value = Element> {
    prop_oneof![
        any::<i32>().prop_map(Element::Plain),
        (0usize..4, any::<i32>()).prop_map(|(gap, v)| Element::Jump(gap, v)),
    ]
}

proptest! {
    #[test]
    fn prop_arrays_are_dense(elements in prop::collection::vec(element(), 0..16)) {
        let mut parts = Vec::new();
        let mut expected = Vec::new();
        for element in &elements {
            match *element {
                Element::Plain(v) => {
                    parts.push(v.to_string());
                    expected.push(Some(v));
                }
                Element::Jump(gap, v) => {
                    let index = expected.len() + gap;
                    parts.push(format!("[{index}]: {v}"));
                    expected.resize(index, None);
                    expected.push(Some(v));
                }
            }
        }

        let root = parse_value(&format!("a = [{}]", parts.join(", ")));
        let array = root.get("a").and_then(Value::as_array).unwrap();
        prop_assert_eq!(array.len(), expected.len());
        for (value, want) in array.iter().zip(&expected) {
            match want {
                Some(v) => prop_assert_eq!(value.as_i32(), Some(*v)),
                None => prop_assert!(value.is_null()),
            }
        }
    }

    #[test]
    fn prop_backward_index_fails(len in 1usize..8, back in 1usize..8) {
        let back = back.min(len);
        let items: Vec<String> = (0..len).map(|i| i.to_string()).collect();
        let src = format!("a = [{}, [{}]: 0]", items.join(", "), len - back);
        let err = parse_str(&src).unwrap_err();
        prop_assert!(
            matches!(err, Error::ArrayIndexOrder { next, .. } if next == len),
            "{}", err
        );
    }

    #[test]
    fn prop_uniform_tuples_parse(values in prop::collection::vec(any::<u32>(), 1..10)) {
        let items: Vec<String> = values.iter().map(|v| format!("{v}u")).collect();
        let root = parse_value(&format!("t = ({})", items.join(", ")));
        let tuple = root.get("t").and_then(Value::as_tuple).unwrap();
        prop_assert_eq!(tuple.tuple_type(), Some(Kind::UInt32));
        prop_assert!(tuple.iter().all(|v| v.kind() == Kind::UInt32));
        prop_assert_eq!(tuple.len(), values.len());
    }

    #[test]
    fn prop_mixed_tuples_fail(
        ints in prop::collection::vec(any::<i32>(), 1..6),
        position in 0usize..6,
        odd in "[a-z]{1,6}",
    ) {
        let mut items: Vec<String> = ints.iter().map(i32::to_string).collect();
        let position = 1 + position % items.len();
        items.insert(position, format!("\"{odd}\""));
        let err = parse_str(&format!("t = ({})", items.join(", "))).unwrap_err();
        prop_assert!(
            matches!(err, Error::TupleTypeMismatch { expected: Kind::Int32, found: Kind::String, .. }),
            "{}", err
        );
    }

    #[test]
    fn prop_scope_keys_stay_unique(keys in prop::collection::vec("[a-d]", 1..20)) {
        let body: Vec<String> = keys.iter().enumerate().map(|(i, k)| format!("{k} = {i}")).collect();
        let root = parse_value(&format!("s:{{ {} }}", body.join("; ")));
        let scope = root.get("s").and_then(Value::as_scope).unwrap();

        let mut distinct = keys.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(scope.len(), distinct.len());

        for key in &distinct {
            let last = keys.iter().rposition(|k| k == key).unwrap();
            prop_assert_eq!(scope.get(key).and_then(Value::as_i32), Some(last as i32));
        }
    }

    #[test]
    fn prop_decimal_literals(n in any::<i32>(), m in any::<i64>(), u in any::<u64>()) {
        let root = parse_value(&format!("a = {n}; b = {m}L; c = {u}uL"));
        prop_assert_eq!(root.get("a").and_then(Value::as_i32), Some(n));
        prop_assert_eq!(root.get("b").and_then(Value::as_i64), Some(m));
        prop_assert_eq!(root.get("c").and_then(Value::as_u64), Some(u));
    }

    #[test]
    fn prop_hex_literals(n in any::<u32>()) {
        let root = parse_value(&format!("a = 0x{n:X}u; b = 0x{n:x}"));
        let a = root.get("a").unwrap();
        prop_assert_eq!(a.as_u32(), Some(n));
        prop_assert_eq!(a.to_string(), format!("0x{n:X}u"));
        prop_assert_eq!(root.get("b").and_then(Value::as_i32), Some(n as i32));
    }

    #[test]
    fn prop_binary_literals(n in any::<u32>(), pad in 0usize..4) {
        let digits = format!("{n:b}");
        let width = (digits.len() + pad).min(32);
        let spelled = format!("{n:0width$b}");
        let root = parse_value(&format!("a = {spelled}b"));
        let bits = root.get("a").and_then(Value::as_bits).unwrap();
        prop_assert_eq!(bits.bits(), n);
        prop_assert_eq!(usize::from(bits.width()), spelled.len());
        prop_assert_eq!(bits.to_string(), spelled);
    }

    #[test]
    fn prop_float_literals(x in -1.0e12f64..1.0e12) {
        let root = parse_value(&format!("a = {x:?}; b = {x:e}d"));
        prop_assert_eq!(root.get("a").and_then(Value::as_f64), Some(x));
        prop_assert_eq!(root.get("b").and_then(Value::as_f64), Some(x));
    }

    #[test]
    fn prop_quoted_strings(s in "[a-zA-Z0-9 {}\\[\\]();:,=@]{0,24}") {
        let root = parse_value(&format!("s = \"{s}\""));
        prop_assert_eq!(root.get("s").and_then(Value::as_str), Some(s.as_str()));
    }
}
