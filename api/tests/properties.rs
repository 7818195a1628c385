//! Property tests for status classification and JSON decoding.

use api_runtime::{
    Codec, DecodeError, Either, JsonCodec, StatusClass, classify, decode_json, to_url_piece,
};
use proptest::prelude::*;
use serde::Serialize;
use serde_json::{Value, json};

proptest! {
    #[test]
    fn test_classify_matches_status_ranges(status in 0u16..1000) {
        let expected = if (200..=299).contains(&status) {
            StatusClass::Success
        } else if status == 404 {
            StatusClass::NotFound
        } else {
            StatusClass::Failure
        };
        prop_assert_eq!(classify(status), expected);
    }

    #[test]
    fn test_integer_round_trip(n in any::<i64>()) {
        let encoded = JsonCodec.encode_json(&n).unwrap();
        prop_assert_eq!(JsonCodec.decode_json::<i64>(&encoded).unwrap(), n);
    }

    #[test]
    fn test_string_round_trip(s in ".*") {
        let encoded = JsonCodec.encode_json(&s).unwrap();
        prop_assert_eq!(JsonCodec.decode_json::<String>(&encoded).unwrap(), s);
    }

    #[test]
    fn test_bool_round_trip(b in any::<bool>()) {
        let encoded = JsonCodec.encode_json(&b).unwrap();
        prop_assert_eq!(JsonCodec.decode_json::<bool>(&encoded).unwrap(), b);
    }

    #[test]
    fn test_sequence_round_trip(items in prop::collection::vec(any::<u32>(), 0..32)) {
        let encoded = JsonCodec.encode_json(&items).unwrap();
        prop_assert_eq!(JsonCodec.decode_json::<Vec<u32>>(&encoded).unwrap(), items);
    }

    #[test]
    fn test_either_round_trip(
        value in prop_oneof![
            any::<i32>().prop_map(Either::<i32, Vec<String>>::Left),
            prop::collection::vec(".*", 0..8).prop_map(Either::<i32, Vec<String>>::Right),
        ]
    ) {
        let encoded = JsonCodec.encode_json(&value).unwrap();
        let decoded: Either<i32, Vec<String>> = JsonCodec.decode_json(&encoded).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn test_every_bad_element_is_reported(
        cells in prop::collection::vec(prop::option::of(any::<i32>()), 0..24)
    ) {
        // `None` cells become strings that cannot decode as integers.
        let array: Vec<Value> = cells
            .iter()
            .map(|cell| match cell {
                Some(n) => json!(n),
                None => json!("x"),
            })
            .collect();
        let bad: Vec<usize> = cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.is_none().then_some(i))
            .collect();

        match decode_json::<Vec<i32>>(&Value::Array(array)) {
            Ok(decoded) => prop_assert!(bad.is_empty() && decoded.len() == cells.len()),
            Err(errors) => {
                let reported: Vec<usize> = errors
                    .iter()
                    .map(|error| match error {
                        DecodeError::AtIndex { index, .. } => *index,
                        other => panic!("unexpected error {other:?}"),
                    })
                    .collect();
                prop_assert_eq!(reported, bad);
            }
        }
    }
}

#[test]
fn test_single_bad_element_is_indexed() {
    let errors = decode_json::<Vec<i64>>(&json!([1, "x", 3])).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors.iter().next(),
        Some(DecodeError::AtIndex { index: 1, .. })
    ));
}

#[test]
fn test_either_branches() {
    let right: Either<i64, String> = decode_json(&json!({"Right": "five"})).unwrap();
    assert_eq!(right, Either::Right("five".to_string()));

    let right: Either<String, i64> = decode_json(&json!({"Right": 5})).unwrap();
    assert_eq!(right, Either::Right(5));

    let left: Either<String, i64> = decode_json(&json!({"Left": "e"})).unwrap();
    assert_eq!(left, Either::Left("e".to_string()));

    let err = decode_json::<Either<i64, String>>(&json!({})).unwrap_err();
    assert!(err.to_string().contains("not a valid two-branch sum"));
}

#[derive(Serialize)]
#[serde(rename = "Module.Status")]
enum Status {
    Active,
    #[serde(rename = "Module.Pair")]
    Pair(i32, i32),
    Nested(Inner),
}

#[derive(Serialize)]
enum Inner {
    Pair(i32, i32),
}

#[test]
fn test_url_pieces() {
    assert_eq!(to_url_piece(&Status::Active).unwrap(), "Active");
    assert_eq!(to_url_piece(&Status::Pair(1, 2)).unwrap(), "Pair 1 2");
    assert_eq!(
        to_url_piece(&Status::Nested(Inner::Pair(1, 2))).unwrap(),
        "Nested (Pair 1 2)"
    );
}
