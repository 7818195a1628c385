//! Primitive decoders that generated code composes into type decoders.
//!
//! Each combinator inspects a borrowed [`Value`] and either produces the typed
//! result or a non-empty [`DecodeErrors`]. Container combinators take the
//! element decoder as a closure and annotate its errors with the element's
//! position.

use serde_json::Value;

use crate::either::Either;
use crate::error::{DecodeError, DecodeErrors};

/// Largest magnitude at which every `f64` is still an exact integer.
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

/// Decodes an integer-valued JSON number.
///
/// Accepts `3` as well as `3.0`, and checks the result fits in `N`.
///
/// ## Errors
///
/// `expected integer` for non-numbers and fractional numbers,
/// `expected integer within the range of <type>` when the value does not fit.
pub fn integer<N: TryFrom<i128>>(value: &Value) -> Result<N, DecodeErrors> {
    let Some(raw) = integer_value(value) else {
        return Err(DecodeError::expected("integer").into());
    };
    N::try_from(raw).map_err(|_| {
        DecodeError::expected(format!(
            "integer within the range of {}",
            std::any::type_name::<N>()
        ))
        .into()
    })
}

pub(crate) fn integer_value(value: &Value) -> Option<i128> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(i) = n.as_i64() {
        return Some(i128::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(i128::from(u));
    }
    let f = n.as_f64()?;
    // Fractional or imprecise floats are not integers.
    if f.fract() == 0.0 && f.abs() <= MAX_EXACT_F64 {
        Some(f as i128)
    } else {
        None
    }
}

/// Decodes any JSON number as `f64`.
pub fn number(value: &Value) -> Result<f64, DecodeErrors> {
    value
        .as_f64()
        .ok_or_else(|| DecodeError::expected("number").into())
}

/// Decodes a JSON boolean.
pub fn boolean(value: &Value) -> Result<bool, DecodeErrors> {
    value
        .as_bool()
        .ok_or_else(|| DecodeError::expected("boolean").into())
}

/// Decodes a JSON string.
pub fn string(value: &Value) -> Result<String, DecodeErrors> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| DecodeError::expected("string").into())
}

/// Always succeeds, ignoring the value.
pub fn unit(_value: &Value) -> Result<(), DecodeErrors> {
    Ok(())
}

/// Decodes `null` as `None` and anything else with `inner`.
pub fn nullable<T>(
    value: &Value,
    inner: impl FnOnce(&Value) -> Result<T, DecodeErrors>,
) -> Result<Option<T>, DecodeErrors> {
    if value.is_null() {
        Ok(None)
    } else {
        inner(value).map(Some)
    }
}

/// Decodes a two-branch sum encoded as `{"Left": l}` or `{"Right": r}`.
///
/// The object must carry exactly one of the two keys; the payload's own
/// errors are reported under the branch key.
///
/// ## Errors
///
/// [`DecodeError::InvalidSum`] when the value is not an object or carries
/// neither or both keys.
pub fn either<L, R>(
    value: &Value,
    left: impl FnOnce(&Value) -> Result<L, DecodeErrors>,
    right: impl FnOnce(&Value) -> Result<R, DecodeErrors>,
) -> Result<Either<L, R>, DecodeErrors> {
    let Value::Object(map) = value else {
        return Err(DecodeError::InvalidSum.into());
    };
    match (map.get("Left"), map.get("Right")) {
        (None, Some(payload)) => right(payload)
            .map(Either::Right)
            .map_err(|errors| at_field("Right", errors)),
        (Some(payload), None) => left(payload)
            .map(Either::Left)
            .map_err(|errors| at_field("Left", errors)),
        _ => Err(DecodeError::InvalidSum.into()),
    }
}

/// Decodes a JSON array with `element`.
///
/// Every element is attempted. Each failing element contributes one
/// [`DecodeError::AtIndex`] wrapping its own errors, so nested arrays produce
/// nested index paths.
pub fn array<T>(
    value: &Value,
    mut element: impl FnMut(&Value) -> Result<T, DecodeErrors>,
) -> Result<Vec<T>, DecodeErrors> {
    let Value::Array(items) = value else {
        return Err(DecodeError::expected("array").into());
    };

    let mut decoded = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match element(item) {
            Ok(v) => decoded.push(v),
            Err(inner) => errors.push(DecodeError::AtIndex {
                index,
                errors: inner,
            }),
        }
    }

    match DecodeErrors::from_vec(errors) {
        Some(errors) => Err(errors),
        None => Ok(decoded),
    }
}

pub(crate) fn at_field(field: &str, errors: DecodeErrors) -> DecodeErrors {
    DecodeError::AtField {
        field: field.to_string(),
        errors,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_accepts_integral_float() {
        assert_eq!(integer::<i64>(&json!(3.0)).unwrap(), 3);
        assert_eq!(integer::<u8>(&json!(255)).unwrap(), 255);
    }

    #[test]
    fn test_integer_rejects_fraction_and_strings() {
        let err = integer::<i64>(&json!(1.5)).unwrap_err();
        assert_eq!(err.to_string(), "expected integer");
        assert!(integer::<i64>(&json!("1")).is_err());
    }

    #[test]
    fn test_integer_range_check() {
        let err = integer::<u8>(&json!(256)).unwrap_err();
        assert_eq!(err.to_string(), "expected integer within the range of u8");
        assert!(integer::<u32>(&json!(-1)).is_err());
    }

    #[test]
    fn test_u64_max() {
        assert_eq!(integer::<u64>(&json!(u64::MAX)).unwrap(), u64::MAX);
    }

    #[test]
    fn test_array_collects_every_failure() {
        let err = array(&json!([1, "x", 3, "y"]), integer::<i64>).unwrap_err();
        let indices: Vec<_> = err
            .iter()
            .map(|e| match e {
                DecodeError::AtIndex { index, .. } => *index,
                other => panic!("unexpected error {other:?}"),
            })
            .collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn test_either_rejects_both_keys() {
        let result = either(&json!({"Left": 1, "Right": 2}), integer::<i64>, integer::<i64>);
        assert_eq!(
            result.unwrap_err(),
            DecodeErrors::single(DecodeError::InvalidSum)
        );
    }

    #[test]
    fn test_either_reports_branch_path() {
        let err = either(&json!({"Right": "five"}), string, integer::<i64>).unwrap_err();
        assert_eq!(err.to_string(), "error at field \"Right\": expected integer");
    }

    #[test]
    fn test_nullable() {
        assert_eq!(nullable(&json!(null), string).unwrap(), None);
        assert_eq!(
            nullable(&json!("a"), string).unwrap(),
            Some("a".to_string())
        );
    }

    #[test]
    fn test_unit_ignores_value() {
        assert!(unit(&json!({"anything": [1, 2]})).is_ok());
    }
}
