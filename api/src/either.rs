//! Two-branch sum type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{Decode, Shape, combinators};
use crate::error::DecodeErrors;

/// A value that is exactly one of two alternatives.
///
/// Encodes as `{"Left": l}` or `{"Right": r}`. Endpoints commonly return
/// `Either<ErrorPayload, Success>`.
///
/// ## Examples
///
/// ```rust
/// use api_runtime::{Either, decode_json};
/// use serde_json::json;
///
/// let value: Either<String, i64> = decode_json(&json!({"Right": 5})).unwrap();
/// assert_eq!(value, Either::Right(5));
/// assert_eq!(serde_json::to_value(&value).unwrap(), json!({"Right": 5}));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Either<L, R> {
    /// The alternate branch.
    Left(L),
    /// The primary branch.
    Right(R),
}

impl<L, R> Either<L, R> {
    /// Returns `true` for [`Either::Left`].
    pub fn is_left(&self) -> bool {
        matches!(self, Self::Left(_))
    }

    /// Returns `true` for [`Either::Right`].
    pub fn is_right(&self) -> bool {
        matches!(self, Self::Right(_))
    }

    /// Returns the left value, if any.
    pub fn left(self) -> Option<L> {
        match self {
            Self::Left(l) => Some(l),
            Self::Right(_) => None,
        }
    }

    /// Returns the right value, if any.
    pub fn right(self) -> Option<R> {
        match self {
            Self::Left(_) => None,
            Self::Right(r) => Some(r),
        }
    }

    /// Converts into a `Result`, treating `Right` as success.
    pub fn into_result(self) -> Result<R, L> {
        match self {
            Self::Left(l) => Err(l),
            Self::Right(r) => Ok(r),
        }
    }
}

impl<L, R> From<Result<R, L>> for Either<L, R> {
    fn from(result: Result<R, L>) -> Self {
        match result {
            Ok(r) => Self::Right(r),
            Err(l) => Self::Left(l),
        }
    }
}

impl<L: Decode, R: Decode> Decode for Either<L, R> {
    fn shape() -> Shape {
        Shape::either(L::shape(), R::shape())
    }

    fn decode(value: &Value) -> Result<Self, DecodeErrors> {
        combinators::either(value, L::decode, R::decode)
    }
}
