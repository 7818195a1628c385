//! Structural JSON decoding.
//!
//! Response bodies are decoded by the [`Decode`] implementation of the
//! endpoint's result type. Primitives, [`Either`](crate::Either), `Option`
//! and `Vec` are implemented here; composite types generated from an API
//! definition implement [`Decode`] by describing their [`Shape`] and
//! delegating to [`decode_shaped`]. The trait impl is the registration: each
//! type supplies its decoder once and generic code reaches it through
//! [`decode_json`].
//!
//! ## Examples
//!
//! ```rust
//! use api_runtime::{Decode, Shape, decode_json, decode_shaped, DecodeErrors};
//! use serde_json::{json, Value};
//!
//! #[derive(Debug, PartialEq, serde::Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! impl Decode for User {
//!     fn shape() -> Shape {
//!         Shape::record("User", [("id", Shape::Integer), ("name", Shape::String)])
//!     }
//!
//!     fn decode(value: &Value) -> Result<Self, DecodeErrors> {
//!         decode_shaped(&Self::shape(), value)
//!     }
//! }
//!
//! let users: Vec<User> = decode_json(&json!([{"id": 1, "name": "Ann"}])).unwrap();
//! assert_eq!(users[0].name, "Ann");
//!
//! let err = decode_json::<Vec<User>>(&json!([{"id": 1, "name": "Ann"}, {"id": "2"}])).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "error at array index 1: error at field \"id\": expected integer; missing field \"name\""
//! );
//! ```

pub mod combinators;
mod primitives;
mod shape;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{DecodeError, DecodeErrors};

pub use shape::{CONTENTS_KEY, RecordLayout, Shape, TAG_KEY, VariantLayout, VariantsLayout};

/// A type that can be decoded from a JSON value with path-annotated errors.
pub trait Decode: Sized {
    /// Describes the JSON structure this type expects.
    fn shape() -> Shape;

    /// Decodes a value.
    ///
    /// ## Errors
    ///
    /// Returns every structural mismatch found.
    fn decode(value: &Value) -> Result<Self, DecodeErrors>;
}

/// Decodes `value` as `T`.
///
/// This is the decoder generated code passes to
/// [`execute`](crate::execute), e.g. `decode_json::<Either<String, i64>>`.
pub fn decode_json<T: Decode>(value: &Value) -> Result<T, DecodeErrors> {
    T::decode(value)
}

/// Decodes a composite type from its declared shape.
///
/// The value is first checked against `shape`, collecting one error per
/// mismatched field, array element or variant argument. A value that passes
/// is normalized (unit positions become `null`, integral floats become
/// integers) and then materialized through `T`'s `Deserialize`
/// implementation, which for variant types must use
/// `#[serde(tag = "tag", content = "contents")]`.
///
/// ## Errors
///
/// The collected shape errors, or a single [`DecodeError::Custom`] if serde
/// rejects a value the shape accepted.
pub fn decode_shaped<T: DeserializeOwned>(shape: &Shape, value: &Value) -> Result<T, DecodeErrors> {
    shape.check(value)?;
    let normalized = shape.normalize(value);
    T::deserialize(&normalized).map_err(|e| DecodeError::Custom(e.to_string()).into())
}
