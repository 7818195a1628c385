//! Shape descriptors.
//!
//! A [`Shape`] describes the JSON structure a type expects. Composite types
//! generated from an API definition describe themselves with a
//! [`RecordLayout`] or [`VariantsLayout`]; [`Shape::check`] walks a value
//! against the description and reports every mismatch it finds.

use serde_json::{Map, Value};

use super::Decode;
use super::combinators::{self, at_field};
use crate::error::{DecodeError, DecodeErrors};

/// Key carrying the constructor name of a tagged variant.
pub const TAG_KEY: &str = "tag";

/// Key carrying the arguments of a tagged variant.
pub const CONTENTS_KEY: &str = "contents";

/// Description of the JSON structure a type expects.
///
/// ## Examples
///
/// ```rust
/// use api_runtime::Shape;
/// use serde_json::json;
///
/// let shape = Shape::array(Shape::either(Shape::String, Shape::Integer));
/// assert!(shape.check(&json!([{"Right": 1}, {"Left": "no"}])).is_ok());
///
/// let err = shape.check(&json!([{"Right": 1}, {}])).unwrap_err();
/// assert!(err.to_string().starts_with("error at array index 1"));
/// ```
#[derive(Debug, Clone)]
pub enum Shape {
    /// An integer-valued number.
    Integer,
    /// A string.
    String,
    /// Anything; the value is ignored.
    Unit,
    /// A two-branch sum: `{"Left": l}` or `{"Right": r}`.
    Either(Box<Shape>, Box<Shape>),
    /// An array whose elements all have the given shape.
    Array(Box<Shape>),
    /// Any number.
    Number,
    /// A boolean.
    Boolean,
    /// `null` or the inner shape. Record fields with this shape may be absent.
    Nullable(Box<Shape>),
    /// Any value at all.
    Any,
    /// An object with named fields.
    Record(RecordLayout),
    /// A tagged variant: `{"tag": "Ctor", "contents": ...}`.
    Variants(VariantsLayout),
    /// A shape computed on demand, used for recursive types.
    Deferred(fn() -> Shape),
}

impl Shape {
    /// A two-branch sum of `left` and `right`.
    pub fn either(left: Shape, right: Shape) -> Self {
        Self::Either(Box::new(left), Box::new(right))
    }

    /// An array of `element`.
    pub fn array(element: Shape) -> Self {
        Self::Array(Box::new(element))
    }

    /// `null` or `inner`.
    pub fn nullable(inner: Shape) -> Self {
        Self::Nullable(Box::new(inner))
    }

    /// A record with the given fields, in declaration order.
    pub fn record<N, I>(name: impl Into<String>, fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Shape)>,
    {
        Self::Record(RecordLayout {
            name: name.into(),
            fields: fields.into_iter().map(|(n, s)| (n.into(), s)).collect(),
        })
    }

    /// A tagged variant type with the given constructors.
    pub fn variants(
        name: impl Into<String>,
        variants: impl IntoIterator<Item = VariantLayout>,
    ) -> Self {
        Self::Variants(VariantsLayout {
            name: name.into(),
            variants: variants.into_iter().collect(),
        })
    }

    /// The shape of `T`, resolved lazily so that types may refer to themselves.
    pub fn of<T: Decode>() -> Self {
        Self::Deferred(T::shape)
    }

    /// Returns `true` if a record field of this shape may be omitted.
    pub fn is_optional(&self) -> bool {
        match self {
            Self::Nullable(_) => true,
            Self::Deferred(resolve) => resolve().is_optional(),
            _ => false,
        }
    }

    /// Checks `value` against this shape.
    ///
    /// Rules are tried in a fixed order: integer, string, unit, two-branch
    /// sum, array, then the remaining primitives, and finally the composite
    /// layouts. Array elements, record fields and variant arguments are all
    /// checked, so the result lists every mismatch rather than the first one.
    ///
    /// ## Errors
    ///
    /// Returns the collected [`DecodeErrors`], annotated with array indices
    /// and field names.
    pub fn check(&self, value: &Value) -> Result<(), DecodeErrors> {
        match self {
            Self::Deferred(resolve) => resolve().check(value),
            Self::Integer => combinators::integer::<i128>(value).map(drop),
            Self::String => combinators::string(value).map(drop),
            Self::Unit => combinators::unit(value),
            Self::Either(left, right) => {
                combinators::either(value, |v| left.check(v), |v| right.check(v)).map(drop)
            }
            Self::Array(element) => combinators::array(value, |v| element.check(v)).map(drop),
            Self::Number => combinators::number(value).map(drop),
            Self::Boolean => combinators::boolean(value).map(drop),
            Self::Nullable(inner) => combinators::nullable(value, |v| inner.check(v)).map(drop),
            Self::Any => Ok(()),
            Self::Record(layout) => layout.check(value),
            Self::Variants(layout) => layout.check(value),
        }
    }

    /// Rewrites a value that passed [`check`](Self::check) into the form
    /// serde's derived implementations accept.
    ///
    /// Unit positions become `null`, integral floats become integers, and
    /// sums keep only their branch key, so that materializing never rejects
    /// what the check accepted.
    pub(crate) fn normalize(&self, value: &Value) -> Value {
        match (self, value) {
            (Self::Deferred(resolve), _) => resolve().normalize(value),
            (Self::Integer, Value::Number(_)) => {
                match combinators::integer_value(value).map(integer_number) {
                    Some(Some(number)) => number,
                    _ => value.clone(),
                }
            }
            (Self::Unit, _) => Value::Null,
            (Self::Either(left, right), Value::Object(map)) => {
                let mut branch = Map::new();
                if let Some(payload) = map.get("Left") {
                    branch.insert("Left".to_string(), left.normalize(payload));
                } else if let Some(payload) = map.get("Right") {
                    branch.insert("Right".to_string(), right.normalize(payload));
                }
                Value::Object(branch)
            }
            (Self::Array(element), Value::Array(items)) => {
                Value::Array(items.iter().map(|item| element.normalize(item)).collect())
            }
            (Self::Nullable(inner), _) if !value.is_null() => inner.normalize(value),
            (Self::Record(layout), Value::Object(map)) => Value::Object(layout.normalize(map)),
            (Self::Variants(layout), Value::Object(map)) => Value::Object(layout.normalize(map)),
            _ => value.clone(),
        }
    }
}

/// An integer as a JSON number, preferring the signed representation.
fn integer_number(n: i128) -> Option<Value> {
    if let Ok(i) = i64::try_from(n) {
        Some(Value::from(i))
    } else {
        u64::try_from(n).ok().map(Value::from)
    }
}

/// Field layout of a record type.
#[derive(Debug, Clone)]
pub struct RecordLayout {
    /// Type name, used in error messages.
    pub name: String,
    /// Field names and shapes, in declaration order.
    pub fields: Vec<(String, Shape)>,
}

impl RecordLayout {
    fn check(&self, value: &Value) -> Result<(), DecodeErrors> {
        let Value::Object(map) = value else {
            return Err(DecodeError::expected(format!("object for record {}", self.name)).into());
        };

        let mut errors = Vec::new();
        for (field, shape) in &self.fields {
            match map.get(field) {
                Some(v) => {
                    if let Err(inner) = shape.check(v) {
                        errors.push(DecodeError::AtField {
                            field: field.clone(),
                            errors: inner,
                        });
                    }
                }
                None if shape.is_optional() => {}
                None => errors.push(DecodeError::MissingField {
                    field: field.clone(),
                }),
            }
        }

        into_result(errors)
    }

    fn normalize(&self, map: &Map<String, Value>) -> Map<String, Value> {
        let mut normalized = map.clone();
        for (field, shape) in &self.fields {
            if let Some(v) = map.get(field) {
                normalized.insert(field.clone(), shape.normalize(v));
            }
        }
        normalized
    }
}

/// One constructor of a tagged variant type.
#[derive(Debug, Clone)]
pub struct VariantLayout {
    /// Constructor tag as it appears under the `"tag"` key.
    pub tag: String,
    /// Argument shapes, in order.
    pub args: Vec<Shape>,
}

impl VariantLayout {
    /// Creates a constructor layout.
    pub fn new(tag: impl Into<String>, args: impl IntoIterator<Item = Shape>) -> Self {
        Self {
            tag: tag.into(),
            args: args.into_iter().collect(),
        }
    }

    /// A constructor without arguments.
    pub fn unit(tag: impl Into<String>) -> Self {
        Self::new(tag, [])
    }

    fn normalize_contents(&self, contents: Option<&Value>) -> Option<Value> {
        match (self.args.as_slice(), contents) {
            ([], _) => None,
            ([single], Some(c)) => Some(single.normalize(c)),
            ([single], None) => Some(single.normalize(&Value::Null)),
            (args, Some(Value::Array(items))) => Some(Value::Array(
                args.iter()
                    .zip(items)
                    .map(|(shape, item)| shape.normalize(item))
                    .collect(),
            )),
            (_, other) => other.cloned(),
        }
    }

    fn check_contents(&self, map: &Map<String, Value>) -> Result<(), DecodeErrors> {
        let contents = map.get(CONTENTS_KEY);
        match (self.args.as_slice(), contents) {
            ([], _) => Ok(()),
            ([single], Some(c)) => single.check(c).map_err(|e| at_field(CONTENTS_KEY, e)),
            ([single], None) if single.is_optional() => Ok(()),
            (args, None) => Err(DecodeError::Arity {
                tag: self.tag.clone(),
                expected: args.len(),
                found: 0,
            }
            .into()),
            (args, Some(Value::Array(items))) => {
                if items.len() != args.len() {
                    return Err(DecodeError::Arity {
                        tag: self.tag.clone(),
                        expected: args.len(),
                        found: items.len(),
                    }
                    .into());
                }
                let errors: Vec<_> = args
                    .iter()
                    .zip(items)
                    .enumerate()
                    .filter_map(|(index, (shape, item))| {
                        shape
                            .check(item)
                            .err()
                            .map(|errors| DecodeError::AtIndex { index, errors })
                    })
                    .collect();
                into_result(errors).map_err(|e| at_field(CONTENTS_KEY, e))
            }
            (_, Some(_)) => Err(at_field(
                CONTENTS_KEY,
                DecodeError::expected("array of constructor arguments").into(),
            )),
        }
    }
}

/// Constructor layout of a tagged variant type.
#[derive(Debug, Clone)]
pub struct VariantsLayout {
    /// Type name, used in error messages.
    pub name: String,
    /// The type's constructors.
    pub variants: Vec<VariantLayout>,
}

impl VariantsLayout {
    fn check(&self, value: &Value) -> Result<(), DecodeErrors> {
        let Value::Object(map) = value else {
            return Err(DecodeError::expected(format!("object for variant type {}", self.name)).into());
        };
        let Some(tag) = map.get(TAG_KEY) else {
            return Err(DecodeError::MissingField {
                field: TAG_KEY.to_string(),
            }
            .into());
        };
        let Some(tag) = tag.as_str() else {
            return Err(at_field(TAG_KEY, DecodeError::expected("string").into()));
        };
        let Some(variant) = self.variants.iter().find(|v| v.tag == tag) else {
            return Err(DecodeError::UnknownTag {
                tag: tag.to_string(),
                expected: self.variants.iter().map(|v| v.tag.clone()).collect(),
            }
            .into());
        };

        variant.check_contents(map)
    }

    fn normalize(&self, map: &Map<String, Value>) -> Map<String, Value> {
        let mut normalized = Map::new();
        let Some(tag) = map.get(TAG_KEY) else {
            return map.clone();
        };
        normalized.insert(TAG_KEY.to_string(), tag.clone());
        let variant = tag
            .as_str()
            .and_then(|tag| self.variants.iter().find(|v| v.tag == tag));
        let contents = match variant {
            Some(variant) => variant.normalize_contents(map.get(CONTENTS_KEY)),
            None => map.get(CONTENTS_KEY).cloned(),
        };
        if let Some(contents) = contents {
            normalized.insert(CONTENTS_KEY.to_string(), contents);
        }
        normalized
    }
}

fn into_result(errors: Vec<DecodeError>) -> Result<(), DecodeErrors> {
    match DecodeErrors::from_vec(errors) {
        Some(errors) => Err(errors),
        None => Ok(()),
    }
}
