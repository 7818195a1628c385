//! Structural decode errors.

use std::fmt;

use thiserror::Error;

/// A single structural decode failure.
///
/// Errors nest: [`DecodeError::AtIndex`] and [`DecodeError::AtField`] wrap the
/// errors of the element or field they annotate, so a failure deep inside a
/// nested array renders as a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The value had the wrong JSON type.
    #[error("expected {expected}")]
    Expected {
        /// Description of what was expected, e.g. `integer`.
        expected: String,
    },

    /// A two-branch sum did not have exactly one of the `Left` and `Right` keys.
    #[error("not a valid two-branch sum: expected an object with a \"Left\" or \"Right\" key")]
    InvalidSum,

    /// An array element failed to decode.
    #[error("error at array index {index}: {errors}")]
    AtIndex {
        /// Zero-based index of the failing element.
        index: usize,
        /// The element's own errors.
        errors: DecodeErrors,
    },

    /// A record field failed to decode.
    #[error("error at field \"{field}\": {errors}")]
    AtField {
        /// Name of the failing field.
        field: String,
        /// The field's own errors.
        errors: DecodeErrors,
    },

    /// A required record field was absent.
    #[error("missing field \"{field}\"")]
    MissingField {
        /// Name of the missing field.
        field: String,
    },

    /// A variant tag was not one of the declared constructors.
    #[error("unknown variant tag \"{tag}\", expected one of: {}", expected.join(", "))]
    UnknownTag {
        /// The tag found in the value.
        tag: String,
        /// The declared tags.
        expected: Vec<String>,
    },

    /// A variant carried the wrong number of arguments.
    #[error("variant \"{tag}\" takes {expected} argument(s), found {found}")]
    Arity {
        /// The variant tag.
        tag: String,
        /// Declared number of arguments.
        expected: usize,
        /// Number of arguments present.
        found: usize,
    },

    /// Any other failure, e.g. reported by serde while materializing a value.
    #[error("{0}")]
    Custom(String),
}

impl DecodeError {
    /// Creates a type mismatch error.
    pub fn expected(expected: impl Into<String>) -> Self {
        Self::Expected {
            expected: expected.into(),
        }
    }
}

/// A non-empty, ordered collection of [`DecodeError`]s.
///
/// Renders as the individual errors joined with `"; "`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeErrors(Vec<DecodeError>);

impl DecodeErrors {
    /// Creates a collection holding one error.
    pub fn single(error: DecodeError) -> Self {
        Self(vec![error])
    }

    /// Creates a collection from a list of errors, returning `None` when the
    /// list is empty.
    pub fn from_vec(errors: Vec<DecodeError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no errors (never, for a constructed value).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the errors in order.
    pub fn iter(&self) -> std::slice::Iter<'_, DecodeError> {
        self.0.iter()
    }

    /// Returns the errors as a vector.
    pub fn into_vec(self) -> Vec<DecodeError> {
        self.0
    }
}

impl From<DecodeError> for DecodeErrors {
    fn from(error: DecodeError) -> Self {
        Self::single(error)
    }
}

impl IntoIterator for DecodeErrors {
    type Item = DecodeError;
    type IntoIter = std::vec::IntoIter<DecodeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DecodeErrors {
    type Item = &'a DecodeError;
    type IntoIter = std::slice::Iter<'a, DecodeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for DecodeErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DecodeErrors {}
