//! Rendering values as URL path pieces.
//!
//! Generated clients interpolate captured path parameters with
//! [`to_url_piece`]. Values are rendered in a constructor-application style
//! driven by their `Serialize` implementation:
//!
//! | Value | Rendering |
//! |---|---|
//! | unit variant / unit struct `Active` | `Active` |
//! | tuple variant `Pair(1, 2)` | `Pair 1 2` |
//! | nested compound argument `Wrap(Pair(1, 2))` | `Wrap (Pair 1 2)` |
//! | struct `{ id: 1 }` | `{id: 1}` |
//! | struct variant `Moved { city: "Oslo" }` | `Moved {city: Oslo}` |
//! | adjacently tagged `{"tag": "Pair", "contents": [1, 2]}` | `Pair 1 2` |
//! | sequence | `[1, 2]` |
//! | string, number, bool | natural text |
//!
//! Type and variant names are stripped of any `::` or `.` qualifier.

use serde::ser::{self, Serialize};

use crate::decode::{CONTENTS_KEY, TAG_KEY};
use crate::error::CodecError;

/// Renders `value` as a URL piece.
///
/// The result is not percent-encoded; use
/// [`append_path`](crate::settings::append_path) to place it in a URL.
///
/// ## Examples
///
/// ```rust
/// use api_runtime::to_url_piece;
///
/// #[derive(serde::Serialize)]
/// enum Filter {
///     Active,
///     Pair(i32, i32),
///     Wrap(Box<Filter>),
/// }
///
/// assert_eq!(to_url_piece(&Filter::Active).unwrap(), "Active");
/// assert_eq!(to_url_piece(&Filter::Pair(1, 2)).unwrap(), "Pair 1 2");
/// assert_eq!(
///     to_url_piece(&Filter::Wrap(Box::new(Filter::Pair(1, 2)))).unwrap(),
///     "Wrap (Pair 1 2)"
/// );
/// ```
///
/// ## Errors
///
/// Returns [`CodecError::UrlPiece`] if the value's `Serialize` implementation fails.
pub fn to_url_piece<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    let piece = value.serialize(PieceSerializer)?;
    let mut out = String::new();
    piece.write(&mut out, false);
    Ok(out)
}

/// Strips a `::` or `.` qualifier from a type or variant name.
fn unqualified(name: &str) -> String {
    name.rsplit(['.', ':']).next().unwrap_or(name).to_string()
}

/// Intermediate rendering tree; parenthesization depends on position.
#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Atom(String),
    /// A unit variant name, kept apart from strings so that adjacently
    /// tagged enums can be recognized by their `tag` field.
    Variant(String),
    Negative(String),
    Ctor { tag: String, args: Vec<Piece> },
    Record {
        tag: Option<String>,
        fields: Vec<(String, Piece)>,
    },
    List(Vec<Piece>),
    Tuple(Vec<Piece>),
}

impl Piece {
    fn number(text: String) -> Self {
        if text.starts_with('-') {
            Self::Negative(text)
        } else {
            Self::Atom(text)
        }
    }

    /// Whether this piece needs parentheses when used as a constructor argument.
    fn is_compound(&self) -> bool {
        match self {
            Self::Negative(_) => true,
            Self::Ctor { args, .. } => !args.is_empty(),
            Self::Record { tag, .. } => tag.is_some(),
            Self::Atom(_) | Self::Variant(_) | Self::List(_) | Self::Tuple(_) => false,
        }
    }

    fn write(&self, out: &mut String, as_arg: bool) {
        let parens = as_arg && self.is_compound();
        if parens {
            out.push('(');
        }
        match self {
            Self::Atom(text) | Self::Variant(text) | Self::Negative(text) => out.push_str(text),
            Self::Ctor { tag, args } => {
                out.push_str(tag);
                for arg in args {
                    out.push(' ');
                    arg.write(out, true);
                }
            }
            Self::Record { tag, fields } => {
                if let Some(tag) = tag {
                    out.push_str(tag);
                    out.push(' ');
                }
                out.push('{');
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(name);
                    out.push_str(": ");
                    value.write(out, false);
                }
                out.push('}');
            }
            Self::List(items) => write_items(out, '[', ']', items),
            Self::Tuple(items) => write_items(out, '(', ')', items),
        }
        if parens {
            out.push(')');
        }
    }
}

fn write_items(out: &mut String, open: char, close: char, items: &[Piece]) {
    out.push(open);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        item.write(out, false);
    }
    out.push(close);
}

struct PieceSerializer;

impl ser::Serializer for PieceSerializer {
    type Ok = Piece;
    type Error = CodecError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = CtorBuilder;
    type SerializeTupleVariant = CtorBuilder;
    type SerializeMap = RecordBuilder;
    type SerializeStruct = RecordBuilder;
    type SerializeStructVariant = RecordBuilder;

    fn serialize_bool(self, v: bool) -> Result<Piece, CodecError> {
        Ok(Piece::Atom(v.to_string()))
    }

    fn serialize_i8(self, v: i8) -> Result<Piece, CodecError> {
        Ok(Piece::number(v.to_string()))
    }

    fn serialize_i16(self, v: i16) -> Result<Piece, CodecError> {
        Ok(Piece::number(v.to_string()))
    }

    fn serialize_i32(self, v: i32) -> Result<Piece, CodecError> {
        Ok(Piece::number(v.to_string()))
    }

    fn serialize_i64(self, v: i64) -> Result<Piece, CodecError> {
        Ok(Piece::number(v.to_string()))
    }

    fn serialize_i128(self, v: i128) -> Result<Piece, CodecError> {
        Ok(Piece::number(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Piece, CodecError> {
        Ok(Piece::Atom(v.to_string()))
    }

    fn serialize_u16(self, v: u16) -> Result<Piece, CodecError> {
        Ok(Piece::Atom(v.to_string()))
    }

    fn serialize_u32(self, v: u32) -> Result<Piece, CodecError> {
        Ok(Piece::Atom(v.to_string()))
    }

    fn serialize_u64(self, v: u64) -> Result<Piece, CodecError> {
        Ok(Piece::Atom(v.to_string()))
    }

    fn serialize_u128(self, v: u128) -> Result<Piece, CodecError> {
        Ok(Piece::Atom(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<Piece, CodecError> {
        Ok(Piece::number(v.to_string()))
    }

    fn serialize_f64(self, v: f64) -> Result<Piece, CodecError> {
        Ok(Piece::number(v.to_string()))
    }

    fn serialize_char(self, v: char) -> Result<Piece, CodecError> {
        Ok(Piece::Atom(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Piece, CodecError> {
        Ok(Piece::Atom(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Piece, CodecError> {
        Ok(Piece::List(
            v.iter().map(|b| Piece::Atom(b.to_string())).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Piece, CodecError> {
        Ok(Piece::Atom("null".to_string()))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Piece, CodecError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Piece, CodecError> {
        Ok(Piece::Atom("()".to_string()))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Piece, CodecError> {
        Ok(Piece::Atom(unqualified(name)))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Piece, CodecError> {
        Ok(Piece::Variant(unqualified(variant)))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Piece, CodecError> {
        Ok(Piece::Ctor {
            tag: unqualified(name),
            args: vec![value.serialize(PieceSerializer)?],
        })
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Piece, CodecError> {
        Ok(Piece::Ctor {
            tag: unqualified(variant),
            args: vec![value.serialize(PieceSerializer)?],
        })
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, CodecError> {
        Ok(SeqBuilder {
            items: Vec::with_capacity(len.unwrap_or(0)),
            tuple: false,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, CodecError> {
        Ok(SeqBuilder {
            items: Vec::with_capacity(len),
            tuple: true,
        })
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<CtorBuilder, CodecError> {
        Ok(CtorBuilder::new(name, len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<CtorBuilder, CodecError> {
        Ok(CtorBuilder::new(variant, len))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<RecordBuilder, CodecError> {
        Ok(RecordBuilder::new(None))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<RecordBuilder, CodecError> {
        Ok(RecordBuilder::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<RecordBuilder, CodecError> {
        Ok(RecordBuilder::new(Some(unqualified(variant))))
    }
}

struct SeqBuilder {
    items: Vec<Piece>,
    tuple: bool,
}

impl SeqBuilder {
    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CodecError> {
        self.items.push(value.serialize(PieceSerializer)?);
        Ok(())
    }

    fn finish(self) -> Piece {
        if self.tuple {
            Piece::Tuple(self.items)
        } else {
            Piece::List(self.items)
        }
    }
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Piece;
    type Error = CodecError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CodecError> {
        self.push(value)
    }

    fn end(self) -> Result<Piece, CodecError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Piece;
    type Error = CodecError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CodecError> {
        self.push(value)
    }

    fn end(self) -> Result<Piece, CodecError> {
        Ok(self.finish())
    }
}

struct CtorBuilder {
    tag: String,
    args: Vec<Piece>,
}

impl CtorBuilder {
    fn new(name: &str, len: usize) -> Self {
        Self {
            tag: unqualified(name),
            args: Vec::with_capacity(len),
        }
    }

    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CodecError> {
        self.args.push(value.serialize(PieceSerializer)?);
        Ok(())
    }

    fn finish(self) -> Piece {
        Piece::Ctor {
            tag: self.tag,
            args: self.args,
        }
    }
}

impl ser::SerializeTupleStruct for CtorBuilder {
    type Ok = Piece;
    type Error = CodecError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CodecError> {
        self.push(value)
    }

    fn end(self) -> Result<Piece, CodecError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for CtorBuilder {
    type Ok = Piece;
    type Error = CodecError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CodecError> {
        self.push(value)
    }

    fn end(self) -> Result<Piece, CodecError> {
        Ok(self.finish())
    }
}

struct RecordBuilder {
    tag: Option<String>,
    fields: Vec<(String, Piece)>,
    pending_key: Option<String>,
}

impl RecordBuilder {
    fn new(tag: Option<String>) -> Self {
        Self {
            tag,
            fields: Vec::new(),
            pending_key: None,
        }
    }

    fn push<T: Serialize + ?Sized>(&mut self, key: String, value: &T) -> Result<(), CodecError> {
        self.fields.push((key, value.serialize(PieceSerializer)?));
        Ok(())
    }

    fn finish(self) -> Piece {
        Piece::Record {
            tag: self.tag,
            fields: self.fields,
        }
    }

    /// Like [`finish`](Self::finish), but a struct holding only a unit
    /// variant under `tag` and optionally `contents` (the serialized form of
    /// an adjacently tagged enum) renders as a constructor.
    fn finish_struct(mut self) -> Piece {
        if self.tag.is_some() {
            return self.finish();
        }
        let tag = match self.fields.as_slice() {
            [(key, Piece::Variant(tag))] if key == TAG_KEY => Some(tag.clone()),
            [(key, Piece::Variant(tag)), (contents, _)] if key == TAG_KEY && contents == CONTENTS_KEY => {
                Some(tag.clone())
            }
            _ => None,
        };
        let Some(tag) = tag else {
            return self.finish();
        };
        let args = match self.fields.pop() {
            Some((_, Piece::Tuple(items))) if self.fields.len() == 1 => items,
            Some((_, arg)) if self.fields.len() == 1 => vec![arg],
            _ => Vec::new(),
        };
        Piece::Ctor { tag, args }
    }
}

impl ser::SerializeMap for RecordBuilder {
    type Ok = Piece;
    type Error = CodecError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), CodecError> {
        let mut rendered = String::new();
        key.serialize(PieceSerializer)?.write(&mut rendered, false);
        self.pending_key = Some(rendered);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CodecError> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| CodecError::UrlPiece("map value serialized before its key".to_string()))?;
        self.push(key, value)
    }

    fn end(self) -> Result<Piece, CodecError> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for RecordBuilder {
    type Ok = Piece;
    type Error = CodecError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), CodecError> {
        self.push(key.to_string(), value)
    }

    fn end(self) -> Result<Piece, CodecError> {
        Ok(self.finish_struct())
    }
}

impl ser::SerializeStructVariant for RecordBuilder {
    type Ok = Piece;
    type Error = CodecError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), CodecError> {
        self.push(key.to_string(), value)
    }

    fn end(self) -> Result<Piece, CodecError> {
        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    enum Status {
        Active,
        #[serde(rename = "Module.Suspended")]
        Suspended,
        Pair(i32, i32),
        Wrap(Box<Status>),
        Offset(i64),
        Moved { city: String, floor: u8 },
    }

    #[derive(Serialize)]
    struct Query {
        page: u32,
        tags: Vec<String>,
    }

    #[derive(Serialize)]
    struct UserId(u64);

    #[derive(Serialize)]
    struct Marker;

    fn render<T: Serialize>(value: &T) -> String {
        to_url_piece(value).unwrap()
    }

    #[test]
    fn test_unit_variant_strips_qualifier() {
        assert_eq!(render(&Status::Active), "Active");
        assert_eq!(render(&Status::Suspended), "Suspended");
    }

    #[test]
    fn test_multi_argument_variant() {
        assert_eq!(render(&Status::Pair(1, 2)), "Pair 1 2");
    }

    #[test]
    fn test_compound_argument_is_parenthesized() {
        assert_eq!(
            render(&Status::Wrap(Box::new(Status::Pair(1, 2)))),
            "Wrap (Pair 1 2)"
        );
        assert_eq!(
            render(&Status::Wrap(Box::new(Status::Active))),
            "Wrap Active"
        );
        assert_eq!(render(&Status::Offset(-3)), "Offset (-3)");
    }

    #[test]
    fn test_struct_variant() {
        let moved = Status::Moved {
            city: "Oslo".to_string(),
            floor: 3,
        };
        assert_eq!(render(&moved), "Moved {city: Oslo, floor: 3}");
        assert_eq!(
            render(&Status::Wrap(Box::new(moved))),
            "Wrap (Moved {city: Oslo, floor: 3})"
        );
    }

    #[test]
    fn test_record_and_sequence() {
        let query = Query {
            page: 2,
            tags: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(render(&query), "{page: 2, tags: [a, b]}");
    }

    #[test]
    fn test_primitives() {
        assert_eq!(render(&"plain text"), "plain text");
        assert_eq!(render(&42u16), "42");
        assert_eq!(render(&-1.5f64), "-1.5");
        assert_eq!(render(&true), "true");
        assert_eq!(render(&Some(7)), "7");
        assert_eq!(render(&Option::<u8>::None), "null");
    }

    #[test]
    fn test_structs_by_name() {
        assert_eq!(render(&UserId(9)), "UserId 9");
        assert_eq!(render(&Marker), "Marker");
    }

    #[test]
    fn test_map_and_tuple() {
        let mut map = BTreeMap::new();
        map.insert("k", 1);
        assert_eq!(render(&map), "{k: 1}");
        assert_eq!(render(&(1, "x")), "(1, x)");
    }

    #[derive(Serialize)]
    #[serde(tag = "tag", content = "contents")]
    enum Tagged {
        Idle,
        Count(u32),
        Span(i32, i32),
        Nested(Box<Tagged>),
    }

    #[test]
    fn test_adjacently_tagged_variants() {
        assert_eq!(render(&Tagged::Idle), "Idle");
        assert_eq!(render(&Tagged::Count(4)), "Count 4");
        assert_eq!(render(&Tagged::Span(-1, 2)), "Span (-1) 2");
        assert_eq!(
            render(&Tagged::Nested(Box::new(Tagged::Span(1, 2)))),
            "Nested (Span 1 2)"
        );
    }

    #[derive(Serialize)]
    struct Label {
        tag: String,
    }

    #[derive(Serialize)]
    struct Note {
        tag: String,
        contents: Vec<u8>,
    }

    #[test]
    fn test_records_with_tag_field_stay_records() {
        let label = Label {
            tag: "urgent".to_string(),
        };
        assert_eq!(render(&label), "{tag: urgent}");

        let note = Note {
            tag: "n".to_string(),
            contents: vec![1, 2],
        };
        assert_eq!(render(&note), "{tag: n, contents: [1, 2]}");
    }
}
