//! [`Decode`] implementations for standard types.

use serde_json::Value;

use super::combinators;
use super::{Decode, Shape};
use crate::error::DecodeErrors;

macro_rules! decode_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Decode for $ty {
                fn shape() -> Shape {
                    Shape::Integer
                }

                fn decode(value: &Value) -> Result<Self, DecodeErrors> {
                    combinators::integer(value)
                }
            }
        )*
    };
}

decode_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Decode for f64 {
    fn shape() -> Shape {
        Shape::Number
    }

    fn decode(value: &Value) -> Result<Self, DecodeErrors> {
        combinators::number(value)
    }
}

impl Decode for f32 {
    fn shape() -> Shape {
        Shape::Number
    }

    fn decode(value: &Value) -> Result<Self, DecodeErrors> {
        combinators::number(value).map(|n| n as f32)
    }
}

impl Decode for bool {
    fn shape() -> Shape {
        Shape::Boolean
    }

    fn decode(value: &Value) -> Result<Self, DecodeErrors> {
        combinators::boolean(value)
    }
}

impl Decode for String {
    fn shape() -> Shape {
        Shape::String
    }

    fn decode(value: &Value) -> Result<Self, DecodeErrors> {
        combinators::string(value)
    }
}

impl Decode for () {
    fn shape() -> Shape {
        Shape::Unit
    }

    fn decode(value: &Value) -> Result<Self, DecodeErrors> {
        combinators::unit(value)
    }
}

impl Decode for Value {
    fn shape() -> Shape {
        Shape::Any
    }

    fn decode(value: &Value) -> Result<Self, DecodeErrors> {
        Ok(value.clone())
    }
}

impl<T: Decode> Decode for Option<T> {
    fn shape() -> Shape {
        Shape::nullable(T::shape())
    }

    fn decode(value: &Value) -> Result<Self, DecodeErrors> {
        combinators::nullable(value, T::decode)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn shape() -> Shape {
        Shape::array(T::shape())
    }

    fn decode(value: &Value) -> Result<Self, DecodeErrors> {
        combinators::array(value, T::decode)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }

    fn decode(value: &Value) -> Result<Self, DecodeErrors> {
        T::decode(value).map(Box::new)
    }
}
