use crate::{Error, ErrorContext, Result, Value, truncate_long};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::any;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`].
///
/// It is used in both directions: records are turned into values when statements are
/// generated, and row values are turned back into record fields by the materializer.
///
/// # Conversion contract
/// - The canonical variant for the type is always accepted (`Value::Int32` for `i32`).
/// - Other numeric widths are accepted after a range check, the error message names
///   both the offending value and the target type.
/// - `Value::Varchar` is accepted by every scalar type through [`AsValue::parse`],
///   drivers using a text protocol rely on this.
/// - Temporal types accept the neighbouring temporal variants (a `Date` can be read
///   from a `Timestamp` and vice versa).
///
/// # Examples
/// ```rust
/// use quarry_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// The typed NULL for this type.
    fn as_empty_value() -> Value;
    /// Convert into the owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Value a required field takes when its column is NULL.
    ///
    /// Types without a natural empty value (dates, times) refuse NULL.
    fn from_null() -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::msg(format!(
            "NULL cannot be assigned to a non optional {}",
            any::type_name::<Self>()
        )))
    }
    /// Parse the textual representation of `Self`.
    fn parse(input: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::msg(format!(
            "Cannot parse `{}` as {}",
            truncate_long!(input.as_ref()),
            any::type_name::<Self>()
        )))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn conversion_error<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {:?} to {}",
        value,
        any::type_name::<T>()
    ))
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn from_null() -> Result<Self> {
                Ok(Default::default())
            }
            #[allow(unreachable_patterns)]
            fn try_from_value(value: Value) -> Result<Self> {
                let wide: i128 = match value {
                    $destination(Some(v)) => return Ok(v),
                    Value::Int8(Some(v)) => v as _,
                    Value::Int16(Some(v)) => v as _,
                    Value::Int32(Some(v)) => v as _,
                    Value::Int64(Some(v)) => v as _,
                    Value::UInt8(Some(v)) => v as _,
                    Value::UInt16(Some(v)) => v as _,
                    Value::UInt32(Some(v)) => v as _,
                    Value::UInt64(Some(v)) => v as _,
                    Value::Boolean(Some(v)) => v as _,
                    Value::Decimal(Some(v)) if v.fract().is_zero() => {
                        v.to_i128().ok_or_else(|| conversion_error::<Self>(&value))?
                    }
                    Value::Varchar(Some(ref v)) => return <Self as AsValue>::parse(v),
                    _ => return Err(conversion_error::<Self>(&value)),
                };
                <$source>::try_from(wide).map_err(|_| {
                    Error::msg(format!(
                        "Value {} is out of range for {}",
                        wide,
                        any::type_name::<Self>()
                    ))
                })
            }
            fn parse(input: impl AsRef<str>) -> Result<Self> {
                let input = input.as_ref();
                input.trim().parse::<$source>().with_context(|| {
                    format!(
                        "Cannot parse `{}` as {}",
                        truncate_long!(input),
                        any::type_name::<Self>()
                    )
                })
            }
        }
    };
}

impl_as_value_integer!(i8, Value::Int8);
impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u8, Value::UInt8);
impl_as_value_integer!(u16, Value::UInt16);
impl_as_value_integer!(u32, Value::UInt32);
impl_as_value_integer!(u64, Value::UInt64);

macro_rules! impl_as_value_float {
    ($source:ty, $destination:path, $from_decimal:ident) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn from_null() -> Result<Self> {
                Ok(Default::default())
            }
            fn try_from_value(value: Value) -> Result<Self> {
                Ok(match value {
                    Value::Float32(Some(v)) => v as _,
                    Value::Float64(Some(v)) => v as _,
                    Value::Int8(Some(v)) => v as _,
                    Value::Int16(Some(v)) => v as _,
                    Value::Int32(Some(v)) => v as _,
                    Value::Int64(Some(v)) => v as _,
                    Value::UInt8(Some(v)) => v as _,
                    Value::UInt16(Some(v)) => v as _,
                    Value::UInt32(Some(v)) => v as _,
                    Value::UInt64(Some(v)) => v as _,
                    Value::Decimal(Some(v)) => v
                        .$from_decimal()
                        .ok_or_else(|| conversion_error::<Self>(&value))?,
                    Value::Varchar(Some(ref v)) => return <Self as AsValue>::parse(v),
                    _ => return Err(conversion_error::<Self>(&value)),
                })
            }
            fn parse(input: impl AsRef<str>) -> Result<Self> {
                let input = input.as_ref();
                input.trim().parse::<$source>().with_context(|| {
                    format!(
                        "Cannot parse `{}` as {}",
                        truncate_long!(input),
                        any::type_name::<Self>()
                    )
                })
            }
        }
    };
}

impl_as_value_float!(f32, Value::Float32, to_f32);
impl_as_value_float!(f64, Value::Float64, to_f64);

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn from_null() -> Result<Self> {
        Ok(Default::default())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(match value {
            Value::Boolean(Some(v)) => v,
            Value::Int8(Some(v)) => v != 0,
            Value::Int16(Some(v)) => v != 0,
            Value::Int32(Some(v)) => v != 0,
            Value::Int64(Some(v)) => v != 0,
            Value::UInt8(Some(v)) => v != 0,
            Value::UInt16(Some(v)) => v != 0,
            Value::UInt32(Some(v)) => v != 0,
            Value::UInt64(Some(v)) => v != 0,
            Value::Varchar(Some(ref v)) => return <Self as AsValue>::parse(v),
            _ => return Err(conversion_error::<Self>(&value)),
        })
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref().trim();
        if input.eq_ignore_ascii_case("true") || input == "1" {
            Ok(true)
        } else if input.eq_ignore_ascii_case("false") || input == "0" {
            Ok(false)
        } else {
            Err(Error::msg(format!(
                "Cannot parse `{}` as bool",
                truncate_long!(input)
            )))
        }
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self))
    }
    fn from_null() -> Result<Self> {
        Ok(Default::default())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let result = match value {
            Value::Decimal(Some(v)) => return Ok(v),
            Value::Int8(Some(v)) => Some(v.into()),
            Value::Int16(Some(v)) => Some(v.into()),
            Value::Int32(Some(v)) => Some(v.into()),
            Value::Int64(Some(v)) => Some(v.into()),
            Value::UInt8(Some(v)) => Some(v.into()),
            Value::UInt16(Some(v)) => Some(v.into()),
            Value::UInt32(Some(v)) => Some(v.into()),
            Value::UInt64(Some(v)) => Some(v.into()),
            Value::Float32(Some(v)) => Decimal::from_f32(v),
            Value::Float64(Some(v)) => Decimal::from_f64(v),
            Value::Varchar(Some(ref v)) => return <Self as AsValue>::parse(v),
            _ => None,
        };
        result.ok_or_else(|| conversion_error::<Self>(&value))
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref();
        input.trim().parse::<Decimal>().with_context(|| {
            format!("Cannot parse `{}` as Decimal", truncate_long!(input))
        })
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn from_null() -> Result<Self> {
        Ok(Default::default())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            Value::Blob(Some(v)) => String::from_utf8(v.into_vec())
                .map_err(|e| Error::msg(format!("Blob is not a valid UTF-8 string: {e}"))),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        Ok(input.as_ref().into())
    }
}

impl AsValue for char {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.into()))
    }
    fn from_null() -> Result<Self> {
        Ok(Default::default())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref();
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::msg(format!(
                "Cannot parse `{}` as char, expected exactly one character",
                truncate_long!(input)
            ))),
        }
    }
}

impl AsValue for Box<[u8]> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self))
    }
    fn from_null() -> Result<Self> {
        Ok(Default::default())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v),
            Value::Varchar(Some(v)) => Ok(v.into_bytes().into_boxed_slice()),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
}

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into_boxed_slice()))
    }
    fn from_null() -> Result<Self> {
        Ok(Default::default())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Box::<[u8]>::try_from_value(value).map(Into::into)
    }
}

static DATE_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[format_description!("[year]-[month]-[day]")];

static TIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[hour]:[minute]:[second].[subsecond]"),
    format_description!("[hour]:[minute]:[second]"),
    format_description!("[hour]:[minute]"),
];

static TIMESTAMP_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
];

/// Try every format in order, the first one consuming the whole input wins.
fn parse_temporal<T>(
    input: &str,
    formats: &[&[BorrowedFormatItem<'static>]],
    parse: impl Fn(&str, &[BorrowedFormatItem<'static>]) -> std::result::Result<T, time::error::Parse>,
) -> Result<T> {
    let trimmed = input.trim().trim_matches(['\'', '"']);
    formats
        .iter()
        .find_map(|format| parse(trimmed, format).ok())
        .ok_or_else(|| {
            Error::msg(format!(
                "Cannot parse `{}` as {}",
                truncate_long!(input),
                any::type_name::<T>()
            ))
        })
}

impl AsValue for Date {
    fn as_empty_value() -> Value {
        Value::Date(None)
    }
    fn as_value(self) -> Value {
        Value::Date(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.date()),
            Value::TimestampWithTimezone(Some(v)) => Ok(v.to_utc().date()),
            Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref();
        parse_temporal(input, DATE_FORMATS, |v, f| Date::parse(v, f))
            .or_else(|_| <PrimitiveDateTime as AsValue>::parse(input).map(|v| v.date()))
    }
}

impl AsValue for Time {
    fn as_empty_value() -> Value {
        Value::Time(None)
    }
    fn as_value(self) -> Value {
        Value::Time(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Time(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.time()),
            Value::TimestampWithTimezone(Some(v)) => Ok(v.to_utc().time()),
            Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        parse_temporal(input.as_ref(), TIME_FORMATS, |v, f| Time::parse(v, f))
    }
}

impl AsValue for PrimitiveDateTime {
    fn as_empty_value() -> Value {
        Value::Timestamp(None)
    }
    fn as_value(self) -> Value {
        Value::Timestamp(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(Some(v)) => Ok(v),
            Value::Date(Some(v)) => Ok(v.midnight()),
            Value::TimestampWithTimezone(Some(v)) => {
                let v = v.to_utc();
                Ok(PrimitiveDateTime::new(v.date(), v.time()))
            }
            Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref();
        parse_temporal(input, TIMESTAMP_FORMATS, |v, f| PrimitiveDateTime::parse(v, f)).or_else(
            |_| parse_temporal(input, DATE_FORMATS, |v, f| Date::parse(v, f)).map(Date::midnight),
        )
    }
}

impl AsValue for OffsetDateTime {
    fn as_empty_value() -> Value {
        Value::TimestampWithTimezone(None)
    }
    fn as_value(self) -> Value {
        Value::TimestampWithTimezone(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::TimestampWithTimezone(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
            Value::Date(Some(v)) => Ok(v.midnight().assume_utc()),
            Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref();
        match OffsetDateTime::parse(input.trim(), &Rfc3339) {
            Ok(v) => Ok(v),
            Err(..) => {
                <PrimitiveDateTime as AsValue>::parse(input).map(PrimitiveDateTime::assume_utc)
            }
        }
    }
}

impl AsValue for Uuid {
    fn as_empty_value() -> Value {
        Value::Uuid(None)
    }
    fn as_value(self) -> Value {
        Value::Uuid(Some(self))
    }
    fn from_null() -> Result<Self> {
        Ok(Default::default())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(Some(v)) => Ok(v),
            Value::Blob(Some(ref v)) => {
                Uuid::from_slice(v).map_err(|_| conversion_error::<Self>(&value))
            }
            Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref();
        Uuid::parse_str(input.trim())
            .with_context(|| format!("Cannot parse `{}` as Uuid", truncate_long!(input)))
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn from_null() -> Result<Self> {
        Ok(None)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        T::parse(input).map(Some)
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}
