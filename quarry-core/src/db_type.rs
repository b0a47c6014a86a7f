use crate::{AsValue, Error, Result, Value};
use rust_decimal::Decimal;
use std::fmt::{self, Display, Formatter};
use time::{Date, Month, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Declared database type of a column.
///
/// The tag drives the conversion applied by the materializer to the raw value read from a
/// row before it is assigned to the record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbType {
    Decimal,
    NewDecimal,
    Bit,
    Byte,
    Int16,
    Int24,
    Int32,
    Int64,
    Float,
    Double,
    Timestamp,
    Date,
    Time,
    DateTime,
    Year,
    Newdate,
    VarString,
    Blob,
    TinyBlob,
    MediumBlob,
    LongBlob,
    Json,
    Enum,
    Set,
    Geometry,
    UByte,
    UInt16,
    UInt24,
    UInt32,
    UInt64,
    String,
    VarChar,
    Binary,
    VarBinary,
    TinyText,
    MediumText,
    LongText,
    Text,
    Guid,
}

impl DbType {
    /// Convert a raw non null value into the representation of this family.
    ///
    /// - decimal family: `Value::Decimal`
    /// - integer families: the integer variant of matching width and signedness
    /// - `Float`/`Double`: `Value::Float32`/`Value::Float64`
    /// - `Time`: `Value::Time`, other temporal families: `Value::Timestamp` (`Year` is January 1st)
    /// - text, char and binary families, `Json`, `Enum`, `Set`: `Value::Varchar`
    /// - blob families and `Geometry`: `Value::Blob`
    /// - `Guid`: `Value::Uuid`
    ///
    /// Null values are returned unchanged.
    pub fn convert(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(value);
        }
        Ok(match self {
            DbType::Decimal | DbType::NewDecimal => Decimal::try_from_value(value)?.as_value(),
            DbType::Bit | DbType::Byte => i8::try_from_value(value)?.as_value(),
            DbType::UByte => u8::try_from_value(value)?.as_value(),
            DbType::Int16 => i16::try_from_value(value)?.as_value(),
            DbType::UInt16 => u16::try_from_value(value)?.as_value(),
            DbType::Int24 | DbType::Int32 => i32::try_from_value(value)?.as_value(),
            DbType::UInt24 | DbType::UInt32 => u32::try_from_value(value)?.as_value(),
            DbType::Int64 => i64::try_from_value(value)?.as_value(),
            DbType::UInt64 => u64::try_from_value(value)?.as_value(),
            DbType::Float => f32::try_from_value(value)?.as_value(),
            DbType::Double => f64::try_from_value(value)?.as_value(),
            DbType::Time => Time::try_from_value(value)?.as_value(),
            DbType::Timestamp | DbType::Date | DbType::DateTime | DbType::Newdate => {
                PrimitiveDateTime::try_from_value(value)?.as_value()
            }
            DbType::Year => match value {
                Value::Date(..) | Value::Timestamp(..) | Value::TimestampWithTimezone(..) => {
                    PrimitiveDateTime::try_from_value(value)?.as_value()
                }
                _ => {
                    let year = i32::try_from_value(value)?;
                    Date::from_calendar_date(year, Month::January, 1)?
                        .midnight()
                        .as_value()
                }
            },
            DbType::Blob
            | DbType::TinyBlob
            | DbType::MediumBlob
            | DbType::LongBlob
            | DbType::Geometry => Box::<[u8]>::try_from_value(value)?.as_value(),
            DbType::Guid => Uuid::try_from_value(value)?.as_value(),
            DbType::VarString
            | DbType::String
            | DbType::VarChar
            | DbType::Binary
            | DbType::VarBinary
            | DbType::TinyText
            | DbType::MediumText
            | DbType::LongText
            | DbType::Text
            | DbType::Json
            | DbType::Enum
            | DbType::Set => Value::Varchar(Some(text(value)?)),
        })
    }
}

/// Textual rendering of a scalar, used when a column is declared as text.
fn text(value: Value) -> Result<String> {
    Ok(match value {
        Value::Varchar(Some(v)) => v,
        Value::Blob(..) => String::try_from_value(value)?,
        Value::Boolean(Some(v)) => v.to_string(),
        Value::Int8(Some(v)) => v.to_string(),
        Value::Int16(Some(v)) => v.to_string(),
        Value::Int32(Some(v)) => v.to_string(),
        Value::Int64(Some(v)) => v.to_string(),
        Value::UInt8(Some(v)) => v.to_string(),
        Value::UInt16(Some(v)) => v.to_string(),
        Value::UInt32(Some(v)) => v.to_string(),
        Value::UInt64(Some(v)) => v.to_string(),
        Value::Float32(Some(v)) => v.to_string(),
        Value::Float64(Some(v)) => v.to_string(),
        Value::Decimal(Some(v)) => v.to_string(),
        Value::Date(Some(v)) => v.to_string(),
        Value::Time(Some(v)) => v.to_string(),
        Value::Timestamp(Some(v)) => v.to_string(),
        Value::TimestampWithTimezone(Some(v)) => v.to_string(),
        Value::Uuid(Some(v)) => v.to_string(),
        _ => return Err(Error::msg(format!("Cannot convert {:?} to text", value))),
    })
}

impl Display for DbType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
