use mysql_async::{
    Column,
    consts::{ColumnFlags, ColumnType},
};
use quarry_core::{ErrorContext, Result, Row, RowLabeled, RowNames, Value};
use rust_decimal::Decimal;
use std::str::FromStr;
use time::{Date, Month, PrimitiveDateTime, Time};

/// Charset number MySQL reports for binary strings.
const BINARY_CHARSET: u16 = 63;

pub(crate) fn decode_row(mut row: mysql_async::Row) -> Result<RowLabeled> {
    let columns = row.columns();
    let labels: RowNames = columns.iter().map(|v| v.name_str().into_owned()).collect();
    let values: Row = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let value = row
                .take::<mysql_async::Value, _>(i)
                .unwrap_or(mysql_async::Value::NULL);
            decode_value(column, value)
                .with_context(|| format!("While decoding column `{}`", column.name_str()))
        })
        .collect::<Result<_>>()?;
    Ok(RowLabeled::new(labels, values))
}

/// Text protocol results carry every cell as bytes, the column metadata tells how to read them.
pub(crate) fn decode_value(column: &Column, value: mysql_async::Value) -> Result<Value> {
    let unsigned = column.flags().contains(ColumnFlags::UNSIGNED_FLAG);
    Ok(match value {
        mysql_async::Value::NULL => Value::Null,
        mysql_async::Value::Bytes(v) => match column.column_type() {
            ColumnType::MYSQL_TYPE_TINY
            | ColumnType::MYSQL_TYPE_SHORT
            | ColumnType::MYSQL_TYPE_INT24
            | ColumnType::MYSQL_TYPE_LONG
            | ColumnType::MYSQL_TYPE_LONGLONG
            | ColumnType::MYSQL_TYPE_YEAR => {
                let text = std::str::from_utf8(&v)?;
                if unsigned {
                    Value::UInt64(Some(text.parse()?))
                } else {
                    Value::Int64(Some(text.parse()?))
                }
            }
            ColumnType::MYSQL_TYPE_FLOAT => Value::Float32(Some(std::str::from_utf8(&v)?.parse()?)),
            ColumnType::MYSQL_TYPE_DOUBLE => {
                Value::Float64(Some(std::str::from_utf8(&v)?.parse()?))
            }
            ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
                Value::Decimal(Some(Decimal::from_str(std::str::from_utf8(&v)?)?))
            }
            ColumnType::MYSQL_TYPE_BIT => Value::UInt64(Some(
                v.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64),
            )),
            ColumnType::MYSQL_TYPE_GEOMETRY => Value::Blob(Some(v.into())),
            _ if column.character_set() == BINARY_CHARSET => Value::Blob(Some(v.into())),
            _ => match String::from_utf8(v) {
                Ok(v) => Value::Varchar(Some(v)),
                Err(e) => Value::Blob(Some(e.into_bytes().into())),
            },
        },
        mysql_async::Value::Int(v) if unsigned => Value::UInt64(Some(v as _)),
        mysql_async::Value::Int(v) => Value::Int64(Some(v)),
        mysql_async::Value::UInt(v) => Value::UInt64(Some(v)),
        mysql_async::Value::Float(v) => Value::Float32(Some(v)),
        mysql_async::Value::Double(v) => Value::Float64(Some(v)),
        mysql_async::Value::Date(year, month, day, hour, minute, second, microsecond) => {
            Value::Timestamp(Some(PrimitiveDateTime::new(
                Date::from_calendar_date(year as _, Month::try_from(month)?, day)?,
                Time::from_hms_micro(hour, minute, second, microsecond)?,
            )))
        }
        mysql_async::Value::Time(negative, days, hours, minutes, seconds, micro) => {
            if negative || days != 0 {
                return Err(quarry_core::Error::msg(format!(
                    "Time interval `{}{} days {:02}:{:02}:{:02}` does not fit a time of day",
                    if negative { "-" } else { "" },
                    days,
                    hours,
                    minutes,
                    seconds
                )));
            }
            Value::Time(Some(Time::from_hms_micro(hours, minutes, seconds, micro)?))
        }
    })
}
