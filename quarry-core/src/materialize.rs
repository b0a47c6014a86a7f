use crate::{
    AsValue, DataError, Entity, Error, Result, RowLabeled, Value,
    stream::{Stream, StreamExt},
};
use std::mem;

/// Lazily turn a stream of rows into records, one row is read for every record yielded.
pub fn materialize<E, S>(rows: S) -> impl Stream<Item = Result<E>> + Send
where
    E: Entity,
    S: Stream<Item = Result<RowLabeled>> + Send,
{
    rows.map(|row| row.and_then(materialize_row::<E>))
}

/// Build a record from a row.
///
/// Columns and fields are matched by position. Surplus columns are dropped, fields without a
/// column receive NULL. Values go through the declared [`crate::DbType`] conversion first when
/// the column has one, then [`Entity::from_values`] assigns them.
pub fn materialize_row<E: Entity>(row: RowLabeled) -> Result<E> {
    let columns = E::columns();
    let RowLabeled { labels, values } = row;
    let mut values = values.into_vec();
    values.resize(columns.len(), Value::Null);
    for (i, (column, value)) in columns.iter().zip(values.iter_mut()).enumerate() {
        if let Some(label) = labels.get(i) {
            if !label.eq_ignore_ascii_case(column.name) {
                log::trace!(
                    "Column {} of the result is named `{}`, reading it into `{}.{}`",
                    i,
                    label,
                    E::table().name,
                    column.field,
                );
            }
        }
        let Some(db_type) = column.db_type else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let source = mem::take(value);
        *value = db_type
            .convert(source.clone())
            .map_err(|e| conversion_error(column.field, &source, e))?;
    }
    E::from_values(values.into_boxed_slice())
}

/// Convert the value of one field, NULL gives [`AsValue::from_null`].
///
/// Failures name the field and the offending value.
pub fn materialize_field<T: AsValue>(field: &'static str, value: Value) -> Result<T> {
    let result = if value.is_null() {
        T::from_null()
    } else {
        T::try_from_value(value.clone())
    };
    result.map_err(|e| conversion_error(field, &value, e))
}

fn conversion_error(field: &'static str, value: &Value, error: Error) -> Error {
    DataError::Conversion {
        field,
        value: format!("{:?}", value),
        reason: format!("{:#}", error),
    }
    .into()
}
