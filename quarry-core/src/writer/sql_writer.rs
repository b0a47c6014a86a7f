use crate::{
    BinaryOpType, DataError, Entity, Error, Expr, QueryNode, Result, TableRef, UnaryOpType, Value,
    separated_by,
    writer::{Context, Fragment},
};
use std::fmt::Write;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($out:ident, $value:expr) => {{
        if !$value.is_finite() {
            return Err(DataError::UnsupportedLiteralType(format!("{}", $value)).into());
        }
        let mut buffer = ryu::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}

/// Dialect printer converting queries, records and values into SQL text.
///
/// Every method has a default implementation producing the generic dialect, drivers override
/// the pieces where their database differs.
pub trait SqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Table and column names are written verbatim.
    fn write_identifier(&self, _context: &mut Context, out: &mut String, value: &str) {
        out.push_str(value);
    }

    fn write_table_ref(&self, context: &mut Context, out: &mut String, value: &TableRef) {
        self.write_identifier(context, out, value.name);
    }

    /// Render a field reference, resolved through the table of the context when declared.
    fn write_member_access(&self, context: &mut Context, out: &mut String, field: &str) {
        let name = match context.table {
            Some(table) => table.column_name(field),
            None => field,
        };
        self.write_identifier(context, out, name);
    }

    /// Render a concrete value (including proper quoting / escaping).
    fn write_value(&self, context: &mut Context, out: &mut String, value: &Value) -> Result<()> {
        match value {
            v if v.is_null() => self.write_value_none(context, out),
            Value::Boolean(Some(v)) => self.write_value_bool(context, out, *v),
            Value::Int8(Some(v)) => write_integer!(out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::UInt8(Some(v)) => write_integer!(out, *v),
            Value::UInt16(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => write_float!(out, *v),
            Value::Float64(Some(v)) => write_float!(out, *v),
            Value::Decimal(Some(v)) => {
                let _ = write!(out, "{}", v);
            }
            Value::Varchar(Some(v)) => self.write_value_string(context, out, v),
            Value::Date(Some(v)) => self.write_value_date(context, out, v),
            Value::Time(Some(v)) => self.write_value_time(context, out, v),
            Value::Timestamp(Some(v)) => self.write_value_timestamp(context, out, v),
            Value::TimestampWithTimezone(Some(v)) => self.write_value_timestamptz(context, out, v),
            Value::Uuid(Some(v)) => {
                let _ = write!(out, "'{}'", v);
            }
            _ => {
                let error = DataError::UnsupportedLiteralType(format!("{:?}", value));
                log::error!("{}", error);
                return Err(error.into());
            }
        };
        Ok(())
    }

    /// Render NULL literal.
    fn write_value_none(&self, _context: &mut Context, out: &mut String) {
        out.push_str("NULL");
    }

    /// Render boolean literal, `0`/`1` when assigning or matching a key.
    fn write_value_bool(&self, context: &mut Context, out: &mut String, value: bool) {
        if context.fragment.is_key_assignment() {
            out.push(['0', '1'][value as usize]);
        } else {
            out.push_str(["false", "true"][value as usize]);
        }
    }

    /// Render and escape a string literal using single quotes.
    fn write_value_string(&self, _context: &mut Context, out: &mut String, value: &str) {
        out.push('\'');
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == '\'' {
                out.push_str(&value[position..i]);
                out.push_str("''");
                position = i + 1;
            }
        }
        out.push_str(&value[position..]);
        out.push('\'');
    }

    /// Render a DATE literal, `'YYYY-MM-DD'` for keys and `'YYYY-MM-DD 00:00'` otherwise.
    fn write_value_date(&self, context: &mut Context, out: &mut String, value: &Date) {
        self.write_value_timestamp(context, out, &value.midnight());
    }

    /// Render a TIME literal as `'HH:MM'`.
    fn write_value_time(&self, _context: &mut Context, out: &mut String, value: &Time) {
        let _ = write!(out, "'{:02}:{:02}'", value.hour(), value.minute());
    }

    /// Render a TIMESTAMP literal, `'YYYY-MM-DD'` for keys and `'YYYY-MM-DD HH:MM'` otherwise.
    fn write_value_timestamp(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &PrimitiveDateTime,
    ) {
        let _ = write!(
            out,
            "'{:04}-{:02}-{:02}",
            value.year(),
            value.month() as u8,
            value.day()
        );
        if !context.fragment.is_key_assignment() {
            let _ = write!(out, " {:02}:{:02}", value.hour(), value.minute());
        }
        out.push('\'');
    }

    /// Render a TIMESTAMPTZ literal converted to UTC.
    fn write_value_timestamptz(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &OffsetDateTime,
    ) {
        let date_time = value.to_utc();
        self.write_value_timestamp(
            context,
            out,
            &PrimitiveDateTime::new(date_time.date(), date_time.time()),
        );
    }

    fn write_expression(&self, context: &mut Context, out: &mut String, value: &Expr) -> Result<()> {
        match value {
            Expr::BinaryOp { op, lhs, rhs } => {
                self.write_expression_binary_op(context, out, *op, lhs, rhs)
            }
            Expr::UnaryOp { op, arg } => self.write_expression_unary_op(context, out, *op, arg),
            Expr::MemberAccess(field) => {
                self.write_member_access(context, out, field);
                Ok(())
            }
            Expr::Literal(value) => self.write_value(context, out, value),
        }
    }

    fn write_expression_unary_op(
        &self,
        context: &mut Context,
        out: &mut String,
        op: UnaryOpType,
        arg: &Expr,
    ) -> Result<()> {
        match op {
            UnaryOpType::Not => out.push_str(" NOT "),
        }
        self.write_expression(context, out, arg)
    }

    /// Render `(lhs OP rhs)`, comparisons with NULL become `IS` / `IS NOT`.
    fn write_expression_binary_op(
        &self,
        context: &mut Context,
        out: &mut String,
        op: BinaryOpType,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<()> {
        let null_rhs = matches!(rhs, Expr::Literal(v) if v.is_null());
        let infix = match op {
            BinaryOpType::And => " AND ",
            BinaryOpType::Or => " OR ",
            BinaryOpType::Equal if null_rhs => " IS ",
            BinaryOpType::NotEqual if null_rhs => " IS NOT ",
            BinaryOpType::Equal => " = ",
            BinaryOpType::NotEqual => " <> ",
            BinaryOpType::Less => " < ",
            BinaryOpType::LessEqual => " <= ",
            BinaryOpType::Greater => " > ",
            BinaryOpType::GreaterEqual => " >= ",
        };
        out.push('(');
        self.write_expression(context, out, lhs)?;
        out.push_str(infix);
        self.write_expression(context, out, rhs)?;
        out.push(')');
        Ok(())
    }

    /// Compile a query chain into a SELECT statement.
    ///
    /// Clauses are emitted in SQL order, a chain that cannot be expressed in that order
    /// (filtering after ordering or limiting, ordering after limiting, limiting twice) is
    /// rejected with [`DataError::UnsupportedOperation`].
    fn write_query(&self, out: &mut String, query: &QueryNode) -> Result<()> {
        let chain = query.chain();
        let table = query.source();
        let count = chain.iter().any(|v| matches!(v, QueryNode::Count(..)));
        out.reserve(64 + chain.len() * 32);
        out.push_str(if count { "SELECT COUNT(*)" } else { "SELECT *" });
        let mut context = Context::new(Fragment::SqlSelect, Some(table));
        for node in chain {
            match node {
                QueryNode::Source(table) => {
                    out.push_str(" FROM ");
                    context = context.switch_fragment(Fragment::SqlSelectFrom);
                    self.write_table_ref(&mut context, out, table);
                }
                QueryNode::Filter(_, predicate) => {
                    match context.fragment {
                        Fragment::SqlSelectFrom => out.push_str(" WHERE "),
                        Fragment::SqlSelectWhere => out.push_str(" AND "),
                        _ => {
                            return Err(DataError::UnsupportedOperation(
                                "filter after ORDER BY or LIMIT".into(),
                            )
                            .into());
                        }
                    }
                    context = context.switch_fragment(Fragment::SqlSelectWhere);
                    self.write_expression(&mut context, out, predicate)?;
                }
                QueryNode::OrderBy(_, key) | QueryNode::OrderByDescending(_, key) => {
                    match context.fragment {
                        Fragment::SqlSelectFrom | Fragment::SqlSelectWhere => {
                            out.push_str(" ORDER BY ")
                        }
                        Fragment::SqlSelectOrderBy => {
                            if out.ends_with(' ') {
                                out.pop();
                            }
                            out.push_str(", ")
                        }
                        _ => {
                            return Err(DataError::UnsupportedOperation(
                                "order after LIMIT".into(),
                            )
                            .into());
                        }
                    }
                    context = context.switch_fragment(Fragment::SqlSelectOrderBy);
                    self.write_expression(&mut context, out, key)?;
                    if matches!(node, QueryNode::OrderByDescending(..)) {
                        out.push_str(" DESC ");
                    }
                }
                QueryNode::Limit(_, limit) => {
                    if context.fragment == Fragment::SqlSelectLimit {
                        return Err(
                            DataError::UnsupportedOperation("second LIMIT".into()).into()
                        );
                    }
                    context = context.switch_fragment(Fragment::SqlSelectLimit);
                    out.push_str(" LIMIT ");
                    write_integer!(out, *limit);
                }
                QueryNode::Count(..) => {}
            }
        }
        Ok(())
    }

    /// Emit `INSERT INTO T VALUES (..),(..)`, generated columns are written as `NULL`.
    fn write_insert<'b, E>(
        &self,
        out: &mut String,
        entities: impl IntoIterator<Item = &'b E>,
    ) -> Result<()>
    where
        Self: Sized,
        E: Entity + 'b,
    {
        let table = E::table();
        let mut entities = entities.into_iter().peekable();
        if entities.peek().is_none() {
            return Err(DataError::EmptyBatch { table: table.name }.into());
        }
        out.reserve(128 + table.columns.len() * 16);
        out.push_str("INSERT INTO ");
        let mut context = Context::new(Fragment::SqlInsertInto, Some(table));
        self.write_table_ref(&mut context, out, table);
        out.push_str(" VALUES ");
        let mut context = context.switch_fragment(Fragment::SqlInsertIntoValues);
        separated_by(
            out,
            entities,
            |out, entity| {
                let row = entity.row();
                out.push('(');
                separated_by(
                    out,
                    table.columns.iter().zip(row.iter()),
                    |out, (column, value)| {
                        if !column.mapped {
                            return Ok(());
                        }
                        if column.generated {
                            self.write_value_none(&mut context, out);
                            return Ok(());
                        }
                        self.write_value(&mut context, out, value)
                    },
                    ",",
                )?;
                out.push(')');
                Ok(())
            },
            ",",
        )
    }

    /// Emit `UPDATE T SET col=val,.. WHERE pk=val` over the mapped, non generated columns.
    ///
    /// Without a primary key the statement has no WHERE clause and touches every row.
    fn write_update<E>(&self, out: &mut String, entity: &E) -> Result<()>
    where
        Self: Sized,
        E: Entity,
    {
        let table = E::table();
        let row = entity.row();
        out.reserve(128 + table.columns.len() * 24);
        out.push_str("UPDATE ");
        let mut context = Context::new(Fragment::SqlUpdate, Some(table));
        self.write_table_ref(&mut context, out, table);
        out.push_str(" SET ");
        let mut context = context.switch_fragment(Fragment::SqlUpdateSet);
        let position = out.len();
        separated_by(
            out,
            table.columns.iter().zip(row.iter()),
            |out, (column, value)| {
                if !column.mapped || column.generated {
                    return Ok(());
                }
                self.write_identifier(&mut context, out, column.name);
                out.push('=');
                self.write_value(&mut context, out, value)
            },
            ",",
        )?;
        if out.len() == position {
            return Err(DataError::UnsupportedOperation(format!(
                "`{}` has no column that can be updated",
                table.name
            ))
            .into());
        }
        match table.primary_key() {
            Some((index, column)) => {
                let mut context = context.switch_fragment(Fragment::SqlUpdateWhere);
                out.push_str(" WHERE ");
                self.write_key_match(&mut context, out, column.name, key_value(table, &row, index)?)?;
            }
            None => {
                log::warn!(
                    "Updating `{}` without a primary key, the statement affects every row",
                    table.name
                );
            }
        }
        Ok(())
    }

    /// Emit `DELETE FROM T WHERE pk=val`.
    fn write_delete<E>(&self, out: &mut String, entity: &E) -> Result<()>
    where
        Self: Sized,
        E: Entity,
    {
        let table = E::table();
        let Some((index, column)) = table.primary_key() else {
            return Err(DataError::MissingPrimaryKey { table: table.name }.into());
        };
        let row = entity.row();
        out.reserve(64 + table.name.len());
        out.push_str("DELETE FROM ");
        let mut context = Context::new(Fragment::SqlDeleteFrom, Some(table));
        self.write_table_ref(&mut context, out, table);
        out.push_str(" WHERE ");
        let mut context = context.switch_fragment(Fragment::SqlDeleteFromWhere);
        self.write_key_match(&mut context, out, column.name, key_value(table, &row, index)?)
    }

    /// Render `column=value` for a primary key lookup.
    fn write_key_match(
        &self,
        context: &mut Context,
        out: &mut String,
        column: &str,
        value: &Value,
    ) -> Result<()> {
        self.write_identifier(context, out, column);
        out.push('=');
        self.write_value(context, out, value)
    }
}

fn key_value<'r>(table: &TableRef, row: &'r [Value], index: usize) -> Result<&'r Value> {
    row.get(index).ok_or_else(|| {
        Error::msg(format!(
            "The row of `{}` has no value for the primary key at position {}",
            table.name, index
        ))
    })
}

/// Fallback generic SQL writer.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;
impl GenericSqlWriter {
    pub fn new() -> Self {
        Self {}
    }
}
impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
