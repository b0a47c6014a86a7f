use crate::{
    ColumnDef, Driver, Executor, Query, Result, Row, RowLabeled, RowsAffected, SqlWriter,
    TableRef, materialize_row, truncate_long,
};
use std::future::Future;

/// A record type mapped to a table, usually implemented with `#[derive(Entity)]`.
///
/// Materialized records are built in one go by [`Entity::from_values`] from the row values,
/// already converted to the declared column types.
pub trait Entity: Sized + Send + Sync + 'static {
    /// Static metadata of the table.
    fn table() -> &'static TableRef;

    /// Columns in field declaration order.
    fn columns() -> &'static [ColumnDef] {
        Self::table().columns
    }

    /// First mapped column flagged as primary key.
    fn primary_key_def() -> Option<&'static ColumnDef> {
        Self::table().primary_key().map(|(_, column)| column)
    }

    /// Value of every field, in the order of [`Entity::columns`].
    fn row(&self) -> Row;

    /// Build a record from one value per column, in the order of [`Entity::columns`].
    ///
    /// NULL becomes `None` for optional fields and [`crate::AsValue::from_null`] otherwise.
    fn from_values(values: Row) -> Result<Self>;

    fn from_row(row: RowLabeled) -> Result<Self> {
        materialize_row(row)
    }

    /// Query rooted at the table of this entity.
    fn query() -> Query<Self> {
        Query::new()
    }

    fn insert_one<Exec: Executor>(
        executor: &mut Exec,
        entity: &Self,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        Self::insert_many(executor, [entity])
    }

    fn insert_many<'a, Exec, It>(
        executor: &mut Exec,
        items: It,
    ) -> impl Future<Output = Result<RowsAffected>> + Send
    where
        Exec: Executor,
        It: IntoIterator<Item = &'a Self>,
    {
        let mut query = String::new();
        let written = executor
            .driver()
            .sql_writer()
            .write_insert::<Self>(&mut query, items);
        run_statement(executor, query, written)
    }

    /// Insert only the items accepted by `predicate`.
    fn insert_many_where<'a, Exec, It, P>(
        executor: &mut Exec,
        items: It,
        mut predicate: P,
    ) -> impl Future<Output = Result<RowsAffected>> + Send
    where
        Exec: Executor,
        It: IntoIterator<Item = &'a Self>,
        P: FnMut(&Self) -> bool,
    {
        Self::insert_many(executor, items.into_iter().filter(move |v| predicate(v)))
    }

    fn update_one<Exec: Executor>(
        executor: &mut Exec,
        entity: &Self,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let mut query = String::new();
        let written = executor
            .driver()
            .sql_writer()
            .write_update(&mut query, entity);
        run_statement(executor, query, written)
    }

    fn delete_one<Exec: Executor>(
        executor: &mut Exec,
        entity: &Self,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let mut query = String::new();
        let written = executor
            .driver()
            .sql_writer()
            .write_delete(&mut query, entity);
        run_statement(executor, query, written)
    }
}

/// Execute a generated statement, nothing is sent when it could not be generated.
fn run_statement<Exec: Executor>(
    executor: &mut Exec,
    query: String,
    written: Result<()>,
) -> impl Future<Output = Result<RowsAffected>> + Send {
    async move {
        written?;
        log::debug!("{}", truncate_long!(query));
        executor.execute(query).await
    }
}
