use crate::{
    Driver, QueryResult, Result, RowLabeled, RowsAffected, Value,
    stream::{Stream, StreamExt, TryStreamExt},
};
use std::{future::Future, pin::pin};

/// Sends SQL text to a database, one statement at a time.
pub trait Executor: Send + Sized {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    /// General method to send any query and return any result type (either row or count)
    fn run(&mut self, query: String) -> impl Stream<Item = Result<QueryResult>> + Send;

    /// Execute the query and returns the rows.
    fn fetch(&mut self, query: String) -> impl Stream<Item = Result<RowLabeled>> + Send {
        self.run(query).filter_map(|v| async move {
            match v {
                Ok(QueryResult::Row(v)) => Some(Ok(v)),
                Err(e) => Some(Err(e)),
                _ => None,
            }
        })
    }

    /// Execute the query and return the total number of rows affected.
    fn execute(&mut self, query: String) -> impl Future<Output = Result<RowsAffected>> + Send {
        self.run(query)
            .filter_map(|v| async move {
                match v {
                    Ok(QueryResult::Affected(v)) => Some(Ok(v)),
                    Err(e) => Some(Err(e)),
                    _ => None,
                }
            })
            .try_collect()
    }

    /// Execute the query and return the first value of the first row, `Value::Null` when
    /// there are no rows.
    fn fetch_scalar(&mut self, query: String) -> impl Future<Output = Result<Value>> + Send {
        let rows = self.fetch(query);
        async move {
            let mut rows = pin!(rows);
            Ok(rows
                .try_next()
                .await?
                .and_then(|row| row.values.into_vec().into_iter().next())
                .unwrap_or_default())
        }
    }
}
