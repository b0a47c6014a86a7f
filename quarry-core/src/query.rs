use crate::{
    AsValue, Driver, Entity, Executor, IntoExpr, QueryNode, Result, SqlWriter, materialize,
    stream::Stream, truncate_long,
};
use async_stream::try_stream;
use std::{
    fmt::{self, Debug, Formatter},
    future::Future,
    marker::PhantomData,
    sync::Arc,
};

/// Deferred query over the records of `E`.
///
/// Building a query never touches the database, every call to [`Query::fetch`] compiles the
/// chain and runs it again. Extending a query leaves the original usable.
///
/// # Examples
/// ```rust,ignore
/// let adults = Person::query()
///     .filter(Person::age.greater_equal(18))
///     .order_by_descending(Person::age)
///     .limit(10);
/// let people = adults.fetch(&mut connection).try_collect::<Vec<_>>().await?;
/// ```
pub struct Query<E: Entity> {
    node: Arc<QueryNode>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Query<E> {
    pub fn new() -> Self {
        Self::from_node(QueryNode::Source(E::table()))
    }

    fn from_node(node: QueryNode) -> Self {
        Self {
            node: Arc::new(node),
            _entity: PhantomData,
        }
    }

    pub fn node(&self) -> &QueryNode {
        &self.node
    }

    pub fn filter(&self, predicate: impl IntoExpr) -> Self {
        Self::from_node(QueryNode::Filter(self.node.clone(), predicate.into_expr()))
    }

    pub fn order_by(&self, key: impl IntoExpr) -> Self {
        Self::from_node(QueryNode::OrderBy(self.node.clone(), key.into_expr()))
    }

    pub fn order_by_descending(&self, key: impl IntoExpr) -> Self {
        Self::from_node(QueryNode::OrderByDescending(
            self.node.clone(),
            key.into_expr(),
        ))
    }

    pub fn limit(&self, limit: u64) -> Self {
        Self::from_node(QueryNode::Limit(self.node.clone(), limit))
    }

    /// Count the records instead of returning them.
    ///
    /// Ordering and limit stay in the statement and do not cap the count:
    /// `T::query().order_by(T::id).limit(1).count()` compiles to
    /// `SELECT COUNT(*) FROM T ORDER BY id LIMIT 1`, which still counts every row of `T`.
    pub fn count(&self) -> CountQuery<E> {
        CountQuery {
            node: Arc::new(QueryNode::Count(self.node.clone())),
            _entity: PhantomData,
        }
    }

    /// Compile the query without running it.
    pub fn to_sql<W: SqlWriter + ?Sized>(&self, writer: &W) -> Result<String> {
        let mut out = String::new();
        writer.write_query(&mut out, &self.node)?;
        Ok(out)
    }

    /// Run the query and stream the materialized records.
    pub fn fetch<'s, Exec: Executor>(
        &'s self,
        executor: &'s mut Exec,
    ) -> impl Stream<Item = Result<E>> + Send + 's {
        try_stream! {
            let sql = {
                let writer = executor.driver().sql_writer();
                self.to_sql(&writer)
            }?;
            log::debug!("{}", truncate_long!(sql));
            let rows = executor.fetch(sql);
            for await entity in materialize::<E, _>(rows) {
                yield entity?;
            }
        }
    }
}

impl<E: Entity> Default for Query<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Clone for Query<E> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Debug for Query<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Query").field(&self.node).finish()
    }
}

/// Query projecting the number of records.
pub struct CountQuery<E: Entity> {
    node: Arc<QueryNode>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> CountQuery<E> {
    pub fn node(&self) -> &QueryNode {
        &self.node
    }

    pub fn to_sql<W: SqlWriter + ?Sized>(&self, writer: &W) -> Result<String> {
        let mut out = String::new();
        writer.write_query(&mut out, &self.node)?;
        Ok(out)
    }

    /// Run the query and return the count.
    pub fn fetch<'s, Exec: Executor>(
        &'s self,
        executor: &'s mut Exec,
    ) -> impl Future<Output = Result<u64>> + Send + 's {
        async move {
            let sql = {
                let writer = executor.driver().sql_writer();
                self.to_sql(&writer)
            }?;
            log::debug!("{}", truncate_long!(sql));
            let value = executor.fetch_scalar(sql).await?;
            if value.is_null() {
                return Ok(0);
            }
            u64::try_from_value(value)
        }
    }
}

impl<E: Entity> Clone for CountQuery<E> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Debug for CountQuery<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CountQuery").field(&self.node).finish()
    }
}
