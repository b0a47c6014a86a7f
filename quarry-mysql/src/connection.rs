use crate::{MySQLDriver, decode_row};
use async_stream::try_stream;
use mysql_async::{Conn, Opts, prelude::Queryable};
use quarry_core::{
    Connection, Driver, Error, ErrorContext, Executor, QueryResult, Result, RowsAffected,
    stream::{Stream, StreamExt, TryStreamExt},
    truncate_long,
};
use std::{borrow::Cow, sync::Arc};
use url::Url;

pub struct MySQLConnection {
    pub(crate) connection: Conn,
}

impl Executor for MySQLConnection {
    type Driver = MySQLDriver;

    fn driver(&self) -> &Self::Driver {
        &MySQLDriver {}
    }

    fn run(&mut self, query: String) -> impl Stream<Item = Result<QueryResult>> + Send {
        let context = Arc::new(format!(
            "While running the query:\n{}",
            truncate_long!(query)
        ));
        try_stream! {
            let mut result = self.connection.query_iter(query).await?;
            let mut rows = 0;
            while let Some(mut stream) = result.stream::<mysql_async::Row>().await? {
                while let Some(row) = stream.next().await.transpose()? {
                    rows += 1;
                    yield decode_row(row)?.into();
                }
            }
            if rows == 0 {
                yield RowsAffected {
                    rows_affected: result.affected_rows(),
                    last_affected_id: result.last_insert_id().map(|v| v as _),
                }
                .into();
            }
        }
        .map_err(move |e: Error| {
            let e = e.context(context.clone());
            log::error!("{:#}", e);
            e
        })
    }
}

impl Connection for MySQLConnection {
    async fn connect(url: Cow<'static, str>) -> Result<MySQLConnection> {
        let context = || format!("While trying to connect to `{}`", truncate_long!(url));
        let prefix = format!("{}://", <Self::Driver as Driver>::NAME);
        if !url.starts_with(&prefix) {
            let error = Error::msg(format!(
                "MySQL connection url must start with `{}`",
                &prefix
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let url = Url::parse(&url).with_context(context)?;
        let config = Opts::from_url(url.as_str()).with_context(context)?;
        let connection = Conn::new(config).await.with_context(context)?;
        Ok(MySQLConnection { connection })
    }

    async fn disconnect(self) -> Result<()> {
        self.connection
            .disconnect()
            .await
            .context("While closing the MySQL connection")
    }
}
