use crate::{
    Connection, ConnectionConfig, DataError, Driver, Entity, Executor, Query, QueryResult, Result,
    stream::{self, Stream, StreamExt},
};
use std::borrow::Cow;

/// Owner of a single connection, the entry point to query and modify records.
///
/// Opening and closing are idempotent. Statements run while the context is closed fail with
/// [`DataError::ConnectionClosed`].
pub struct DataContext<C: Connection> {
    driver: C::Driver,
    url: Option<Cow<'static, str>>,
    connection: Option<C>,
}

impl<C: Connection> DataContext<C> {
    /// Wrap an already established connection.
    pub fn new(connection: C) -> Self {
        Self {
            driver: Default::default(),
            url: None,
            connection: Some(connection),
        }
    }

    /// Closed context that connects to `url` when opened.
    pub fn with_url(url: impl Into<Cow<'static, str>>) -> Self {
        Self {
            driver: Default::default(),
            url: Some(url.into()),
            connection: None,
        }
    }

    /// Closed context for a server configuration, the URL scheme is the driver name.
    pub fn with_config(config: &ConnectionConfig) -> Result<Self> {
        let url = config.to_url(<C::Driver as Driver>::NAME)?;
        Ok(Self::with_url(String::from(url)))
    }

    /// Connect with a server configuration.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let mut context = Self::with_config(config)?;
        context.open().await?;
        Ok(context)
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Establish the connection, nothing happens when it is already open.
    pub async fn open(&mut self) -> Result<()> {
        if self.connection.is_some() {
            return Ok(());
        }
        let Some(url) = self.url.clone() else {
            return Err(DataError::NullArgument("url").into());
        };
        log::debug!("Opening a {} connection", <C::Driver as Driver>::NAME);
        self.connection = Some(C::connect(url).await?);
        Ok(())
    }

    /// Release the connection, nothing happens when it is already closed.
    pub async fn close(&mut self) -> Result<()> {
        match self.connection.take() {
            Some(connection) => connection.disconnect().await,
            None => Ok(()),
        }
    }

    /// Query over the records of `E`.
    pub fn table<E: Entity>(&self) -> Query<E> {
        E::query()
    }

    pub fn connection(&mut self) -> Option<&mut C> {
        self.connection.as_mut()
    }
}

impl<C: Connection> Executor for DataContext<C> {
    type Driver = C::Driver;

    fn driver(&self) -> &Self::Driver {
        &self.driver
    }

    fn run(&mut self, query: String) -> impl Stream<Item = Result<QueryResult>> + Send {
        match self.connection.as_mut() {
            Some(connection) => connection.run(query).left_stream(),
            None => {
                log::error!("{}", DataError::ConnectionClosed);
                stream::iter([Err(DataError::ConnectionClosed.into())]).right_stream()
            }
        }
    }
}
