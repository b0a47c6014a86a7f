use crate::{Executor, Result};
use std::{borrow::Cow, future::Future};

pub trait Connection: Executor {
    /// Establish a connection to the given URL
    fn connect(url: Cow<'static, str>) -> impl Future<Output = Result<Self>> + Send;

    /// Close the connection, releasing the server side resources
    fn disconnect(self) -> impl Future<Output = Result<()>> + Send;
}
