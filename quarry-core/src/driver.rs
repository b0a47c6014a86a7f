use crate::{Connection, SqlWriter};

pub trait Driver: Default + Send + Sync {
    type Connection: Connection;
    type SqlWriter: SqlWriter;

    /// Name of the backend, also the scheme of its connection URLs.
    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}
