mod as_value;
mod column;
mod config;
mod connection;
mod data_context;
mod db_type;
mod driver;
mod entity;
mod error;
mod executor;
mod expression;
mod materialize;
mod query;
mod query_node;
mod row;
mod table_ref;
mod util;
mod value;
pub mod writer;

pub use ::anyhow::Context as ErrorContext;
pub use as_value::*;
pub use column::*;
pub use config::*;
pub use connection::*;
pub use data_context::*;
pub use db_type::*;
pub use driver::*;
pub use entity::*;
pub use error::*;
pub use executor::*;
pub use expression::*;
pub use materialize::*;
pub use query::*;
pub use query_node::*;
pub use row::*;
pub use table_ref::*;
pub use util::*;
pub use value::*;
pub use writer::{GenericSqlWriter, SqlWriter};
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
