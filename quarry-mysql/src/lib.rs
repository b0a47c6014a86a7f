mod connection;
mod decode;
mod driver;
mod sql_writer;

pub use connection::*;
pub(crate) use decode::*;
pub use driver::*;
pub use sql_writer::*;
