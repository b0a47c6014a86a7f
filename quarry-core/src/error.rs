use std::fmt::{self, Display, Formatter};

/// Failures raised by the compiler, the statement builder and the materializer.
///
/// They travel as [`crate::Error`] and can be recovered with `downcast_ref::<DataError>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    UnsupportedOperation(String),
    UnsupportedLiteralType(String),
    MissingPrimaryKey { table: &'static str },
    EmptyBatch { table: &'static str },
    Conversion {
        field: &'static str,
        value: String,
        reason: String,
    },
    NullArgument(&'static str),
    ConnectionClosed,
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DataError::UnsupportedOperation(what) => {
                write!(f, "Unsupported operation: {what}")
            }
            DataError::UnsupportedLiteralType(what) => {
                write!(f, "Unsupported literal type: {what}")
            }
            DataError::MissingPrimaryKey { table } => {
                write!(f, "Table `{table}` has no primary key column")
            }
            DataError::EmptyBatch { table } => {
                write!(f, "Cannot insert an empty batch into `{table}`")
            }
            DataError::Conversion {
                field,
                value,
                reason,
            } => write!(f, "Cannot assign {value} to field `{field}`: {reason}"),
            DataError::NullArgument(name) => write!(f, "Argument `{name}` is required"),
            DataError::ConnectionClosed => f.write_str("The connection is closed"),
        }
    }
}

impl std::error::Error for DataError {}
