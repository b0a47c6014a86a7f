use crate::DbType;

/// Mapping between a record field and a database column.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Name of the Rust field.
    pub field: &'static str,
    /// Column name, defaults to the lowercase field name.
    pub name: &'static str,
    /// Declared database type, drives the conversion of read values.
    pub db_type: Option<DbType>,
    pub primary_key: bool,
    /// Assigned by the database, written as `NULL` on insert and never updated.
    pub generated: bool,
    pub nullable: bool,
    /// False for fields without a declared mapping, ignored by the statement builder.
    pub mapped: bool,
}

impl ColumnDef {
    pub fn name(&self) -> &'static str {
        self.name
    }
}
