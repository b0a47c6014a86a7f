use crate::ColumnDef;

/// Static description of the table backing a record type.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRef {
    pub name: &'static str,
    /// Columns in field declaration order.
    pub columns: &'static [ColumnDef],
}

impl TableRef {
    /// First mapped column flagged as primary key, with its position.
    pub fn primary_key(&self) -> Option<(usize, &'static ColumnDef)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, c)| c.mapped && c.primary_key)
    }

    pub fn column(&self, field: &str) -> Option<&'static ColumnDef> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Database column name of a field, the field itself when not declared.
    pub fn column_name<'a>(&self, field: &'a str) -> &'a str {
        match self.column(field) {
            Some(column) => column.name,
            None => field,
        }
    }
}
