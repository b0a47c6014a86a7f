use quarry_core::{SqlWriter, writer::Context};

/// MySQL treats the backslash as an escape character inside string literals.
#[derive(Default)]
pub struct MySQLSqlWriter {}

impl SqlWriter for MySQLSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_value_string(&self, _context: &mut Context, out: &mut String, value: &str) {
        out.push('\'');
        for c in value.chars() {
            match c {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                _ => out.push(c),
            }
        }
        out.push('\'');
    }
}
