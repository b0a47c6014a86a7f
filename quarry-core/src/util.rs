use crate::Result;
use std::fmt::{self, Display, Formatter};

/// Write each value with `f`, putting `separator` between the values that produced output.
///
/// A value for which `f` writes nothing does not get a separator, so callers can skip
/// elements in place.
pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) -> Result<()>
where
    F: FnMut(&mut String, T) -> Result<()>,
{
    let mut separate = false;
    for v in values {
        let start = out.len();
        if separate {
            out.push_str(separator);
        }
        let mark = out.len();
        f(out, v)?;
        if out.len() == mark {
            out.truncate(start);
        } else {
            separate = true;
        }
    }
    Ok(())
}

/// Display adapter printing at most the first 497 bytes of a statement.
pub struct Truncated<'a>(pub &'a str);

impl Display for Truncated<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        const LIMIT: usize = 497;
        if self.0.len() <= LIMIT {
            return f.write_str(self.0.trim_end());
        }
        let mut end = LIMIT;
        while !self.0.is_char_boundary(end) {
            end -= 1;
        }
        write!(f, "{}...", self.0[..end].trim_end())
    }
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        $crate::Truncated(&$query)
    };
}
