use crate::TableRef;

/// Clause currently being written.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    None,
    SqlSelect,
    SqlSelectFrom,
    SqlSelectWhere,
    SqlSelectOrderBy,
    SqlSelectLimit,
    SqlInsertInto,
    SqlInsertIntoValues,
    SqlUpdate,
    SqlUpdateSet,
    SqlUpdateWhere,
    SqlDeleteFrom,
    SqlDeleteFromWhere,
}

impl Fragment {
    /// Fragments where values follow the key formatting rules: dates without time and
    /// booleans as `0`/`1`.
    pub fn is_key_assignment(&self) -> bool {
        matches!(
            self,
            Fragment::SqlUpdateSet | Fragment::SqlUpdateWhere | Fragment::SqlDeleteFromWhere
        )
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub fragment: Fragment,
    /// Table used to resolve field names into column names.
    pub table: Option<&'static TableRef>,
}

impl Context {
    pub fn new(fragment: Fragment, table: Option<&'static TableRef>) -> Self {
        Self { fragment, table }
    }
    pub fn switch_fragment(&self, fragment: Fragment) -> Context {
        Context { fragment, ..*self }
    }
}
