use super::types::{ColumnType, SortDirection};

/// A filterable column and the type its query-string values parse into.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub column: &'static str,
    pub ty: ColumnType,
}

/// The closed set of columns a resource exposes to the query layer.
///
/// Client-supplied filter, sort, and select names are validated against this
/// set; anything outside it (including the owner column) is rejected rather
/// than passed through to the store.
#[derive(Debug, Clone, Copy)]
pub struct ResourceSchema {
    pub table: &'static str,
    pub owner_column: &'static str,
    pub fields: &'static [FieldSpec],
    pub default_sort: (&'static str, SortDirection),
}

impl ResourceSchema {
    pub fn field(&self, column: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.column == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.field(column).is_some()
    }
}
