/// A column of one of the portal tables.
/// Implementations are generated by the `table!` macro in `schema`.
pub trait Column {
    /// The column name as it appears in the database.
    fn column_name(&self) -> &'static str;

    /// The table this column belongs to.
    fn table_name(&self) -> &'static str;

    /// `table.column`
    fn qualified_name(&self) -> String {
        format!("{}.{}", self.table_name(), self.column_name())
    }
}

/// Owned copy of a column's identity, stored by clauses and builders so they do
/// not need to hold on to the original `Column` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn from_column<C: Column + ?Sized>(col: &C) -> Self {
        Self::new(col.table_name(), col.column_name())
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }
}
