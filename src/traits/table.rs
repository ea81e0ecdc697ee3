/// A portal table.
/// Implementations are generated by the `table!` macro in `schema`.
pub trait Table {
    /// Accessor struct holding one value per column.
    type Columns;

    /// The table name as it appears in the database.
    fn table_name() -> &'static str;

    /// Accessor for this table's columns.
    fn columns() -> Self::Columns;
}
