use crate::clauses::WhereClause;
use crate::database::Database;
use crate::error::Result;
use crate::traits::{Column, ColumnRef, Table};
use crate::types::{ExecutionResult, SqlValue};

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_sql(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// Entry point for building a SELECT query.
/// Must call `.columns()` to proceed.
pub struct Select {
    db: Database,
}

impl Select {
    pub(crate) fn new(db: Database) -> Self {
        Self { db }
    }

    /// Specify the columns to select.
    pub fn columns(self, cols: &[&dyn Column]) -> SelectWithColumns {
        let columns = cols.iter().map(|c| ColumnRef::from_column(*c)).collect();
        SelectWithColumns {
            db: self.db,
            columns,
        }
    }
}

/// SELECT builder after columns have been specified.
/// Must call `.from()` to proceed.
pub struct SelectWithColumns {
    db: Database,
    columns: Vec<ColumnRef>,
}

impl SelectWithColumns {
    /// Specify the table to select from.
    pub fn from<T: Table>(self, _table: T) -> SelectWithTable {
        SelectWithTable {
            db: self.db,
            columns: self.columns,
            table: T::table_name().to_string(),
            where_clause: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }
}

/// SELECT builder after the table has been specified.
/// Can optionally add WHERE, ORDER BY and paging, or execute directly.
pub struct SelectWithTable {
    db: Database,
    columns: Vec<ColumnRef>,
    table: String,
    where_clause: Option<WhereClause>,
    order_by: Vec<(ColumnRef, Order)>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl SelectWithTable {
    /// Add a WHERE clause to the query.
    pub fn where_(mut self, clause: WhereClause) -> Self {
        self.where_clause = Some(clause);
        self
    }

    /// Append an ORDER BY key. Keys apply in the order they are added.
    pub fn order_by<C: Column + ?Sized>(mut self, column: &C, order: Order) -> Self {
        self.order_by.push((ColumnRef::from_column(column), order));
        self
    }

    /// Add a LIMIT to the query.
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Add LIMIT and OFFSET together, as the listing endpoints page.
    pub fn page(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Build the canonical SQL text and its parameters.
    pub fn build_sql(&self) -> (String, Vec<SqlValue>) {
        let mut sql = String::with_capacity(256);
        let mut params = Vec::new();

        // SELECT clause
        sql.push_str("SELECT ");
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&col.qualified_name());
        }

        // FROM clause
        sql.push_str(" FROM ");
        sql.push_str(&self.table);

        // WHERE clause
        if let Some(ref where_clause) = self.where_clause {
            sql.push_str(" WHERE ");
            let where_sql = where_clause.build_sql(&mut params);
            sql.push_str(&where_sql);
        }

        // ORDER BY clause
        for (i, (col, order)) in self.order_by.iter().enumerate() {
            sql.push_str(if i == 0 { " ORDER BY " } else { ", " });
            sql.push_str(&col.qualified_name());
            sql.push(' ');
            sql.push_str(order.as_sql());
        }

        // LIMIT / OFFSET, bound like the routes bind them
        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            params.push(SqlValue::Int64(limit));
            if let Some(offset) = self.offset {
                sql.push_str(" OFFSET ?");
                params.push(SqlValue::Int64(offset));
            }
        }

        (sql, params)
    }

    /// Execute the query and return the result.
    pub async fn execute(self) -> Result<ExecutionResult> {
        let (sql, params) = self.build_sql();
        self.db.execute(&sql, &params).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dialect::Dialect;
    use crate::drivers::InMemoryTestDriver;
    use crate::schema::{Exams, Videos};

    fn db() -> Database {
        Database::with_driver(Arc::new(InMemoryTestDriver::new()), Dialect::Sqlite)
    }

    #[test]
    fn test_build_simple_select() {
        let builder = Select::new(db())
            .columns(&[&Exams::columns().id, &Exams::columns().name])
            .from(Exams);

        let (sql, params) = builder.build_sql();
        assert_eq!(sql, "SELECT exams.id, exams.name FROM exams");
        assert!(params.is_empty());
    }

    #[test]
    fn test_build_select_with_where() {
        let builder = Select::new(db())
            .columns(&[&Exams::columns().id])
            .from(Exams)
            .where_(WhereClause::eq(&Exams::columns().code, "UPSC"));

        let (sql, params) = builder.build_sql();
        assert_eq!(sql, "SELECT exams.id FROM exams WHERE exams.code = ?");
        assert_eq!(params, vec![SqlValue::from("UPSC")]);
    }

    #[test]
    fn test_build_listing_query() {
        let videos = Videos::columns();
        let builder = Select::new(db())
            .columns(&[&videos.id, &videos.title])
            .from(Videos)
            .where_(WhereClause::raw("videos.is_active = 1").and(WhereClause::eq(&videos.category, "Maths")))
            .order_by(&videos.is_featured, Order::Desc)
            .order_by(&videos.views, Order::Desc)
            .page(20, 40);

        let (sql, params) = builder.build_sql();
        assert_eq!(
            sql,
            "SELECT videos.id, videos.title FROM videos \
             WHERE (videos.is_active = 1) AND (videos.category = ?) \
             ORDER BY videos.is_featured DESC, videos.views DESC LIMIT ? OFFSET ?"
        );
        assert_eq!(
            params,
            vec![SqlValue::from("Maths"), SqlValue::Int64(20), SqlValue::Int64(40)]
        );
    }

    #[test]
    fn test_build_select_with_limit() {
        let builder = Select::new(db())
            .columns(&[&Exams::columns().id])
            .from(Exams)
            .limit(10);

        let (sql, params) = builder.build_sql();
        assert_eq!(sql, "SELECT exams.id FROM exams LIMIT ?");
        assert_eq!(params, vec![SqlValue::Int64(10)]);
    }
}
