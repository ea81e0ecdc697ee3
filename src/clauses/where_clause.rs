use crate::traits::{Column, ColumnRef};
use crate::types::SqlValue;

/// A WHERE clause condition written in the canonical `?` placeholder style.
#[derive(Debug, Clone)]
pub enum WhereClause {
    /// column = value
    Eq(ColumnRef, SqlValue),
    /// column LIKE value
    Like(ColumnRef, SqlValue),
    /// Fixed SQL fragment without parameters, e.g. `videos.is_active = 1`.
    /// Date idioms inside it are rewritten like any other statement text.
    Raw(String),
    /// clause AND clause
    And(Box<WhereClause>, Box<WhereClause>),
    /// clause OR clause
    Or(Box<WhereClause>, Box<WhereClause>),
}

impl WhereClause {
    /// column = value
    pub fn eq<C: Column + ?Sized, V: Into<SqlValue>>(column: &C, value: V) -> Self {
        WhereClause::Eq(ColumnRef::from_column(column), value.into())
    }

    /// column LIKE '%term%'
    pub fn contains<C: Column + ?Sized>(column: &C, term: &str) -> Self {
        WhereClause::Like(ColumnRef::from_column(column), format!("%{}%", term).into())
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        WhereClause::Raw(sql.into())
    }

    /// Combines this clause with another using AND
    pub fn and(self, other: WhereClause) -> Self {
        WhereClause::And(Box::new(self), Box::new(other))
    }

    /// Combines this clause with another using OR
    pub fn or(self, other: WhereClause) -> Self {
        WhereClause::Or(Box::new(self), Box::new(other))
    }

    /// Builds the SQL fragment, appending bound values to `params` in the
    /// order their `?` placeholders appear.
    pub fn build_sql(&self, params: &mut Vec<SqlValue>) -> String {
        match self {
            WhereClause::Eq(col, value) => {
                params.push(value.clone());
                format!("{} = ?", col.qualified_name())
            }
            WhereClause::Like(col, value) => {
                params.push(value.clone());
                format!("{} LIKE ?", col.qualified_name())
            }
            WhereClause::Raw(sql) => sql.clone(),
            WhereClause::And(left, right) => {
                let left_sql = left.build_sql(params);
                let right_sql = right.build_sql(params);
                format!("({}) AND ({})", left_sql, right_sql)
            }
            WhereClause::Or(left, right) => {
                let left_sql = left.build_sql(params);
                let right_sql = right.build_sql(params);
                format!("({}) OR ({})", left_sql, right_sql)
            }
        }
    }
}
