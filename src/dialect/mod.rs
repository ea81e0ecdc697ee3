//! SQL dialect normalization.
//!
//! Statements are written once in SQLite style: `?` placeholders and SQLite
//! date/time functions. For PostgreSQL they are rewritten in two fixed steps,
//! idiom substitution then placeholder renumbering. SQLite statements pass through
//! untouched.

mod idioms;
mod placeholders;

use std::borrow::Cow;

pub use self::idioms::{postgres_idioms, rewrite_idioms, Idiom};
pub use self::placeholders::{count_placeholders, renumber_placeholders, PlaceholderScan};

/// Target SQL dialect of the active engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

/// A statement after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSql<'a> {
    pub sql: Cow<'a, str>,
    /// Placeholders found while renumbering. `None` when the statement was not
    /// rewritten and the engine does its own counting.
    pub placeholders: Option<usize>,
}

/// Rewrites canonical statements for one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    dialect: Dialect,
    scan: PlaceholderScan,
}

impl Normalizer {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            scan: PlaceholderScan::default(),
        }
    }

    /// Choose how placeholders are located during renumbering.
    pub fn with_placeholder_scan(mut self, scan: PlaceholderScan) -> Self {
        self.scan = scan;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn placeholder_scan(&self) -> PlaceholderScan {
        self.scan
    }

    pub fn normalize<'a>(&self, sql: &'a str) -> NormalizedSql<'a> {
        match self.dialect {
            Dialect::Sqlite => NormalizedSql {
                sql: Cow::Borrowed(sql),
                placeholders: None,
            },
            Dialect::Postgres => {
                let converted = rewrite_idioms(sql);
                let (converted, count) = renumber_placeholders(&converted, self.scan);
                NormalizedSql {
                    sql: Cow::Owned(converted),
                    placeholders: Some(count),
                }
            }
        }
    }
}
