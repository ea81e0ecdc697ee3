use crate::builders::Select;
use crate::database::Database;

/// Query builder factory.
/// Created from a `Database`; every query it builds runs through that
/// database's normalizer.
pub struct Querier {
    db: Database,
}

impl Querier {
    pub(crate) fn new(db: Database) -> Self {
        Self { db }
    }

    /// Start building a SELECT query.
    pub fn select(&self) -> Select {
        Select::new(self.db.clone())
    }
}
