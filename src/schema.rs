//! Typed descriptions of the portal tables.
//!
//! Column names are the database's snake_case identifiers and reach result rows
//! verbatim.

use crate::traits::{Column, Table};

/// A column of one of the tables below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaColumn {
    table: &'static str,
    column: &'static str,
}

impl SchemaColumn {
    pub const fn new(table: &'static str, column: &'static str) -> Self {
        Self { table, column }
    }
}

impl Column for SchemaColumn {
    fn column_name(&self) -> &'static str {
        self.column
    }

    fn table_name(&self) -> &'static str {
        self.table
    }
}

macro_rules! table {
    ($(#[$meta:meta])* $table:ident, $columns:ident, $name:literal, [$($field:ident),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $table;

        #[derive(Debug, Clone, Copy)]
        pub struct $columns {
            $(pub $field: SchemaColumn,)+
        }

        impl Table for $table {
            type Columns = $columns;

            fn table_name() -> &'static str {
                $name
            }

            fn columns() -> Self::Columns {
                $columns {
                    $($field: SchemaColumn::new($name, stringify!($field)),)+
                }
            }
        }
    };
}

table!(
    /// Registered accounts.
    Users, UsersColumns, "users",
    [id, full_name, email, phone, exam_interest, password_hash, is_active, created_at]
);

table!(
    Exams, ExamsColumns, "exams",
    [id, name, code, description, exam_type, is_active, created_at]
);

table!(
    /// Lecture videos, one exam each.
    Videos, VideosColumns, "videos",
    [
        id, exam_id, title, description, youtube_url, thumbnail_url, duration, views,
        category, is_featured, is_active, created_at,
    ]
);

table!(
    /// Previous-year question papers.
    Papers, PapersColumns, "papers",
    [
        id, exam_id, title, description, year, paper_type, file_path, file_size,
        download_count, is_active, created_at,
    ]
);

table!(
    /// Exam calendar events.
    Schedules, SchedulesColumns, "schedules",
    [id, exam_id, event_name, event_type, start_date, end_date, description, is_active, created_at]
);

table!(
    Bookmarks, BookmarksColumns, "bookmarks",
    [id, user_id, video_id, paper_id, bookmark_type, created_at]
);

table!(
    /// Videos watched and papers downloaded per user.
    UserProgress, UserProgressColumns, "user_progress",
    [id, user_id, video_id, paper_id, progress_type, created_at]
);

table!(
    /// Exam centers.
    Centers, CentersColumns, "centers",
    [
        id, name, address, city, state, country, website_url, maps_url, latitude, longitude,
        is_active, updated_at,
    ]
);
