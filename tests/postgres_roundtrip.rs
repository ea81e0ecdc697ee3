//! Runs against the server in `DATABASE_URL` and passes trivially when it is unset.
//! Every table is `TEMP`, so runs never touch real data or each other.

use examprep::config::EngineKind;
use examprep::error::ExamPrepError;
use examprep::schema::Centers;
use examprep::traits::Table;
use examprep::types::SqlValue;
use examprep::{Database, Dialect, WhereClause};

async fn open(schema: &str) -> Option<Database> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    let db = Database::connect(&EngineKind::Postgres { url }).await.unwrap();
    assert_eq!(db.dialect(), Dialect::Postgres);
    db.execute(schema, &[]).await.unwrap();
    Some(db)
}

fn float(value: &SqlValue) -> f64 {
    match value {
        SqlValue::Float(f) => *f,
        other => panic!("expected a float, got {other:?}"),
    }
}

const CENTERS: &str = "CREATE TEMP TABLE centers (
    id SERIAL PRIMARY KEY,
    name VARCHAR(200) NOT NULL,
    city VARCHAR(100),
    latitude DECIMAL(9,6),
    longitude DECIMAL(9,6),
    is_active INTEGER DEFAULT 1
)";

const VIDEOS: &str = "CREATE TEMP TABLE videos (
    id SERIAL PRIMARY KEY,
    exam_id INTEGER,
    title VARCHAR(300) NOT NULL,
    views BIGINT DEFAULT 0,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[tokio::test]
async fn test_insert_returning_then_read_back() {
    let Some(db) = open(CENTERS).await else { return };
    assert!(db.test_connection().await);

    let inserted = db
        .execute(
            "INSERT INTO centers (name, city, latitude, longitude) VALUES (?, ?, ?, ?) RETURNING id",
            &[
                SqlValue::from("Fergusson College"),
                SqlValue::from("Pune"),
                SqlValue::Float(18.52),
                SqlValue::from("73.8567"),
            ],
        )
        .await
        .unwrap();
    let id = inserted.inserted_id().unwrap();

    let centers = Centers::columns();
    let row = db
        .querier()
        .select()
        .columns(&[&centers.id, &centers.name, &centers.latitude, &centers.longitude, &centers.is_active])
        .from(Centers)
        .where_(WhereClause::eq(&centers.id, id))
        .execute()
        .await
        .unwrap()
        .single_row()
        .unwrap();

    assert_eq!(row.get("id").unwrap().as_i64(), Some(id));
    assert_eq!(row.get("name").unwrap().as_str(), Some("Fergusson College"));
    assert!((float(row.get("latitude").unwrap()) - 18.52).abs() < 1e-9);
    assert!((float(row.get("longitude").unwrap()) - 73.8567).abs() < 1e-9);
    assert_eq!(row.get("is_active").unwrap(), &SqlValue::Int32(1));
}

#[tokio::test]
async fn test_update_reports_affected_rows() {
    let Some(db) = open(CENTERS).await else { return };

    for city in ["Pune", "Pune", "Nagpur"] {
        db.execute(
            "INSERT INTO centers (name, city) VALUES (?, ?)",
            &[SqlValue::from("Center"), SqlValue::from(city)],
        )
        .await
        .unwrap();
    }

    let updated = db
        .execute(
            "UPDATE centers SET is_active = 0, latitude = ? WHERE LOWER(city) = ?",
            &[SqlValue::Null, SqlValue::from("pune")],
        )
        .await
        .unwrap();
    assert_eq!(updated.affected(), 2);
    assert!(updated.is_empty());
}

#[tokio::test]
async fn test_numeric_aggregates() {
    let Some(db) = open(VIDEOS).await else { return };

    for (title, views) in [("Polity basics", 120), ("Modern history", 45), ("Geography", 10)] {
        db.execute(
            "INSERT INTO videos (exam_id, title, views) VALUES (?, ?, ?)",
            &[SqlValue::Int64(1), SqlValue::from(title), SqlValue::Int64(views)],
        )
        .await
        .unwrap();
    }

    let row = db
        .execute(
            "SELECT COUNT(*) AS total_videos, SUM(views) AS total_views, AVG(views) AS average_views \
             FROM videos WHERE exam_id = ?",
            &[SqlValue::Int64(1)],
        )
        .await
        .unwrap()
        .single_row()
        .unwrap();

    assert_eq!(row.get("total_videos").unwrap(), &SqlValue::Int64(3));
    assert_eq!(row.get("total_views").unwrap(), &SqlValue::Int64(175));
    assert!((float(row.get("average_views").unwrap()) - 175.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_date_idioms_run_on_the_server() {
    let Some(db) = open(VIDEOS).await else { return };

    db.execute(
        "INSERT INTO videos (title, created_at) VALUES (?, datetime('now', '-3 days'))",
        &[SqlValue::from("Recent")],
    )
    .await
    .unwrap();
    db.execute(
        "INSERT INTO videos (title, created_at) VALUES (?, datetime('now', '-30 days'))",
        &[SqlValue::from("Old")],
    )
    .await
    .unwrap();

    let recent = db
        .execute(
            "SELECT title, strftime('%Y', created_at) AS year, strftime('%m', created_at) AS month \
             FROM videos WHERE created_at >= datetime('now', '-7 days') AND created_at < datetime('now')",
            &[],
        )
        .await
        .unwrap()
        .single_row()
        .unwrap();

    assert_eq!(recent.get("title").unwrap().as_str(), Some("Recent"));
    assert_eq!(recent.get("year").unwrap().as_str().map(str::len), Some(4));
    assert_eq!(recent.get("month").unwrap().as_str().map(str::len), Some(2));
}

#[tokio::test]
async fn test_engine_error_keeps_server_message() {
    let Some(db) = open(VIDEOS).await else { return };

    let err = db
        .execute("SELECT missing_column FROM videos WHERE id = ?", &[SqlValue::Int64(1)])
        .await
        .unwrap_err();
    match err {
        ExamPrepError::QueryFailed(message) => {
            assert!(message.contains("\"missing_column\""), "{message}");
            assert!(!message.starts_with("db error"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
