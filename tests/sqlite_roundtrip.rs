use examprep::config::EngineKind;
use examprep::error::ExamPrepError;
use examprep::schema::Papers;
use examprep::traits::Table;
use examprep::types::SqlValue;
use examprep::{Database, Dialect, WhereClause};

const SCHEMA: &str = "CREATE TABLE papers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    exam_id INTEGER,
    title TEXT NOT NULL,
    description TEXT,
    year INTEGER,
    paper_type TEXT,
    file_path TEXT,
    file_size INTEGER,
    download_count INTEGER DEFAULT 0,
    is_active INTEGER DEFAULT 1,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
)";

async fn open(dir: &tempfile::TempDir) -> Database {
    let engine = EngineKind::Sqlite {
        path: dir.path().join("portal.sqlite"),
    };
    let db = Database::connect(&engine).await.unwrap();
    db.execute(SCHEMA, &[]).await.unwrap();
    db
}

#[tokio::test]
async fn test_insert_then_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;
    assert_eq!(db.dialect(), Dialect::Sqlite);

    let inserted = db
        .execute(
            "INSERT INTO papers (exam_id, title, year, paper_type, file_path) VALUES (?, ?, ?, ?, ?)",
            &[
                SqlValue::Int64(1),
                SqlValue::from("UPSC Prelims GS Paper I"),
                SqlValue::Int64(2023),
                SqlValue::from("prelims"),
                SqlValue::from("/papers/upsc-2023-gs1.pdf"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(inserted.affected(), 1);
    let id = inserted.inserted_id().unwrap();

    let papers = Papers::columns();
    let row = db
        .querier()
        .select()
        .columns(&[&papers.id, &papers.title, &papers.year, &papers.download_count])
        .from(Papers)
        .where_(WhereClause::eq(&papers.id, id))
        .execute()
        .await
        .unwrap()
        .single_row()
        .unwrap();

    assert_eq!(row.get("id").unwrap(), &SqlValue::Int64(id));
    assert_eq!(row.get("title").unwrap().as_str(), Some("UPSC Prelims GS Paper I"));
    assert_eq!(row.get("year").unwrap().as_i64(), Some(2023));
    assert_eq!(row.get("download_count").unwrap().as_i64(), Some(0));
}

#[tokio::test]
async fn test_update_reports_affected_rows() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;

    for title in ["Mains Essay", "Mains GS II", "CSAT"] {
        db.execute("INSERT INTO papers (title) VALUES (?)", &[SqlValue::from(title)])
            .await
            .unwrap();
    }

    let updated = db
        .execute(
            "UPDATE papers SET download_count = download_count + 1 WHERE title LIKE ?",
            &[SqlValue::from("Mains%")],
        )
        .await
        .unwrap();
    assert_eq!(updated.affected(), 2);
}

#[tokio::test]
async fn test_sqlite_date_idioms_run_natively() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;

    db.execute(
        "INSERT INTO papers (title, created_at) VALUES (?, datetime('now', '-3 days'))",
        &[SqlValue::from("Old upload")],
    )
    .await
    .unwrap();

    let recent = db
        .execute(
            "SELECT COUNT(*) AS total FROM papers WHERE created_at >= datetime('now', '-7 days')",
            &[],
        )
        .await
        .unwrap()
        .single_row()
        .unwrap();
    assert_eq!(recent.get("total").unwrap().as_i64(), Some(1));
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = open(&dir).await;
        db.execute("INSERT INTO papers (title) VALUES (?)", &[SqlValue::from("Kept")])
            .await
            .unwrap();
    }

    let engine = EngineKind::Sqlite {
        path: dir.path().join("portal.sqlite"),
    };
    let db = Database::connect(&engine).await.unwrap();
    assert!(db.test_connection().await);

    let result = db.execute("SELECT title FROM papers", &[]).await.unwrap();
    assert_eq!(result.rows_json(), serde_json::json!([{ "title": "Kept" }]));
}

#[tokio::test]
async fn test_engine_error_is_query_failed() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(&dir).await;

    let err = db
        .execute("SELECT missing_column FROM papers", &[])
        .await
        .unwrap_err();
    match err {
        ExamPrepError::QueryFailed(message) => assert!(message.contains("missing_column"), "{message}"),
        other => panic!("unexpected error: {other:?}"),
    }
}
