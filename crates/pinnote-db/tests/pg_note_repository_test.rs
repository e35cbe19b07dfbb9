//! Integration tests for PgNoteRepository.
//!
//! These run against the database named by `DATABASE_URL` and are skipped
//! when it is not set. Each test only touches the notes it creates.

use pinnote_db::{validate, Category, Database, NoteDraft, NoteRepository};
use uuid::Uuid;

async fn setup_test_db() -> Option<Database> {
    let _ = dotenvy::dotenv();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
        return None;
    };
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!("../../migrations")
        .run(&db.pool)
        .await
        .expect("Failed to run migrations");
    Some(db)
}

fn draft(title: &str, content: &str) -> NoteDraft {
    NoteDraft {
        title: Some(title.to_string()),
        content: Some(content.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_fetch_round_trip() {
    let Some(db) = setup_test_db().await else {
        return;
    };

    let fields = validate(&NoteDraft {
        is_pinned: Some(true),
        category: Some("Work".to_string()),
        tags: Some(vec!["q3".to_string(), "planning".to_string()]),
        ..draft("  Roadmap  ", "Draft the Q3 roadmap")
    })
    .unwrap();
    let created = db.notes.create(fields).await.expect("create");

    assert_eq!(created.title, "Roadmap");
    assert!(created.is_pinned);
    assert_eq!(created.category, Some(Category::Work));
    assert_eq!(created.created_at, created.updated_at);

    let fetched = db.notes.fetch(created.id).await.expect("fetch");
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.tags, vec!["q3".to_string(), "planning".to_string()]);

    db.notes.delete(created.id).await.expect("cleanup");
}

#[tokio::test]
async fn test_list_all_returns_creation_order() {
    let Some(db) = setup_test_db().await else {
        return;
    };

    let first = db
        .notes
        .create(validate(&draft("first", "one")).unwrap())
        .await
        .unwrap();
    let second = db
        .notes
        .create(validate(&draft("second", "two")).unwrap())
        .await
        .unwrap();

    let ids: Vec<Uuid> = db
        .notes
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.id)
        .filter(|id| *id == first.id || *id == second.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);

    db.notes.delete(first.id).await.unwrap();
    db.notes.delete(second.id).await.unwrap();
}

#[tokio::test]
async fn test_replace_keeps_created_at() {
    let Some(db) = setup_test_db().await else {
        return;
    };

    let note = db
        .notes
        .create(validate(&draft("before", "body")).unwrap())
        .await
        .unwrap();
    let updated = db
        .notes
        .replace(note.id, validate(&draft("after", "new body")).unwrap())
        .await
        .unwrap();

    assert_eq!(updated.id, note.id);
    assert_eq!(updated.created_at, note.created_at);
    assert!(updated.updated_at >= note.updated_at);
    assert_eq!(updated.title, "after");
    assert_eq!(updated.category, None);

    db.notes.delete(note.id).await.unwrap();
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let id = Uuid::new_v4();
    let fields = validate(&draft("x", "y")).unwrap();

    assert!(db.notes.fetch(id).await.unwrap_err().is_not_found());
    assert!(db.notes.replace(id, fields).await.unwrap_err().is_not_found());
    assert!(db.notes.delete(id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_delete_returns_note_and_removes_it() {
    let Some(db) = setup_test_db().await else {
        return;
    };

    let note = db
        .notes
        .create(validate(&draft("temp", "gone soon")).unwrap())
        .await
        .unwrap();
    let removed = db.notes.delete(note.id).await.unwrap();

    assert_eq!(removed.id, note.id);
    assert_eq!(removed.title, "temp");
    assert!(db.notes.fetch(note.id).await.unwrap_err().is_not_found());
}
