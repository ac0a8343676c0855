use entity::{course, course_content, lesson, organization, quiz};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // A single pooled connection, so every query sees the same in-memory
    // database.
    options.max_connections(1);
    let db = Database::connect(options).await.expect("connect");
    Migrator::up(&db, None).await.expect("migrate");
    db
}

async fn fixture(db: &DatabaseConnection) -> (course::Model, lesson::Model, quiz::Model) {
    let now = 1_700_000_000;
    let org = organization::ActiveModel {
        name: Set("Test Organization".to_string()),
        description: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert organization");

    let course = course::ActiveModel {
        organization_id: Set(org.id),
        title: Set("Rust Basics".to_string()),
        slug: Set("rust-basics".to_string()),
        description: Set(None),
        enabled: Set(false),
        imap_connection_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert course");

    let lesson = lesson::ActiveModel {
        title: Set("Ownership".to_string()),
        content: Set("Every value has a single owner.".to_string()),
        is_published: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert lesson");

    let quiz = quiz::ActiveModel {
        title: Set("Ownership quiz".to_string()),
        required_score: Set(80),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert quiz");

    (course, lesson, quiz)
}

fn content(course_id: i32, kind: &str) -> course_content::ActiveModel {
    course_content::ActiveModel {
        course_id: Set(course_id),
        priority: Set(1),
        kind: Set(kind.to_string()),
        lesson_id: Set(None),
        quiz_id: Set(None),
        waiting_period: Set(0),
        ..Default::default()
    }
}

#[tokio::test]
async fn lesson_content_with_lesson_reference_saves() {
    let db = setup().await;
    let (course, lesson, _quiz) = fixture(&db).await;

    let mut row = content(course.id, "lesson");
    row.lesson_id = Set(Some(lesson.id));
    let saved = row.insert(&db).await.expect("insert content");
    assert_eq!(saved.kind, "lesson");
    assert_eq!(saved.lesson_id, Some(lesson.id));
    assert_eq!(saved.quiz_id, None);
}

#[tokio::test]
async fn quiz_content_with_quiz_reference_saves() {
    let db = setup().await;
    let (course, _lesson, quiz) = fixture(&db).await;

    let mut row = content(course.id, "quiz");
    row.quiz_id = Set(Some(quiz.id));
    let saved = row.insert(&db).await.expect("insert content");
    assert_eq!(saved.quiz_id, Some(quiz.id));
}

#[tokio::test]
async fn lesson_content_without_lesson_is_rejected() {
    let db = setup().await;
    let (course, _lesson, _quiz) = fixture(&db).await;

    let err = content(course.id, "lesson")
        .insert(&db)
        .await
        .expect_err("must be rejected");
    assert!(err
        .to_string()
        .contains("must reference a lesson and no quiz"));
}

#[tokio::test]
async fn lesson_content_with_quiz_reference_is_rejected() {
    let db = setup().await;
    let (course, lesson, quiz) = fixture(&db).await;

    let mut row = content(course.id, "lesson");
    row.lesson_id = Set(Some(lesson.id));
    row.quiz_id = Set(Some(quiz.id));
    let err = row.insert(&db).await.expect_err("must be rejected");
    assert!(err
        .to_string()
        .contains("must reference a lesson and no quiz"));
}

#[tokio::test]
async fn quiz_content_without_quiz_is_rejected() {
    let db = setup().await;
    let (course, _lesson, _quiz) = fixture(&db).await;

    let err = content(course.id, "quiz")
        .insert(&db)
        .await
        .expect_err("must be rejected");
    assert!(err.to_string().contains("must reference a quiz and no lesson"));
}

#[tokio::test]
async fn quiz_content_with_lesson_reference_is_rejected() {
    let db = setup().await;
    let (course, lesson, _quiz) = fixture(&db).await;

    let mut row = content(course.id, "quiz");
    row.lesson_id = Set(Some(lesson.id));
    let err = row.insert(&db).await.expect_err("must be rejected");
    assert!(err.to_string().contains("must reference a quiz and no lesson"));
}

#[tokio::test]
async fn unknown_kind_is_rejected() {
    let db = setup().await;
    let (course, lesson, _quiz) = fixture(&db).await;

    let mut row = content(course.id, "video");
    row.lesson_id = Set(Some(lesson.id));
    let err = row.insert(&db).await.expect_err("must be rejected");
    assert!(err.to_string().contains("Invalid content kind 'video'"));
}

#[tokio::test]
async fn switching_kind_on_update_is_checked_too() {
    let db = setup().await;
    let (course, lesson, _quiz) = fixture(&db).await;

    let mut row = content(course.id, "lesson");
    row.lesson_id = Set(Some(lesson.id));
    let saved = row.insert(&db).await.expect("insert content");

    // Flipping the kind without swapping the reference must fail.
    let mut active: course_content::ActiveModel = saved.into();
    active.kind = Set("quiz".to_string());
    let err = active.update(&db).await.expect_err("must be rejected");
    assert!(err.to_string().contains("must reference a quiz and no lesson"));
}
