//! Integration tests for the user repository using in-memory SurrealDB.

use stockroom_core::error::StockroomError;
use stockroom_core::models::user::CreateUser;
use stockroom_core::repository::UserRepository;
use stockroom_db::SurrealUserRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn setup() -> SurrealUserRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    stockroom_db::run_migrations(&db).await.unwrap();
    SurrealUserRepository::new(db)
}

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.into(),
        display_name: email.split('@').next().unwrap_or_default().into(),
    }
}

#[tokio::test]
async fn create_assigns_sequential_ids() {
    let repo = setup().await;

    let ana = repo.create(new_user("ana@example.com")).await.unwrap();
    let ben = repo.create(new_user("ben@example.com")).await.unwrap();

    assert_eq!(ana.id, 1);
    assert_eq!(ben.id, 2);
    assert_eq!(ana.email, "ana@example.com");
    assert_eq!(ana.display_name, "ana");
}

#[tokio::test]
async fn get_by_id_round_trips() {
    let repo = setup().await;
    let created = repo.create(new_user("ana@example.com")).await.unwrap();

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.email, created.email);
}

#[tokio::test]
async fn get_missing_user_is_not_found() {
    let repo = setup().await;
    let err = repo.get_by_id(42).await.unwrap_err();
    assert!(matches!(
        err,
        StockroomError::NotFound { ref entity, ref id } if entity == "user" && id == "42"
    ));
}

#[tokio::test]
async fn find_id_by_email() {
    let repo = setup().await;
    let ana = repo.create(new_user("ana@example.com")).await.unwrap();

    assert_eq!(
        repo.find_id_by_email("ana@example.com").await.unwrap(),
        Some(ana.id)
    );
    assert_eq!(repo.find_id_by_email("nobody@example.com").await.unwrap(), None);
}

#[tokio::test]
async fn duplicate_email_is_a_database_error() {
    let repo = setup().await;
    repo.create(new_user("ana@example.com")).await.unwrap();

    let err = repo.create(new_user("ana@example.com")).await.unwrap_err();
    assert!(matches!(err, StockroomError::Database(_)));
}
