//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `pollcast_test`)
//!   `TEST_DB_PASSWORD` (default: `pollcast_test`)
//!   `TEST_DB_NAME` (default: `pollcast_test`)

#![allow(clippy::unwrap_used)]

use pollcast_db::entities::{block, distributed_poll, question, response, user};
use pollcast_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use serde_json::json;

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn database_connection_works() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn database_cleanup_truncates_tables() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let result = db.cleanup().await;
    assert!(result.is_ok(), "Cleanup failed: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn survey_delete_cascades_to_responses() {
    let db = TestDatabase::create_unique().await.expect("create db");
    pollcast_db::migrate(db.connection()).await.expect("migrate");
    let conn = db.connection();

    let survey = distributed_poll::ActiveModel {
        id: Set("dp1".to_string()),
        name: Set("cascade test".to_string()),
    }
    .insert(conn)
    .await
    .unwrap();

    let block = block::ActiveModel {
        id: Set("b1".to_string()),
        distributed_poll_id: Set(survey.id.clone()),
        name: Set("Block".to_string()),
        position: Set(0),
    }
    .insert(conn)
    .await
    .unwrap();

    let question = question::ActiveModel {
        id: Set("qqqqqqqq".to_string()),
        block_id: Set(block.id.clone()),
        question: Set("Pick one".to_string()),
        options: Set(json!(["Left", "Right"])),
        position: Set(0),
    }
    .insert(conn)
    .await
    .unwrap();

    let voter = user::ActiveModel {
        id: Set("U1".to_string()),
        name: Set("ada".to_string()),
    }
    .insert(conn)
    .await
    .unwrap();

    response::ActiveModel {
        id: Set("r1".to_string()),
        question_id: Set(question.id.clone()),
        option: Set(0),
        user_id: Set(voter.id.clone()),
    }
    .insert(conn)
    .await
    .unwrap();

    distributed_poll::Entity::delete_by_id(survey.id.clone())
        .exec(conn)
        .await
        .unwrap();

    assert_eq!(block::Entity::find().count(conn).await.unwrap(), 0);
    assert_eq!(question::Entity::find().count(conn).await.unwrap(), 0);
    assert_eq!(response::Entity::find().count(conn).await.unwrap(), 0);
    // Users are shared and survive survey deletion.
    assert_eq!(user::Entity::find().count(conn).await.unwrap(), 1);

    db.drop_database().await.unwrap();
}

#[test]
fn config_defaults_are_valid() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(config.database_url().starts_with("postgres://"));
}
