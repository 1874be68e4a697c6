//! Store properties against a live PostgreSQL. Ignored by default; run with
//! `TEST_DATABASE_URL=postgres://... cargo test -- --ignored`. The role in the URL
//! must be a superuser for the startup tests that create roles and databases.
//! Assertions only look at rows created by each test, so tests may share a database.

use pessoas_api::{PersonId, PersonStore, PgStore};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

fn database_url() -> String {
    std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set for postgres tests")
}

async fn store() -> PgStore {
    PgStore::connect(&database_url(), 8).await.expect("connect to TEST_DATABASE_URL")
}

async fn admin_pool() -> PgPool {
    PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url())
        .await
        .expect("connect to TEST_DATABASE_URL")
}

fn unique_suffix() -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().subsec_nanos();
    format!("{}_{}", std::process::id(), nanos)
}

/// Same host and port as `TEST_DATABASE_URL`, different credentials and database.
fn url_for(user: &str, password: &str, database: &str) -> String {
    let opts = PgConnectOptions::from_str(&database_url()).expect("parse TEST_DATABASE_URL");
    format!(
        "postgres://{}:{}@{}:{}/{}",
        user,
        password,
        opts.get_host(),
        opts.get_port(),
        database
    )
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn create_get_update_delete() {
    let store = store().await;

    let created = store.create("Jean").await.unwrap();
    let fetched = store.get(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let other = store.create("Maria").await.unwrap();
    let updated = store.update(created.id, "Jean B.").await.unwrap().unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Jean B.");
    assert_eq!(store.get(other.id).await.unwrap().unwrap(), other);

    assert!(store.delete(created.id).await.unwrap());
    assert!(store.get(created.id).await.unwrap().is_none());
    assert!(!store.delete(created.id).await.unwrap());
    assert!(store.delete(other.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn list_contains_created_rows_in_id_order() {
    let store = store().await;

    let mut ids = Vec::new();
    for name in ["a", "b", "c"] {
        ids.push(store.create(name).await.unwrap().id);
    }
    let listed: Vec<PersonId> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .filter(|id| ids.contains(id))
        .collect();
    assert_eq!(listed, ids);
    for id in ids {
        store.delete(id).await.unwrap();
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn missing_ids_report_absence() {
    let store = store().await;

    let missing = PersonId::new(i64::MAX);
    assert!(store.get(missing).await.unwrap().is_none());
    assert!(store.update(missing, "x").await.unwrap().is_none());
    assert!(!store.delete(missing).await.unwrap());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn concurrent_creates_get_distinct_ids() {
    let store = store().await;
    let store = Arc::new(store);

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.create(&format!("p{}", i)).await.unwrap().id
        }));
    }
    let mut ids = HashSet::new();
    for h in handles {
        assert!(ids.insert(h.await.unwrap()));
    }
    for id in ids {
        store.delete(id).await.unwrap();
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn schema_setup_is_idempotent() {
    let store = store().await;
    store.ensure_schema().await.unwrap();
    store.ping().await.unwrap();
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn connect_creates_a_missing_database() {
    let admin = admin_pool().await;
    let db_name = format!("pessoas_created_{}", unique_suffix());
    let base = database_url();
    let (server, _) = base.rsplit_once('/').expect("TEST_DATABASE_URL has a database path");
    let url = format!("{}/{}", server, db_name);

    let outcome = match PgStore::connect(&url, 2).await {
        Ok(store) => store.create("Jean").await.map(|_| ()).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", db_name))
        .execute(&admin)
        .await
        .unwrap();
    outcome.unwrap();
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn connect_does_not_need_the_admin_database() {
    let admin = admin_pool().await;
    let suffix = unique_suffix();
    let role = format!("pessoas_app_{}", suffix);
    let db_name = format!("pessoas_owned_{}", suffix);

    sqlx::query(&format!("CREATE ROLE \"{}\" LOGIN PASSWORD 'pessoas'", role))
        .execute(&admin)
        .await
        .unwrap();
    sqlx::query(&format!("CREATE DATABASE \"{}\" OWNER \"{}\"", db_name, role))
        .execute(&admin)
        .await
        .unwrap();
    sqlx::query("REVOKE CONNECT ON DATABASE postgres FROM PUBLIC")
        .execute(&admin)
        .await
        .unwrap();

    let outcome = match PgStore::connect(&url_for(&role, "pessoas", &db_name), 2).await {
        Ok(store) => async {
            let created = store.create("Jean").await?;
            store.get(created.id).await
        }
        .await
        .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    sqlx::query("GRANT CONNECT ON DATABASE postgres TO PUBLIC")
        .execute(&admin)
        .await
        .unwrap();
    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", db_name))
        .execute(&admin)
        .await
        .unwrap();
    sqlx::query(&format!("DROP ROLE IF EXISTS \"{}\"", role))
        .execute(&admin)
        .await
        .unwrap();

    let fetched = outcome.expect("connect without CONNECT on the postgres database");
    assert_eq!(fetched.map(|p| p.name).as_deref(), Some("Jean"));
}
