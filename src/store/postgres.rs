//! PostgreSQL-backed store. The `pessoas` table is the single source of truth.

use super::PersonStore;
use crate::error::StoreError;
use crate::model::{Person, PersonId};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS pessoas (
        id BIGSERIAL PRIMARY KEY,
        nome VARCHAR(255) NOT NULL
    )
"#;

const SELECT_ALL: &str = "SELECT id, nome FROM pessoas ORDER BY id";
const SELECT_ONE: &str = "SELECT id, nome FROM pessoas WHERE id = $1";
const INSERT: &str = "INSERT INTO pessoas (nome) VALUES ($1) RETURNING id";
const UPDATE: &str = "UPDATE pessoas SET nome = $1 WHERE id = $2 RETURNING id, nome";
const DELETE: &str = "DELETE FROM pessoas WHERE id = $1";

const MISSING_DATABASE: &str = "3D000";

type PersonRow = (i64, String);

fn from_row((id, nome): PersonRow) -> Person {
    Person::new(PersonId::new(id), nome)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool. Call [`PgStore::ensure_schema`] before serving.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool on `database_url` and ensures the table. The server's
    /// `postgres` database is only contacted when the target database does not
    /// exist yet, to create it.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = || PgPoolOptions::new().max_connections(max_connections);
        let pool = match options().connect(database_url).await {
            Ok(pool) => pool,
            Err(e) if is_missing_database(&e) => {
                tracing::info!("target database does not exist; creating it");
                ensure_database_exists(database_url).await?;
                options().connect(database_url).await?
            }
            Err(e) => return Err(e.into()),
        };
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        tracing::debug!(sql = %CREATE_TABLE.trim(), "query");
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl PersonStore for PgStore {
    async fn list(&self) -> Result<Vec<Person>, StoreError> {
        tracing::debug!(sql = %SELECT_ALL, "query");
        let rows: Vec<PersonRow> = sqlx::query_as(SELECT_ALL).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn get(&self, id: PersonId) -> Result<Option<Person>, StoreError> {
        tracing::debug!(sql = %SELECT_ONE, id = %id, "query");
        let row: Option<PersonRow> = sqlx::query_as(SELECT_ONE)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(from_row))
    }

    async fn create(&self, name: &str) -> Result<Person, StoreError> {
        tracing::debug!(sql = %INSERT, "query");
        let id: i64 = sqlx::query_scalar(INSERT)
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(Person::new(PersonId::new(id), name))
    }

    async fn update(&self, id: PersonId, name: &str) -> Result<Option<Person>, StoreError> {
        tracing::debug!(sql = %UPDATE, id = %id, "query");
        let row: Option<PersonRow> = sqlx::query_as(UPDATE)
            .bind(name)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(from_row))
    }

    async fn delete(&self, id: PersonId) -> Result<bool, StoreError> {
        tracing::debug!(sql = %DELETE, id = %id, "query");
        let result = sqlx::query(DELETE).bind(id.get()).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// SQLSTATE 3D000 (invalid_catalog_name): the database named in the URL does not exist.
fn is_missing_database(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(MISSING_DATABASE),
        _ => false,
    }
}

/// Connects to the server's `postgres` database and creates the database named
/// in `database_url` when it does not exist yet.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = PgConnectOptions::from_str(&admin_url).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        // CREATE DATABASE takes no bind parameters; the name is quoted as an identifier.
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let scheme_end = url
        .find("://")
        .ok_or_else(|| StoreError::InvalidUrl("missing scheme".into()))?
        + 3;
    let path_start = match url[scheme_end..].find('/') {
        Some(i) => scheme_end + i + 1,
        None => return Ok((url.to_string(), String::new())),
    };
    let (base, path_and_query) = url.split_at(path_start);
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim().to_string();
    let admin_url = match parts.next() {
        Some(query) => format!("{}postgres?{}", base, query),
        None => format!("{}postgres", base),
    };
    Ok((admin_url, db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
