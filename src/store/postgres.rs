//! PostgreSQL-backed contact store, plus database and table bootstrap DDL.

use super::{duplicate_email, ContactStore};
use crate::error::AppError;
use crate::model::{Contact, ContactPatch, NewContact};
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, Connection, PgPool};

pub const CONTACTS_TABLE: &str = "contacts";

const COLUMNS: &str = "id, name, email, phone, address";

/// Create the contacts table if missing. `email` carries the UNIQUE constraint that
/// arbitrates concurrent writers; tables created before it existed get a unique index.
/// Fails when existing rows already share an email.
pub async fn ensure_contacts_table(pool: &PgPool) -> Result<(), AppError> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            email VARCHAR(254) NOT NULL UNIQUE,
            phone VARCHAR(16) NOT NULL,
            address VARCHAR(255)
        )
        "#,
        CONTACTS_TABLE
    );
    sqlx::query(&ddl).execute(pool).await?;

    let index = format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {table}_email_key ON {table} (email)",
        table = CONTACTS_TABLE
    );
    sqlx::query(&index).execute(pool).await?;
    Ok(())
}

/// Ensure the database named in `options` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(options: &PgConnectOptions) -> Result<(), AppError> {
    let db_name = match options.get_database() {
        Some(name) if !name.is_empty() && name != "postgres" => name.to_string(),
        _ => return Ok(()),
    };
    let mut conn = options.clone().database("postgres").connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    conn.close().await?;
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Map a write failure: a unique violation is the duplicate-email conflict, anything else a storage fault.
fn write_error(err: sqlx::Error, email: &str) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return duplicate_email(email);
        }
    }
    AppError::Db(err)
}

#[derive(Clone)]
pub struct PgContactStore {
    pool: PgPool,
}

impl PgContactStore {
    pub fn new(pool: PgPool) -> Self {
        PgContactStore { pool }
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn get(&self, id: i64) -> Result<Option<Contact>, AppError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, CONTACTS_TABLE);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Contact>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id LIMIT $1 OFFSET $2",
            COLUMNS, CONTACTS_TABLE
        );
        tracing::debug!(sql = %sql, skip, limit, "query");
        let rows = sqlx::query_as::<_, Contact>(&sql)
            .bind(i64::from(limit))
            .bind(i64::from(skip))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, contact: &NewContact) -> Result<Contact, AppError> {
        let sql = format!(
            "INSERT INTO {} (name, email, phone, address) VALUES ($1, $2, $3, $4) RETURNING {}",
            CONTACTS_TABLE, COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        sqlx::query_as::<_, Contact>(&sql)
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(&contact.address)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(e, &contact.email))
    }

    async fn replace(&self, id: i64, contact: &NewContact) -> Result<Option<Contact>, AppError> {
        let sql = format!(
            "UPDATE {} SET name = $2, email = $3, phone = $4, address = $5 WHERE id = $1 RETURNING {}",
            CONTACTS_TABLE, COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(&contact.address)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(e, &contact.email))
    }

    async fn patch(&self, id: i64, patch: &ContactPatch) -> Result<Option<Contact>, AppError> {
        let sql = format!(
            r#"
            UPDATE {} SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                address = CASE WHEN $5 THEN $6 ELSE address END
            WHERE id = $1
            RETURNING {}
            "#,
            CONTACTS_TABLE, COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let (set_address, address) = match &patch.address {
            Some(address) => (true, address.clone()),
            None => (false, None),
        };
        sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.email)
            .bind(&patch.phone)
            .bind(set_address)
            .bind(address)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(e, patch.email.as_deref().unwrap_or_default()))
    }

    async fn delete(&self, id: i64) -> Result<Option<Contact>, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING {}", CONTACTS_TABLE, COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
