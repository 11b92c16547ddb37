//! PostgreSQL store tests. They need a reachable server:
//! `DATABASE_URL=postgres://... cargo test --test pg_store -- --ignored`

use std::sync::Arc;

use contacts_api::store::{ensure_contacts_table, ContactStore, PgContactStore, CONTACTS_TABLE};
use contacts_api::{AppError, ContactPatch, NewContact};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

async fn store() -> Result<(PgPool, PgContactStore), String> {
    let url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .map_err(|err| format!("connect: {err}"))?;
    ensure_contacts_table(&pool)
        .await
        .map_err(|err| format!("ensure table: {err}"))?;
    sqlx::query(&format!("TRUNCATE {} RESTART IDENTITY", CONTACTS_TABLE))
        .execute(&pool)
        .await
        .map_err(|err| format!("truncate: {err}"))?;
    Ok((pool.clone(), PgContactStore::new(pool)))
}

fn contact(email: &str) -> NewContact {
    NewContact {
        name: "Test User".into(),
        email: email.into(),
        phone: "1234567890".into(),
        address: None,
    }
}

// One test drives every case so runs never race on the shared table.
#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn pg_store_semantics() -> Result<(), String> {
    let (pool, store) = store().await?;

    let a = store.insert(&contact("a@example.com")).await.map_err(|e| e.to_string())?;
    let b = store.insert(&contact("b@example.com")).await.map_err(|e| e.to_string())?;
    assert!(b.id > a.id);
    assert_eq!(store.get(a.id).await.map_err(|e| e.to_string())?, Some(a.clone()));

    let dup = store.insert(&contact("a@example.com")).await;
    assert!(matches!(dup, Err(AppError::Conflict(_))));

    let own = store
        .replace(a.id, &contact("a@example.com"))
        .await
        .map_err(|e| e.to_string())?;
    assert!(own.is_some());
    let steal = store.replace(a.id, &contact("b@example.com")).await;
    assert!(matches!(steal, Err(AppError::Conflict(_))));

    let patch = ContactPatch {
        address: Some(Some("5 Birch Ln".into())),
        ..ContactPatch::default()
    };
    let patched = store.patch(b.id, &patch).await.map_err(|e| e.to_string())?;
    assert_eq!(patched.and_then(|c| c.address).as_deref(), Some("5 Birch Ln"));

    let page = store.list(1, 10).await.map_err(|e| e.to_string())?;
    assert_eq!(page.iter().map(|c| c.id).collect::<Vec<_>>(), [b.id]);

    assert_eq!(store.delete(a.id).await.map_err(|e| e.to_string())?.map(|c| c.id), Some(a.id));
    assert_eq!(store.delete(a.id).await.map_err(|e| e.to_string())?, None);
    assert_eq!(store.replace(a.id, &contact("z@example.com")).await.map_err(|e| e.to_string())?, None);

    concurrent_duplicate_creates_admit_one(Arc::new(store)).await?;
    legacy_table_with_shared_emails_fails_startup(pool).await
}

// A table created without the constraint, already holding a shared email,
// must stop startup instead of serving without uniqueness.
async fn legacy_table_with_shared_emails_fails_startup(pool: PgPool) -> Result<(), String> {
    let run = |sql: String| {
        let pool = pool.clone();
        async move { sqlx::query(&sql).execute(&pool).await.map(|_| ()).map_err(|e| e.to_string()) }
    };
    run(format!("DROP TABLE {}", CONTACTS_TABLE)).await?;
    run(format!(
        "CREATE TABLE {} (id BIGSERIAL PRIMARY KEY, name VARCHAR(100) NOT NULL, \
         email VARCHAR(254) NOT NULL, phone VARCHAR(16) NOT NULL, address VARCHAR(255))",
        CONTACTS_TABLE
    ))
    .await?;
    run(format!(
        "INSERT INTO {} (name, email, phone) VALUES ('A', 'dup@example.com', '1234567890'), \
         ('B', 'dup@example.com', '1234567890')",
        CONTACTS_TABLE
    ))
    .await?;

    let result = ensure_contacts_table(&pool).await;
    run(format!("DROP TABLE {}", CONTACTS_TABLE)).await?;
    assert!(matches!(result, Err(AppError::Db(_))));
    Ok(())
}

async fn concurrent_duplicate_creates_admit_one(store: Arc<PgContactStore>) -> Result<(), String> {
    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move { store.insert(&contact("race@example.com")).await }));
    }
    let mut created = 0;
    for handle in handles {
        match handle.await.map_err(|e| e.to_string())? {
            Ok(_) => created += 1,
            Err(AppError::Conflict(_)) => {}
            Err(other) => return Err(other.to_string()),
        }
    }
    assert_eq!(created, 1);
    Ok(())
}
