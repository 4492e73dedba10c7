//! SQLite-backed implementation of the record store.
//!
//! # What this module is
//! Implements `PeopleStore` on a single `people` table through an `sqlx`
//! SQLite pool. This is the durable backend used by default.
//!
//! # Key invariants
//! - `id` is `INTEGER PRIMARY KEY AUTOINCREMENT`, so SQLite never reuses the
//!   id of a deleted row.
//! - Create and update re-read the row after writing and return what the
//!   table holds, not what the caller sent.
//! - `created_at` is written once on insert and never touched by update.
//!
//! # Concurrency model
//! SQLite serializes writers with its own file locking; the pool only bounds
//! the number of open connections. The write-then-read-back pair is two
//! statements and is not atomic against other writers sharing the file.
//!
//! # Operational notes
//! - Migrations run at connect time via `sqlx::migrate!("./migrations")`.
//! - `sqlite::memory:` databases live inside a single connection, so the pool
//!   is pinned to one connection that never expires.
use super::{PeopleStore, StoreConfig, StoreError, StoreResult};
use crate::config::SqliteConfig;
use crate::model::PersonRecord;
use crate::observability::WRITES_METRIC;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roster_common::PersonInput;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;

/// Durable record store backed by SQLite.
///
/// # Example
/// ```rust,no_run
/// use roster_api::config::SqliteConfig;
/// use roster_api::store::{StoreConfig, sqlite::SqliteStore};
///
/// async fn open() {
///     let sqlite = SqliteConfig {
///         url: "sqlite://data.sqlite".to_string(),
///         max_connections: 4,
///     };
///     let _ = SqliteStore::connect(&sqlite, StoreConfig::default()).await;
/// }
/// ```
pub struct SqliteStore {
    pool: SqlitePool,
    config: StoreConfig,
}

/// Row shape for the `people` table.
#[derive(Debug, Clone, FromRow)]
struct DbPerson {
    id: i64,
    name: String,
    email: Option<String>,
    age: Option<i64>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<DbPerson> for PersonRecord {
    fn from(row: DbPerson) -> Self {
        PersonRecord {
            id: row.id,
            name: row.name,
            email: row.email,
            age: row.age,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

impl SqliteStore {
    /// Open (creating if needed) the database and apply migrations.
    ///
    /// # Errors
    /// - Invalid URL, connection failures, or migration failures.
    pub async fn connect(sqlite: &SqliteConfig, config: StoreConfig) -> StoreResult<Self> {
        let connect_options = SqliteConnectOptions::from_str(&sqlite.url)?.create_if_missing(true);
        let pool_options = if is_memory_url(&sqlite.url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(sqlite.max_connections.max(1))
        };
        let pool = pool_options.connect_with(connect_options).await?;

        // The schema must exist before any handler runs.
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(backend = "sqlite", "record store ready");

        Ok(Self { pool, config })
    }

    async fn fetch_person(&self, id: i64) -> StoreResult<Option<PersonRecord>> {
        let row = sqlx::query_as::<_, DbPerson>(
            r#"SELECT id, name, email, age, notes, created_at FROM people WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(PersonRecord::from))
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[async_trait]
impl PeopleStore for SqliteStore {
    async fn list_people(&self) -> StoreResult<Vec<PersonRecord>> {
        let rows = sqlx::query_as::<_, DbPerson>(
            r#"SELECT id, name, email, age, notes, created_at FROM people ORDER BY id DESC LIMIT ?"#,
        )
        .bind(self.config.list_limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(PersonRecord::from).collect())
    }

    async fn get_person(&self, id: i64) -> StoreResult<PersonRecord> {
        self.fetch_person(id)
            .await?
            .ok_or_else(|| StoreError::NotFound("person".into()))
    }

    async fn create_person(&self, input: PersonInput) -> StoreResult<PersonRecord> {
        let fields = input.normalize()?;
        let result = sqlx::query(
            r#"INSERT INTO people (name, email, age, notes, created_at) VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(fields.age)
        .bind(&fields.notes)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        let id = result.last_insert_rowid();
        metrics::counter!(WRITES_METRIC, "op" => "created").increment(1);
        self.fetch_person(id).await?.ok_or_else(|| {
            StoreError::Unexpected(anyhow::anyhow!("row {id} missing after insert"))
        })
    }

    async fn update_person(&self, id: i64, input: PersonInput) -> StoreResult<PersonRecord> {
        let fields = input.normalize()?;
        let result =
            sqlx::query(r#"UPDATE people SET name = ?, email = ?, age = ?, notes = ? WHERE id = ?"#)
                .bind(&fields.name)
                .bind(&fields.email)
                .bind(fields.age)
                .bind(&fields.notes)
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("person".into()));
        }
        metrics::counter!(WRITES_METRIC, "op" => "updated").increment(1);
        // A concurrent delete between the two statements surfaces as not found.
        self.get_person(id).await
    }

    async fn delete_person(&self, id: i64) -> StoreResult<u64> {
        let result = sqlx::query(r#"DELETE FROM people WHERE id = ?"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        let deleted = result.rows_affected();
        metrics::counter!(WRITES_METRIC, "op" => "deleted").increment(deleted);
        Ok(deleted)
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_common::FieldError;

    async fn memory_store(list_limit: usize) -> SqliteStore {
        SqliteStore::connect(
            &SqliteConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 4,
            },
            StoreConfig { list_limit },
        )
        .await
        .expect("connect")
    }

    fn input(name: &str) -> PersonInput {
        PersonInput {
            name: Some(name.to_string()),
            ..PersonInput::default()
        }
    }

    #[test]
    fn deletes_count_only_removed_rows() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        metrics::with_local_recorder(&recorder, || {
            runtime.block_on(async {
                let store = memory_store(1000).await;
                store.create_person(input("Ana")).await.expect("create");
                assert_eq!(store.delete_person(1).await.expect("delete"), 1);
                assert_eq!(store.delete_person(1).await.expect("again"), 0);
            })
        });
        let rendered = handle.render();
        assert!(rendered.contains(r#"roster_people_writes_total{op="deleted"} 1"#));
    }

    #[test]
    fn memory_urls_are_detected() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://file.db?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite://data.sqlite"));
    }

    #[tokio::test]
    async fn create_reads_back_normalized_row() {
        let store = memory_store(1000).await;
        let created = store
            .create_person(PersonInput {
                name: Some(" Ana ".to_string()),
                email: Some("".to_string()),
                age: Some(30),
                notes: None,
            })
            .await
            .expect("create");
        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Ana");
        assert_eq!(created.email, None);
        assert_eq!(created.age, Some(30));
        assert_eq!(store.get_person(1).await.expect("get"), created);
    }

    #[tokio::test]
    async fn update_is_full_replace_and_keeps_created_at() {
        let store = memory_store(1000).await;
        let created = store
            .create_person(PersonInput {
                name: Some("Ana".to_string()),
                email: Some("ana@example.com".to_string()),
                age: None,
                notes: Some("first".to_string()),
            })
            .await
            .expect("create");
        let updated = store
            .update_person(
                created.id,
                PersonInput {
                    name: Some("Ana B".to_string()),
                    age: Some(31),
                    ..PersonInput::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.name, "Ana B");
        assert_eq!(updated.email, None);
        assert_eq!(updated.age, Some(31));
        assert_eq!(updated.notes, None);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_and_get_missing_are_not_found() {
        let store = memory_store(1000).await;
        assert!(matches!(
            store.update_person(42, input("Ana")).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.get_person(42).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn invalid_name_is_rejected_without_mutation() {
        let store = memory_store(1000).await;
        let err = store
            .create_person(input(""))
            .await
            .expect_err("empty name");
        assert!(matches!(err, StoreError::InvalidInput(FieldError::NameRequired)));
        assert!(store.list_people().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn delete_counts_and_ids_are_not_reused() {
        let store = memory_store(1000).await;
        store.create_person(input("a")).await.expect("a");
        store.create_person(input("b")).await.expect("b");
        assert_eq!(store.delete_person(2).await.expect("delete"), 1);
        assert_eq!(store.delete_person(2).await.expect("delete again"), 0);
        assert_eq!(store.delete_person(99).await.expect("never existed"), 0);
        let next = store.create_person(input("c")).await.expect("c");
        assert_eq!(next.id, 3);
    }

    #[tokio::test]
    async fn list_is_descending_and_capped() {
        let store = memory_store(2).await;
        for name in ["a", "b", "c"] {
            store.create_person(input(name)).await.expect("create");
        }
        let names: Vec<String> = store
            .list_people()
            .await
            .expect("list")
            .into_iter()
            .map(|row| row.name)
            .collect();
        assert_eq!(names, vec!["c".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn file_database_survives_reconnect() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("people.sqlite");
        let sqlite = SqliteConfig {
            url: format!("sqlite://{}", path.display()),
            max_connections: 2,
        };
        {
            let store = SqliteStore::connect(&sqlite, StoreConfig::default())
                .await
                .expect("connect");
            store.create_person(input("Ana")).await.expect("create");
            store.pool.close().await;
        }
        let store = SqliteStore::connect(&sqlite, StoreConfig::default())
            .await
            .expect("reconnect");
        let rows = store.list_people().await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Ana");
        store.health_check().await.expect("health");
        assert!(store.is_durable());
        assert_eq!(store.backend_name(), "sqlite");
    }
}
