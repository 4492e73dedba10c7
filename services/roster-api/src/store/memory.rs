//! In-memory implementation of the record store.
//!
//! # Purpose
//! Implements `PeopleStore` with a `BTreeMap` guarded by a
//! `tokio::sync::RwLock`. Used for local development, tests, and deployments
//! that do not need durability.
//!
//! # Durability and consistency
//! - **Not durable**: all records are lost on restart.
//! - Writes hold the write lock for the whole mutate-then-read-back sequence,
//!   so callers always see the row they wrote.
//! - The id counter only grows; deleted ids are never handed out again.
use super::{PeopleStore, StoreConfig, StoreError, StoreResult};
use crate::model::PersonRecord;
use crate::observability::WRITES_METRIC;
use async_trait::async_trait;
use chrono::Utc;
use roster_common::PersonInput;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug)]
struct PeopleTable {
    /// Last id handed out. Starts at 0 so the first record gets id 1.
    last_id: i64,
    rows: BTreeMap<i64, PersonRecord>,
}

impl PeopleTable {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

pub struct InMemoryStore {
    config: StoreConfig,
    table: Arc<RwLock<PeopleTable>>,
}

impl InMemoryStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            table: Arc::new(RwLock::new(PeopleTable {
                last_id: 0,
                rows: BTreeMap::new(),
            })),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

#[async_trait]
impl PeopleStore for InMemoryStore {
    async fn list_people(&self) -> StoreResult<Vec<PersonRecord>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .rev()
            .take(self.config.list_limit)
            .cloned()
            .collect())
    }

    async fn get_person(&self, id: i64) -> StoreResult<PersonRecord> {
        self.table
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("person".into()))
    }

    async fn create_person(&self, input: PersonInput) -> StoreResult<PersonRecord> {
        let fields = input.normalize()?;
        let mut table = self.table.write().await;
        let id = table.next_id();
        table
            .rows
            .insert(id, PersonRecord::new(id, fields, Utc::now()));
        let stored = table.rows.get(&id).cloned().ok_or_else(|| {
            StoreError::Unexpected(anyhow::anyhow!("row {id} missing after insert"))
        })?;
        metrics::counter!(WRITES_METRIC, "op" => "created").increment(1);
        Ok(stored)
    }

    async fn update_person(&self, id: i64, input: PersonInput) -> StoreResult<PersonRecord> {
        let fields = input.normalize()?;
        let mut table = self.table.write().await;
        let row = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("person".into()))?;
        row.replace_fields(fields);
        let stored = row.clone();
        metrics::counter!(WRITES_METRIC, "op" => "updated").increment(1);
        Ok(stored)
    }

    async fn delete_person(&self, id: i64) -> StoreResult<u64> {
        let removed = u64::from(self.table.write().await.rows.remove(&id).is_some());
        metrics::counter!(WRITES_METRIC, "op" => "deleted").increment(removed);
        Ok(removed)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_common::FieldError;

    fn input(name: &str) -> PersonInput {
        PersonInput {
            name: Some(name.to_string()),
            ..PersonInput::default()
        }
    }

    #[tokio::test]
    async fn create_get_update_delete_roundtrip() {
        let store = InMemoryStore::default();
        let created = store.create_person(input("Ana")).await.expect("create");
        assert_eq!(created.id, 1);
        assert_eq!(store.get_person(1).await.expect("get"), created);

        let updated = store
            .update_person(
                1,
                PersonInput {
                    name: Some("Ana B".to_string()),
                    age: Some(31),
                    ..PersonInput::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.name, "Ana B");
        assert_eq!(updated.age, Some(31));
        assert_eq!(updated.email, None);
        assert_eq!(updated.created_at, created.created_at);

        assert_eq!(store.delete_person(1).await.expect("delete"), 1);
        assert_eq!(store.delete_person(1).await.expect("delete again"), 0);
        assert!(matches!(
            store.get_person(1).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_replaces_optional_fields_with_null() {
        let store = InMemoryStore::default();
        store
            .create_person(PersonInput {
                name: Some("Bob".to_string()),
                email: Some("bob@example.com".to_string()),
                age: Some(40),
                notes: Some("note".to_string()),
            })
            .await
            .expect("create");
        let updated = store.update_person(1, input("Bob")).await.expect("update");
        assert_eq!(updated.email, None);
        assert_eq!(updated.age, None);
        assert_eq!(updated.notes, None);
    }

    #[tokio::test]
    async fn invalid_input_leaves_table_unchanged() {
        let store = InMemoryStore::default();
        store.create_person(input("Ana")).await.expect("create");
        let err = store
            .create_person(PersonInput::default())
            .await
            .expect_err("missing name");
        assert!(matches!(err, StoreError::InvalidInput(FieldError::NameRequired)));
        let err = store.update_person(1, input("  ")).await.expect_err("blank");
        assert!(matches!(err, StoreError::InvalidInput(_)));
        let rows = store.list_people().await.expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Ana");
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found() {
        let store = InMemoryStore::default();
        let err = store.update_person(9, input("Ana")).await.expect_err("missing");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn ids_are_not_reused_and_list_is_capped_descending() {
        let store = InMemoryStore::new(StoreConfig { list_limit: 3 });
        for name in ["a", "b", "c", "d", "e"] {
            store.create_person(input(name)).await.expect("create");
        }
        store.delete_person(5).await.expect("delete");
        let next = store.create_person(input("f")).await.expect("create");
        assert_eq!(next.id, 6);

        let ids: Vec<i64> = store
            .list_people()
            .await
            .expect("list")
            .into_iter()
            .map(|row| row.id)
            .collect();
        assert_eq!(ids, vec![6, 4, 3]);
    }

    #[test]
    fn deletes_count_only_removed_rows() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        metrics::with_local_recorder(&recorder, || {
            runtime.block_on(async {
                let store = InMemoryStore::default();
                store.create_person(input("Ana")).await.expect("create");
                assert_eq!(store.delete_person(1).await.expect("delete"), 1);
                assert_eq!(store.delete_person(1).await.expect("again"), 0);
                assert_eq!(store.delete_person(9).await.expect("missing"), 0);
            })
        });
        let rendered = handle.render();
        assert!(rendered.contains(r#"roster_people_writes_total{op="deleted"} 1"#));
        assert!(rendered.contains(r#"roster_people_writes_total{op="created"} 1"#));
    }

    #[tokio::test]
    async fn backend_identity() {
        let store = InMemoryStore::default();
        store.health_check().await.expect("health");
        assert!(!store.is_durable());
        assert_eq!(store.backend_name(), "memory");
    }
}
