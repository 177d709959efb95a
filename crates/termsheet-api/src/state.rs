//! # Application State
//!
//! Shared state for the Axum application: the authoritative in-memory record
//! store, the optional Postgres pool backing it, and runtime configuration.
//!
//! ## Persistence model
//!
//! The in-memory [`TermSheetStore`] serves every read. When a database pool
//! is configured, handlers write the row first and publish the record to the
//! store only after the write succeeds, so a failed write leaves no trace.
//! On startup [`AppState::hydrate_from_db`] loads persisted rows and seeds
//! the id allocator past the highest stored id.
//!
//! Writers hold [`AppState::begin_write`] across the database write and the
//! in-memory publish, so the store always reflects the order rows committed.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use sqlx::PgPool;
use termsheet_core::{
    CompositeValue, FinancialRatio, NamesList, PercentageCondition, PercentageMultiple,
    TermSheetFields, TermSheetStatus,
};
use utoipa::ToSchema;

// -- Records ------------------------------------------------------------------

/// A stored term sheet record as returned by the API.
///
/// Unset scalars serialize as `null`; unset slots are omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TermSheetRecord {
    /// Server-assigned identifier.
    pub id: i64,
    pub boolean_value: Option<bool>,
    /// One of `Yes`, `Partial`, `No`, `N/A`, `Not stated in Term Sheet`.
    #[schema(value_type = Option<String>)]
    pub term_sheet_status: Option<TermSheetStatus>,
    pub numeric_value: Option<f64>,
    pub date_value: Option<NaiveDate>,
    /// Tags: `number`, `greater_of`, `no_minimum`, `no_pik`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub composite_value: Option<CompositeValue>,
    /// Tags: `percentage`, `no_cash_requirement`, `not_stated`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub percentage_multiple: Option<PercentageMultiple>,
    /// Tags: `names_list`, `na`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub names_list: Option<NamesList>,
    /// Tags: `first_lien`, `senior_secured`, `secured`, `total_net`,
    /// `fixed_charge`, `interest_coverage`, `no_covenant`, `not_stated`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub financial_ratio: Option<FinancialRatio>,
    /// Tags: `with_leverage_test`, `no_leverage_test`, `basket_no_component`,
    /// `no_basket`, `not_stated`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub percentage_condition: Option<PercentageCondition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TermSheetRecord {
    /// Build a freshly created record.
    pub fn new(id: i64, fields: TermSheetFields, now: DateTime<Utc>) -> Self {
        let TermSheetFields {
            boolean_value,
            term_sheet_status,
            numeric_value,
            date_value,
            composite_value,
            percentage_multiple,
            names_list,
            financial_ratio,
            percentage_condition,
        } = fields;
        Self {
            id,
            boolean_value,
            term_sheet_status,
            numeric_value,
            date_value,
            composite_value,
            percentage_multiple,
            names_list,
            financial_ratio,
            percentage_condition,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full replacement: every field comes from `fields`, keeping only the
    /// id and creation time.
    pub fn replaced_with(&self, fields: TermSheetFields, now: DateTime<Utc>) -> Self {
        Self {
            created_at: self.created_at,
            ..Self::new(self.id, fields, now)
        }
    }
}

// -- Store --------------------------------------------------------------------

/// Thread-safe in-memory record store, ordered by id.
///
/// Ids are allocated monotonically and never reused, so id order is
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct TermSheetStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Debug, Default)]
struct StoreInner {
    records: BTreeMap<i64, TermSheetRecord>,
    last_id: i64,
}

impl TermSheetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next record id.
    pub fn allocate_id(&self) -> i64 {
        let mut inner = self.inner.write();
        inner.last_id += 1;
        inner.last_id
    }

    /// Load persisted records, advancing the allocator past the highest id.
    pub fn seed(&self, records: Vec<TermSheetRecord>) {
        let mut inner = self.inner.write();
        for record in records {
            inner.last_id = inner.last_id.max(record.id);
            inner.records.insert(record.id, record);
        }
    }

    /// Publish a newly created record.
    pub fn insert(&self, record: TermSheetRecord) {
        let mut inner = self.inner.write();
        inner.last_id = inner.last_id.max(record.id);
        inner.records.insert(record.id, record);
    }

    pub fn get(&self, id: i64) -> Option<TermSheetRecord> {
        self.inner.read().records.get(&id).cloned()
    }

    /// A page of records in id order.
    pub fn list(&self, offset: usize, limit: usize) -> Vec<TermSheetRecord> {
        self.inner
            .read()
            .records
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Overwrite an existing record. Returns `false` if the id is gone.
    pub fn replace(&self, record: TermSheetRecord) -> bool {
        let mut inner = self.inner.write();
        match inner.records.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: i64) -> Option<TermSheetRecord> {
        self.inner.write().records.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// -- Configuration ------------------------------------------------------------

/// Runtime configuration, read from the environment.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind (`PORT`, default 8000).
    pub port: u16,
    /// Postgres connection string (`DATABASE_URL`). In-memory only when unset.
    pub database_url: Option<String>,
    /// Whether `/metrics` and the metrics middleware are mounted
    /// (`TERMSHEET_METRICS_ENABLED`, default on).
    pub metrics_enabled: bool,
}

/// Redacts the database URL, which usually embeds credentials.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("metrics_enabled", &self.metrics_enabled)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            database_url: None,
            metrics_enabled: true,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// An unparsable `PORT` falls back to the default with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(port = %raw, "invalid PORT, using {}", defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let metrics_enabled = lookup("TERMSHEET_METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(defaults.metrics_enabled);
        Self {
            port,
            database_url,
            metrics_enabled,
        }
    }
}

// -- Application state --------------------------------------------------------

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub records: TermSheetStore,
    /// Postgres pool for write-through persistence. `None` in in-memory mode.
    pub db_pool: Option<PgPool>,
    pub config: AppConfig,
    write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    /// In-memory state with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            records: TermSheetStore::new(),
            db_pool,
            config,
            write_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Serialize a mutation: existence check, row write, and store publish.
    pub async fn begin_write(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Load persisted records into the in-memory store.
    ///
    /// A no-op without a database pool.
    pub async fn hydrate_from_db(&self) -> Result<(), sqlx::Error> {
        let Some(pool) = &self.db_pool else {
            return Ok(());
        };
        let records = crate::db::financial_data::load_all(pool).await?;
        let count = records.len();
        self.records.seed(records);
        tracing::info!(records = count, "hydrated term sheet records from database");
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(id: i64) -> TermSheetRecord {
        TermSheetRecord::new(id, TermSheetFields::default(), Utc::now())
    }

    #[test]
    fn allocate_id_is_monotonic() {
        let store = TermSheetStore::new();
        assert_eq!(store.allocate_id(), 1);
        assert_eq!(store.allocate_id(), 2);
        assert_eq!(store.allocate_id(), 3);
    }

    #[test]
    fn seed_advances_allocator_past_max_id() {
        let store = TermSheetStore::new();
        store.seed(vec![record(4), record(17), record(9)]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.allocate_id(), 18);
    }

    #[test]
    fn list_pages_in_id_order() {
        let store = TermSheetStore::new();
        for _ in 0..5 {
            let id = store.allocate_id();
            store.insert(record(id));
        }
        let ids: Vec<i64> = store.list(1, 2).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(store.list(10, 5).is_empty());
        assert_eq!(store.list(0, 1000).len(), 5);
    }

    #[test]
    fn replace_requires_existing_record() {
        let store = TermSheetStore::new();
        assert!(!store.replace(record(1)));
        store.insert(record(1));
        let mut updated = record(1);
        updated.numeric_value = Some(2.0);
        assert!(store.replace(updated));
        assert_eq!(store.get(1).unwrap().numeric_value, Some(2.0));
    }

    #[test]
    fn remove_returns_record_once() {
        let store = TermSheetStore::new();
        store.insert(record(1));
        assert!(store.remove(1).is_some());
        assert!(store.remove(1).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let store = TermSheetStore::new();
        let id = store.allocate_id();
        store.insert(record(id));
        store.remove(id);
        assert_eq!(store.allocate_id(), id + 1);
    }

    #[test]
    fn replaced_with_keeps_id_and_created_at() {
        let created = Utc::now() - chrono::Duration::hours(1);
        let original = TermSheetRecord::new(
            3,
            TermSheetFields {
                composite_value: Some(CompositeValue::NoPik),
                ..TermSheetFields::default()
            },
            created,
        );
        let now = Utc::now();
        let updated = original.replaced_with(TermSheetFields::default(), now);
        assert_eq!(updated.id, 3);
        assert_eq!(updated.created_at, created);
        assert_eq!(updated.updated_at, now);
        assert!(updated.composite_value.is_none());
    }

    #[test]
    fn record_omits_unset_slots_but_keeps_null_scalars() {
        let json = serde_json::to_value(record(1)).unwrap();
        let object = json.as_object().unwrap();
        assert!(object["boolean_value"].is_null());
        assert!(object["term_sheet_status"].is_null());
        for slot in [
            "composite_value",
            "percentage_multiple",
            "names_list",
            "financial_ratio",
            "percentage_condition",
        ] {
            assert!(!object.contains_key(slot), "{slot} should be omitted");
        }
    }

    #[test]
    fn config_debug_redacts_database_url() {
        let config = AppConfig {
            database_url: Some("postgres://admin:hunter2@db/termsheets".to_string()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn config_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PORT", "9100"),
            ("DATABASE_URL", "postgres://db/termsheets"),
            ("TERMSHEET_METRICS_ENABLED", "FALSE"),
        ]);
        let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.port, 9100);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://db/termsheets")
        );
        assert!(!config.metrics_enabled);
    }

    #[test]
    fn config_defaults_and_bad_port() {
        let config = AppConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));
        assert_eq!(config.port, 8000);
        assert!(config.database_url.is_none());
        assert!(config.metrics_enabled);
    }

    #[tokio::test]
    async fn writes_are_serialized_across_clones() {
        let state = AppState::new();
        let other = state.clone();

        let guard = state.begin_write().await;
        let pending = tokio::spawn(async move {
            let _guard = other.begin_write().await;
            other.records.len()
        });

        tokio::task::yield_now().await;
        assert!(!pending.is_finished());
        let id = state.records.allocate_id();
        state.records.insert(record(id));
        drop(guard);

        assert_eq!(pending.await.unwrap(), 1);
    }
}
