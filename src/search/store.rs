use super::{SearchHistoryEntry, SearchStats};
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub const HISTORY_KEY: &str = "toolbox:recent-searches";
pub const STATS_KEY: &str = "toolbox:search-stats";
pub const HISTORY_CAP: usize = 10;

/// Key/value persistence behind the search store
#[async_trait]
pub trait SearchPersistence: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process persistence, used by tests and as a fallback backend
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPersistence {
    pub fn with_values(values: &[(&str, &str)]) -> Self {
        Self {
            values: Mutex::new(
                values
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl SearchPersistence for MemoryPersistence {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct SearchState {
    history: Vec<SearchHistoryEntry>,
    stats: SearchStats,
}

/// Recent searches and aggregate counters, persisted best-effort.
///
/// State is read once in [`SearchStore::load`]; every mutation rewrites both
/// keys. The write lock is held until persistence finishes, so stored
/// snapshots land in the same order as the in-memory updates. A failed write
/// is reported to the caller but the in-memory state keeps the update.
pub struct SearchStore {
    persistence: Arc<dyn SearchPersistence>,
    state: RwLock<SearchState>,
}

impl SearchStore {
    pub async fn load(persistence: Arc<dyn SearchPersistence>) -> Self {
        let mut history: Vec<SearchHistoryEntry> =
            read_or_default(persistence.as_ref(), HISTORY_KEY).await;
        history.truncate(HISTORY_CAP);
        let stats = read_or_default(persistence.as_ref(), STATS_KEY).await;

        debug!("Loaded {} recent searches", history.len());

        Self {
            persistence,
            state: RwLock::new(SearchState { history, stats }),
        }
    }

    /// Move `query` to the front of history and fold it into the stats
    pub async fn record_search(&self, query: &str, result_count: usize) -> Result<(), StoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }

        let mut state = self.state.write().await;

        state.history.retain(|entry| entry.text != query);
        state
            .history
            .insert(0, SearchHistoryEntry::new(query, Utc::now()));
        state.history.truncate(HISTORY_CAP);

        let stats = &mut state.stats;
        stats.total_searches += 1;
        let n = stats.total_searches as f64;
        stats.average_result_count =
            (stats.average_result_count * (n - 1.0) + result_count as f64) / n;
        *stats.per_query_count.entry(query.to_string()).or_insert(0) += 1;

        let history = serde_json::to_string(&state.history)?;
        let stats = serde_json::to_string(&state.stats)?;
        self.persist(HISTORY_KEY, &history).await?;
        self.persist(STATS_KEY, &stats).await
    }

    pub async fn record_ai_suggestion_used(&self) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.stats.ai_suggestion_usage_count += 1;
        let stats = serde_json::to_string(&state.stats)?;
        self.persist(STATS_KEY, &stats).await
    }

    /// Drop all recent searches; aggregate stats are kept
    pub async fn clear_history(&self) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.history.clear();
        self.persist(HISTORY_KEY, "[]").await
    }

    /// Recent searches, newest first, with fresh age descriptions
    pub async fn recent(&self) -> Vec<SearchHistoryEntry> {
        let now = Utc::now();
        self.state
            .read()
            .await
            .history
            .iter()
            .map(|entry| entry.refreshed(now))
            .collect()
    }

    pub async fn recent_texts(&self) -> Vec<String> {
        self.state
            .read()
            .await
            .history
            .iter()
            .map(|entry| entry.text.clone())
            .collect()
    }

    pub async fn stats(&self) -> SearchStats {
        self.state.read().await.stats.clone()
    }

    async fn persist(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.persistence.write(key, value).await.map_err(|e| {
            warn!("Failed to persist {}: {}", key, e);
            e
        })
    }
}

async fn read_or_default<T>(persistence: &dyn SearchPersistence, key: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    match persistence.read(key).await {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Discarding malformed {} value: {}", key, e);
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            warn!("Failed to read {}, starting empty: {}", key, e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingPersistence;

    #[async_trait]
    impl SearchPersistence for FailingPersistence {
        async fn read(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Backend("unavailable".into()))
        }

        async fn write(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend("read-only".into()))
        }
    }

    // Stalls the first write so a concurrent mutation can try to overtake it
    #[derive(Default)]
    struct StallingPersistence {
        inner: MemoryPersistence,
        stalled: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl SearchPersistence for StallingPersistence {
        async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.read(key).await
        }

        async fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if !self.stalled.swap(true, std::sync::atomic::Ordering::SeqCst) {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
            self.inner.write(key, value).await
        }
    }

    async fn empty_store() -> (SearchStore, Arc<MemoryPersistence>) {
        let persistence = Arc::new(MemoryPersistence::default());
        let store = SearchStore::load(persistence.clone()).await;
        (store, persistence)
    }

    #[tokio::test]
    async fn duplicate_queries_move_to_front() {
        let (store, _) = empty_store().await;
        store.record_search("jwt", 2).await.unwrap();
        store.record_search("roman", 1).await.unwrap();
        store.record_search("jwt", 2).await.unwrap();

        assert_eq!(store.recent_texts().await, vec!["jwt", "roman"]);
        let stats = store.stats().await;
        assert_eq!(stats.total_searches, 3);
        assert_eq!(stats.per_query_count["jwt"], 2);
    }

    #[tokio::test]
    async fn history_is_capped() {
        let (store, _) = empty_store().await;
        for i in 0..15 {
            store.record_search(&format!("query {}", i), 0).await.unwrap();
        }
        let texts = store.recent_texts().await;
        assert_eq!(texts.len(), HISTORY_CAP);
        assert_eq!(texts[0], "query 14");
        assert_eq!(texts[9], "query 5");
    }

    #[tokio::test]
    async fn running_average_of_result_counts() {
        let (store, _) = empty_store().await;
        store.record_search("a", 4).await.unwrap();
        store.record_search("b", 2).await.unwrap();
        store.record_search("c", 0).await.unwrap();
        assert!((store.stats().await.average_result_count - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn blank_queries_are_ignored() {
        let (store, _) = empty_store().await;
        store.record_search("   ", 3).await.unwrap();
        assert!(store.recent_texts().await.is_empty());
        assert_eq!(store.stats().await.total_searches, 0);
    }

    #[tokio::test]
    async fn state_survives_reload() {
        let (store, persistence) = empty_store().await;
        store.record_search("color", 5).await.unwrap();
        store.record_ai_suggestion_used().await.unwrap();

        let reloaded = SearchStore::load(persistence).await;
        assert_eq!(reloaded.recent_texts().await, vec!["color"]);
        let stats = reloaded.stats().await;
        assert_eq!(stats.total_searches, 1);
        assert_eq!(stats.ai_suggestion_usage_count, 1);
        assert_eq!(reloaded.recent().await[0].timestamp_description, "just now");
    }

    #[tokio::test]
    async fn malformed_state_falls_back_to_defaults() {
        let persistence = Arc::new(MemoryPersistence::with_values(&[
            (HISTORY_KEY, "{not json"),
            (STATS_KEY, "\"corrupted\""),
        ]));
        let store = SearchStore::load(persistence).await;
        assert!(store.recent_texts().await.is_empty());
        assert_eq!(store.stats().await, SearchStats::default());
    }

    #[tokio::test]
    async fn legacy_entries_without_timestamps_load() {
        let persistence = Arc::new(MemoryPersistence::with_values(&[(
            HISTORY_KEY,
            r#"[{"text": "qr code", "timestampDescription": "Just now"}]"#,
        )]));
        let store = SearchStore::load(persistence).await;
        let recent = store.recent().await;
        assert_eq!(recent[0].text, "qr code");
        assert_eq!(recent[0].timestamp_description, "Just now");
    }

    #[tokio::test]
    async fn read_failure_starts_empty_and_write_failure_keeps_memory() {
        let store = SearchStore::load(Arc::new(FailingPersistence)).await;
        assert!(store.recent_texts().await.is_empty());

        let result = store.record_search("hash", 1).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
        assert_eq!(store.recent_texts().await, vec!["hash"]);
    }

    #[tokio::test]
    async fn clearing_history_keeps_stats() {
        let (store, persistence) = empty_store().await;
        store.record_search("uuid", 1).await.unwrap();
        store.clear_history().await.unwrap();

        assert!(store.recent_texts().await.is_empty());
        assert_eq!(store.stats().await.total_searches, 1);
        assert_eq!(
            persistence.read(HISTORY_KEY).await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_records_persist_in_order() {
        let persistence = Arc::new(StallingPersistence::default());
        let store = SearchStore::load(persistence.clone()).await;

        let (first, second) = tokio::join!(
            store.record_search("slow", 1),
            store.record_search("fast", 3)
        );
        first.unwrap();
        second.unwrap();

        let reloaded = SearchStore::load(persistence).await;
        assert_eq!(reloaded.recent_texts().await, store.recent_texts().await);
        assert_eq!(reloaded.recent_texts().await, vec!["fast", "slow"]);
        assert_eq!(reloaded.stats().await, store.stats().await);
        assert_eq!(reloaded.stats().await.total_searches, 2);
    }
}
