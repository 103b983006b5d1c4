use crate::config::AppConfig;
use crate::registries::TOOL_CATALOG;
use crate::search::debounce::Debouncer;
use crate::search::engine::{group_ai_first, rank};
use crate::search::store::SearchStore;
use crate::search::SearchSuggestion;
use crate::trending::{RecommendationClient, TRENDING_SEARCHES};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_SESSION: &str = "default";

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<SearchStore>,
    pub debouncer: Arc<Debouncer>,
    pub recommendations: RecommendationClient,
}

impl AppState {
    pub fn new(config: AppConfig, store: SearchStore) -> Self {
        let debouncer = Debouncer::new(config.search_debounce);
        let recommendations = RecommendationClient::new(config.recommendations_url.clone());
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            debouncer: Arc::new(debouncer),
            recommendations,
        }
    }

    /// Rank the catalogue for a live query.
    ///
    /// Non-blank queries are recorded in the history once `session` has
    /// been quiet for the debounce window.
    pub async fn search(
        &self,
        query: &str,
        session: Option<&str>,
        ai_first: bool,
    ) -> Vec<SearchSuggestion> {
        let recent = self.store.recent_texts().await;
        let suggestions = rank(query, &TOOL_CATALOG, &recent, TRENDING_SEARCHES);

        let query = query.trim();
        if !query.is_empty() {
            let store = Arc::clone(&self.store);
            let query = query.to_string();
            let result_count = suggestions.len();
            let session = session.unwrap_or(DEFAULT_SESSION).to_string();
            debug!("Scheduling history update for session {}", session);
            self.debouncer.call(session, async move {
                if let Err(e) = store.record_search(&query, result_count).await {
                    warn!("Failed to record search {:?}: {}", query, e);
                }
            });
        }

        if ai_first {
            group_ai_first(suggestions)
        } else {
            suggestions
        }
    }
}
