use crate::registries::TOOL_CATALOG;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub session_id: Option<String>,
    #[serde(default)]
    pub group_ai_first: bool,
}

pub async fn list_tools(Query(query): Query<CatalogQuery>) -> impl IntoResponse {
    let tools: Vec<_> = TOOL_CATALOG
        .iter()
        .filter(|tool| {
            query
                .category
                .as_deref()
                .map_or(true, |category| tool.category.eq_ignore_ascii_case(category))
        })
        .filter(|tool| query.featured.map_or(true, |featured| tool.featured == featured))
        .collect();
    Json(json!({ "count": tools.len(), "tools": tools }))
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let suggestions = state
        .search(&query.q, query.session_id.as_deref(), query.group_ai_first)
        .await;
    Json(json!({ "query": query.q, "suggestions": suggestions }))
}

pub async fn search_history(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.recent().await)
}

pub async fn clear_search_history(State(state): State<AppState>) -> Response {
    match state.store.clear_history().await {
        Ok(()) => {
            info!("Search history cleared");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!("Failed to clear search history: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to clear search history").into_response()
        }
    }
}

pub async fn search_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.stats().await)
}

pub async fn record_ai_usage(State(state): State<AppState>) -> Response {
    match state.store.record_ai_suggestion_used().await {
        Ok(()) => Json(state.store.stats().await).into_response(),
        Err(e) => {
            error!("Failed to record AI suggestion usage: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to record usage").into_response()
        }
    }
}

pub async fn recommendations(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "recommendations": state.recommendations.fetch().await }))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::search::store::{MemoryPersistence, SearchStore};
    use serde_json::Value;
    use std::sync::Arc;

    async fn test_state() -> AppState {
        let store = SearchStore::load(Arc::new(MemoryPersistence::default())).await;
        AppState::new(AppConfig::default(), store)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn filters_catalog_by_category_and_featured() {
        let response = list_tools(Query(CatalogQuery {
            category: Some("Security".to_string()),
            featured: None,
        }))
        .await
        .into_response();
        let body = body_json(response).await;
        let tools = body["tools"].as_array().unwrap();
        assert!(!tools.is_empty());
        assert!(tools.iter().all(|t| t["category"] == "security"));

        let response = list_tools(Query(CatalogQuery {
            category: None,
            featured: Some(true),
        }))
        .await
        .into_response();
        let body = body_json(response).await;
        assert!(body["tools"]
            .as_array()
            .unwrap()
            .iter()
            .all(|t| t["featured"] == true));
    }

    #[tokio::test]
    async fn clearing_history_empties_it() {
        let state = test_state().await;
        state.store.record_search("base64", 3).await.unwrap();

        let response = clear_search_history(State(state.clone())).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let body = body_json(search_history(State(state)).await.into_response()).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn ai_usage_is_counted() {
        let state = test_state().await;
        record_ai_usage(State(state.clone())).await;
        let body = body_json(record_ai_usage(State(state)).await).await;
        assert_eq!(body["aiSuggestionUsageCount"], 2);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let body = body_json(health().await.into_response()).await;
        assert_eq!(body["status"], "ok");
    }
}
