use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Shown alongside recent searches when the query is blank
pub const TRENDING_SEARCHES: &[&str] = &[
    "json formatter",
    "password generator",
    "qr code",
    "color picker",
    "base64",
];

/// Record returned by the external recommendation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub tool: String,
    pub score: f64,
    #[serde(default)]
    pub reason: String,
}

#[derive(Clone)]
pub struct RecommendationClient {
    http: reqwest::Client,
    endpoint: Option<String>,
}

impl RecommendationClient {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Fetch recommendations; any failure degrades to an empty list
    pub async fn fetch(&self) -> Vec<Recommendation> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return Vec::new();
        };

        let body = match self.http.get(endpoint).send().await {
            Ok(response) => match response.error_for_status() {
                Ok(response) => response.json::<Value>().await,
                Err(e) => {
                    warn!("Recommendation service returned an error: {}", e);
                    return Vec::new();
                }
            },
            Err(e) => {
                warn!("Failed to reach recommendation service: {}", e);
                return Vec::new();
            }
        };

        match body {
            Ok(value) => {
                let recommendations = parse_recommendations(value);
                info!("Fetched {} recommendations", recommendations.len());
                recommendations
            }
            Err(e) => {
                warn!("Recommendation response was not JSON: {}", e);
                Vec::new()
            }
        }
    }
}

/// Keep the records that look like `{tool, score, reason}`, best first.
///
/// Accepts a bare array or an object wrapping it under `recommendations`.
pub fn parse_recommendations(value: Value) -> Vec<Recommendation> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("recommendations") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    let mut recommendations: Vec<Recommendation> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    recommendations.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    recommendations
}
