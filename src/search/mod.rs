//! Tool search: ranking, history, debouncing.
//!
//! The ranking engine is a pure function of the query and the tool catalogue.
//! History and aggregate stats live in an explicit store with pluggable
//! persistence; the debouncer decides when a query is final enough to record.

pub mod debounce;
pub mod engine;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a suggestion came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionKind {
    Tool,
    Category,
    Recent,
    Trending,
    AiPowered,
}

impl SuggestionKind {
    /// Lower sorts first among suggestions of equal relevance
    pub fn priority(&self) -> u8 {
        match self {
            Self::AiPowered => 0,
            Self::Tool => 1,
            Self::Category => 2,
            Self::Recent => 3,
            Self::Trending => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSuggestion {
    pub id: String,
    pub text: String,
    pub kind: SuggestionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub relevance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    pub text: String,
    pub timestamp_description: String,
    // Absent in entries written before timestamps were tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searched_at: Option<DateTime<Utc>>,
}

impl SearchHistoryEntry {
    pub fn new(text: impl Into<String>, searched_at: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            timestamp_description: describe_elapsed(searched_at, searched_at),
            searched_at: Some(searched_at),
        }
    }

    /// Copy with the description recomputed against `now`
    pub fn refreshed(&self, now: DateTime<Utc>) -> Self {
        let mut entry = self.clone();
        if let Some(at) = self.searched_at {
            entry.timestamp_description = describe_elapsed(at, now);
        }
        entry
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchStats {
    pub total_searches: u64,
    pub average_result_count: f64,
    pub per_query_count: HashMap<String, u64>,
    pub ai_suggestion_usage_count: u64,
}

/// Human-readable age of a timestamp, e.g. "5 minutes ago"
pub fn describe_elapsed(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - at).num_seconds().max(0);
    let (amount, unit) = match secs {
        0..=59 => return "just now".to_string(),
        60..=3_599 => (secs / 60, "minute"),
        3_600..=86_399 => (secs / 3_600, "hour"),
        _ => (secs / 86_400, "day"),
    };
    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}
