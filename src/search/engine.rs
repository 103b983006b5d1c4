use super::{SearchSuggestion, SuggestionKind};
use crate::registries::Tool;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Score at which a tool's relevance saturates to 1.0
const RELEVANCE_SCALE: f64 = 150.0;
const MAX_TOOL_SUGGESTIONS: usize = 8;
const MAX_CATEGORY_SUGGESTIONS: usize = 3;
const MAX_AI_SUGGESTIONS: usize = 3;
const CATEGORY_RELEVANCE: f64 = 0.5;
const RECENT_RELEVANCE: f64 = 0.8;
const TRENDING_RELEVANCE: f64 = 0.6;
const AI_SIMILARITY_THRESHOLD: f64 = 0.3;
const AI_EXPLANATION: &str = "Related by keywords in its name and description";

/// Rank the catalogue against a live query.
///
/// A blank query skips scoring entirely and returns `recent` followed by
/// `trending`. Otherwise tool, category and keyword-overlap suggestions are
/// merged, deduplicated by id and sorted by relevance (highest first).
pub fn rank(
    query: &str,
    tools: &[Tool],
    recent: &[String],
    trending: &[&str],
) -> Vec<SearchSuggestion> {
    let query = query.trim();
    if query.is_empty() {
        return fallback_suggestions(recent, trending);
    }

    let query_lower = query.to_lowercase();

    let mut merged = tool_suggestions(&query_lower, tools);
    merged.extend(category_suggestions(&query_lower, tools));
    merged.extend(ai_suggestions(&query_lower, tools));

    let mut seen = HashSet::new();
    merged.retain(|s| seen.insert(s.id.clone()));
    merged.sort_by(compare_suggestions);
    merged
}

/// Stable partition putting keyword-overlap suggestions ahead of the rest
pub fn group_ai_first(suggestions: Vec<SearchSuggestion>) -> Vec<SearchSuggestion> {
    let (mut ai, rest): (Vec<_>, Vec<_>) = suggestions
        .into_iter()
        .partition(|s| s.kind == SuggestionKind::AiPowered);
    ai.extend(rest);
    ai
}

/// Raw score of a single tool against a lowercased query
pub fn score_tool(query_lower: &str, tool: &Tool) -> u32 {
    let name = tool.name.to_lowercase();
    let mut score = 0;

    if name.contains(query_lower) {
        score += 100;
        if name == query_lower {
            score += 50;
        }
    }
    if tool.description.to_lowercase().contains(query_lower) {
        score += 20;
    }
    if tool.category.to_lowercase().contains(query_lower) {
        score += 15;
    }

    // Partial word overlap; identical words are already covered above
    for query_word in query_lower.split_whitespace() {
        if query_word.chars().count() <= 2 {
            continue;
        }
        for name_word in name.split_whitespace() {
            if name_word != query_word && name_word.contains(query_word) {
                score += 5;
            }
        }
    }

    score
}

pub fn relevance_for(score: u32) -> f64 {
    (f64::from(score) / RELEVANCE_SCALE).min(1.0)
}

/// Share of query words overlapping the tool's name and description
pub fn keyword_similarity(query_lower: &str, tool: &Tool) -> f64 {
    let query_words: Vec<&str> = query_lower.split_whitespace().collect();
    if query_words.is_empty() {
        return 0.0;
    }

    let haystack = format!("{} {}", tool.name, tool.description).to_lowercase();
    let tool_words: Vec<&str> = haystack.split_whitespace().collect();

    let mut matches = 0usize;
    for query_word in &query_words {
        for tool_word in &tool_words {
            if tool_word.contains(query_word) || query_word.contains(tool_word) {
                matches += 1;
            }
        }
    }

    (matches as f64 / (query_words.len() as f64 * 1.5)).min(1.0)
}

fn tool_suggestions(query_lower: &str, tools: &[Tool]) -> Vec<SearchSuggestion> {
    let mut scored: Vec<(u32, &Tool)> = tools
        .iter()
        .map(|tool| (score_tool(query_lower, tool), tool))
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|(a_score, a), (b_score, b)| {
        b_score
            .cmp(a_score)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    scored
        .into_iter()
        .take(MAX_TOOL_SUGGESTIONS)
        .map(|(score, tool)| {
            let relevance = relevance_for(score);
            SearchSuggestion {
                id: format!("tool-{}", tool.path),
                text: tool.name.to_string(),
                kind: SuggestionKind::Tool,
                category: Some(tool.category.to_string()),
                relevance,
                confidence: Some((relevance * 100.0).min(100.0)),
                path: Some(tool.path.to_string()),
                explanation: None,
            }
        })
        .collect()
}

fn category_suggestions(query_lower: &str, tools: &[Tool]) -> Vec<SearchSuggestion> {
    let mut seen = HashSet::new();
    tools
        .iter()
        .map(|tool| tool.category)
        .filter(|category| category.to_lowercase().contains(query_lower))
        .filter(|category| seen.insert(*category))
        .take(MAX_CATEGORY_SUGGESTIONS)
        .map(|category| SearchSuggestion {
            id: format!("category-{}", category),
            text: category.to_string(),
            kind: SuggestionKind::Category,
            category: Some(category.to_string()),
            relevance: CATEGORY_RELEVANCE,
            confidence: None,
            path: None,
            explanation: None,
        })
        .collect()
}

fn ai_suggestions(query_lower: &str, tools: &[Tool]) -> Vec<SearchSuggestion> {
    let mut related: Vec<(f64, &Tool)> = tools
        .iter()
        .filter(|tool| !tool.name.to_lowercase().contains(query_lower))
        .map(|tool| (keyword_similarity(query_lower, tool), tool))
        .filter(|(similarity, _)| *similarity > AI_SIMILARITY_THRESHOLD)
        .collect();

    related.sort_by(|(a_sim, a), (b_sim, b)| {
        b_sim
            .partial_cmp(a_sim)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    related
        .into_iter()
        .take(MAX_AI_SUGGESTIONS)
        .map(|(similarity, tool)| SearchSuggestion {
            id: format!("ai-{}", tool.path),
            text: tool.name.to_string(),
            kind: SuggestionKind::AiPowered,
            category: Some(tool.category.to_string()),
            relevance: similarity,
            confidence: Some(similarity * 100.0),
            path: Some(tool.path.to_string()),
            explanation: Some(AI_EXPLANATION.to_string()),
        })
        .collect()
}

fn fallback_suggestions(recent: &[String], trending: &[&str]) -> Vec<SearchSuggestion> {
    let recent = recent.iter().enumerate().map(|(i, text)| SearchSuggestion {
        id: format!("recent-{}", i),
        text: text.clone(),
        kind: SuggestionKind::Recent,
        category: None,
        relevance: RECENT_RELEVANCE,
        confidence: None,
        path: None,
        explanation: None,
    });
    let trending = trending.iter().enumerate().map(|(i, text)| SearchSuggestion {
        id: format!("trending-{}", i),
        text: text.to_string(),
        kind: SuggestionKind::Trending,
        category: None,
        relevance: TRENDING_RELEVANCE,
        confidence: None,
        path: None,
        explanation: None,
    });
    recent.chain(trending).collect()
}

// Relevance descending, then kind priority, then text (case-insensitive)
fn compare_suggestions(a: &SearchSuggestion, b: &SearchSuggestion) -> Ordering {
    match b.relevance.partial_cmp(&a.relevance) {
        Some(Ordering::Equal) | None => {}
        Some(ord) => return ord,
    }
    match a.kind.priority().cmp(&b.kind.priority()) {
        Ordering::Equal => {}
        ord => return ord,
    }
    a.text.to_lowercase().cmp(&b.text.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registries::TOOL_CATALOG;

    fn tool(name: &'static str, description: &'static str, category: &'static str, path: &'static str) -> Tool {
        Tool {
            name,
            description,
            category,
            icon: "wrench",
            path,
            tags: &[],
            featured: false,
        }
    }

    fn sample_tools() -> Vec<Tool> {
        vec![
            tool(
                "SEO Analyzer",
                "Check meta tags and headings of a page",
                "seo",
                "/tools/seo-analyzer",
            ),
            tool(
                "Image Compressor",
                "Shrink PNG and JPEG files in the browser",
                "image",
                "/tools/image-compressor",
            ),
            tool(
                "Password Generator",
                "Create strong random passwords",
                "security",
                "/tools/password-generator",
            ),
            tool(
                "Password Strength Checker",
                "Estimate how hard a password is to crack",
                "security",
                "/tools/password-strength",
            ),
            tool(
                "Hash Generator",
                "Compute SHA digests for text",
                "security",
                "/tools/hash-generator",
            ),
        ]
    }

    fn assert_sorted_and_unique(suggestions: &[SearchSuggestion]) {
        let mut ids = HashSet::new();
        for s in suggestions {
            assert!(ids.insert(s.id.clone()), "duplicate id {}", s.id);
            assert!((0.0..=1.0).contains(&s.relevance));
        }
        for pair in suggestions.windows(2) {
            assert!(pair[0].relevance >= pair[1].relevance);
        }
    }

    #[test]
    fn seo_query_ranks_analyzer_first() {
        let tools = sample_tools();
        let results = rank("seo", &tools, &[], &[]);

        let first = &results[0];
        assert_eq!(first.text, "SEO Analyzer");
        assert_eq!(first.kind, SuggestionKind::Tool);
        assert!(first.relevance >= 100.0 / 150.0);
        assert!(!results.iter().any(|s| s.text == "Image Compressor"));
        assert!(results
            .iter()
            .any(|s| s.kind == SuggestionKind::Category && s.text == "seo"));
    }

    #[test]
    fn exact_name_saturates_relevance() {
        let tools = sample_tools();
        assert!(score_tool("hash generator", &tools[4]) >= 150);

        let results = rank("HASH GENERATOR", &tools, &[], &[]);
        assert_eq!(results[0].text, "Hash Generator");
        assert_eq!(results[0].relevance, 1.0);
        assert_eq!(results[0].confidence, Some(100.0));
    }

    #[test]
    fn partial_word_bonus_skips_short_and_identical_words() {
        let tools = sample_tools();
        // name (100) + description (20) + "pass" inside "password" (5)
        assert_eq!(score_tool("pass", &tools[2]), 125);
        // identical word gets no bonus
        assert_eq!(score_tool("generator", &tools[4]), 100);
        // two-letter words never contribute
        assert_eq!(score_tool("ra", &tools[4]), 100);
    }

    #[test]
    fn results_are_sorted_and_deduplicated() {
        let tools = sample_tools();
        for query in ["password", "security", "gen", "a", "strong random", "e"] {
            let results = rank(query, &tools, &[], &[]);
            assert_sorted_and_unique(&results);
        }
    }

    fn overlap_tools() -> Vec<Tool> {
        vec![
            tool(
                "Password Generator",
                "Create strong random passwords",
                "security",
                "/tools/password-generator",
            ),
            tool("Image Compressor", "Shrink PNG files", "image", "/tools/image-compressor"),
        ]
    }

    #[test]
    fn keyword_overlap_suggestions_exclude_name_matches() {
        let tools = overlap_tools();
        let results = rank("random strong", &tools, &[], &[]);
        let ai: Vec<_> = results
            .iter()
            .filter(|s| s.kind == SuggestionKind::AiPowered)
            .collect();
        assert_eq!(ai.len(), 1);
        assert_eq!(ai[0].text, "Password Generator");
        assert_eq!(ai[0].explanation.as_deref(), Some(AI_EXPLANATION));
        assert!((ai[0].relevance - 2.0 / 3.0).abs() < 1e-9);

        let ai = rank("password", &sample_tools(), &[], &[]);
        assert!(!ai
            .iter()
            .any(|s| s.kind == SuggestionKind::AiPowered && s.text.contains("Password")));
    }

    #[test]
    fn blank_query_returns_recent_then_trending() {
        let tools = sample_tools();
        let recent = vec!["jwt".to_string(), "roman".to_string()];
        let results = rank("   ", &tools, &recent, &["qr code"]);
        let texts: Vec<_> = results.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["jwt", "roman", "qr code"]);
        assert_eq!(results[0].kind, SuggestionKind::Recent);
        assert_eq!(results[2].kind, SuggestionKind::Trending);
        assert!(results.iter().all(|s| s.confidence.is_none()));
    }

    #[test]
    fn empty_catalogue_yields_nothing() {
        assert!(rank("password", &[], &["recent".to_string()], &["x"]).is_empty());
    }

    #[test]
    fn tool_suggestions_are_capped() {
        let tools: Vec<Tool> = (0..12)
            .map(|i| {
                let path: &'static str = Box::leak(format!("/tools/converter-{}", i).into_boxed_str());
                tool("Unit Converter", "Convert units", "converters", path)
            })
            .collect();
        let results = rank("converter", &tools, &[], &[]);
        let tool_count = results
            .iter()
            .filter(|s| s.kind == SuggestionKind::Tool)
            .count();
        assert_eq!(tool_count, MAX_TOOL_SUGGESTIONS);
        assert_eq!(
            results.iter().filter(|s| s.kind == SuggestionKind::Category).count(),
            1
        );
    }

    #[test]
    fn ties_break_by_kind_then_name() {
        let tools = vec![
            tool("Beta Tool", "x", "misc", "/b"),
            tool("Alpha Tool", "x", "misc", "/a"),
        ];
        let results = rank("tool", &tools, &[], &[]);
        assert_eq!(results[0].text, "Alpha Tool");
        assert_eq!(results[1].text, "Beta Tool");
    }

    #[test]
    fn grouping_moves_ai_suggestions_first() {
        let tools = overlap_tools();
        let grouped = group_ai_first(rank("random strong", &tools, &[], &[]));
        assert_eq!(grouped[0].kind, SuggestionKind::AiPowered);
    }

    #[test]
    fn catalogue_search_finds_roman_converter() {
        let results = rank("roman", &TOOL_CATALOG, &[], &[]);
        assert_eq!(results[0].path.as_deref(), Some("/tools/roman-numeral-converter"));
    }
}
