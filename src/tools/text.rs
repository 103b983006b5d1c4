use crate::error::ToolError;
use serde::Serialize;

const WORDS_PER_MINUTE: f64 = 200.0;

pub const TRANSFORMS: &[&str] = &[
    "uppercase",
    "lowercase",
    "titlecase",
    "sentencecase",
    "camelcase",
    "snakecase",
    "kebabcase",
];

#[derive(Debug, Serialize, PartialEq)]
pub struct TextStats {
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub words: usize,
    pub lines: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub reading_time_minutes: f64,
}

fn capitalize(word: &str) -> String {
    let mut c = word.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + &c.as_str().to_lowercase(),
    }
}

// Splits on whitespace and punctuation so "helloWorld-foo_bar" style input
// yields ["hello", "world", "foo", "bar"]
fn identifier_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in text.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_numeric();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

pub fn text_transform(text: &str, transform: &str) -> Result<String, ToolError> {
    let normalized = transform.trim().to_lowercase().replace(['-', '_', ' '], "");
    match normalized.as_str() {
        "uppercase" | "upper" => Ok(text.to_uppercase()),
        "lowercase" | "lower" => Ok(text.to_lowercase()),
        "titlecase" | "title" => Ok(text
            .split_whitespace()
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")),
        "sentencecase" | "sentence" => {
            let lower = text.to_lowercase();
            let mut out = String::with_capacity(lower.len());
            let mut start = true;
            for c in lower.chars() {
                if start && c.is_alphabetic() {
                    out.extend(c.to_uppercase());
                    start = false;
                } else {
                    out.push(c);
                }
                if matches!(c, '.' | '!' | '?') {
                    start = true;
                }
            }
            Ok(out)
        }
        "camelcase" | "camel" => {
            let words = identifier_words(text);
            Ok(words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
                .collect())
        }
        "snakecase" | "snake" => Ok(identifier_words(text).join("_")),
        "kebabcase" | "kebab" => Ok(identifier_words(text).join("-")),
        _ => Err(ToolError::invalid(
            "transform",
            format!("expected one of: {}", TRANSFORMS.join(", ")),
        )),
    }
}

pub fn text_stats(text: &str) -> TextStats {
    let words = text.split_whitespace().count();
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count();
    let paragraphs = text
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .count();

    TextStats {
        characters: text.chars().count(),
        characters_no_spaces: text.chars().filter(|c| !c.is_whitespace()).count(),
        words,
        lines: if text.is_empty() { 0 } else { text.lines().count() },
        sentences,
        paragraphs,
        reading_time_minutes: (words as f64 / WORDS_PER_MINUTE * 10.0).ceil() / 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_transforms() {
        assert_eq!(text_transform("hello world", "uppercase").unwrap(), "HELLO WORLD");
        assert_eq!(text_transform("Hello World", "lowercase").unwrap(), "hello world");
        assert_eq!(text_transform("hELLO wORLD", "titlecase").unwrap(), "Hello World");
        assert_eq!(
            text_transform("this is FINE. really? yes", "sentence-case").unwrap(),
            "This is fine. Really? Yes"
        );
    }

    #[test]
    fn identifier_transforms() {
        assert_eq!(text_transform("user account id", "camelCase").unwrap(), "userAccountId");
        assert_eq!(text_transform("userAccountId", "snake_case").unwrap(), "user_account_id");
        assert_eq!(text_transform("User_Account ID", "kebab").unwrap(), "user-account-id");
    }

    #[test]
    fn unknown_transform_is_rejected() {
        let err = text_transform("x", "reverse").unwrap_err();
        assert!(err.to_string().contains("uppercase"));
    }

    #[test]
    fn counts_text() {
        let stats = text_stats("One two three. Four five!\n\nSix?");
        assert_eq!(stats.words, 6);
        assert_eq!(stats.sentences, 3);
        assert_eq!(stats.paragraphs, 2);
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.characters, 31);
        assert_eq!(stats.reading_time_minutes, 0.1);
    }

    #[test]
    fn empty_text() {
        let stats = text_stats("");
        assert_eq!(stats.words, 0);
        assert_eq!(stats.lines, 0);
        assert_eq!(stats.reading_time_minutes, 0.0);
    }
}
