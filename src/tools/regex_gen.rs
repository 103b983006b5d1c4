//! Regular expression generator and tester.
//!
//! `generate` is a pure function from a template and options to a pattern;
//! callers that need to remember the last selection keep that state
//! themselves.

use crate::error::ToolError;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const MAX_MATCHES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternTemplate {
    Email,
    Url,
    Phone,
    Ipv4,
    Date,
    Time,
    HexColor,
    PostalCode,
    Username,
    Slug,
    Integer,
    Decimal,
}

impl PatternTemplate {
    pub fn all() -> &'static [PatternTemplate] {
        &[
            Self::Email,
            Self::Url,
            Self::Phone,
            Self::Ipv4,
            Self::Date,
            Self::Time,
            Self::HexColor,
            Self::PostalCode,
            Self::Username,
            Self::Slug,
            Self::Integer,
            Self::Decimal,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Url => "url",
            Self::Phone => "phone",
            Self::Ipv4 => "ipv4",
            Self::Date => "date",
            Self::Time => "time",
            Self::HexColor => "hex-color",
            Self::PostalCode => "postal-code",
            Self::Username => "username",
            Self::Slug => "slug",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
        }
    }

    fn body(&self) -> &'static str {
        match self {
            Self::Email => r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}",
            Self::Url => r"https?://[A-Za-z0-9.-]+\.[A-Za-z]{2,}(?::\d+)?(?:/[^\s]*)?",
            Self::Phone => r"(?:\+?\d{1,3}[-. ]?)?\(?\d{3}\)?[-. ]?\d{3}[-. ]?\d{4}",
            Self::Ipv4 => {
                r"(?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)"
            }
            Self::Date => r"\d{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])",
            Self::Time => r"(?:[01]\d|2[0-3]):[0-5]\d(?::[0-5]\d)?",
            Self::HexColor => r"#(?:[0-9a-fA-F]{3}){1,2}",
            Self::PostalCode => r"\d{5}(?:-\d{4})?",
            Self::Username => r"[A-Za-z0-9_]{3,16}",
            Self::Slug => r"[a-z0-9]+(?:-[a-z0-9]+)*",
            Self::Integer => r"[-+]?\d+",
            Self::Decimal => r"[-+]?\d*\.\d+",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Email => "Email address",
            Self::Url => "HTTP or HTTPS URL",
            Self::Phone => "Phone number with optional country code",
            Self::Ipv4 => "IPv4 address",
            Self::Date => "ISO 8601 date (YYYY-MM-DD)",
            Self::Time => "24-hour time (HH:MM or HH:MM:SS)",
            Self::HexColor => "Hex color (#rgb or #rrggbb)",
            Self::PostalCode => "US ZIP code (12345 or 12345-6789)",
            Self::Username => "Username of 3-16 letters, digits or underscores",
            Self::Slug => "Lowercase URL slug",
            Self::Integer => "Signed integer",
            Self::Decimal => "Signed decimal number",
        }
    }

    fn examples(&self) -> (&'static [&'static str], &'static [&'static str]) {
        match self {
            Self::Email => (&["user@example.com", "first.last+tag@mail.co.uk"], &["not-an-email", "a@b"]),
            Self::Url => (&["https://example.com/path?q=1", "http://localhost.dev:8080"], &["example dot com", "ftp://example.com"]),
            Self::Phone => (&["+1 555-123-4567", "(555) 123-4567", "5551234567"], &["12-34", "phone"]),
            Self::Ipv4 => (&["192.168.1.1", "8.8.8.8"], &["256.1.1.1", "1.2.3"]),
            Self::Date => (&["2024-02-29", "1999-12-31"], &["2024-13-01", "24-01-01"]),
            Self::Time => (&["23:59", "08:30:15"], &["24:00", "7:5"]),
            Self::HexColor => (&["#ff8800", "#abc"], &["#ggg", "ff8800"]),
            Self::PostalCode => (&["12345", "12345-6789"], &["1234", "123456"]),
            Self::Username => (&["rust_dev", "abc"], &["ab", "has space"]),
            Self::Slug => (&["hello-world", "post-42"], &["Not A Slug", "trailing-"]),
            Self::Integer => (&["42", "-7"], &["12a", "4.2"]),
            Self::Decimal => (&["3.14", "-.5"], &["3.", "abc"]),
        }
    }
}

impl FromStr for PatternTemplate {
    type Err = ToolError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "email" | "e-mail" => Ok(Self::Email),
            "url" | "link" => Ok(Self::Url),
            "phone" | "phone-number" => Ok(Self::Phone),
            "ipv4" | "ip" | "ip-address" => Ok(Self::Ipv4),
            "date" => Ok(Self::Date),
            "time" => Ok(Self::Time),
            "hex-color" | "color" | "hex" => Ok(Self::HexColor),
            "postal-code" | "zip" | "zip-code" => Ok(Self::PostalCode),
            "username" => Ok(Self::Username),
            "slug" => Ok(Self::Slug),
            "integer" | "int" => Ok(Self::Integer),
            "decimal" | "float" | "number" => Ok(Self::Decimal),
            _ => Err(ToolError::invalid(
                "template",
                format!(
                    "unknown template '{}' (expected one of: {})",
                    input,
                    Self::all()
                        .iter()
                        .map(|t| t.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateOptions {
    /// Wrap in `^...$` so the whole input must match
    pub anchored: bool,
    pub case_insensitive: bool,
    pub global: bool,
    pub multiline: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            anchored: true,
            case_insensitive: false,
            global: false,
            multiline: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Pattern {
    pub template: PatternTemplate,
    pub source: String,
    pub flags: String,
    pub description: &'static str,
    pub matches: Vec<&'static str>,
    pub non_matches: Vec<&'static str>,
}

pub fn generate(template: PatternTemplate, options: &GenerateOptions) -> Pattern {
    let body = template.body();
    let source = if options.anchored {
        format!("^(?:{})$", body)
    } else {
        body.to_string()
    };

    let mut flags = String::new();
    if options.global {
        flags.push('g');
    }
    if options.case_insensitive {
        flags.push('i');
    }
    if options.multiline {
        flags.push('m');
    }

    let (matches, non_matches) = template.examples();
    Pattern {
        template,
        source,
        flags,
        description: template.description(),
        matches: matches.to_vec(),
        non_matches: non_matches.to_vec(),
    }
}

#[derive(Debug, Serialize)]
pub struct PatternMatch {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub groups: Vec<Option<String>>,
}

#[derive(Debug, Serialize)]
pub struct PatternTestResult {
    pub is_match: bool,
    pub match_count: usize,
    pub matches: Vec<PatternMatch>,
}

/// Run `pattern` over `text`. Flags: `g` all matches, `i`, `m`, `s`.
pub fn test_pattern(pattern: &str, flags: &str, text: &str) -> Result<PatternTestResult, ToolError> {
    if let Some(bad) = flags.chars().find(|c| !"gims".contains(*c)) {
        return Err(ToolError::invalid("flags", format!("unsupported flag '{}'", bad)));
    }

    let re = RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .build()
        .map_err(|e| ToolError::invalid("pattern", format!("invalid regex: {}", e)))?;

    let limit = if flags.contains('g') { MAX_MATCHES } else { 1 };
    let matches: Vec<PatternMatch> = re
        .captures_iter(text)
        .take(limit)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(PatternMatch {
                text: whole.as_str().to_string(),
                start: whole.start(),
                end: whole.end(),
                groups: caps
                    .iter()
                    .skip(1)
                    .map(|group| group.map(|m| m.as_str().to_string()))
                    .collect(),
            })
        })
        .collect();

    Ok(PatternTestResult {
        is_match: !matches.is_empty(),
        match_count: matches.len(),
        matches,
    })
}
