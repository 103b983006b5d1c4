use once_cell::sync::Lazy;
use serde::Serialize;

/// Catalogue entry for one utility tool. `path` is the identity key.
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub icon: &'static str,
    pub path: &'static str,
    pub tags: &'static [&'static str],
    pub featured: bool,
}

/// A tool callable over MCP `tools/call`
pub struct CallableTool {
    pub name: &'static str,
    pub description: &'static str,
    /// Catalogue path of the page this tool backs, if any
    pub path: Option<&'static str>,
}

pub struct Resource {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
}

pub struct Prompt {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<PromptArgument>,
}

pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

macro_rules! tool {
    ($name:expr, $description:expr, $category:expr, $icon:expr, $path:expr, [$($tag:expr),*], $featured:expr) => {
        Tool {
            name: $name,
            description: $description,
            category: $category,
            icon: $icon,
            path: $path,
            tags: &[$($tag),*],
            featured: $featured,
        }
    };
}

pub static TOOL_CATALOG: Lazy<Vec<Tool>> = Lazy::new(|| {
    vec![
        // converters
        tool!("Roman Numeral Converter", "Convert numbers to Roman numerals and back (1-3999)", "converters", "landmark", "/tools/roman-numeral-converter", ["roman", "numerals", "numbers"], true),
        tool!("Number Base Converter", "Convert integers between binary, octal, decimal and hexadecimal", "converters", "binary", "/tools/number-base-converter", ["binary", "hex", "octal", "radix"], true),
        tool!("Color Converter", "Convert colors between HEX, RGB, HSL, HSV and CMYK", "converters", "palette", "/tools/color-converter", ["hex", "rgb", "hsl", "cmyk"], true),
        tool!("Unit Converter", "Convert length, mass and temperature units", "converters", "ruler", "/tools/unit-converter", ["length", "weight", "temperature"], false),
        tool!("Timestamp Converter", "Convert Unix timestamps to readable dates and back", "converters", "clock", "/tools/timestamp-converter", ["unix", "epoch", "date"], false),
        tool!("Morse Code Translator", "Translate text to Morse code and decode Morse messages", "converters", "radio", "/tools/morse-code", ["morse", "telegraph"], false),
        tool!("CSV to JSON", "Turn comma separated values into a JSON array", "converters", "table", "/tools/csv-to-json", ["csv", "json"], false),
        // developer
        tool!("JWT Decoder", "Decode JSON Web Token header and payload without verifying the signature", "developer", "key-round", "/tools/jwt-decoder", ["jwt", "token", "auth"], true),
        tool!("Regex Tester", "Test regular expressions against sample text and list matches", "developer", "regex", "/tools/regex-tester", ["regex", "pattern"], true),
        tool!("Regex Generator", "Generate regular expressions for emails, URLs, dates and more", "developer", "wand", "/tools/regex-generator", ["regex", "pattern", "template"], false),
        tool!("JSON Formatter", "Pretty print, minify and validate JSON documents", "developer", "braces", "/tools/json-formatter", ["json", "format", "validate"], true),
        tool!("Base64 Encoder", "Encode and decode Base64 text, including URL-safe variants", "developer", "file-code", "/tools/base64", ["base64", "encode", "decode"], true),
        tool!("URL Encoder", "Percent-encode and decode URL components", "developer", "link", "/tools/url-encoder", ["url", "percent", "encode"], false),
        tool!("UUID Generator", "Generate random version 4 UUIDs in bulk", "developer", "fingerprint", "/tools/uuid-generator", ["uuid", "guid", "id"], false),
        tool!("Markdown Editor", "Write Markdown with a live HTML preview", "developer", "file-text", "/tools/markdown-editor", ["markdown", "preview"], false),
        tool!("Cron Expression Parser", "Explain cron schedules in plain language", "developer", "calendar-clock", "/tools/cron-parser", ["cron", "schedule"], false),
        // text
        tool!("Case Converter", "Change text to upper, lower, title, camel, snake or kebab case", "text", "case-sensitive", "/tools/case-converter", ["case", "uppercase", "lowercase"], false),
        tool!("Word Counter", "Count words, characters, sentences and reading time", "text", "letter-text", "/tools/word-counter", ["words", "characters", "count"], true),
        tool!("Lorem Ipsum Generator", "Generate placeholder paragraphs of filler text", "text", "pilcrow", "/tools/lorem-ipsum", ["placeholder", "dummy text"], false),
        tool!("Text Diff Checker", "Compare two texts and highlight the differences", "text", "diff", "/tools/text-diff", ["diff", "compare"], false),
        // security
        tool!("Password Generator", "Create strong random passwords with custom character sets", "security", "lock", "/tools/password-generator", ["password", "random", "secure"], true),
        tool!("Hash Generator", "Compute SHA-224, SHA-256, SHA-384 and SHA-512 digests", "security", "hash", "/tools/hash-generator", ["sha256", "digest", "checksum"], false),
        tool!("Password Strength Checker", "Estimate how long a password would take to crack", "security", "shield-check", "/tools/password-strength", ["password", "entropy"], false),
        // image
        tool!("Image Compressor", "Shrink PNG and JPEG files in the browser", "image", "image-down", "/tools/image-compressor", ["png", "jpeg", "optimize"], false),
        tool!("Image Resizer", "Resize pictures to exact pixel dimensions", "image", "scaling", "/tools/image-resizer", ["resize", "dimensions"], false),
        tool!("QR Code Generator", "Create QR codes for links, text and Wi-Fi credentials", "image", "qr-code", "/tools/qr-code-generator", ["qr", "barcode"], true),
        tool!("QR Code Scanner", "Scan QR codes with your camera or from an image", "image", "scan-line", "/tools/qr-code-scanner", ["qr", "camera", "scan"], false),
        tool!("Color Picker", "Pick colors from a palette or an uploaded image", "image", "pipette", "/tools/color-picker", ["color", "eyedropper"], false),
        // seo
        tool!("SEO Analyzer", "Check titles, meta descriptions and headings of a page", "seo", "search-check", "/tools/seo-analyzer", ["meta", "headings"], false),
        tool!("Meta Tag Generator", "Build Open Graph and Twitter card meta tags", "seo", "tags", "/tools/meta-tag-generator", ["open graph", "twitter"], false),
        tool!("Keyword Density Checker", "Measure how often keywords appear in your copy", "seo", "chart-bar", "/tools/keyword-density", ["keywords", "density"], false),
        // media
        tool!("Tone Generator", "Play sine, square and sawtooth tones at any frequency", "media", "audio-waveform", "/tools/tone-generator", ["audio", "frequency"], false),
        tool!("Voice Recorder", "Record audio from your microphone and download it", "media", "mic", "/tools/voice-recorder", ["audio", "microphone"], false),
        // utility
        tool!("Stopwatch", "Time laps with millisecond precision", "utility", "timer", "/tools/stopwatch", ["timer", "laps"], false),
        tool!("Age Calculator", "Work out an exact age in years, months and days", "utility", "cake", "/tools/age-calculator", ["birthday", "date"], false),
        tool!("Percentage Calculator", "Solve common percentage questions", "utility", "percent", "/tools/percentage-calculator", ["percent", "math"], false),
        tool!("BMI Calculator", "Calculate body mass index from height and weight", "utility", "heart-pulse", "/tools/bmi-calculator", ["health", "bmi"], false),
    ]
});

pub static TOOL_REGISTRY: Lazy<Vec<CallableTool>> = Lazy::new(|| {
    vec![
        CallableTool {
            name: "search_tools",
            description: "Search the tool catalogue and get ranked suggestions.",
            path: None,
        },
        CallableTool {
            name: "record_ai_suggestion",
            description: "Count a click on an AI-powered search suggestion.",
            path: None,
        },
        CallableTool {
            name: "clear_search_history",
            description: "Forget all recent searches. Aggregate stats are kept.",
            path: None,
        },
        CallableTool {
            name: "roman_numeral",
            description: "Convert between integers (1-3999) and Roman numerals.",
            path: Some("/tools/roman-numeral-converter"),
        },
        CallableTool {
            name: "base_convert",
            description: "Convert an integer between number bases 2 to 36.",
            path: Some("/tools/number-base-converter"),
        },
        CallableTool {
            name: "color_convert",
            description: "Convert a color to HEX, RGB, HSL, HSV and CMYK.",
            path: Some("/tools/color-converter"),
        },
        CallableTool {
            name: "unit_convert",
            description: "Convert a value between length, mass or temperature units.",
            path: Some("/tools/unit-converter"),
        },
        CallableTool {
            name: "timestamp",
            description: "Get the current UTC timestamp or convert a Unix/RFC 3339 time.",
            path: Some("/tools/timestamp-converter"),
        },
        CallableTool {
            name: "morse_code",
            description: "Encode text to Morse code or decode Morse code to text.",
            path: Some("/tools/morse-code"),
        },
        CallableTool {
            name: "jwt_decode",
            description: "Decode a JWT header and payload. The signature is not verified.",
            path: Some("/tools/jwt-decoder"),
        },
        CallableTool {
            name: "regex_test",
            description: "Run a regular expression against text and list the matches.",
            path: Some("/tools/regex-tester"),
        },
        CallableTool {
            name: "regex_generate",
            description: "Generate a regular expression from a common template.",
            path: Some("/tools/regex-generator"),
        },
        CallableTool {
            name: "base64",
            description: "Encode or decode Base64 text.",
            path: Some("/tools/base64"),
        },
        CallableTool {
            name: "url_encode",
            description: "Percent-encode or decode a URL component.",
            path: Some("/tools/url-encoder"),
        },
        CallableTool {
            name: "uuid_generate",
            description: "Generate one or more random UUIDs.",
            path: Some("/tools/uuid-generator"),
        },
        CallableTool {
            name: "text_transform",
            description: "Transform text to upper, lower, title, sentence, camel, snake or kebab case.",
            path: Some("/tools/case-converter"),
        },
        CallableTool {
            name: "text_stats",
            description: "Count characters, words, sentences and estimate reading time.",
            path: Some("/tools/word-counter"),
        },
        CallableTool {
            name: "password_generate",
            description: "Generate a random password and estimate its strength.",
            path: Some("/tools/password-generator"),
        },
        CallableTool {
            name: "hash_generate",
            description: "Compute a SHA-2 digest of text.",
            path: Some("/tools/hash-generator"),
        },
    ]
});

pub static RESOURCE_REGISTRY: Lazy<Vec<Resource>> = Lazy::new(|| {
    vec![
        Resource {
            uri: "toolbox://catalog",
            name: "Tool Catalogue",
            description: "Every utility tool with its category, icon and path",
            mime_type: "application/json",
        },
        Resource {
            uri: "toolbox://search/history",
            name: "Recent Searches",
            description: "The ten most recent tool searches",
            mime_type: "application/json",
        },
        Resource {
            uri: "toolbox://search/stats",
            name: "Search Statistics",
            description: "Aggregate search counters",
            mime_type: "application/json",
        },
    ]
});

pub static PROMPT_REGISTRY: Lazy<Vec<Prompt>> = Lazy::new(|| {
    vec![
        Prompt {
            name: "find_tool",
            description: "Ask which utility tool fits a task",
            arguments: vec![PromptArgument {
                name: "task",
                description: "What you are trying to do",
                required: true,
            }],
        },
        Prompt {
            name: "explain_token",
            description: "Generate a prompt explaining a decoded JWT",
            arguments: vec![PromptArgument {
                name: "token",
                description: "The encoded JWT",
                required: true,
            }],
        },
    ]
});

pub fn find_tool_by_path(path: &str) -> Option<&'static Tool> {
    TOOL_CATALOG.iter().find(|tool| tool.path == path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalogue_paths_are_unique() {
        let mut paths = HashSet::new();
        for tool in TOOL_CATALOG.iter() {
            assert!(paths.insert(tool.path), "duplicate path {}", tool.path);
        }
    }

    #[test]
    fn callable_tools_point_at_catalogue_pages() {
        for tool in TOOL_REGISTRY.iter() {
            if let Some(path) = tool.path {
                assert!(find_tool_by_path(path).is_some(), "{} has no page", tool.name);
            }
        }
    }

    #[test]
    fn featured_tools_exist() {
        assert!(TOOL_CATALOG.iter().filter(|t| t.featured).count() >= 5);
    }
}
