use crate::error::ToolError;
use base64::{engine::general_purpose, Engine as _};

pub fn base64_encode(text: &str, url_safe: bool) -> String {
    if url_safe {
        general_purpose::URL_SAFE_NO_PAD.encode(text.as_bytes())
    } else {
        general_purpose::STANDARD.encode(text.as_bytes())
    }
}

/// Decodes either alphabet, padded or not; the result must be UTF-8 text
pub fn base64_decode(encoded: &str) -> Result<String, ToolError> {
    let cleaned: String = encoded
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let unpadded = cleaned.trim_end_matches('=');

    let bytes = general_purpose::STANDARD_NO_PAD
        .decode(unpadded.as_bytes())
        .map_err(|e| ToolError::Malformed(format!("invalid base64: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|_| ToolError::Malformed("decoded bytes are not UTF-8 text".to_string()))
}

pub fn url_encode(text: &str) -> String {
    urlencoding::encode(text).into_owned()
}

pub fn url_decode(text: &str) -> Result<String, ToolError> {
    // Form encoding uses '+' for spaces
    let text = text.replace('+', "%20");
    urlencoding::decode(&text)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ToolError::Malformed("decoded text is not UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_both_alphabets() {
        assert_eq!(base64_encode("hello?>", false), "aGVsbG8/Pg==");
        assert_eq!(base64_encode("hello?>", true), "aGVsbG8_Pg");
        assert_eq!(base64_decode("aGVsbG8/Pg==").unwrap(), "hello?>");
        assert_eq!(base64_decode("aGVsbG8_Pg").unwrap(), "hello?>");
        assert_eq!(base64_decode(" aGVs\nbG8= ").unwrap(), "hello");
    }

    #[test]
    fn base64_rejects_garbage() {
        assert!(base64_decode("***").is_err());
        // 0xff 0xfe is not UTF-8
        assert!(base64_decode("//4=").is_err());
    }

    #[test]
    fn url_round_trip() {
        let encoded = url_encode("a b&c=d/é");
        assert_eq!(encoded, "a%20b%26c%3Dd%2F%C3%A9");
        assert_eq!(url_decode(&encoded).unwrap(), "a b&c=d/é");
        assert_eq!(url_decode("q=rust+lang").unwrap(), "q=rust lang");
        assert!(url_decode("%ff").is_err());
    }
}
