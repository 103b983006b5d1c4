use crate::error::ToolError;
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Structural decode of a JWT. Nothing here verifies the signature.
#[derive(Debug, Serialize)]
pub struct DecodedJwt {
    pub header: Value,
    pub payload: Value,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
}

pub fn decode(token: &str) -> Result<DecodedJwt, ToolError> {
    decode_at(token, Utc::now())
}

pub fn decode_at(token: &str, now: DateTime<Utc>) -> Result<DecodedJwt, ToolError> {
    let token = token.trim();
    let token = token
        .strip_prefix("Bearer ")
        .unwrap_or(token)
        .trim();

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(ToolError::Malformed(format!(
            "a JWT has three dot-separated parts, found {}",
            parts.len()
        )));
    }

    let header = decode_segment("header", parts[0])?;
    let payload = decode_segment("payload", parts[1])?;

    let claim_time = |name: &str| {
        payload
            .get(name)
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    };
    let expiry = claim_time("exp");

    Ok(DecodedJwt {
        algorithm: string_field(&header, "alg"),
        token_type: string_field(&header, "typ"),
        issued_at: claim_time("iat").map(|t| t.to_rfc3339()),
        not_before: claim_time("nbf").map(|t| t.to_rfc3339()),
        expires_at: expiry.map(|t| t.to_rfc3339()),
        expired: expiry.map(|t| t <= now),
        signature: parts[2].to_string(),
        header: Value::Object(header),
        payload: Value::Object(payload),
    })
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn decode_segment(name: &str, segment: &str) -> Result<Map<String, Value>, ToolError> {
    // Tolerate padding and the standard alphabet
    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|e| ToolError::Malformed(format!("{} is not valid base64url: {}", name, e)))?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ToolError::Malformed(format!("{} is not a JSON object", name))),
        Err(e) => Err(ToolError::Malformed(format!("{} is not valid JSON: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn mint(claims: &Value) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(b"not-a-real-secret"),
        )
        .unwrap()
    }

    #[test]
    fn decodes_header_and_payload() {
        let now = Utc::now();
        let exp = now.timestamp() + 3600;
        let token = mint(&json!({"sub": "user-42", "name": "Ada", "iat": now.timestamp(), "exp": exp}));

        let decoded = decode_at(&token, now).unwrap();
        assert_eq!(decoded.algorithm.as_deref(), Some("HS256"));
        assert_eq!(decoded.token_type.as_deref(), Some("JWT"));
        assert_eq!(decoded.payload["sub"], "user-42");
        assert_eq!(decoded.expired, Some(false));
        assert!(decoded.issued_at.is_some());
        assert!(!decoded.signature.is_empty());
    }

    #[test]
    fn flags_expired_tokens() {
        let now = Utc::now();
        let token = mint(&json!({"sub": "x", "exp": (now - Duration::minutes(5)).timestamp()}));
        let decoded = decode(&format!("Bearer {}", token)).unwrap();
        assert_eq!(decoded.expired, Some(true));
        assert!(decoded.expires_at.is_some());
    }

    #[test]
    fn accepts_unsigned_tokens() {
        // {"alg":"none"} . {"sub":"1"} . (empty signature)
        let decoded = decode("eyJhbGciOiJub25lIn0.eyJzdWIiOiIxIn0.").unwrap();
        assert_eq!(decoded.algorithm.as_deref(), Some("none"));
        assert_eq!(decoded.signature, "");
        assert!(decoded.expired.is_none());
    }

    #[test]
    fn rejects_structural_errors() {
        assert!(decode("abc").is_err());
        assert!(decode("a.b.c.d").is_err());
        assert!(decode("!!!.eyJzdWIiOiIxIn0.sig").is_err());
        // payload decodes to a JSON string, not an object
        let err = decode("eyJhbGciOiJub25lIn0.InN0cmluZyI.sig").unwrap_err();
        assert!(err.to_string().contains("payload is not a JSON object"));
    }
}
