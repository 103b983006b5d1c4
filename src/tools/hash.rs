use crate::error::ToolError;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl FromStr for HashAlgorithm {
    type Err = ToolError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(ToolError::invalid(
                "algorithm",
                format!("'{}' is not one of sha224, sha256, sha384, sha512", input),
            )),
        }
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Lowercase hex digest of the UTF-8 bytes of `text`
pub fn digest(text: &str, algorithm: HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Sha224 => to_hex(&Sha224::digest(text.as_bytes())),
        HashAlgorithm::Sha256 => to_hex(&Sha256::digest(text.as_bytes())),
        HashAlgorithm::Sha384 => to_hex(&Sha384::digest(text.as_bytes())),
        HashAlgorithm::Sha512 => to_hex(&Sha512::digest(text.as_bytes())),
    }
}
