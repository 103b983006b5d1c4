use crate::error::ToolError;
use serde::Serialize;

/// Largest integer a double represents exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct BaseConversion {
    pub decimal: String,
    pub binary: String,
    pub octal: String,
    pub hexadecimal: String,
}

fn check_base(base: u32) -> Result<(), ToolError> {
    if (2..=36).contains(&base) {
        Ok(())
    } else {
        Err(ToolError::invalid("base", format!("{} is not between 2 and 36", base)))
    }
}

/// Human-readable digit alphabet of a base, e.g. "0-9, a-f"
pub fn alphabet(base: u32) -> String {
    match base {
        2..=10 => format!("0-{}", base - 1),
        11 => "0-9, a".to_string(),
        _ => format!("0-9, a-{}", (b'a' + (base - 11) as u8) as char),
    }
}

/// Parse `input` in `base`, validating every digit against the alphabet.
///
/// Accepts an optional sign and a `0b`/`0o`/`0x` prefix matching the base.
pub fn parse_in_base(input: &str, base: u32) -> Result<i64, ToolError> {
    check_base(base)?;

    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let prefix = match base {
        2 => Some(["0b", "0B"]),
        8 => Some(["0o", "0O"]),
        16 => Some(["0x", "0X"]),
        _ => None,
    };
    let digits = prefix
        .and_then(|p| p.iter().find_map(|pre| unsigned.strip_prefix(pre)))
        .unwrap_or(unsigned);

    if digits.is_empty() {
        return Err(ToolError::invalid("value", "no digits to convert"));
    }

    let mut value: i64 = 0;
    for c in digits.chars() {
        let digit = c
            .to_digit(36)
            .filter(|d| *d < base)
            .ok_or_else(|| ToolError::InvalidDigit {
                digit: c,
                base,
                alphabet: alphabet(base),
            })?;
        value = value
            .checked_mul(i64::from(base))
            .and_then(|v| v.checked_add(i64::from(digit)))
            .ok_or_else(|| ToolError::invalid("value", "number is too large"))?;
    }

    Ok(if negative { -value } else { value })
}

pub fn format_in_base(value: i64, base: u32) -> Result<String, ToolError> {
    check_base(base)?;

    if value == 0 {
        return Ok("0".to_string());
    }

    let mut magnitude = value.unsigned_abs();
    let base = u64::from(base);
    let mut out = Vec::new();
    while magnitude > 0 {
        out.push(DIGITS[(magnitude % base) as usize]);
        magnitude /= base;
    }
    if value < 0 {
        out.push(b'-');
    }
    out.reverse();
    Ok(String::from_utf8_lossy(&out).into_owned())
}

pub fn convert(input: &str, from: u32, to: u32) -> Result<String, ToolError> {
    format_in_base(parse_in_base(input, from)?, to)
}

/// Binary, octal, decimal and hex renderings at once
pub fn convert_all(input: &str, from: u32) -> Result<BaseConversion, ToolError> {
    let value = parse_in_base(input, from)?;
    Ok(BaseConversion {
        decimal: format_in_base(value, 10)?,
        binary: format_in_base(value, 2)?,
        octal: format_in_base(value, 8)?,
        hexadecimal: format_in_base(value, 16)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_between_common_bases() {
        assert_eq!(convert("255", 10, 16).unwrap(), "FF");
        assert_eq!(convert("ff", 16, 2).unwrap(), "11111111");
        assert_eq!(convert("0x1F", 16, 10).unwrap(), "31");
        assert_eq!(convert("0b101", 2, 8).unwrap(), "5");
        assert_eq!(convert("-42", 10, 2).unwrap(), "-101010");
        assert_eq!(convert("zz", 36, 10).unwrap(), "1295");
    }

    #[test]
    fn rejects_digits_outside_alphabet() {
        let err = parse_in_base("12g4", 16).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid character 'g' for base 16 (allowed: 0-9, a-f)"
        );
        assert!(matches!(
            parse_in_base("102", 2),
            Err(ToolError::InvalidDigit { digit: '2', .. })
        ));
        assert!(parse_in_base("", 10).is_err());
        assert!(parse_in_base("0x", 16).is_err());
        assert!(parse_in_base("19", 8).is_err());
    }

    #[test]
    fn rejects_bad_bases_and_overflow() {
        assert!(parse_in_base("1", 1).is_err());
        assert!(format_in_base(1, 37).is_err());
        assert!(parse_in_base("zzzzzzzzzzzzzzzzzzzz", 36).is_err());
    }

    #[test]
    fn round_trips_safe_integers() {
        let samples = [
            0,
            1,
            7,
            255,
            65_535,
            1_234_567_890,
            9_007_199_254_740_990,
            MAX_SAFE_INTEGER,
        ];
        for base in [2, 8, 10, 16] {
            for n in samples {
                let rendered = format_in_base(n, base).unwrap();
                assert_eq!(parse_in_base(&rendered, base).unwrap(), n, "base {}", base);
            }
        }
    }

    #[test]
    fn convert_all_renders_every_base() {
        let all = convert_all("10", 10).unwrap();
        assert_eq!(
            all,
            BaseConversion {
                decimal: "10".into(),
                binary: "1010".into(),
                octal: "12".into(),
                hexadecimal: "A".into(),
            }
        );
    }

    #[test]
    fn alphabets() {
        assert_eq!(alphabet(2), "0-1");
        assert_eq!(alphabet(10), "0-9");
        assert_eq!(alphabet(16), "0-9, a-f");
        assert_eq!(alphabet(36), "0-9, a-z");
    }
}
