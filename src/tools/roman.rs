use crate::error::ToolError;

pub const MIN_ROMAN: u32 = 1;
pub const MAX_ROMAN: u32 = 3999;

// Greedy table, subtractive pairs included
const NUMERALS: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

pub fn to_roman(number: u32) -> Result<String, ToolError> {
    if !(MIN_ROMAN..=MAX_ROMAN).contains(&number) {
        return Err(ToolError::OutOfRange {
            value: i64::from(number),
            min: i64::from(MIN_ROMAN),
            max: i64::from(MAX_ROMAN),
        });
    }

    let mut remaining = number;
    let mut out = String::new();
    for (value, symbol) in NUMERALS {
        while remaining >= value {
            out.push_str(symbol);
            remaining -= value;
        }
    }
    Ok(out)
}

/// Canonical form used for comparisons: trimmed and uppercased
pub fn normalize(numeral: &str) -> String {
    numeral.trim().to_uppercase()
}

/// Parse a Roman numeral, accepting only the canonical spelling.
///
/// Overruns such as `IIII` and invalid pairs such as `VX` or `DM` are
/// rejected, as is anything outside 1-3999.
pub fn from_roman(numeral: &str) -> Result<u32, ToolError> {
    let numeral = normalize(numeral);
    if numeral.is_empty() {
        return Err(ToolError::Malformed("Roman numeral is empty".to_string()));
    }

    if let Some(bad) = numeral.chars().find(|c| !"IVXLCDM".contains(*c)) {
        return Err(ToolError::Malformed(format!(
            "'{}' is not a Roman numeral symbol (use I, V, X, L, C, D, M)",
            bad
        )));
    }

    let mut rest = numeral.as_str();
    let mut total = 0u32;
    for (value, symbol) in NUMERALS {
        while let Some(tail) = rest.strip_prefix(symbol) {
            total += value;
            rest = tail;
        }
    }

    if !rest.is_empty() || total > MAX_ROMAN {
        return Err(ToolError::Malformed(format!(
            "'{}' is not a valid Roman numeral",
            numeral
        )));
    }

    let canonical = to_roman(total)?;
    if canonical != numeral {
        return Err(ToolError::Malformed(format!(
            "'{}' is not a valid Roman numeral (did you mean {}?)",
            numeral, canonical
        )));
    }

    Ok(total)
}
