use crate::error::ToolError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const MIN_LENGTH: usize = 4;
pub const MAX_LENGTH: usize = 128;

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:,.<>?";
const AMBIGUOUS: &str = "Il1O0o";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub exclude_ambiguous: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: 16,
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
            exclude_ambiguous: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GeneratedPassword {
    pub password: String,
    pub entropy_bits: f64,
    pub strength: &'static str,
}

fn character_classes(options: &PasswordOptions) -> Vec<Vec<char>> {
    [
        (options.uppercase, UPPERCASE),
        (options.lowercase, LOWERCASE),
        (options.digits, DIGITS),
        (options.symbols, SYMBOLS),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .map(|(_, set)| {
        set.chars()
            .filter(|c| !(options.exclude_ambiguous && AMBIGUOUS.contains(*c)))
            .collect()
    })
    .collect()
}

pub fn strength_label(entropy_bits: f64) -> &'static str {
    match entropy_bits {
        e if e < 40.0 => "weak",
        e if e < 60.0 => "fair",
        e if e < 80.0 => "strong",
        _ => "very strong",
    }
}

pub fn generate(options: &PasswordOptions) -> Result<GeneratedPassword, ToolError> {
    generate_with(options, &mut rand::rng())
}

/// Every selected class contributes at least one character
pub fn generate_with<R: Rng + ?Sized>(
    options: &PasswordOptions,
    rng: &mut R,
) -> Result<GeneratedPassword, ToolError> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&options.length) {
        return Err(ToolError::OutOfRange {
            value: options.length as i64,
            min: MIN_LENGTH as i64,
            max: MAX_LENGTH as i64,
        });
    }

    let classes = character_classes(options);
    if classes.is_empty() {
        return Err(ToolError::invalid(
            "options",
            "select at least one character set",
        ));
    }

    let pool: Vec<char> = classes.iter().flatten().copied().collect();
    let mut chars: Vec<char> = classes
        .iter()
        .map(|class| class[rng.random_range(0..class.len())])
        .collect();
    while chars.len() < options.length {
        chars.push(pool[rng.random_range(0..pool.len())]);
    }
    chars.shuffle(rng);

    let entropy_bits = options.length as f64 * (pool.len() as f64).log2();
    Ok(GeneratedPassword {
        password: chars.into_iter().collect(),
        entropy_bits: (entropy_bits * 10.0).round() / 10.0,
        strength: strength_label(entropy_bits),
    })
}
