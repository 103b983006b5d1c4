pub mod base;
pub mod color;
pub mod encoding;
pub mod hash;
pub mod jwt;
pub mod morse;
pub mod password;
pub mod regex_gen;
pub mod roman;
pub mod text;
pub mod units;
pub mod utils;
