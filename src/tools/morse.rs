use crate::error::ToolError;

const CODE: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('-', "-....-"),
    ('_', "..--.-"),
    ('"', ".-..-."),
    ('$', "...-..-"),
    ('@', ".--.-."),
];

/// Letters separated by spaces, words by " / "
pub fn encode(text: &str) -> Result<String, ToolError> {
    let words = text
        .split_whitespace()
        .map(|word| {
            word.chars()
                .map(|c| {
                    let upper = c.to_ascii_uppercase();
                    CODE.iter()
                        .find(|(symbol, _)| *symbol == upper)
                        .map(|(_, code)| *code)
                        .ok_or_else(|| {
                            ToolError::Malformed(format!("'{}' has no Morse code equivalent", c))
                        })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(|codes| codes.join(" "))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(words.join(" / "))
}

/// Accepts `/` or a run of three spaces as the word separator
pub fn decode(morse: &str) -> Result<String, ToolError> {
    let normalized = morse.trim().replace("   ", " / ");

    let words = normalized
        .split('/')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(|word| {
            word.split_whitespace()
                .map(|code| {
                    CODE.iter()
                        .find(|(_, known)| *known == code)
                        .map(|(symbol, _)| *symbol)
                        .ok_or_else(|| {
                            ToolError::Malformed(format!("'{}' is not a Morse code sequence", code))
                        })
                })
                .collect::<Result<String, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_words() {
        assert_eq!(encode("SOS").unwrap(), "... --- ...");
        assert_eq!(encode("hi  there").unwrap(), ".... .. / - .... . .-. .");
    }

    #[test]
    fn decodes_both_word_separators() {
        assert_eq!(decode(".... .. / - .... . .-. .").unwrap(), "HI THERE");
        assert_eq!(decode(".... ..   .-- --- .-. .-.. -..").unwrap(), "HI WORLD");
    }

    #[test]
    fn round_trip_uppercases() {
        let text = "Rust 2024, ok?";
        assert_eq!(decode(&encode(text).unwrap()).unwrap(), "RUST 2024, OK?");
    }

    #[test]
    fn rejects_unknown_symbols() {
        assert!(encode("naïve").is_err());
        assert!(decode("...---...---").is_err());
    }
}
