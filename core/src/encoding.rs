//! Text encodings for request bodies.

use serde::{Deserialize, Serialize};

/// Encoding used to turn a POST body string into bytes.
///
/// Characters the encoding cannot represent become `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    Utf8,
    /// ISO-8859-1: one byte per code point up to U+00FF.
    Latin1,
    Ascii,
}

impl Encoding {
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Latin1 => narrow(text, 0xFF),
            Encoding::Ascii => narrow(text, 0x7F),
        }
    }
}

fn narrow(text: &str, max: u32) -> Vec<u8> {
    text.chars()
        .map(|c| match u8::try_from(c as u32) {
            Ok(b) if u32::from(b) <= max => b,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_is_passthrough() {
        assert_eq!(Encoding::Utf8.encode("é"), vec![0xC3, 0xA9]);
    }

    #[test]
    fn latin1_uses_one_byte_per_char() {
        assert_eq!(Encoding::Latin1.encode("aé"), vec![b'a', 0xE9]);
    }

    #[test]
    fn unrepresentable_chars_become_question_marks() {
        assert_eq!(Encoding::Ascii.encode("aé"), b"a?".to_vec());
        assert_eq!(Encoding::Latin1.encode("中"), b"?".to_vec());
    }

    #[test]
    fn deserializes_from_kebab_case() {
        let enc: Encoding = serde_json::from_str(r#""latin1""#).unwrap();
        assert_eq!(enc, Encoding::Latin1);
    }
}
