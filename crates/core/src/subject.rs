//! Descriptive attributes of the person a model is trained on.
//!
//! The wire names match what the web client sends (`"Asian American"`,
//! `"Hazel"`, ...). They are stored as plain text columns.

use serde::{Deserialize, Serialize};

/// Maximum length of a derived trigger word.
pub const TRIGGER_WORD_MAX_LEN: usize = 64;

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $( #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// The stored / wire representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }
    };
}

define_text_enum! {
    /// Kind of subject in the training photos.
    ModelType {
        Man => "Man",
        Woman => "Woman",
        Others => "Others",
    }
}

define_text_enum! {
    Ethnicity {
        White => "White",
        Black => "Black",
        AsianAmerican => "Asian American",
        EastAsian => "East Asian",
        SouthEastAsian => "South East Asian",
        SouthAsian => "South Asian",
        MiddleEastern => "Middle Eastern",
        Pacific => "Pacific",
        Hispanic => "Hispanic",
    }
}

define_text_enum! {
    EyeColor {
        Brown => "Brown",
        Blue => "Blue",
        Hazel => "Hazel",
        Gray => "Gray",
    }
}

/// Derive the trainer's trigger word from a model name.
///
/// Keeps ASCII alphanumerics, lowercases them and truncates, so the word can
/// be embedded verbatim in later prompts. Falls back to `"subject"` when the
/// name has no usable characters.
pub fn trigger_word(name: &str) -> String {
    let word: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .take(TRIGGER_WORD_MAX_LEN)
        .collect();
    if word.is_empty() {
        "subject".to_string()
    } else {
        word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_word_variants_use_spaced_wire_names() {
        let json = serde_json::to_string(&Ethnicity::SouthEastAsian).unwrap();
        assert_eq!(json, r#""South East Asian""#);
        let parsed: Ethnicity = serde_json::from_str(r#""Middle Eastern""#).unwrap();
        assert_eq!(parsed, Ethnicity::MiddleEastern);
    }

    #[test]
    fn as_str_matches_serde_name() {
        for eye in [EyeColor::Brown, EyeColor::Blue, EyeColor::Hazel, EyeColor::Gray] {
            let json = serde_json::to_string(&eye).unwrap();
            assert_eq!(json.trim_matches('"'), eye.as_str());
        }
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(serde_json::from_str::<ModelType>(r#""Robot""#).is_err());
    }

    #[test]
    fn trigger_word_strips_and_lowercases() {
        assert_eq!(trigger_word("Jane Doe-2"), "janedoe2");
        assert_eq!(trigger_word("  !! "), "subject");
        assert_eq!(trigger_word(&"x".repeat(200)).len(), TRIGGER_WORD_MAX_LEN);
    }
}
