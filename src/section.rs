use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// One part of a typing assessment. The variant order is the order in which
/// sections are taken.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Section {
    Words,
    Sentences,
    Paragraphs,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Words, Section::Sentences, Section::Paragraphs];

    /// Puts a user supplied selection into assessment order, dropping repeats.
    pub fn ordered(selection: &[Section]) -> Vec<Section> {
        selection.iter().copied().sorted().dedup().collect()
    }
}

/// Where a section is in its lifecycle. Sections only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionStatus {
    NotStarted,
    Active,
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lowercase() {
        assert_eq!(Section::Words.to_string(), "words");
        assert_eq!(Section::Paragraphs.to_string(), "paragraphs");
    }

    #[test]
    fn ordered_sorts_and_dedups() {
        let picked = [
            Section::Paragraphs,
            Section::Words,
            Section::Paragraphs,
            Section::Sentences,
        ];
        assert_eq!(Section::ordered(&picked), Section::ALL.to_vec());
        assert!(Section::ordered(&[]).is_empty());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Section::Sentences).unwrap();
        assert_eq!(json, "\"sentences\"");
        let back: Section = serde_json::from_str("\"words\"").unwrap();
        assert_eq!(back, Section::Words);
    }
}
