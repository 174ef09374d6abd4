//! Read-only Bhagavad Gita content served by the RapidAPI `bhagavad-gita3`
//! service.

mod client;

pub use client::{ContentError, GitaClient, DEFAULT_HOST};

use serde::Deserialize;

pub const CHAPTER_COUNT: u32 = 18;

#[derive(Clone, Debug, Deserialize)]
pub struct Chapter {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub name_transliterated: String,
    #[serde(default)]
    pub name_translated: String,
    pub verses_count: u32,
    pub chapter_number: u32,
    #[serde(default)]
    pub name_meaning: String,
    #[serde(default)]
    pub chapter_summary: String,
}

impl Chapter {
    /// Translated name when the API provides one, the Sanskrit name otherwise.
    pub fn display_name(&self) -> &str {
        if self.name_translated.is_empty() {
            &self.name
        } else {
            &self.name_translated
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Verse {
    pub id: u32,
    pub verse_number: u32,
    pub chapter_number: u32,
    pub text: String,
    #[serde(default)]
    pub transliteration: String,
    #[serde(default)]
    pub word_meanings: String,
    #[serde(default)]
    pub translations: Vec<Translation>,
    #[serde(default)]
    pub commentaries: Vec<Commentary>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Translation {
    pub id: u32,
    pub description: String,
    pub author_name: String,
    pub language: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Commentary {
    pub id: u32,
    pub description: String,
    pub author_name: String,
    pub language: String,
}

/// Checks a chapter number before it is sent upstream.
pub fn valid_chapter(chapter: u32) -> bool {
    (1..=CHAPTER_COUNT).contains(&chapter)
}

/// Previous and next verse numbers within a chapter of `verses_count`
/// verses, `None` at either end.
pub fn neighbours(verse: u32, verses_count: u32) -> (Option<u32>, Option<u32>) {
    let prev = (verse > 1).then(|| verse - 1);
    let next = (verse < verses_count).then(|| verse + 1);
    (prev, next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_bounds() {
        assert!(!valid_chapter(0));
        assert!(valid_chapter(1));
        assert!(valid_chapter(18));
        assert!(!valid_chapter(19));
    }

    #[test]
    fn neighbours_stop_at_chapter_edges() {
        assert_eq!(neighbours(1, 47), (None, Some(2)));
        assert_eq!(neighbours(20, 47), (Some(19), Some(21)));
        assert_eq!(neighbours(47, 47), (Some(46), None));
        assert_eq!(neighbours(1, 1), (None, None));
    }

    #[test]
    fn display_name_falls_back_to_sanskrit() {
        let json = r#"{
            "id": 2,
            "name": "सांख्ययोग",
            "name_transliterated": "Sānkhya Yog",
            "name_translated": "",
            "verses_count": 72,
            "chapter_number": 2,
            "name_meaning": "Transcendental Knowledge",
            "chapter_summary": "..."
        }"#;
        let chapter: Chapter = serde_json::from_str(json).expect("chapter json");
        assert_eq!(chapter.display_name(), "सांख्ययोग");
    }
}
