//! Diary entries and the moods they are written in.
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{entry::required, Entry, EntryDate, EntryId, JournalError, Placement, Result};

/// Glyph shown for entries whose mood is missing or unknown.
pub const DEFAULT_MOOD_GLYPH: &str = "😊";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mood {
    #[default]
    Happy,
    Excited,
    Calm,
    Sad,
    Thoughtful,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Happy, Mood::Excited, Mood::Calm, Mood::Sad, Mood::Thoughtful];

    /// Name stored in the `mood` field.
    pub fn key(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Excited => "excited",
            Mood::Calm => "calm",
            Mood::Sad => "sad",
            Mood::Thoughtful => "thoughtful",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Excited => "🤩",
            Mood::Calm => "😌",
            Mood::Sad => "😢",
            Mood::Thoughtful => "🤔",
        }
    }
}

impl FromStr for Mood {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        Mood::ALL
            .into_iter()
            .find(|m| m.key() == key)
            .ok_or_else(|| {
                JournalError::validation(format!(
                    "Unknown mood '{}'. Pick one of: happy, excited, calm, sad, thoughtful",
                    s
                ))
            })
    }
}

/// Glyph for a stored mood name.
pub fn mood_glyph(mood: &str) -> &'static str {
    mood.parse::<Mood>()
        .map(Mood::glyph)
        .unwrap_or(DEFAULT_MOOD_GLYPH)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: EntryId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub mood: String,
    pub date: EntryDate,
}

#[derive(Debug, Clone, Default)]
pub struct DiaryDraft {
    pub title: String,
    pub content: String,
    /// Entries written without a mood are stored as happy.
    pub mood: Option<Mood>,
}

impl Entry for DiaryEntry {
    type Draft = DiaryDraft;

    const KEY: &'static str = "diaryEntries";
    const PLACEMENT: Placement = Placement::Head;
    const DELETE_PROMPT: &'static str = "Delete this entry?";

    fn id(&self) -> EntryId {
        self.id
    }

    fn set_id(&mut self, id: EntryId) {
        self.id = id;
    }

    fn from_draft(draft: DiaryDraft, id: EntryId, now: DateTime<Utc>) -> Result<Self> {
        const MISSING: &str = "Please fill in both title and content";
        let title = required(&draft.title, MISSING)?;
        let content = required(&draft.content, MISSING)?;

        Ok(DiaryEntry {
            id,
            title,
            content,
            mood: draft.mood.unwrap_or_default().key().to_string(),
            date: now.into(),
        })
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.content.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moods_map_to_glyphs_with_fallback() {
        assert_eq!(mood_glyph("excited"), "🤩");
        assert_eq!(mood_glyph("thoughtful"), "🤔");
        assert_eq!(mood_glyph(""), DEFAULT_MOOD_GLYPH);
        assert_eq!(mood_glyph("grumpy"), DEFAULT_MOOD_GLYPH);
        assert_eq!("Calm".parse::<Mood>().unwrap(), Mood::Calm);
    }

    #[test]
    fn both_title_and_content_are_required() {
        let now = Utc::now();
        let draft = DiaryDraft {
            title: "Monday".into(),
            content: "  ".into(),
            mood: None,
        };
        assert!(DiaryEntry::from_draft(draft, EntryId(1), now).unwrap_err().is_validation());

        let draft = DiaryDraft {
            title: "Monday".into(),
            content: "Sunny".into(),
            mood: None,
        };
        let entry = DiaryEntry::from_draft(draft, EntryId(1), now).unwrap();
        assert_eq!(entry.mood, "happy");
    }
}
