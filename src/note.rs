//! Notes: titled free text with a category, inline images and an optional
//! drawing marker.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Entry, EntryId, JournalError, Placement, Result};

/// Token appended to a note's content when it was saved with a drawing.
pub const DRAWING_MARKER: &str = "[Drawing]";

/// Color used for notes without a recognised category.
pub const DEFAULT_CATEGORY_COLOR: &str = "ffd1dc";

/// The fixed set of note categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    MyDay,
    Personal,
    Work,
    ToDo,
    Birthdays,
    Ideas,
    Shopping,
    Groceries,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::MyDay,
        Category::Personal,
        Category::Work,
        Category::ToDo,
        Category::Birthdays,
        Category::Ideas,
        Category::Shopping,
        Category::Groceries,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::MyDay => "My Day",
            Category::Personal => "Personal",
            Category::Work => "Work",
            Category::ToDo => "To Do",
            Category::Birthdays => "Birthdays",
            Category::Ideas => "Ideas",
            Category::Shopping => "Shopping",
            Category::Groceries => "Groceries",
        }
    }

    /// Hex color, without the leading `#`.
    pub fn color(self) -> &'static str {
        match self {
            Category::MyDay => "ff9ff3",
            Category::Personal => "fd79a8",
            Category::Work => "a29bfe",
            Category::ToDo => "00b894",
            Category::Birthdays => "feca57",
            Category::Ideas => "48dbfb",
            Category::Shopping => "ff7675",
            Category::Groceries => "1dd1a1",
        }
    }

    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }
}

/// Display color for a stored category label.
pub fn category_color(label: &str) -> &'static str {
    Category::from_label(label)
        .map(Category::color)
        .unwrap_or(DEFAULT_CATEGORY_COLOR)
}

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier; notes saved before ids existed load as zero
    #[serde(default)]
    pub id: EntryId,
    /// Possibly empty title
    pub title: String,
    /// Free text, may embed `[Image: ...]` tokens and the drawing marker
    pub content: String,
    /// Category label, empty when none was picked
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub category_color: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new note as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub category: String,
    pub with_drawing: bool,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: category.into(),
            with_drawing: false,
        }
    }

    /// Embeds an image payload at the end of the content.
    pub fn attach_image(&mut self, payload: &str) -> Result<()> {
        if payload.trim().is_empty() || payload.contains(']') {
            return Err(JournalError::InvalidPayload {
                message: "image payload must be non-empty and cannot contain ']'".to_string(),
            });
        }
        self.content.push_str(&format!("\n[Image: {}]", payload));
        Ok(())
    }

    /// Marks the note as carrying the current drawing.
    pub fn with_drawing(mut self, present: bool) -> Self {
        self.with_drawing = present;
        self
    }
}

impl Entry for Note {
    type Draft = NoteDraft;

    const KEY: &'static str = "notes";
    const PLACEMENT: Placement = Placement::Head;
    const DELETE_PROMPT: &'static str = "Delete this note?";

    fn id(&self) -> EntryId {
        self.id
    }

    fn set_id(&mut self, id: EntryId) {
        self.id = id;
    }

    fn from_draft(draft: NoteDraft, id: EntryId, now: DateTime<Utc>) -> Result<Self> {
        let title = draft.title.trim().to_string();
        let mut content = draft.content.trim().to_string();
        if draft.with_drawing {
            content.push('\n');
            content.push_str(DRAWING_MARKER);
        }

        if title.is_empty() && content.is_empty() {
            return Err(JournalError::validation(
                "Please write a title or some content for your note",
            ));
        }

        let category = draft.category.trim().to_string();
        Ok(Note {
            id,
            title,
            content,
            category_color: category_color(&category).to_string(),
            category,
            created_at: now,
        })
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.content.as_str(), self.category.as_str()]
    }
}
