//! Recipes: a name, ingredient lines and instruction steps.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{entry::required, Entry, EntryDate, EntryId, JournalError, Placement, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: EntryId,
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub date: EntryDate,
}

/// Recipe fields as typed, ingredients and instructions one per line.
#[derive(Debug, Clone, Default)]
pub struct RecipeDraft {
    pub name: String,
    pub ingredients: String,
    pub instructions: String,
}

/// Splits multi-line input into trimmed, non-blank lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

impl Entry for Recipe {
    type Draft = RecipeDraft;

    const KEY: &'static str = "recipes";
    const PLACEMENT: Placement = Placement::Head;
    const DELETE_PROMPT: &'static str = "Delete this recipe?";

    fn id(&self) -> EntryId {
        self.id
    }

    fn set_id(&mut self, id: EntryId) {
        self.id = id;
    }

    fn from_draft(draft: RecipeDraft, id: EntryId, now: DateTime<Utc>) -> Result<Self> {
        const MISSING: &str = "Please fill in all fields";
        let name = required(&draft.name, MISSING)?;
        let ingredients = split_lines(&draft.ingredients);
        let instructions = split_lines(&draft.instructions);
        if ingredients.is_empty() || instructions.is_empty() {
            return Err(JournalError::validation(MISSING));
        }

        Ok(Recipe {
            id,
            name,
            ingredients,
            instructions,
            date: now.into(),
        })
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.ingredients.iter().map(String::as_str));
        fields.extend(self.instructions.iter().map(String::as_str));
        fields
    }
}
