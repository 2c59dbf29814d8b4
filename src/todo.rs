use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{entry::required, Entry, EntryId, Placement, Result};

/// A single task on the to-do list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: EntryId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Entry for Todo {
    /// The task text.
    type Draft = String;

    const KEY: &'static str = "todos";
    const PLACEMENT: Placement = Placement::Tail;
    const DELETE_PROMPT: &'static str = "Delete this task?";

    fn id(&self) -> EntryId {
        self.id
    }

    fn set_id(&mut self, id: EntryId) {
        self.id = id;
    }

    fn from_draft(text: String, id: EntryId, _now: DateTime<Utc>) -> Result<Self> {
        Ok(Todo {
            id,
            text: required(&text, "Please write the task first")?,
            completed: false,
        })
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.text.as_str()]
    }
}
