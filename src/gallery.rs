//! Gallery images and the archive of saved drawings.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Entry, EntryDate, EntryId, JournalError, Placement, Result};

/// An uploaded image or saved drawing shown in the gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: EntryId,
    /// Opaque image payload, usually a data URL
    pub data: String,
    pub date: EntryDate,
}

/// A drawing kept in the drawings archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: EntryId,
    pub data: String,
    pub date: EntryDate,
}

fn payload(data: String) -> Result<String> {
    if data.trim().is_empty() {
        return Err(JournalError::validation("The image is empty"));
    }
    Ok(data)
}

impl Entry for GalleryItem {
    /// The image payload.
    type Draft = String;

    const KEY: &'static str = "gallery";
    const PLACEMENT: Placement = Placement::Tail;
    const DELETE_PROMPT: &'static str = "Delete this image?";

    fn id(&self) -> EntryId {
        self.id
    }

    fn set_id(&mut self, id: EntryId) {
        self.id = id;
    }

    fn from_draft(data: String, id: EntryId, now: DateTime<Utc>) -> Result<Self> {
        Ok(GalleryItem {
            id,
            data: payload(data)?,
            date: now.into(),
        })
    }

    // Payloads are opaque, nothing here is searchable.
    fn search_fields(&self) -> Vec<&str> {
        Vec::new()
    }
}

impl Entry for Drawing {
    type Draft = String;

    const KEY: &'static str = "drawings";
    const PLACEMENT: Placement = Placement::Tail;
    const DELETE_PROMPT: &'static str = "Delete this drawing?";

    fn id(&self) -> EntryId {
        self.id
    }

    fn set_id(&mut self, id: EntryId) {
        self.id = id;
    }

    fn from_draft(data: String, id: EntryId, now: DateTime<Utc>) -> Result<Self> {
        Ok(Drawing {
            id,
            data: payload(data)?,
            date: now.into(),
        })
    }

    fn search_fields(&self) -> Vec<&str> {
        Vec::new()
    }
}
