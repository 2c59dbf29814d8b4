//! The contract every domain record fulfils so that a single repository,
//! filter and projection pipeline can serve all of them.
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::{EntryId, JournalError, Result};

/// Where a newly created entry joins its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Most recent first.
    Head,
    /// Creation order, oldest first.
    Tail,
}

/// A persisted record of one domain collection.
pub trait Entry: Clone + Serialize + DeserializeOwned {
    /// User-supplied fields for a new entry, validated by [`Entry::from_draft`].
    type Draft;

    /// Storage key of the domain's collection.
    const KEY: &'static str;

    const PLACEMENT: Placement;

    /// Question put to the user before an entry is deleted.
    const DELETE_PROMPT: &'static str;

    fn id(&self) -> EntryId;

    fn set_id(&mut self, id: EntryId);

    /// Builds an entry from a draft, or fails with a validation error when a
    /// required field is empty.
    fn from_draft(draft: Self::Draft, id: EntryId, now: DateTime<Utc>) -> Result<Self>;

    /// Text fields the search filter looks at. Title first, then content,
    /// then category where the domain has them.
    fn search_fields(&self) -> Vec<&str>;
}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn required(value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(JournalError::validation(message));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("  Plan ", "x").unwrap(), "Plan");
        let err = required(" \n\t", "Please fill in the title").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Please fill in the title");
    }
}
