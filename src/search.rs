//! Case-insensitive inclusion filter over entry collections.
use log::trace;

use crate::Entry;

/// Returns the entries whose searchable fields contain `query`, ignoring
/// case, in their original order. An empty query keeps everything.
pub fn filter<'a, E: Entry>(entries: &'a [E], query: &str) -> Vec<&'a E> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return entries.iter().collect();
    }

    let matched: Vec<&E> = entries
        .iter()
        .filter(|entry| matches(*entry, &needle))
        .collect();
    trace!("Query '{}' matched {} of {} entries", query, matched.len(), entries.len());
    matched
}

/// `needle` must already be lower-cased.
fn matches<E: Entry>(entry: &E, needle: &str) -> bool {
    entry
        .search_fields()
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{EntryId, GalleryItem, Note, NoteDraft, Recipe, RecipeDraft};

    fn note(id: i64, title: &str, content: &str, category: &str) -> Note {
        Note::from_draft(NoteDraft::new(title, content, category), EntryId(id), Utc::now()).unwrap()
    }

    fn sample() -> Vec<Note> {
        vec![
            note(3, "", "Call mom", ""),
            note(2, "Plan", "Buy cake", "Shopping"),
            note(1, "Ideas list", "Paint the fence", "Ideas"),
        ]
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let notes = sample();
        let ids: Vec<EntryId> = filter(&notes, "").into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![EntryId(3), EntryId(2), EntryId(1)]);
    }

    #[test]
    fn matches_title_content_or_category_ignoring_case() {
        let notes = sample();
        assert_eq!(filter(&notes, "cake")[0].id, EntryId(2));
        assert_eq!(filter(&notes, "PLAN")[0].id, EntryId(2));
        assert_eq!(filter(&notes, "shop")[0].id, EntryId(2));
        let ideas: Vec<EntryId> = filter(&notes, "idea").into_iter().map(|n| n.id).collect();
        assert_eq!(ideas, vec![EntryId(1)]);
        assert!(filter(&notes, "zebra").is_empty());
    }

    #[test]
    fn filtering_leaves_source_untouched() {
        let notes = sample();
        let before = notes.clone();
        let _ = filter(&notes, "mom");
        assert_eq!(notes, before);
    }

    #[test]
    fn recipes_match_on_ingredient_lines() {
        let draft = RecipeDraft {
            name: "Pancakes".into(),
            ingredients: "2 Eggs\nflour".into(),
            instructions: "Mix".into(),
        };
        let recipes = vec![Recipe::from_draft(draft, EntryId(1), Utc::now()).unwrap()];
        assert_eq!(filter(&recipes, "eggs").len(), 1);
    }

    #[test]
    fn gallery_payloads_never_match_text() {
        let items = vec![GalleryItem::from_draft("data:image/png;base64,QUJD".into(), EntryId(1), Utc::now()).unwrap()];
        assert!(filter(&items, "png").is_empty());
        assert_eq!(filter(&items, "").len(), 1);
    }
}
