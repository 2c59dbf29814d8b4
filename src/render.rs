//! Pure projections from stored entries to display-ready views.
//!
//! Nothing here touches storage or the terminal: the same entry and
//! [`RenderContext`] always give the same view. Adapters such as the HTML
//! writer and the CLI consume these views.
use std::collections::HashMap;

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::{
    category_color, is_image_data_url, mood_glyph, DiaryEntry, Entry, EntryDate, EntryId,
    GalleryItem, Note, Recipe, Todo,
};

/// `[Image: <ref>]` tokens and the drawing marker.
static CONTENT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[Image: ([^\]]+)\]|\[Drawing\]").expect("valid regex"));

/// Auxiliary data needed to expand content markers.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Image payloads addressable from `[Image: <ref>]` by reference
    pub images: HashMap<String, String>,
    /// Payload the drawing marker expands to
    pub drawing: Option<String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_drawing(mut self, drawing: Option<String>) -> Self {
        self.drawing = drawing;
        self
    }

    pub fn with_image(mut self, reference: impl Into<String>, payload: impl Into<String>) -> Self {
        self.images.insert(reference.into(), payload.into());
        self
    }

    fn resolve_image(&self, reference: &str) -> Option<String> {
        if is_image_data_url(reference) {
            return Some(reference.to_string());
        }
        self.images.get(reference).cloned()
    }
}

/// A piece of rendered body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Segment {
    Text(String),
    LineBreak,
    Image(String),
    Drawing(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBadge {
    pub label: String,
    /// Hex color without `#`
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteView {
    pub id: EntryId,
    pub title: String,
    pub category: Option<CategoryBadge>,
    pub body: Vec<Segment>,
    pub created: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiaryView {
    pub id: EntryId,
    pub title: String,
    pub glyph: &'static str,
    pub date: String,
    pub body: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoView {
    pub id: EntryId,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryView {
    pub id: EntryId,
    pub image: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeView {
    pub id: EntryId,
    pub name: String,
    pub added: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

/// Maps a stored entry to its view.
pub trait Project: Entry {
    type View: Serialize;

    /// Shown instead of the list when the collection is empty.
    const EMPTY_STATE: &'static str;

    fn project(&self, ctx: &RenderContext) -> Self::View;
}

/// Projects a (possibly filtered) sequence of entries, keeping its order.
pub fn project_all<'a, E, I>(entries: I, ctx: &RenderContext) -> Vec<E::View>
where
    E: Project + 'a,
    I: IntoIterator<Item = &'a E>,
{
    entries.into_iter().map(|entry| entry.project(ctx)).collect()
}

fn short_date(date: &EntryDate) -> String {
    date.format_local("%-m/%-d/%Y")
}

fn long_date(date: &EntryDate) -> String {
    date.format_local("%A, %B %-d, %Y")
}

/// Appends `text`, turning newlines into explicit breaks and merging with a
/// preceding text segment.
fn push_text(segments: &mut Vec<Segment>, text: &str) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            segments.push(Segment::LineBreak);
        }
        if line.is_empty() {
            continue;
        }
        match segments.last_mut() {
            Some(Segment::Text(existing)) => existing.push_str(line),
            _ => segments.push(Segment::Text(line.to_string())),
        }
    }
}

fn plain_body(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    push_text(&mut segments, text);
    segments
}

/// Splits note content into segments, expanding image tokens that resolve
/// and the first drawing marker when a drawing is available. Anything that
/// cannot be expanded stays as literal text.
pub fn expand_content(content: &str, ctx: &RenderContext) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut drawing_placed = false;
    let mut last = 0;

    for caps in CONTENT_TOKEN.captures_iter(content) {
        let Some(token) = caps.get(0) else {
            continue;
        };
        push_text(&mut segments, &content[last..token.start()]);
        last = token.end();

        let expanded = match caps.get(1) {
            Some(reference) => ctx.resolve_image(reference.as_str()).map(Segment::Image),
            None if !drawing_placed => ctx.drawing.clone().map(Segment::Drawing),
            None => None,
        };

        match expanded {
            Some(segment) => {
                drawing_placed |= matches!(segment, Segment::Drawing(_));
                segments.push(segment);
            }
            None => push_text(&mut segments, token.as_str()),
        }
    }

    push_text(&mut segments, &content[last..]);
    segments
}

impl Project for Note {
    type View = NoteView;

    const EMPTY_STATE: &'static str = "No notes yet! Add something pretty";

    fn project(&self, ctx: &RenderContext) -> NoteView {
        let category = (!self.category.is_empty()).then(|| CategoryBadge {
            label: self.category.clone(),
            color: category_color(&self.category),
        });
        let title = if self.title.is_empty() {
            "Untitled".to_string()
        } else {
            self.title.clone()
        };

        NoteView {
            id: self.id,
            title,
            category,
            body: expand_content(&self.content, ctx),
            created: self
                .created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
        }
    }
}

impl Project for DiaryEntry {
    type View = DiaryView;

    const EMPTY_STATE: &'static str = "No entries yet! Start writing...";

    fn project(&self, _ctx: &RenderContext) -> DiaryView {
        DiaryView {
            id: self.id,
            title: self.title.clone(),
            glyph: mood_glyph(&self.mood),
            date: long_date(&self.date),
            body: plain_body(&self.content),
        }
    }
}

impl Project for Todo {
    type View = TodoView;

    const EMPTY_STATE: &'static str = "No tasks yet! Add one to get started";

    fn project(&self, _ctx: &RenderContext) -> TodoView {
        TodoView {
            id: self.id,
            text: self.text.clone(),
            completed: self.completed,
        }
    }
}

impl Project for GalleryItem {
    type View = GalleryView;

    const EMPTY_STATE: &'static str = "No images yet! Upload some memories";

    fn project(&self, _ctx: &RenderContext) -> GalleryView {
        GalleryView {
            id: self.id,
            image: self.data.clone(),
            date: short_date(&self.date),
        }
    }
}

impl Project for Recipe {
    type View = RecipeView;

    const EMPTY_STATE: &'static str = "No recipes yet! Add your favorites";

    fn project(&self, _ctx: &RenderContext) -> RecipeView {
        RecipeView {
            id: self.id,
            name: self.name.clone(),
            added: format!("Added on {}", short_date(&self.date)),
            ingredients: self.ingredients.clone(),
            instructions: self.instructions.clone(),
        }
    }
}
