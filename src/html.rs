//! HTML rendering adapter for projected views.
//!
//! Markup is assembled as a `pulldown-cmark` event stream so that all user
//! text goes through its HTML writer and is escaped on the way out.
use pulldown_cmark::{html, CowStr, Event, LinkType, Tag, TagEnd};

use crate::{
    DiaryEntry, DiaryView, GalleryItem, GalleryView, Note, NoteView, Project, Recipe, RecipeView,
    Segment, Todo, TodoView,
};

#[derive(Default)]
struct Markup<'a> {
    events: Vec<Event<'a>>,
}

impl<'a> Markup<'a> {
    fn raw(&mut self, html: impl Into<CowStr<'a>>) -> &mut Self {
        self.events.push(Event::Html(html.into()));
        self
    }

    fn text(&mut self, text: impl Into<CowStr<'a>>) -> &mut Self {
        self.events.push(Event::Text(text.into()));
        self
    }

    fn image(&mut self, src: &'a str, alt: &'a str) -> &mut Self {
        self.events.push(Event::Start(Tag::Image {
            link_type: LinkType::Inline,
            dest_url: src.into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        self.events.push(Event::Text(alt.into()));
        self.events.push(Event::End(TagEnd::Image));
        self
    }

    fn segments(&mut self, segments: &'a [Segment]) -> &mut Self {
        for segment in segments {
            match segment {
                Segment::Text(text) => {
                    self.text(text.as_str());
                }
                Segment::LineBreak => {
                    self.raw("<br>");
                }
                Segment::Image(src) => {
                    self.image(src, "Note image");
                }
                Segment::Drawing(src) => {
                    self.raw("<div class=\"note-drawing\">")
                        .image(src, "Drawing")
                        .raw("</div>");
                }
            }
        }
        self
    }

    fn empty_state(&mut self, message: &'static str) -> &mut Self {
        self.raw("<div class=\"empty-state\">").text(message).raw("</div>\n")
    }

    fn finish(self) -> String {
        let mut out = String::new();
        html::push_html(&mut out, self.events.into_iter());
        out
    }
}

pub fn render_notes(views: &[NoteView]) -> String {
    let mut markup = Markup::default();
    if views.is_empty() {
        markup.empty_state(Note::EMPTY_STATE);
    }
    for view in views {
        markup.raw(format!("<div class=\"note\" data-id=\"{}\">\n", view.id));
        if let Some(badge) = &view.category {
            markup
                .raw(format!(
                    "<span class=\"note-category\" style=\"background:#{}\">",
                    badge.color
                ))
                .text(badge.label.as_str())
                .raw("</span>\n");
        }
        markup
            .raw("<div class=\"note-title\">")
            .text(view.title.as_str())
            .raw("</div>\n<div class=\"note-content\">")
            .segments(&view.body)
            .raw("</div>\n</div>\n");
    }
    markup.finish()
}

pub fn render_diary(views: &[DiaryView]) -> String {
    let mut markup = Markup::default();
    if views.is_empty() {
        markup.empty_state(DiaryEntry::EMPTY_STATE);
    }
    for view in views {
        markup
            .raw(format!("<div class=\"entry-item\" data-id=\"{}\">\n<h3>", view.id))
            .text(view.title.as_str())
            .text(" ")
            .text(view.glyph)
            .raw("</h3>\n<div class=\"date\">")
            .text(view.date.as_str())
            .raw("</div>\n<p>")
            .segments(&view.body)
            .raw("</p>\n</div>\n");
    }
    markup.finish()
}

pub fn render_todos(views: &[TodoView]) -> String {
    let mut markup = Markup::default();
    if views.is_empty() {
        markup.empty_state(Todo::EMPTY_STATE);
    }
    for view in views {
        let (class, checked) = if view.completed {
            ("todo-item completed", " checked")
        } else {
            ("todo-item", "")
        };
        markup
            .raw(format!(
                "<div class=\"{}\" data-id=\"{}\">\n<input type=\"checkbox\" disabled{}>\n<span>",
                class, view.id, checked
            ))
            .text(view.text.as_str())
            .raw("</span>\n</div>\n");
    }
    markup.finish()
}

pub fn render_gallery(views: &[GalleryView]) -> String {
    let mut markup = Markup::default();
    if views.is_empty() {
        markup.empty_state(GalleryItem::EMPTY_STATE);
    }
    for view in views {
        markup
            .raw(format!("<div class=\"gallery-item\" data-id=\"{}\">\n", view.id))
            .image(&view.image, "Gallery image")
            .raw("\n</div>\n");
    }
    markup.finish()
}

pub fn render_recipes(views: &[RecipeView]) -> String {
    let mut markup = Markup::default();
    if views.is_empty() {
        markup.empty_state(Recipe::EMPTY_STATE);
    }
    for view in views {
        markup
            .raw(format!("<div class=\"recipe-item\" data-id=\"{}\">\n<h3>", view.id))
            .text(view.name.as_str())
            .raw("</h3>\n<div class=\"date\">")
            .text(view.added.as_str())
            .raw("</div>\n<h4>Ingredients:</h4>\n<ul>\n");
        for ingredient in &view.ingredients {
            markup.raw("<li>").text(ingredient.as_str()).raw("</li>\n");
        }
        markup.raw("</ul>\n<h4>Instructions:</h4>\n<ol>\n");
        for step in &view.instructions {
            markup.raw("<li>").text(step.as_str()).raw("</li>\n");
        }
        markup.raw("</ol>\n</div>\n");
    }
    markup.finish()
}

/// Every section of a standalone export page.
#[derive(Debug, Default)]
pub struct PageSections {
    pub notes: Vec<NoteView>,
    pub diary: Vec<DiaryView>,
    pub todos: Vec<TodoView>,
    pub gallery: Vec<GalleryView>,
    pub recipes: Vec<RecipeView>,
}

/// A complete HTML document with one section per domain.
pub fn render_page(title: &str, sections: &PageSections) -> String {
    let mut head = Markup::default();
    head.raw("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>")
        .text(title)
        .raw("</title>\n</head>\n<body>\n<h1>")
        .text(title)
        .raw("</h1>\n");

    let parts = [
        ("notes", "Notes", render_notes(&sections.notes)),
        ("diary", "Diary", render_diary(&sections.diary)),
        ("todos", "To-Do", render_todos(&sections.todos)),
        ("gallery", "Gallery", render_gallery(&sections.gallery)),
        ("recipes", "Recipes", render_recipes(&sections.recipes)),
    ];

    let mut page = head.finish();
    for (id, heading, body) in parts {
        page.push_str(&format!("<section id=\"{}\">\n<h2>{}</h2>\n", id, heading));
        page.push_str(&body);
        page.push_str("</section>\n");
    }
    page.push_str("</body>\n</html>\n");
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CategoryBadge, EntryId};

    fn note_view(title: &str, body: Vec<Segment>) -> NoteView {
        NoteView {
            id: EntryId(7),
            title: title.into(),
            category: Some(CategoryBadge { label: "Work".into(), color: "a29bfe" }),
            body,
            created: "2024-01-01 09:00".into(),
        }
    }

    #[test]
    fn empty_collections_render_their_empty_state() {
        assert!(render_notes(&[]).contains("No notes yet!"));
        assert!(render_recipes(&[]).contains("No recipes yet!"));
    }

    #[test]
    fn user_text_is_escaped() {
        let html = render_notes(&[note_view("<b>bold</b>", vec![Segment::Text("a & b".into())])]);
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("background:#a29bfe"));
        assert!(html.contains("data-id=\"7\""));
    }

    #[test]
    fn images_and_breaks_are_emitted() {
        let html = render_notes(&[note_view(
            "Trip",
            vec![
                Segment::Text("Beach".into()),
                Segment::LineBreak,
                Segment::Image("data:image/png;base64,AAAA".into()),
            ],
        )]);
        assert!(html.contains("Beach<br>"));
        assert!(html.contains("<img src=\"data:image/png;base64,AAAA\""));
    }

    #[test]
    fn completed_todos_are_marked() {
        let html = render_todos(&[TodoView { id: EntryId(1), text: "Buy flowers".into(), completed: true }]);
        assert!(html.contains("todo-item completed"));
        assert!(html.contains("checked"));
    }

    #[test]
    fn page_has_every_section() {
        let page = render_page("My journal", &PageSections::default());
        for id in ["notes", "diary", "todos", "gallery", "recipes"] {
            assert!(page.contains(&format!("<section id=\"{}\">", id)));
        }
        assert!(page.starts_with("<!DOCTYPE html>"));
    }
}
