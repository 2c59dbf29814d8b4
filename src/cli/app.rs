//! CLI module for the keepsake application
//!
//! This module handles the command-line interface for interacting with the
//! journal's collections.
use std::{
    fs::{self, read_to_string, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process::Command,
};

use console::style;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use shell_words::split;
use tempfile::Builder;

use crate::{
    html, project_all, read_image_file, read_image_files, AlwaysConfirm, Commands, Config,
    Confirmation, DeleteOutcome, DiaryAction, DiaryDraft, DiaryEntry, DiaryView, DrawingAction,
    DrawingCapture, Entry, EntryId, GalleryAction, GalleryItem, GalleryView, Journal,
    JournalError, Mood, Note, NoteAction, NoteDraft, NoteView, Project, Recipe, RecipeAction,
    RecipeDraft, RecipeView, RenderContext, Repository, Result, Segment, StoredDrawing,
    TerminalPrompt, Todo, TodoAction, TodoView,
};

static EDITOR_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

/// CLI Application handler - processes CLI commands against the journal
pub struct App {
    journal: Journal,

    /// The canvas state shared between invocations
    drawing: StoredDrawing,

    /// Application configuration
    config: Config,

    /// Path the configuration was loaded from
    config_path: PathBuf,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    /// Create a new CLI application over an opened journal
    pub fn new(journal: Journal, config: Config, config_path: PathBuf, verbose: bool) -> Self {
        let drawing = StoredDrawing::new(journal.store());
        Self {
            journal,
            drawing,
            config,
            config_path,
            verbose,
        }
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Note { action } => self.handle_note(action),
            Commands::Diary { action } => self.handle_diary(action),
            Commands::Todo { action } => self.handle_todo(action),
            Commands::Gallery { action } => self.handle_gallery(action),
            Commands::Recipe { action } => self.handle_recipe(action),
            Commands::Drawing { action } => self.handle_drawing(action),
            Commands::Search { query, json } => self.handle_search(&query, json),
            Commands::Export { output } => self.handle_export(&output),
            Commands::Config { show, set, reset } => self.handle_config(show, set, reset),
        }
    }

    fn confirmation(&self, force: bool) -> &'static dyn Confirmation {
        if force || !self.config.confirm_deletes {
            &AlwaysConfirm
        } else {
            &TerminalPrompt
        }
    }

    fn render_context(&self) -> RenderContext {
        RenderContext::new().with_drawing(self.drawing.current_drawing())
    }

    fn handle_note(&mut self, action: NoteAction) -> Result<()> {
        match action {
            NoteAction::Add {
                title,
                content,
                category,
                image,
                drawing,
                edit,
            } => {
                let content = match (content, edit) {
                    (Some(c), _) => c,
                    (None, true) => self.open_editor_for_content(&title)?,
                    (None, false) => String::new(),
                };

                if let Some(path) = drawing {
                    let payload = read_image_file(&path)?;
                    self.drawing.set_drawing(payload)?;
                }

                let with_drawing = self.drawing.current_drawing().is_some();
                let mut draft = NoteDraft::new(title, content, category).with_drawing(with_drawing);
                for payload in read_image_files(&image)? {
                    draft.attach_image(&payload)?;
                }

                let note = self.journal.notes.create(draft)?;
                // The canvas starts over once a note has taken the drawing.
                if with_drawing {
                    self.drawing.clear()?;
                }
                println!("Note created with ID: {}", note.id);
            }

            NoteAction::List { query, json } => {
                let ctx = self.render_context();
                let notes = self.journal.notes.search(query.as_deref().unwrap_or(""));
                let views = project_all(notes, &ctx);
                if json {
                    print_json(&views)?;
                } else {
                    self.display_notes_text(&views);
                }
            }

            NoteAction::Delete { id, force } => {
                let confirmation = self.confirmation(force);
                delete_with_preview(&mut self.journal.notes, id, confirmation, |note: &Note| {
                    format!("Note: {}", if note.title.is_empty() { "Untitled" } else { note.title.as_str() })
                })?;
            }
        }
        Ok(())
    }

    fn handle_diary(&mut self, action: DiaryAction) -> Result<()> {
        match action {
            DiaryAction::Add {
                title,
                content,
                mood,
                edit,
            } => {
                let content = match (content, edit) {
                    (Some(c), _) => c,
                    (None, true) => self.open_editor_for_content(&title)?,
                    (None, false) => String::new(),
                };
                let mood = mood.map(|m| m.parse::<Mood>()).transpose()?;

                let entry = self.journal.diary.create(DiaryDraft {
                    title,
                    content,
                    mood,
                })?;
                println!("Diary entry saved with ID: {}", entry.id);
            }

            DiaryAction::List { query, json } => {
                let ctx = self.render_context();
                let entries = self.journal.diary.search(query.as_deref().unwrap_or(""));
                let views = project_all(entries, &ctx);
                if json {
                    print_json(&views)?;
                } else {
                    self.display_diary_text(&views);
                }
            }

            DiaryAction::Delete { id, force } => {
                let confirmation = self.confirmation(force);
                delete_with_preview(&mut self.journal.diary, id, confirmation, |entry: &DiaryEntry| {
                    format!("Diary entry: {}", entry.title)
                })?;
            }
        }
        Ok(())
    }

    fn handle_todo(&mut self, action: TodoAction) -> Result<()> {
        match action {
            TodoAction::Add { text } => {
                let todo = self.journal.todos.create(text)?;
                println!("Task added with ID: {}", todo.id);
            }

            TodoAction::List { json } => {
                let views = project_all(self.journal.todos.entries(), &RenderContext::new());
                if json {
                    print_json(&views)?;
                } else {
                    self.display_todos_text(&views);
                }
            }

            TodoAction::Toggle { id } => match self.journal.todos.toggle(id)? {
                Some(true) => println!("Task {} marked done.", id),
                Some(false) => println!("Task {} reopened.", id),
                None => println!("No task with ID {}.", id),
            },

            TodoAction::Delete { id, force } => {
                let confirmation = self.confirmation(force);
                delete_with_preview(&mut self.journal.todos, id, confirmation, |todo: &Todo| {
                    format!("Task: {}", todo.text)
                })?;
            }
        }
        Ok(())
    }

    fn handle_gallery(&mut self, action: GalleryAction) -> Result<()> {
        match action {
            GalleryAction::Add { files } => {
                let payloads = read_image_files(&files)?;
                let added = self.journal.gallery.add_payloads(payloads)?;
                for item in &added {
                    println!("Image added with ID: {}", item.id);
                }
            }

            GalleryAction::List { json } => {
                let views = project_all(self.journal.gallery.entries(), &RenderContext::new());
                if json {
                    print_json(&views)?;
                } else {
                    self.display_gallery_text(&views);
                }
            }

            GalleryAction::Delete { id, force } => {
                let confirmation = self.confirmation(force);
                delete_with_preview(&mut self.journal.gallery, id, confirmation, |item: &GalleryItem| {
                    format!("Image added on {}", item.date.format_local("%Y-%m-%d"))
                })?;
            }
        }
        Ok(())
    }

    fn handle_recipe(&mut self, action: RecipeAction) -> Result<()> {
        match action {
            RecipeAction::Add {
                name,
                ingredients,
                instructions,
            } => {
                let recipe = self.journal.recipes.create(RecipeDraft {
                    name,
                    ingredients,
                    instructions,
                })?;
                println!("Recipe saved with ID: {}", recipe.id);
            }

            RecipeAction::List { query, json } => {
                let recipes = self.journal.recipes.search(query.as_deref().unwrap_or(""));
                let views = project_all(recipes, &RenderContext::new());
                if json {
                    print_json(&views)?;
                } else {
                    self.display_recipes_text(&views);
                }
            }

            RecipeAction::Delete { id, force } => {
                let confirmation = self.confirmation(force);
                delete_with_preview(&mut self.journal.recipes, id, confirmation, |recipe: &Recipe| {
                    format!("Recipe: {}", recipe.name)
                })?;
            }
        }
        Ok(())
    }

    fn handle_drawing(&mut self, action: DrawingAction) -> Result<()> {
        match action {
            DrawingAction::Save { file } => {
                let payload = read_image_file(&file)?;
                let item = self.journal.save_drawing(payload)?;
                println!("Drawing saved! Check your gallery (image ID: {}).", item.id);
            }
            DrawingAction::Set { file } => {
                let payload = read_image_file(&file)?;
                self.drawing.set_drawing(payload)?;
                println!("Current drawing set; new notes will include it.");
            }
            DrawingAction::Clear => {
                self.drawing.clear()?;
                println!("Current drawing cleared.");
            }
        }
        Ok(())
    }

    fn handle_search(&self, query: &str, json: bool) -> Result<()> {
        let results = self.journal.search(query);

        if json {
            return print_json(&results);
        }

        let ctx = self.render_context();
        if results.total() == 0 {
            println!("Nothing found matching \"{}\"", query);
            return Ok(());
        }

        if !results.notes.is_empty() {
            println!("{}", style("Notes").bold().underlined());
            self.display_notes_text(&project_all(results.notes.iter().copied(), &ctx));
        }
        if !results.diary.is_empty() {
            println!("\n{}", style("Diary").bold().underlined());
            self.display_diary_text(&project_all(results.diary.iter().copied(), &ctx));
        }
        if !results.todos.is_empty() {
            println!("\n{}", style("To-Do").bold().underlined());
            self.display_todos_text(&project_all(results.todos.iter().copied(), &ctx));
        }
        if !results.recipes.is_empty() {
            println!("\n{}", style("Recipes").bold().underlined());
            self.display_recipes_text(&project_all(results.recipes.iter().copied(), &ctx));
        }

        println!(
            "\nFound {} matching entr{}.",
            results.total(),
            if results.total() == 1 { "y" } else { "ies" }
        );
        Ok(())
    }

    fn handle_export(&self, output: &Path) -> Result<()> {
        let sections = self.journal.page_sections(&self.render_context());
        let page = html::render_page("My Journal", &sections);
        fs::write(output, page)?;
        info!("Exported journal to {}", output.display());
        println!("Journal exported to {}", output.display());
        Ok(())
    }

    fn handle_config(&mut self, show: bool, set: Option<String>, reset: bool) -> Result<()> {
        let changing = reset || set.is_some();

        if reset {
            self.config = Config::default();
            self.config.save(&self.config_path)?;
            println!("Configuration reset to defaults.");
        }

        if let Some(assignment) = set {
            self.config.set(&assignment)?;
            self.config.save(&self.config_path)?;
            println!("Configuration updated.");
        }

        if show || !changing {
            println!("Config file: {}", self.config_path.display());
            println!("{}", serde_json::to_string_pretty(&self.config)?);
        }
        Ok(())
    }

    fn open_editor_for_content(&self, title: &str) -> Result<String> {
        let temp_file = Builder::new().suffix(".md").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        let editor_cmd = self.config.get_editor_command();
        self.write_editor_template(&temp_path, title)?;

        info!("Opening editor to write content. Save and exit when done...");
        self.launch_editor(&editor_cmd, &temp_path)?;

        let content = read_to_string(&temp_path)?;
        Ok(strip_editor_comments(&content))
    }

    fn write_editor_template(&self, path: &Path, title: &str) -> Result<()> {
        let mut file = OpenOptions::new().write(true).open(path)?;

        writeln!(file, "<!-- {} -->", title)?;
        writeln!(file, "<!-- ")?;
        writeln!(file, "Write below this block. Comment blocks like this one are dropped.")?;
        writeln!(file, "Save and exit the editor when you're done.")?;
        writeln!(file, "-->")?;
        writeln!(file)?;

        Ok(())
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        let args = split(editor_cmd).map_err(|e| JournalError::EditorError {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        let Some((program, rest)) = args.split_first() else {
            return Err(JournalError::EditorError {
                message: "Empty editor command".to_string(),
            });
        };

        let status = Command::new(program).args(rest).arg(file_path).status()?;

        if !status.success() {
            return Err(JournalError::EditorError {
                message: "Editor exited with non-zero status".to_string(),
            });
        }

        Ok(())
    }

    fn separator(&self) -> String {
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);
        "-".repeat(term_width.min(50))
    }

    fn display_notes_text(&self, views: &[NoteView]) {
        if views.is_empty() {
            println!("{}", style(Note::EMPTY_STATE).magenta());
            return;
        }

        for (i, view) in views.iter().enumerate() {
            if i > 0 {
                println!("{}", self.separator());
            }
            println!("ID: {} | Created: {}", view.id, view.created);
            print!("{}", style(&view.title).bold());
            if let Some(badge) = &view.category {
                print!("  {}", style(format!("[{}]", badge.label)).magenta());
            }
            println!();
            println!("{}", segments_text(&view.body));
        }
    }

    fn display_diary_text(&self, views: &[DiaryView]) {
        if views.is_empty() {
            println!("{}", style(DiaryEntry::EMPTY_STATE).magenta());
            return;
        }

        for (i, view) in views.iter().enumerate() {
            if i > 0 {
                println!("{}", self.separator());
            }
            println!("{} {}", style(&view.title).bold(), view.glyph);
            println!("{}", style(&view.date).dim());
            println!("{}", segments_text(&view.body));
            if self.verbose {
                println!("ID: {}", view.id);
            }
        }
    }

    fn display_todos_text(&self, views: &[TodoView]) {
        if views.is_empty() {
            println!("{}", style(Todo::EMPTY_STATE).magenta());
            return;
        }

        for view in views {
            if view.completed {
                println!("[x] {}  {}", style(&view.text).strikethrough().dim(), style(view.id).dim());
            } else {
                println!("[ ] {}  {}", view.text, style(view.id).dim());
            }
        }
    }

    fn display_gallery_text(&self, views: &[GalleryView]) {
        if views.is_empty() {
            println!("{}", style(GalleryItem::EMPTY_STATE).magenta());
            return;
        }

        for view in views {
            let kind = view
                .image
                .strip_prefix("data:")
                .and_then(|rest| rest.split(';').next())
                .unwrap_or("image");
            println!("ID: {} | {} | {} ({} bytes)", view.id, view.date, kind, view.image.len());
        }
    }

    fn display_recipes_text(&self, views: &[RecipeView]) {
        if views.is_empty() {
            println!("{}", style(Recipe::EMPTY_STATE).magenta());
            return;
        }

        for (i, view) in views.iter().enumerate() {
            if i > 0 {
                println!("{}", self.separator());
            }
            println!("{}  {}", style(&view.name).bold(), style(view.id).dim());
            println!("{}", style(&view.added).dim());
            println!("\nIngredients:");
            for ingredient in &view.ingredients {
                println!("  - {}", ingredient);
            }
            println!("\nInstructions:");
            for (n, step) in view.instructions.iter().enumerate() {
                println!("  {}. {}", n + 1, step);
            }
        }
    }
}

/// Drops `<!-- ... -->` blocks, including ones spanning lines, and the
/// surrounding blank space.
fn strip_editor_comments(content: &str) -> String {
    EDITOR_COMMENT.replace_all(content, "").trim().to_string()
}

/// Terminal rendering of a body: images and drawings become placeholders.
fn segments_text(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::LineBreak => out.push('\n'),
            Segment::Image(_) => out.push_str(&style("[image]").cyan().to_string()),
            Segment::Drawing(_) => out.push_str(&style("[drawing]").cyan().to_string()),
        }
    }
    out
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Shows what is about to go, asks, and reports the outcome.
fn delete_with_preview<E, F>(
    repository: &mut Repository<E>,
    id: EntryId,
    confirmation: &dyn Confirmation,
    describe: F,
) -> Result<()>
where
    E: Entry,
    F: Fn(&E) -> String,
{
    if let Some(entry) = repository.get(id) {
        println!("You are about to delete:");
        println!("ID:   {}", id);
        println!("{}", describe(entry));
        println!("\nThis action cannot be undone!");
    }

    match repository.delete(id, confirmation)? {
        DeleteOutcome::Deleted(_) => println!("Deleted {}.", id),
        DeleteOutcome::Declined => println!("Deletion cancelled."),
        DeleteOutcome::NotFound => println!("Nothing to delete: no entry with ID {}.", id),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{DrawingPad, FileStore};

    fn app_in(dir: &Path, editor: Option<&str>) -> App {
        let config = Config {
            data_dir: dir.join("data"),
            editor_command: editor.map(String::from),
            confirm_deletes: true,
        };
        let store = FileStore::open(config.data_dir.clone()).unwrap();
        App::new(Journal::open(Rc::new(store)), config, dir.join("config.json"), false)
    }

    fn add_note(title: &str, content: Option<&str>, drawing: Option<PathBuf>) -> Commands {
        Commands::Note {
            action: NoteAction::Add {
                title: title.to_string(),
                content: content.map(String::from),
                category: String::new(),
                image: Vec::new(),
                drawing,
                edit: false,
            },
        }
    }

    fn add_diary(edit: bool) -> Commands {
        Commands::Diary {
            action: DiaryAction::Add {
                title: "Monday".to_string(),
                content: None,
                mood: None,
                edit,
            },
        }
    }

    #[test]
    fn editor_comments_are_stripped() {
        let text = "<!-- Monday -->\n<!-- \nWrite below this block. Comment blocks like this one are dropped.\nSave and exit the editor when you're done.\n-->\n\nSunny <!-- aside --> day\n";
        assert_eq!(strip_editor_comments(text), "Sunny  day");
        assert_eq!(strip_editor_comments("<!-- a\nb -->\n\n"), "");
    }

    #[test]
    fn a_note_takes_the_drawing_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let sketch = dir.path().join("sketch.png");
        fs::write(&sketch, [0x89, b'P', b'N', b'G']).unwrap();

        let mut app = app_in(dir.path(), None);
        app.run(add_note("With drawing", None, Some(sketch))).unwrap();
        assert_eq!(app.drawing.current_drawing(), None);
        app.run(add_note("Plain", Some("no drawing here"), None)).unwrap();

        let app = app_in(dir.path(), None);
        let contents: Vec<(&str, &str)> = app
            .journal
            .notes
            .entries()
            .iter()
            .map(|n| (n.title.as_str(), n.content.as_str()))
            .collect();
        assert_eq!(contents, vec![("Plain", "no drawing here"), ("With drawing", "\n[Drawing]")]);
    }

    #[test]
    fn listed_legacy_ids_can_be_deleted_in_a_later_run() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(
            data.join("notes.json"),
            r#"[{"title":"Plan","content":"Buy cake","category":"Shopping","createdAt":"2024-01-01T00:00:00Z"}]"#,
        )
        .unwrap();

        let mut first = app_in(dir.path(), None);
        first
            .run(Commands::Note { action: NoteAction::List { query: None, json: true } })
            .unwrap();
        let shown = first.journal.notes.entries()[0].id;

        let mut second = app_in(dir.path(), None);
        second
            .run(Commands::Note { action: NoteAction::Delete { id: shown, force: true } })
            .unwrap();

        assert!(app_in(dir.path(), None).journal.notes.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn untouched_editor_template_is_not_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), Some("true"));
        let err = app.run(add_diary(true)).unwrap_err();
        assert!(err.is_validation());
        assert!(app.journal.diary.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn editor_text_becomes_the_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), Some(r#"sh -c 'echo "Sunny day" >> "$0"'"#));
        app.run(add_diary(true)).unwrap();
        assert_eq!(app.journal.diary.entries()[0].content, "Sunny day");
    }

    #[test]
    fn segments_render_as_plain_text() {
        let text = segments_text(&[
            Segment::Text("Beach".into()),
            Segment::LineBreak,
            Segment::Text("day".into()),
        ]);
        assert_eq!(text, "Beach\nday");
    }

    #[test]
    fn drawing_pad_feeds_note_drafts() {
        let mut pad = DrawingPad::default();
        pad.set_drawing("data:image/png;base64,AA".into()).unwrap();
        let draft = NoteDraft::new("", "", "").with_drawing(pad.current_drawing().is_some());
        assert!(draft.with_drawing);
    }
}
