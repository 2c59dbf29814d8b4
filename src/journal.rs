//! One store, every domain repository.
use std::rc::Rc;

use log::{error, info};
use serde::Serialize;

use crate::{
    html::PageSections, project_all, AlwaysConfirm, DiaryEntry, Drawing, GalleryItem,
    KeyValueStore, Note, Recipe, RenderContext, Repository, Result, Todo,
};

/// The journal's collections, loaded from and written back to one store.
pub struct Journal {
    store: Rc<dyn KeyValueStore>,
    pub notes: Repository<Note>,
    pub diary: Repository<DiaryEntry>,
    pub todos: Repository<Todo>,
    pub gallery: Repository<GalleryItem>,
    pub recipes: Repository<Recipe>,
    pub drawings: Repository<Drawing>,
}

/// Matches from every searchable collection.
#[derive(Debug, Serialize)]
pub struct SearchResults<'a> {
    pub notes: Vec<&'a Note>,
    pub diary: Vec<&'a DiaryEntry>,
    pub todos: Vec<&'a Todo>,
    pub recipes: Vec<&'a Recipe>,
}

impl SearchResults<'_> {
    pub fn total(&self) -> usize {
        self.notes.len() + self.diary.len() + self.todos.len() + self.recipes.len()
    }
}

impl Journal {
    pub fn open(store: Rc<dyn KeyValueStore>) -> Self {
        let journal = Self {
            notes: Repository::load(Rc::clone(&store)),
            diary: Repository::load(Rc::clone(&store)),
            todos: Repository::load(Rc::clone(&store)),
            gallery: Repository::load(Rc::clone(&store)),
            recipes: Repository::load(Rc::clone(&store)),
            drawings: Repository::load(Rc::clone(&store)),
            store,
        };
        info!(
            "Journal opened: {} notes, {} diary entries, {} tasks, {} images, {} recipes",
            journal.notes.len(),
            journal.diary.len(),
            journal.todos.len(),
            journal.gallery.len(),
            journal.recipes.len()
        );
        journal
    }

    pub fn store(&self) -> Rc<dyn KeyValueStore> {
        Rc::clone(&self.store)
    }

    /// Keeps a finished drawing in the drawings archive and shows it in the
    /// gallery. If the gallery cannot be written the archive entry is taken
    /// back out.
    pub fn save_drawing(&mut self, payload: String) -> Result<GalleryItem> {
        let archived = self.drawings.create(payload.clone())?;
        match self.gallery.create(payload) {
            Ok(item) => {
                info!("Saved drawing {} to the gallery", item.id);
                Ok(item)
            }
            Err(e) => {
                if let Err(undo) = self.drawings.delete(archived.id, &AlwaysConfirm) {
                    error!("Drawing {} stays archived without a gallery entry: {}", archived.id, undo);
                }
                Err(e)
            }
        }
    }

    pub fn search(&self, query: &str) -> SearchResults<'_> {
        SearchResults {
            notes: self.notes.search(query),
            diary: self.diary.search(query),
            todos: self.todos.search(query),
            recipes: self.recipes.search(query),
        }
    }

    /// Projects every collection for a full-page render.
    pub fn page_sections(&self, ctx: &RenderContext) -> PageSections {
        PageSections {
            notes: project_all(self.notes.entries(), ctx),
            diary: project_all(self.diary.entries(), ctx),
            todos: project_all(self.todos.entries(), ctx),
            gallery: project_all(self.gallery.entries(), ctx),
            recipes: project_all(self.recipes.entries(), ctx),
        }
    }
}
