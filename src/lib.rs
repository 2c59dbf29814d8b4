//! Personal journaling library
//!
//! This library keeps notes, diary entries, to-dos, gallery images and
//! recipes as JSON collections in a key-value store, filters them by text
//! and projects them into display-ready views.

mod cli;
mod config;
mod confirm;
mod diary;
mod drawing;
mod entry;
mod errors;
mod gallery;
pub mod html;
mod journal;
mod note;
mod payload;
mod recipe;
mod render;
mod repository;
mod search;
mod storage;
mod todo;
mod types;

// Re-export key components
pub use cli::*;
pub use config::*;
pub use confirm::*;
pub use diary::*;
pub use drawing::*;
pub use entry::*;
pub use errors::*;
pub use gallery::*;
pub use journal::*;
pub use note::*;
pub use payload::*;
pub use recipe::*;
pub use render::*;
pub use repository::*;
pub use search::*;
pub use storage::*;
pub use todo::*;
pub use types::*;
