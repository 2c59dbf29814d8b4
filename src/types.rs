//! Core data structures shared across the keepsake application.
//!
//! This module contains the result alias, entry identifiers and the
//! subcommands understood by the command-line shell.
use std::{fmt, num::ParseIntError, path::PathBuf, str::FromStr};

use chrono::{DateTime, Local, Utc};
use clap::Subcommand;
use serde::{Deserialize, Serialize};

use crate::JournalError;

/// A specialized Result type for keepsake operations.
pub type Result<T> = std::result::Result<T, JournalError>;

/// Identity of an entry within its domain collection.
///
/// Ids are creation timestamps in milliseconds, bumped when needed so that
/// no two entries of one collection ever share an id. Fractional ids found
/// in older gallery records are read with the fraction dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "StoredId", into = "i64")]
pub struct EntryId(pub i64);

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredId {
    Whole(i64),
    Fractional(f64),
}

impl From<StoredId> for EntryId {
    fn from(stored: StoredId) -> Self {
        match stored {
            StoredId::Whole(id) => EntryId(id),
            StoredId::Fractional(id) => EntryId(id.trunc() as i64),
        }
    }
}

impl From<EntryId> for i64 {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

impl EntryId {
    /// Id derived from a creation instant.
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        EntryId(at.timestamp_millis())
    }

    /// Ids persisted before notes carried one deserialize to zero.
    pub fn is_unassigned(self) -> bool {
        self.0 == 0
    }

    /// The smallest id strictly greater than this one.
    pub fn next(self) -> Self {
        EntryId(self.0.saturating_add(1))
    }
}

/// When an entry was made.
///
/// Older records carry an already formatted date string instead of a
/// timestamp; it is kept and displayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryDate {
    At(DateTime<Utc>),
    Text(String),
}

impl EntryDate {
    /// Formats a timestamp in local time; text dates come back unchanged.
    pub fn format_local(&self, format: &str) -> String {
        match self {
            EntryDate::At(at) => at.with_timezone(&Local).format(format).to_string(),
            EntryDate::Text(text) => text.clone(),
        }
    }
}

impl From<DateTime<Utc>> for EntryDate {
    fn from(at: DateTime<Utc>) -> Self {
        EntryDate::At(at)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(EntryId)
    }
}

/// Available subcommands for the keepsake application
#[derive(Subcommand)]
pub enum Commands {
    /// Notes with categories, inline images and drawings
    Note {
        #[clap(subcommand)]
        action: NoteAction,
    },

    /// Dated diary entries with a mood
    Diary {
        #[clap(subcommand)]
        action: DiaryAction,
    },

    /// To-do list
    Todo {
        #[clap(subcommand)]
        action: TodoAction,
    },

    /// Image gallery
    Gallery {
        #[clap(subcommand)]
        action: GalleryAction,
    },

    /// Recipe book
    Recipe {
        #[clap(subcommand)]
        action: RecipeAction,
    },

    /// Drawing canvas state
    Drawing {
        #[clap(subcommand)]
        action: DrawingAction,
    },

    /// Search notes, diary entries, tasks and recipes
    Search {
        /// Case-insensitive text to look for
        query: String,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Export every collection as a single HTML page
    Export {
        /// Path of the HTML file to write
        #[clap(short, long)]
        output: PathBuf,
    },

    /// Configuration management
    Config {
        /// Show current configuration
        #[clap(short = 'S', long)]
        show: bool,

        /// Update a configuration setting
        #[clap(short, long)]
        set: Option<String>,

        /// Reset configuration to defaults
        #[clap(short, long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum NoteAction {
    /// Create a new note
    Add {
        /// Title of the note
        #[clap(short = 'T', long, default_value = "")]
        title: String,

        /// Content of the note
        #[clap(short, long)]
        content: Option<String>,

        /// Category label, e.g. "Work" or "Shopping"
        #[clap(short = 'C', long, default_value = "")]
        category: String,

        /// Image files to embed in the content
        #[clap(short, long)]
        image: Vec<PathBuf>,

        /// Image file to use as the current drawing
        #[clap(short, long)]
        drawing: Option<PathBuf>,

        /// Open content in editor before saving
        #[clap(short, long)]
        edit: bool,
    },

    /// List notes, newest first
    List {
        /// Only show notes containing this text
        #[clap(short, long)]
        query: Option<String>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Delete a note by ID
    Delete {
        id: EntryId,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum DiaryAction {
    /// Write a diary entry
    Add {
        #[clap(short = 'T', long)]
        title: String,

        #[clap(short, long)]
        content: Option<String>,

        /// One of happy, excited, calm, sad, thoughtful
        #[clap(short, long)]
        mood: Option<String>,

        /// Open content in editor before saving
        #[clap(short, long)]
        edit: bool,
    },

    /// List diary entries, newest first
    List {
        #[clap(short, long)]
        query: Option<String>,

        #[clap(short, long)]
        json: bool,
    },

    /// Delete a diary entry by ID
    Delete {
        id: EntryId,

        #[clap(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum TodoAction {
    /// Add a task
    Add { text: String },

    /// List tasks in creation order
    List {
        #[clap(short, long)]
        json: bool,
    },

    /// Flip a task between done and not done
    Toggle { id: EntryId },

    /// Delete a task by ID
    Delete {
        id: EntryId,

        #[clap(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum GalleryAction {
    /// Upload one or more image files
    Add {
        #[clap(required = true)]
        files: Vec<PathBuf>,
    },

    /// List gallery images in upload order
    List {
        #[clap(short, long)]
        json: bool,
    },

    /// Delete an image by ID
    Delete {
        id: EntryId,

        #[clap(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum RecipeAction {
    /// Add a recipe; ingredients and instructions are one per line
    Add {
        #[clap(short, long)]
        name: String,

        #[clap(short, long)]
        ingredients: String,

        /// Instruction steps, one per line
        #[clap(short = 's', long)]
        instructions: String,
    },

    /// List recipes, newest first
    List {
        #[clap(short, long)]
        query: Option<String>,

        #[clap(short, long)]
        json: bool,
    },

    /// Delete a recipe by ID
    Delete {
        id: EntryId,

        #[clap(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum DrawingAction {
    /// Save an image file as a finished drawing (archive and gallery)
    Save { file: PathBuf },

    /// Make an image file the current drawing for notes
    Set { file: PathBuf },

    /// Forget the current drawing
    Clear,
}
