//! The drawing canvas as seen by the journal: a source of at most one
//! "current drawing" payload.
use std::rc::Rc;

use log::debug;

use crate::{KeyValueStore, Result};

/// Store key under which [`StoredDrawing`] keeps its payload.
pub const CURRENT_DRAWING_KEY: &str = "currentDrawing";

/// Supplies the drawing in progress, if any.
pub trait DrawingCapture {
    fn current_drawing(&self) -> Option<String>;

    fn set_drawing(&mut self, payload: String) -> Result<()>;

    fn clear(&mut self) -> Result<()>;
}

/// Drawing held for the lifetime of the session only.
#[derive(Debug, Clone, Default)]
pub struct DrawingPad {
    payload: Option<String>,
}

impl DrawingCapture for DrawingPad {
    fn current_drawing(&self) -> Option<String> {
        self.payload.clone()
    }

    fn set_drawing(&mut self, payload: String) -> Result<()> {
        self.payload = Some(payload);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.payload = None;
        Ok(())
    }
}

/// Drawing kept in the store, so it survives between command invocations.
pub struct StoredDrawing {
    store: Rc<dyn KeyValueStore>,
}

impl StoredDrawing {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl DrawingCapture for StoredDrawing {
    fn current_drawing(&self) -> Option<String> {
        match self.store.get(CURRENT_DRAWING_KEY) {
            Ok(payload) => payload.filter(|p| !p.is_empty()),
            Err(e) => {
                debug!("No readable current drawing: {}", e);
                None
            }
        }
    }

    fn set_drawing(&mut self, payload: String) -> Result<()> {
        self.store.set(CURRENT_DRAWING_KEY, &payload)
    }

    fn clear(&mut self) -> Result<()> {
        self.store.remove(CURRENT_DRAWING_KEY)
    }
}
