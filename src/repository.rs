//! In-memory entry collections kept in lockstep with the store.
use std::{collections::HashSet, rc::Rc};

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};

use crate::{
    load_collection, save_collection, search, Confirmation, Entry, EntryId, KeyValueStore,
    Placement, Result, Todo,
};

/// What happened to a delete request.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome<E> {
    /// The entry was removed and the collection persisted.
    Deleted(E),
    /// The user declined; nothing changed.
    Declined,
    /// No entry has that id; nothing changed.
    NotFound,
}

/// Ordered collection of one domain's entries.
///
/// Every mutation rewrites the domain's whole collection in the store. If
/// that write fails the in-memory change is undone, so memory and store
/// never disagree.
pub struct Repository<E: Entry> {
    store: Rc<dyn KeyValueStore>,
    entries: Vec<E>,
    /// Highest id handed out or seen, so ids stay unique within a session
    last_id: Option<EntryId>,
}

impl<E: Entry> Repository<E> {
    /// Loads the domain's collection; absent or malformed data gives an
    /// empty one.
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let entries = load_collection::<E>(store.as_ref(), E::KEY);
        let last_id = entries.iter().map(|entry| entry.id()).max();
        let mut repository = Self {
            store,
            entries,
            last_id,
        };
        if repository.repair_ids() > 0 {
            if let Err(e) = repository.persist() {
                warn!("Repaired ids in {} could not be saved: {}", E::KEY, e);
            }
        }
        info!("Loaded {} entries from {}", repository.entries.len(), E::KEY);
        repository
    }

    /// Gives fresh ids, in order, to records saved without one and to
    /// records repeating an earlier record's id. Returns how many changed.
    fn repair_ids(&mut self) -> usize {
        let now = Utc::now();
        let mut seen = HashSet::new();
        let mut repaired = 0;
        for index in 0..self.entries.len() {
            let id = self.entries[index].id();
            if id.is_unassigned() || !seen.insert(id) {
                let fresh = self.next_id(now);
                self.entries[index].set_id(fresh);
                seen.insert(fresh);
                repaired += 1;
            }
        }
        if repaired > 0 {
            warn!("Assigned new ids to {} entries in {}", repaired, E::KEY);
        }
        repaired
    }

    fn next_id(&mut self, now: DateTime<Utc>) -> EntryId {
        let candidate = EntryId::from_timestamp(now);
        let id = match self.last_id {
            Some(last) if candidate <= last => last.next(),
            _ => candidate,
        };
        self.last_id = Some(id);
        id
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&E> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == id)
    }

    /// Entries matching `query`, see [`search::filter`].
    pub fn search(&self, query: &str) -> Vec<&E> {
        search::filter(&self.entries, query)
    }

    fn persist(&self) -> Result<()> {
        save_collection(self.store.as_ref(), E::KEY, &self.entries).map_err(|e| {
            error!("Failed to persist {}: {}", E::KEY, e);
            e
        })
    }

    /// Validates the draft and stores the new entry at the domain's end of
    /// the collection.
    pub fn create(&mut self, draft: E::Draft) -> Result<E> {
        let now = Utc::now();
        let id = self.next_id(now);
        let entry = E::from_draft(draft, id, now)?;

        let index = match E::PLACEMENT {
            Placement::Head => 0,
            Placement::Tail => self.entries.len(),
        };
        self.entries.insert(index, entry.clone());

        if let Err(e) = self.persist() {
            self.entries.remove(index);
            return Err(e);
        }

        debug!("Created entry {} in {}", id, E::KEY);
        Ok(entry)
    }

    /// Removes the entry with `id` once `confirmation` agrees.
    ///
    /// An unknown id is a no-op and does not ask for confirmation.
    pub fn delete(&mut self, id: EntryId, confirmation: &dyn Confirmation) -> Result<DeleteOutcome<E>> {
        let Some(index) = self.position(id) else {
            debug!("Nothing to delete in {} for id {}", E::KEY, id);
            return Ok(DeleteOutcome::NotFound);
        };

        if !confirmation.confirm(E::DELETE_PROMPT) {
            debug!("Deletion of {} in {} declined", id, E::KEY);
            return Ok(DeleteOutcome::Declined);
        }

        let removed = self.entries.remove(index);
        if let Err(e) = self.persist() {
            self.entries.insert(index, removed);
            return Err(e);
        }

        info!("Deleted entry {} from {}", id, E::KEY);
        Ok(DeleteOutcome::Deleted(removed))
    }
}

impl Repository<Todo> {
    /// Flips a task's `completed` flag and returns the new value, or `None`
    /// when no task has that id.
    pub fn toggle(&mut self, id: EntryId) -> Result<Option<bool>> {
        let Some(index) = self.position(id) else {
            debug!("Nothing to toggle for id {}", id);
            return Ok(None);
        };

        let todo = &mut self.entries[index];
        todo.completed = !todo.completed;
        let completed = todo.completed;

        if let Err(e) = self.persist() {
            self.entries[index].completed = !completed;
            return Err(e);
        }

        debug!("Task {} is now {}", id, if completed { "done" } else { "open" });
        Ok(Some(completed))
    }
}

impl<E: Entry<Draft = String>> Repository<E> {
    /// Adds one entry per payload, in the given order; stops at the first
    /// invalid payload, keeping the ones already added.
    pub fn add_payloads<I>(&mut self, payloads: I) -> Result<Vec<E>>
    where
        I: IntoIterator<Item = String>,
    {
        payloads
            .into_iter()
            .map(|payload| self.create(payload))
            .collect()
    }
}
