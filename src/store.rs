//! The canonical, ordered note collection.
//!
//! Every mutation goes through [`NoteStore`], which rewrites the full snapshot
//! after each successful change. A failed write is reported as
//! [`StoreError::Persist`] but the in-memory change is kept, so memory and
//! storage can diverge until the next successful write.

use crate::error::{StoreError, StoreResult};
use crate::note::{
    IdGenerator, Note, NoteInput, NotePatch, now_millis, validate_content,
    validate_title,
};
use crate::storage::{self, Snapshot, Storage};

#[derive(Debug)]
pub struct NoteStore<S: Storage> {
    storage: S,
    notes: Vec<Note>,
    ids: IdGenerator,
}

impl<S: Storage> NoteStore<S> {
    /// Read the persisted snapshot. Missing data starts an empty store;
    /// corrupt or unreadable data also starts empty and the reason is
    /// returned next to the store instead of failing.
    pub fn load(storage: S) -> (Self, Option<StoreError>) {
        let (notes, problem) = match storage::read_notes(&storage) {
            Ok(Snapshot::Notes(notes)) => (notes, None),
            Ok(Snapshot::Missing) => (Vec::new(), None),
            Ok(Snapshot::Corrupt(e)) => {
                log::warn!("discarding unreadable notes snapshot: {e}");
                (Vec::new(), Some(StoreError::Corrupt(e)))
            }
            Err(e) => {
                log::warn!("could not read notes snapshot: {e}");
                (Vec::new(), Some(StoreError::Load(e)))
            }
        };
        log::debug!("loaded {} note(s)", notes.len());
        (Self { storage, notes, ids: IdGenerator::new() }, problem)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn create(&mut self, input: NoteInput) -> StoreResult<Note> {
        let title = validate_title(&input.title)?;
        let content = validate_content(&input.content)?;

        let notes = &self.notes;
        let id = self.ids.next_id(|candidate| notes.iter().any(|n| n.id == candidate));
        let now = now_millis();
        let note = Note {
            id,
            title,
            content,
            category: input.category.unwrap_or_default(),
            is_pinned: false,
            created_at: now,
            updated_at: now,
        };
        self.notes.insert(0, note.clone());
        self.persist()?;
        Ok(note)
    }

    pub fn update(&mut self, id: &str, patch: NotePatch) -> StoreResult<Note> {
        let idx = self.position(id)?;
        let title = patch.title.as_deref().map(validate_title).transpose()?;
        let content = patch.content.as_deref().map(validate_content).transpose()?;

        let note = &mut self.notes[idx];
        if let Some(title) = title {
            note.title = title;
        }
        if let Some(content) = content {
            note.content = content;
        }
        if let Some(category) = patch.category {
            note.category = category;
        }
        if let Some(pinned) = patch.is_pinned {
            note.is_pinned = pinned;
        }
        note.updated_at = now_millis().max(note.created_at);
        let updated = note.clone();

        self.persist()?;
        Ok(updated)
    }

    /// Remove a note. Callers confirm with the user before calling this.
    pub fn delete(&mut self, id: &str) -> StoreResult<Note> {
        let before = self.notes.len();
        let idx = self.position(id)?;
        let removed = self.notes.remove(idx);
        if self.notes.len() < before {
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn toggle_pin(&mut self, id: &str) -> StoreResult<Note> {
        let pinned = self
            .get(id)
            .map(|n| n.is_pinned)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.update(id, NotePatch { is_pinned: Some(!pinned), ..NotePatch::default() })
    }

    fn position(&self, id: &str) -> StoreResult<usize> {
        self.notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn persist(&mut self) -> StoreResult<()> {
        match storage::write_notes(&mut self.storage, &self.notes) {
            Ok(()) => {
                log::debug!("persisted {} note(s)", self.notes.len());
                Ok(())
            }
            Err(e) => {
                log::warn!("notes snapshot not saved: {e}");
                Err(StoreError::Persist(e))
            }
        }
    }
}
