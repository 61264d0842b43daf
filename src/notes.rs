use std::rc::Rc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::model::Note;
use crate::storage::{NOTES_KEY, Storage, load_json, save_json};
use crate::util::{is_blank, next_id};

pub struct NoteStore {
    storage: Rc<dyn Storage>,
    notes: Vec<Note>,
}

impl NoteStore {
    #[tracing::instrument(skip(storage))]
    pub fn load(storage: Rc<dyn Storage>) -> anyhow::Result<Self> {
        let notes: Vec<Note> = load_json(storage.as_ref(), NOTES_KEY).context("failed to load notes")?;
        debug!(count = notes.len(), "loaded notes");
        Ok(Self { storage, notes })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn add(&mut self, content: &str) -> anyhow::Result<Option<&Note>> {
        self.add_at(content, Utc::now())
    }

    #[tracing::instrument(skip(self, content))]
    pub fn add_at(&mut self, content: &str, now: DateTime<Utc>) -> anyhow::Result<Option<&Note>> {
        if is_blank(content) {
            debug!("ignoring blank note");
            return Ok(None);
        }

        let id = next_id(now, self.notes.iter().map(|n| n.id.as_str()));
        self.notes.insert(
            0,
            Note {
                id,
                content: content.to_string(),
                created_at: now,
            },
        );
        self.commit()?;
        info!(id = %self.notes[0].id, "added note");
        Ok(self.notes.first())
    }

    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: &str) -> anyhow::Result<Option<Note>> {
        let Some(pos) = self.notes.iter().position(|n| n.id == id) else {
            return Ok(None);
        };
        let removed = self.notes.remove(pos);
        self.commit()?;
        Ok(Some(removed))
    }

    fn commit(&self) -> anyhow::Result<()> {
        save_json(self.storage.as_ref(), NOTES_KEY, &self.notes).context("failed to save notes")
    }
}
