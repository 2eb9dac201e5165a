use covidash_core::NotificationDescriptor;

use crate::types::{EventHandle, UpdateId, UpdateRequest};

/// A registered update: its toast and the queue handles backing it.
///
/// Keeping both in one record means a toast can never outlive its handles
/// (or the reverse).
#[derive(Debug, Clone)]
pub struct UpdateEntry {
    pub id: UpdateId,
    pub descriptor: NotificationDescriptor,
    pub handles: Vec<EventHandle>,
    pub request: UpdateRequest,
    /// Completed 24 h cycles; always 0 for one-shot updates.
    pub cycle: u32,
}

/// Insertion-ordered store of update entries.
///
/// Names are not unique: registering the same name twice keeps both entries.
#[derive(Debug, Default)]
pub struct UpdateRegistry {
    entries: Vec<UpdateEntry>,
}

impl UpdateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: UpdateEntry) {
        self.entries.push(entry);
    }

    pub fn get(&self, id: UpdateId) -> Option<&UpdateEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: UpdateId) -> Option<&mut UpdateEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn find<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a UpdateEntry> + 'a {
        self.entries.iter().filter(move |e| e.descriptor.title == name)
    }

    pub fn remove(&mut self, id: UpdateId) -> Option<UpdateEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    /// Remove every entry titled `name`, returning them in insertion order.
    pub fn remove_by_name(&mut self, name: &str) -> Vec<UpdateEntry> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.descriptor.title == name);
        self.entries = kept;
        removed
    }

    pub fn entries(&self) -> &[UpdateEntry] {
        &self.entries
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &NotificationDescriptor> {
        self.entries.iter().map(|e| &e.descriptor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
