//! In-memory bookmark store.
//!
//! Records are kept in insertion order. Lookups compare ids by their string form, so the
//! numeric seed ids match the string ids that come in through request paths.

use crate::model::Bookmark;

#[derive(Debug, Default)]
pub struct BookmarkStore {
    records: Vec<Bookmark>,
}

impl BookmarkStore {
    pub fn new() -> Self {
        BookmarkStore { records: vec![] }
    }

    /// Store holding the three sample records the service starts with.
    pub fn seeded() -> Self {
        let records = (1..=3u64)
            .map(|n| {
                Bookmark::new(
                    n,
                    &format!("Test Bookmark {}", n),
                    &format!("Content of Test Bookmark {}", n),
                )
            })
            .collect();

        BookmarkStore { records }
    }

    pub fn list(&self) -> Vec<Bookmark> {
        self.records.clone()
    }

    pub fn find_by_id(&self, id: &str) -> Option<Bookmark> {
        self.records.iter().find(|b| b.id.matches(id)).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|b| b.id.matches(id))
    }

    /// Appends `record` as the last element. Callers validate fields and pick a unique id.
    pub fn append(&mut self, record: Bookmark) {
        self.records.push(record);
    }

    pub fn remove_by_id(&mut self, id: &str) -> bool {
        match self.records.iter().position(|b| b.id.matches(id)) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
