//! # Header records and stores
//!
//! This module gathers the data model of a header and the contract the editor works against.
//!
//! ## Structure
//!
//! ```text
//! header
//! ├── value          HeaderValue, the tagged union of supported value types
//! ├── record         HeaderRecord (keyword, value, comment) and its validation
//! ├── keyword_guard  structural keywords that can never be displaced
//! ├── document       HeaderDocument, the in-memory HeaderStore
//! └── card           80-character card parsing and formatting
//! ```
//!
//! The editor never depends on a concrete store: every operation of
//! [`HeaderEditor`](crate::editor::HeaderEditor) is available on any type implementing
//! [`HeaderStore`].
pub mod card;
pub mod document;
pub mod keyword_guard;
pub mod record;
pub mod value;

use record::HeaderRecord;

/// Ordered sequence of header records with keyword lookup and positional insert/remove.
///
/// Positions are 0-based. Keywords are expected in normalized (upper case) form. When a keyword
/// appears several times, lookups return the first occurrence.
pub trait HeaderStore {
    /// Number of records, the `END` card excluded.
    fn record_count(&self) -> usize;

    /// Position of the first record with this keyword.
    fn position_of(&self, keyword: &str) -> Option<usize>;

    /// Record at a position.
    fn get(&self, position: usize) -> Option<&HeaderRecord>;

    /// Insert a record so that it occupies `position`, shifting the following records.
    /// A position equal to [`record_count`](HeaderStore::record_count) appends.
    ///
    /// # Panics
    /// If `position > record_count()`.
    fn insert_at(&mut self, position: usize, record: HeaderRecord);

    /// Remove and return the record at `position`.
    ///
    /// # Panics
    /// If `position >= record_count()`.
    fn remove_at(&mut self, position: usize) -> HeaderRecord;

    /// Iterate over the records in order.
    fn records(&self) -> Box<dyn Iterator<Item = &HeaderRecord> + '_>;

    fn exists(&self, keyword: &str) -> bool {
        self.position_of(keyword).is_some()
    }

    fn find(&self, keyword: &str) -> Option<&HeaderRecord> {
        self.position_of(keyword).and_then(|pos| self.get(pos))
    }

    fn push(&mut self, record: HeaderRecord) {
        let end = self.record_count();
        self.insert_at(end, record);
    }

    /// Replace the record at `position`, returning the previous one.
    fn replace_at(&mut self, position: usize, record: HeaderRecord) -> HeaderRecord {
        let old = self.remove_at(position);
        self.insert_at(position, record);
        old
    }
}
