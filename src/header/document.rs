use ahash::AHashMap;

use crate::header::record::HeaderRecord;
use crate::header::HeaderStore;

/// In-memory view of one header.
///
/// Records are kept in insertion order in a vector; a keyword → position map gives constant
/// time lookup. The map always points at the **first** record carrying a keyword and is rebuilt
/// from the mutated position onward after each insert or remove.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderDocument {
    records: Vec<HeaderRecord>,
    index: AHashMap<String, usize>,
}

impl HeaderDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(HeaderRecord::keyword)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Re-index every record at or after `from`.
    fn reindex_from(&mut self, from: usize) {
        self.index.retain(|_, pos| *pos < from);
        for (pos, record) in self.records.iter().enumerate().skip(from) {
            self.index.entry(record.keyword().to_string()).or_insert(pos);
        }
    }
}

impl FromIterator<HeaderRecord> for HeaderDocument {
    fn from_iter<I: IntoIterator<Item = HeaderRecord>>(iter: I) -> Self {
        let mut doc = HeaderDocument {
            records: iter.into_iter().collect(),
            index: AHashMap::new(),
        };
        doc.reindex_from(0);
        doc
    }
}

impl HeaderStore for HeaderDocument {
    fn record_count(&self) -> usize {
        self.records.len()
    }

    fn position_of(&self, keyword: &str) -> Option<usize> {
        self.index.get(keyword).copied()
    }

    fn get(&self, position: usize) -> Option<&HeaderRecord> {
        self.records.get(position)
    }

    fn insert_at(&mut self, position: usize, record: HeaderRecord) {
        self.records.insert(position, record);
        self.reindex_from(position);
    }

    fn remove_at(&mut self, position: usize) -> HeaderRecord {
        let removed = self.records.remove(position);
        self.reindex_from(position);
        removed
    }

    fn records(&self) -> Box<dyn Iterator<Item = &HeaderRecord> + '_> {
        Box::new(self.records.iter())
    }
}

#[cfg(test)]
mod document_test {
    use super::*;
    use crate::header::value::HeaderValue;

    fn rec(keyword: &str, value: i32) -> HeaderRecord {
        HeaderRecord::new(keyword, HeaderValue::Int(value), None)
    }

    #[test]
    fn test_index_follows_mutations() {
        let mut doc: HeaderDocument = [rec("A", 1), rec("B", 2), rec("C", 3)]
            .into_iter()
            .collect();

        assert_eq!(doc.position_of("C"), Some(2));

        doc.insert_at(1, rec("X", 0));
        assert_eq!(doc.keywords().collect::<Vec<_>>(), ["A", "X", "B", "C"]);
        assert_eq!(doc.position_of("X"), Some(1));
        assert_eq!(doc.position_of("C"), Some(3));
        assert_eq!(doc.position_of("A"), Some(0));

        let removed = doc.remove_at(0);
        assert_eq!(removed.keyword(), "A");
        assert!(!doc.exists("A"));
        assert_eq!(doc.position_of("X"), Some(0));
        assert_eq!(doc.position_of("C"), Some(2));
    }

    #[test]
    fn test_duplicates_use_first_match() {
        let mut doc: HeaderDocument = [rec("A", 1), rec("DUP", 2), rec("DUP", 3)]
            .into_iter()
            .collect();

        assert_eq!(doc.find("DUP").map(|r| r.value()), Some(&HeaderValue::Int(2)));

        doc.remove_at(1);
        assert_eq!(doc.position_of("DUP"), Some(1));
        assert_eq!(doc.find("DUP").map(|r| r.value()), Some(&HeaderValue::Int(3)));
    }

    #[test]
    fn test_replace_and_push() {
        let mut doc = HeaderDocument::new();
        doc.push(rec("A", 1));
        doc.push(rec("B", 2));

        let old = doc.replace_at(0, rec("Z", 9));
        assert_eq!(old.keyword(), "A");
        assert_eq!(doc.keywords().collect::<Vec<_>>(), ["Z", "B"]);
        assert_eq!(doc.record_count(), 2);
    }
}
