//! # Card Record Cache
//!
//! Holds the card records from the most recent successful fetch, indexed by
//! printing. The external card database is the single source of truth for
//! metadata, so the cache never merges: [`CardCache::replace`] swaps the
//! whole contents, and a later fetch always wins over an earlier one.
//!
//! Set codes are matched case-insensitively. Scryfall reports them in lower
//! case, while deck lists exported from other tools often use upper case.

use std::collections::HashMap;

use crate::card::{CardFace, CardRecord};
use crate::error::{DeckError, Result};
use crate::model::Finish;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrintingKey {
    set: String,
    collector_number: String,
}

impl PrintingKey {
    pub fn new(set: &str, collector_number: &str) -> Self {
        Self {
            set: set.to_lowercase(),
            collector_number: collector_number.to_string(),
        }
    }

    pub fn of(record: &CardRecord) -> Self {
        Self::new(&record.set, &record.collector_number)
    }
}

/// Which part of a record a lookup should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceSelector {
    Whole,
    Face(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardView<'a> {
    Whole(&'a CardRecord),
    Face(&'a CardFace),
}

#[derive(Debug, Default)]
pub struct CardCache {
    records: Vec<CardRecord>,
    index: HashMap<PrintingKey, usize>,
}

impl CardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache contents with a fresh fetch result.
    pub fn replace(&mut self, records: Vec<CardRecord>) {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if index.insert(PrintingKey::of(record), pos).is_some() {
                log::debug!(
                    "duplicate printing {} #{} in fetch result, keeping the later record",
                    record.set,
                    record.collector_number
                );
            }
        }
        log::debug!("card cache replaced with {} records", records.len());
        self.records = records;
        self.index = index;
    }

    pub fn lookup(&self, set: &str, collector_number: &str) -> Option<&CardRecord> {
        self.index
            .get(&PrintingKey::new(set, collector_number))
            .map(|&pos| &self.records[pos])
    }

    /// Look up a printing and select the whole record or one of its faces.
    ///
    /// A missing printing is `Ok(None)`. A face index past the end of
    /// `card_faces` is an error; records without faces have zero of them.
    pub fn lookup_face(
        &self,
        set: &str,
        collector_number: &str,
        selector: FaceSelector,
    ) -> Result<Option<CardView<'_>>> {
        let Some(record) = self.lookup(set, collector_number) else {
            return Ok(None);
        };
        match selector {
            FaceSelector::Whole => Ok(Some(CardView::Whole(record))),
            FaceSelector::Face(index) => {
                let faces = record.faces();
                faces
                    .get(index)
                    .map(|face| Some(CardView::Face(face)))
                    .ok_or(DeckError::FaceOutOfRange {
                        index,
                        faces: faces.len(),
                    })
            }
        }
    }

    /// USD price for a printing in an explicitly chosen finish.
    pub fn price(&self, set: &str, collector_number: &str, finish: Finish) -> Option<&str> {
        self.lookup(set, collector_number)
            .and_then(|record| record.usd_price(finish))
    }

    pub fn records(&self) -> &[CardRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::fixtures::{double_faced, single_faced};

    fn populated() -> CardCache {
        let mut cache = CardCache::new();
        cache.replace(vec![
            single_faced("Lightning Bolt", "2xm", "141"),
            double_faced("Delver of Secrets", "Insectile Aberration", "isd", "51"),
        ]);
        cache
    }

    #[test]
    fn test_lookup_by_printing() {
        let cache = populated();
        assert_eq!(cache.lookup("2xm", "141").unwrap().name, "Lightning Bolt");
        assert!(cache.lookup("2xm", "142").is_none());
        assert!(cache.lookup("xyz", "141").is_none());
    }

    #[test]
    fn test_lookup_ignores_set_code_case() {
        let cache = populated();
        assert!(cache.lookup("2XM", "141").is_some());
        assert!(cache.lookup("ISD", "51").is_some());
    }

    #[test]
    fn test_replace_supersedes_previous_contents() {
        let mut cache = populated();
        cache.replace(vec![single_faced("Counterspell", "mh2", "267")]);
        assert_eq!(cache.len(), 1);
        assert!(cache.lookup("2xm", "141").is_none());
        assert!(cache.lookup("mh2", "267").is_some());

        cache.replace(Vec::new());
        assert!(cache.is_empty());
        assert!(cache.lookup("mh2", "267").is_none());
    }

    #[test]
    fn test_replace_is_idempotent() {
        let records = vec![
            single_faced("Lightning Bolt", "2xm", "141"),
            single_faced("Counterspell", "mh2", "267"),
        ];
        let printings = [("2xm", "141"), ("mh2", "267"), ("xyz", "999")];
        let snapshot = |cache: &CardCache| -> Vec<Option<CardRecord>> {
            printings
                .iter()
                .map(|(set, cn)| cache.lookup(set, cn).cloned())
                .collect()
        };

        let mut cache = CardCache::new();
        cache.replace(records.clone());
        let first = snapshot(&cache);

        cache.replace(records);
        assert_eq!(snapshot(&cache), first);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_duplicate_printing_keeps_last() {
        let mut first = single_faced("Lightning Bolt", "2xm", "141");
        first.rarity = "common".to_string();
        let mut second = first.clone();
        second.rarity = "uncommon".to_string();

        let mut cache = CardCache::new();
        cache.replace(vec![first, second]);
        assert_eq!(cache.lookup("2xm", "141").unwrap().rarity, "uncommon");
    }

    #[test]
    fn test_lookup_face_whole_and_by_index() {
        let cache = populated();
        match cache.lookup_face("isd", "51", FaceSelector::Whole).unwrap() {
            Some(CardView::Whole(record)) => assert_eq!(record.layout, "transform"),
            other => panic!("expected whole record, got {:?}", other),
        }
        match cache.lookup_face("isd", "51", FaceSelector::Face(1)).unwrap() {
            Some(CardView::Face(face)) => assert_eq!(face.name, "Insectile Aberration"),
            other => panic!("expected back face, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_face_out_of_range_is_error() {
        let cache = populated();
        let err = cache
            .lookup_face("isd", "51", FaceSelector::Face(2))
            .unwrap_err();
        assert!(matches!(err, DeckError::FaceOutOfRange { index: 2, faces: 2 }));

        let err = cache
            .lookup_face("2xm", "141", FaceSelector::Face(0))
            .unwrap_err();
        assert!(matches!(err, DeckError::FaceOutOfRange { index: 0, faces: 0 }));
    }

    #[test]
    fn test_lookup_face_missing_printing_is_none() {
        let cache = populated();
        assert!(cache
            .lookup_face("xyz", "999", FaceSelector::Face(5))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_price_by_finish() {
        let cache = populated();
        assert_eq!(cache.price("2xm", "141", Finish::Nonfoil), Some("1.00"));
        assert_eq!(cache.price("2xm", "141", Finish::Foil), Some("3.50"));
        assert_eq!(cache.price("2xm", "141", Finish::Etched), None);
        assert_eq!(cache.price("xyz", "1", Finish::Nonfoil), None);
    }
}
