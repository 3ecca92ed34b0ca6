//! # Reconciliation
//!
//! Joins the deck against the card cache into display rows. The join is best
//! effort per row: an entry whose printing is not in the cache (cache not yet
//! populated, or that printing failed to fetch) still produces a row, marked
//! [`CardMetadata::Unavailable`]. The join as a whole never fails.
//!
//! ## Matching
//!
//! Rows match on `(set, collector_number)`. The finish flags don't affect
//! which record is chosen; they only select which price the row shows
//! (`usd`, `usd_foil` or `usd_etched`).
//!
//! An entry flagged both foil and etched is priced as etched. UIs that want
//! the foil price for such an entry ask [`CardCache::price`] with an
//! explicit [`Finish`].
//!
//! Rows borrow from the store and the cache and are rebuilt on demand, so a
//! row always reflects the current tag mode and the current tags.

use serde::Serialize;

use crate::cache::CardCache;
use crate::card::CardRecord;
use crate::deck::DeckStore;
use crate::model::{DeckEntry, Finish};
use crate::tags::{visible_tags, TagMode, TagScope, VisibleTags};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardMetadata<'a> {
    Available(&'a CardRecord),
    Unavailable,
}

impl<'a> CardMetadata<'a> {
    pub fn record(&self) -> Option<&'a CardRecord> {
        match self {
            CardMetadata::Available(record) => Some(*record),
            CardMetadata::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, CardMetadata::Available(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow<'a> {
    pub entry: &'a DeckEntry,
    pub card: CardMetadata<'a>,
    pub finish: Finish,
    pub price: Option<&'a str>,
    pub tags: VisibleTags<'a>,
}

impl<'a> ViewRow<'a> {
    pub fn build(entry: &'a DeckEntry, cache: &'a CardCache, mode: TagMode) -> Self {
        let finish = entry.finish();
        let card = match cache.lookup(&entry.set, &entry.collector_number) {
            Some(record) => CardMetadata::Available(record),
            None => CardMetadata::Unavailable,
        };
        let price = card.record().and_then(|record| record.usd_price(finish));
        Self {
            entry,
            card,
            finish,
            price,
            tags: visible_tags(mode, entry),
        }
    }

    /// The name to display: the record's canonical name when available
    /// (it includes both halves of split cards), else the declared name.
    pub fn display_name(&self) -> &'a str {
        self.card
            .record()
            .map(|record| record.name.as_str())
            .unwrap_or(self.entry.name.as_str())
    }

    /// True when the record says this printing doesn't come in the
    /// entry's finish. Unknown when metadata is unavailable.
    pub fn finish_mismatch(&self) -> Option<bool> {
        self.card
            .record()
            .map(|record| !record.has_finish(self.finish))
    }
}

/// Build one row per deck entry, in deck order.
pub fn reconcile<'a>(
    deck: &'a DeckStore,
    cache: &'a CardCache,
    mode: TagMode,
) -> Vec<ViewRow<'a>> {
    deck.entries()
        .iter()
        .map(|entry| ViewRow::build(entry, cache, mode))
        .collect()
}

/// Flat, owned form of a row, for handing to a UI over a serialization
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSummary {
    pub name: String,
    pub amount: u32,
    pub set: String,
    pub collector_number: String,
    pub finish: Finish,
    pub metadata_available: bool,
    pub type_line: Option<String>,
    pub mana_cost: Option<String>,
    pub price: Option<String>,
    pub deck_specific_tags: Vec<String>,
    pub global_tags: Vec<String>,
}

impl From<&ViewRow<'_>> for RowSummary {
    fn from(row: &ViewRow<'_>) -> Self {
        let record = row.card.record();
        let owned = |tags: Vec<&str>| -> Vec<String> {
            tags.into_iter().map(str::to_string).collect()
        };
        Self {
            name: row.display_name().to_string(),
            amount: row.entry.amount,
            set: row.entry.set.clone(),
            collector_number: row.entry.collector_number.clone(),
            finish: row.finish,
            metadata_available: record.is_some(),
            type_line: record.map(|r| r.type_line.clone()),
            mana_cost: record.and_then(|r| r.mana_cost.clone()),
            price: row.price.map(str::to_string),
            deck_specific_tags: owned(row.tags.in_scope(TagScope::DeckSpecific)),
            global_tags: owned(row.tags.in_scope(TagScope::Global)),
        }
    }
}
