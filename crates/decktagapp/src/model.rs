//! # Domain Model: Deck Entries and Printing Identity
//!
//! A [`DeckEntry`] is what the user declares: a card name, how many copies,
//! which printing (set + collector number) and which finish. It carries no
//! fetched metadata; that lives in [`crate::card::CardRecord`] and is joined
//! in by [`crate::view`].
//!
//! ## Identity
//!
//! Two entries are the same entry when their [`EntryKey`] matches:
//!
//! ```text
//! (name, set, collector_number, is_foil, is_etched)
//! ```
//!
//! A foil and a non-foil copy of the same printing are therefore two entries,
//! each with its own amount and its own deck-specific tags.
//!
//! ## Wire Shape
//!
//! Entries serialize with camelCase keys (`collectorNumber`, `isFoil`,
//! `globalTags`, ...) so deck files written by older web clients load as-is.
//! Missing tag arrays load as empty sets.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};
use crate::tags::TagScope;

/// Physical treatment of a printing. Each finish is priced independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    Nonfoil,
    Foil,
    Etched,
}

impl Finish {
    /// Resolve the finish from an entry's flags.
    ///
    /// Etched foils are a foil treatment, so an entry flagged both ways is
    /// an etched copy.
    pub fn from_flags(is_foil: bool, is_etched: bool) -> Self {
        if is_etched {
            Finish::Etched
        } else if is_foil {
            Finish::Foil
        } else {
            Finish::Nonfoil
        }
    }

    /// The name Scryfall uses for this finish in a record's `finishes` list.
    pub fn as_str(&self) -> &'static str {
        match self {
            Finish::Nonfoil => "nonfoil",
            Finish::Foil => "foil",
            Finish::Etched => "etched",
        }
    }
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite identity of a deck entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey {
    pub name: String,
    pub set: String,
    pub collector_number: String,
    pub is_foil: bool,
    pub is_etched: bool,
}

impl EntryKey {
    pub fn new(
        name: impl Into<String>,
        set: impl Into<String>,
        collector_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            set: set.into(),
            collector_number: collector_number.into(),
            is_foil: false,
            is_etched: false,
        }
    }

    pub fn foil(mut self) -> Self {
        self.is_foil = true;
        self
    }

    pub fn etched(mut self) -> Self {
        self.is_etched = true;
        self
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} #{}", self.name, self.set, self.collector_number)?;
        match Finish::from_flags(self.is_foil, self.is_etched) {
            Finish::Nonfoil => write!(f, ")"),
            finish => write!(f, ", {})", finish),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckEntry {
    pub name: String,
    pub amount: u32,
    pub set: String,
    pub collector_number: String,
    #[serde(default)]
    pub is_foil: bool,
    #[serde(default)]
    pub is_etched: bool,
    #[serde(default)]
    pub global_tags: BTreeSet<String>,
    #[serde(default)]
    pub deck_specific_tags: BTreeSet<String>,
}

impl DeckEntry {
    /// A single non-foil copy with no tags.
    pub fn new(
        name: impl Into<String>,
        set: impl Into<String>,
        collector_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            amount: 1,
            set: set.into(),
            collector_number: collector_number.into(),
            is_foil: false,
            is_etched: false,
            global_tags: BTreeSet::new(),
            deck_specific_tags: BTreeSet::new(),
        }
    }

    pub fn with_amount(mut self, amount: u32) -> Result<Self> {
        self.set_amount(amount)?;
        Ok(self)
    }

    pub fn foil(mut self) -> Self {
        self.is_foil = true;
        self
    }

    pub fn etched(mut self) -> Self {
        self.is_etched = true;
        self
    }

    pub fn with_tag(mut self, scope: TagScope, tag: impl Into<String>) -> Self {
        self.tags_mut(scope).insert(tag.into());
        self
    }

    pub fn set_amount(&mut self, amount: u32) -> Result<()> {
        if amount == 0 {
            return Err(DeckError::InvalidAmount);
        }
        self.amount = amount;
        Ok(())
    }

    pub fn key(&self) -> EntryKey {
        EntryKey {
            name: self.name.clone(),
            set: self.set.clone(),
            collector_number: self.collector_number.clone(),
            is_foil: self.is_foil,
            is_etched: self.is_etched,
        }
    }

    /// Cheaper than `self.key() == *key`, no allocation.
    pub fn matches(&self, key: &EntryKey) -> bool {
        self.name == key.name
            && self.set == key.set
            && self.collector_number == key.collector_number
            && self.is_foil == key.is_foil
            && self.is_etched == key.is_etched
    }

    /// True when the two entries differ at most in their tags.
    pub fn eq_ignoring_tags(&self, other: &DeckEntry) -> bool {
        self.amount == other.amount && other.matches(&self.key())
    }

    pub fn finish(&self) -> Finish {
        Finish::from_flags(self.is_foil, self.is_etched)
    }

    pub fn tags(&self, scope: TagScope) -> &BTreeSet<String> {
        match scope {
            TagScope::Global => &self.global_tags,
            TagScope::DeckSpecific => &self.deck_specific_tags,
        }
    }

    pub fn tags_mut(&mut self, scope: TagScope) -> &mut BTreeSet<String> {
        match scope {
            TagScope::Global => &mut self.global_tags,
            TagScope::DeckSpecific => &mut self.deck_specific_tags,
        }
    }
}
