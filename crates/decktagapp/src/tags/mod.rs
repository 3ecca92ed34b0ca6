//! Tag namespaces and the tag-mode visibility rule.
//!
//! Every deck entry carries two independent tag collections:
//!
//! - **Global** tags describe the card itself ("staple", "mana rock") and are
//!   meant to follow the card name into every deck.
//! - **Deck-specific** tags describe the card's role in this deck only
//!   ("combo-piece", "sideboard").
//!
//! Which collections the UI shows and edits is decided by a single
//! [`TagMode`], persisted in [`crate::settings::Settings`].
//!
//! ## Visibility Table
//!
//! | Mode | Scopes shown |
//! |------|--------------|
//! | `none` | nothing |
//! | `deckSpecific` | deck-specific tags |
//! | `global` | global tags |
//! | `all` | deck-specific tags, then global tags |
//!
//! [`visible_tags`] is a pure function of the mode and the entry. Callers
//! recompute it on every render instead of caching the result.
//!
//! ## Tag Rules
//!
//! See [`validation`]: tags are trimmed and must be non-empty.

pub mod validation;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::DeckEntry;

pub use validation::{normalize_tag, TagValidationError};

/// One of the two tag namespaces on a deck entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TagScope {
    DeckSpecific,
    Global,
}

impl TagScope {
    pub const ALL: [TagScope; 2] = [TagScope::DeckSpecific, TagScope::Global];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagScope::DeckSpecific => "deckSpecific",
            TagScope::Global => "global",
        }
    }
}

impl std::fmt::Display for TagScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tag namespaces are surfaced for display and editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TagMode {
    None,
    #[default]
    DeckSpecific,
    Global,
    All,
}

impl TagMode {
    pub const ALL: [TagMode; 4] = [
        TagMode::None,
        TagMode::DeckSpecific,
        TagMode::Global,
        TagMode::All,
    ];

    /// The scopes shown under this mode, in display order.
    pub fn scopes(&self) -> &'static [TagScope] {
        match self {
            TagMode::None => &[],
            TagMode::DeckSpecific => &[TagScope::DeckSpecific],
            TagMode::Global => &[TagScope::Global],
            TagMode::All => &[TagScope::DeckSpecific, TagScope::Global],
        }
    }

    pub fn shows(&self, scope: TagScope) -> bool {
        self.scopes().contains(&scope)
    }

    /// The scope a newly typed tag is added to under this mode.
    ///
    /// Under `all` new tags go to the deck, since a global tag changes the
    /// card everywhere.
    pub fn editable_scope(&self) -> Option<TagScope> {
        self.scopes().first().copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TagMode::None => "none",
            TagMode::DeckSpecific => "deckSpecific",
            TagMode::Global => "global",
            TagMode::All => "all",
        }
    }

    /// Parse the persisted string form. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == value)
    }
}

impl std::fmt::Display for TagMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tag together with the namespace it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScopedTag<'a> {
    pub scope: TagScope,
    pub name: &'a str,
}

/// Tags visible for one entry under one mode.
///
/// Namespaces are never merged: a tag present in both collections appears
/// twice, once per scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisibleTags<'a> {
    tags: Vec<ScopedTag<'a>>,
}

impl<'a> VisibleTags<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &ScopedTag<'a>> {
        self.tags.iter()
    }

    pub fn in_scope(&self, scope: TagScope) -> Vec<&'a str> {
        self.tags
            .iter()
            .filter(|t| t.scope == scope)
            .map(|t| t.name)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Tag names known per namespace, whether or not an entry uses them.
///
/// A tag is created here before it is assigned, and stays when its last
/// use is removed. Only an explicit delete drops it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRegistry {
    deck_specific: BTreeSet<String>,
    global: BTreeSet<String>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self, scope: TagScope) -> &BTreeSet<String> {
        match scope {
            TagScope::DeckSpecific => &self.deck_specific,
            TagScope::Global => &self.global,
        }
    }

    pub fn contains(&self, scope: TagScope, name: &str) -> bool {
        self.names(scope).contains(name)
    }

    /// Returns false if the tag was already registered.
    pub fn insert(&mut self, scope: TagScope, name: &str) -> bool {
        if self.contains(scope, name) {
            return false;
        }
        self.names_mut(scope).insert(name.to_string())
    }

    pub fn remove(&mut self, scope: TagScope, name: &str) -> bool {
        self.names_mut(scope).remove(name)
    }

    /// Register every tag an entry carries.
    pub fn register_entry(&mut self, entry: &DeckEntry) {
        for scope in TagScope::ALL {
            for tag in entry.tags(scope) {
                self.insert(scope, tag);
            }
        }
    }

    fn names_mut(&mut self, scope: TagScope) -> &mut BTreeSet<String> {
        match scope {
            TagScope::DeckSpecific => &mut self.deck_specific,
            TagScope::Global => &mut self.global,
        }
    }
}

/// Apply the visibility table to one entry.
pub fn visible_tags(mode: TagMode, entry: &DeckEntry) -> VisibleTags<'_> {
    let tags = mode
        .scopes()
        .iter()
        .flat_map(|&scope| {
            entry.tags(scope).iter().map(move |name| ScopedTag {
                scope,
                name: name.as_str(),
            })
        })
        .collect();
    VisibleTags { tags }
}
