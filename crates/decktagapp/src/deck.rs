//! # Deck Entry Store
//!
//! The user's declared deck: an ordered list of [`DeckEntry`] values. Order is
//! display order, so additions append and removals keep the relative order of
//! what remains.
//!
//! ## Invariants
//!
//! - No two entries share an [`EntryKey`].
//! - Every entry has `amount >= 1`.
//! - Every tag is trimmed and non-empty, and is present in the registry.
//!
//! All three are enforced on every mutation path. [`DeckStore::add`] and
//! [`DeckStore::from_entries`] normalize the tags an entry arrives with;
//! [`DeckStore::update`] rolls the entry back if the mutator breaks a rule.
//!
//! ## Edited Flag
//!
//! Every successful mutation sets `tags_edited`, telling the UI that there are
//! unsaved changes. Only [`DeckStore::mark_tags_saved`] clears it. No-op tag
//! edits (adding a tag that is already there) still count as an edit.
//!
//! ## Tag Registry
//!
//! Each namespace has a [`TagRegistry`] of known tag names, which is what tag
//! pickers offer as suggestions. [`DeckStore::create_tag`] registers a tag
//! before any entry uses it; assigning a tag registers it implicitly.
//! Removing a tag from an entry leaves it registered. [`DeckStore::rename_tag`]
//! and [`DeckStore::delete_tag`] apply to the registry and to all entries at
//! once.

use std::collections::BTreeSet;

use crate::error::{DeckError, Result};
use crate::model::{DeckEntry, EntryKey};
use crate::tags::{normalize_tag, TagRegistry, TagScope};

#[derive(Debug, Default, Clone)]
pub struct DeckStore {
    entries: Vec<DeckEntry>,
    registry: TagRegistry,
    tags_edited: bool,
}

impl DeckStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from previously saved entries.
    ///
    /// Entries are added one by one, so a list with duplicate keys, a zero
    /// amount or an empty tag is rejected. The edited flag starts cleared.
    pub fn from_entries(entries: Vec<DeckEntry>) -> Result<Self> {
        let mut store = Self::new();
        for entry in entries {
            store.add(entry)?;
        }
        store.tags_edited = false;
        Ok(store)
    }

    pub fn entries(&self) -> &[DeckEntry] {
        &self.entries
    }

    pub fn get(&self, key: &EntryKey) -> Option<&DeckEntry> {
        self.entries.iter().find(|e| e.matches(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of physical cards, counting every copy.
    pub fn total_cards(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.amount)).sum()
    }

    pub fn is_tags_edited(&self) -> bool {
        self.tags_edited
    }

    pub fn mark_tags_saved(&mut self) {
        self.tags_edited = false;
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn add(&mut self, mut entry: DeckEntry) -> Result<()> {
        if entry.amount == 0 {
            return Err(DeckError::InvalidAmount);
        }
        normalize_entry_tags(&mut entry)?;
        if self.position(&entry.key()).is_some() {
            return Err(DeckError::DuplicateEntry(entry.key()));
        }
        self.registry.register_entry(&entry);
        self.entries.push(entry);
        self.tags_edited = true;
        Ok(())
    }

    /// Apply `mutator` to the entry with `key` and return the entry's key
    /// afterwards.
    ///
    /// If the mutated entry collides with another entry's key, drops its
    /// amount to zero or gains an empty tag, the change is discarded and an
    /// error returned.
    pub fn update<F>(&mut self, key: &EntryKey, mutator: F) -> Result<EntryKey>
    where
        F: FnOnce(&mut DeckEntry),
    {
        let pos = self.require(key)?;
        let original = self.entries[pos].clone();
        mutator(&mut self.entries[pos]);

        if let Err(e) = self.check_updated(pos) {
            self.entries[pos] = original;
            return Err(e);
        }

        self.registry.register_entry(&self.entries[pos]);
        self.tags_edited = true;
        Ok(self.entries[pos].key())
    }

    pub fn remove(&mut self, key: &EntryKey) -> Result<DeckEntry> {
        let pos = self.require(key)?;
        let removed = self.entries.remove(pos);
        self.tags_edited = true;
        Ok(removed)
    }

    /// Add a tag to one namespace of an entry, registering it if new.
    ///
    /// Returns `Ok(false)` if the entry already had the tag.
    pub fn add_tag(&mut self, key: &EntryKey, scope: TagScope, tag: &str) -> Result<bool> {
        let tag = normalize_tag(tag)?;
        let pos = self.require(key)?;
        self.registry.insert(scope, &tag);
        let inserted = self.entries[pos].tags_mut(scope).insert(tag);
        self.tags_edited = true;
        Ok(inserted)
    }

    /// Remove a tag from one namespace of an entry. The tag stays
    /// registered.
    ///
    /// Returns `Ok(false)` if the entry did not have the tag.
    pub fn remove_tag(&mut self, key: &EntryKey, scope: TagScope, tag: &str) -> Result<bool> {
        let tag = normalize_tag(tag)?;
        let pos = self.require(key)?;
        let removed = self.entries[pos].tags_mut(scope).remove(&tag);
        self.tags_edited = true;
        Ok(removed)
    }

    pub fn add_global_tag(&mut self, key: &EntryKey, tag: &str) -> Result<bool> {
        self.add_tag(key, TagScope::Global, tag)
    }

    pub fn remove_global_tag(&mut self, key: &EntryKey, tag: &str) -> Result<bool> {
        self.remove_tag(key, TagScope::Global, tag)
    }

    pub fn add_deck_tag(&mut self, key: &EntryKey, tag: &str) -> Result<bool> {
        self.add_tag(key, TagScope::DeckSpecific, tag)
    }

    pub fn remove_deck_tag(&mut self, key: &EntryKey, tag: &str) -> Result<bool> {
        self.remove_tag(key, TagScope::DeckSpecific, tag)
    }

    /// Register a tag without assigning it. Returns `Ok(false)` if it was
    /// already registered.
    pub fn create_tag(&mut self, scope: TagScope, name: &str) -> Result<bool> {
        let name = normalize_tag(name)?;
        let created = self.registry.insert(scope, &name);
        if created {
            self.tags_edited = true;
        }
        Ok(created)
    }

    /// Every registered tag in `scope`, sorted.
    pub fn tag_names(&self, scope: TagScope) -> Vec<String> {
        self.registry.names(scope).iter().cloned().collect()
    }

    /// Rename a registered tag, in the registry and on every entry that has
    /// it. Renaming onto an existing tag merges the two.
    ///
    /// Returns `None` if `from` is not registered or equals `to`, else the
    /// number of entries changed.
    pub fn rename_tag(&mut self, scope: TagScope, from: &str, to: &str) -> Result<Option<usize>> {
        let from = normalize_tag(from)?;
        let to = normalize_tag(to)?;
        if from == to || !self.registry.remove(scope, &from) {
            return Ok(None);
        }
        self.registry.insert(scope, &to);

        let mut changed = 0;
        for entry in &mut self.entries {
            let tags = entry.tags_mut(scope);
            if tags.remove(&from) {
                tags.insert(to.clone());
                changed += 1;
            }
        }
        self.tags_edited = true;
        Ok(Some(changed))
    }

    /// Unregister a tag and remove it from every entry.
    ///
    /// Returns `None` if the tag is not registered, else the number of
    /// entries changed.
    pub fn delete_tag(&mut self, scope: TagScope, name: &str) -> Option<usize> {
        let name = name.trim();
        if !self.registry.remove(scope, name) {
            return None;
        }
        let mut changed = 0;
        for entry in &mut self.entries {
            if entry.tags_mut(scope).remove(name) {
                changed += 1;
            }
        }
        self.tags_edited = true;
        Some(changed)
    }

    fn check_updated(&mut self, pos: usize) -> Result<()> {
        if self.entries[pos].amount == 0 {
            return Err(DeckError::InvalidAmount);
        }
        normalize_entry_tags(&mut self.entries[pos])?;
        let key = self.entries[pos].key();
        let collides = self
            .entries
            .iter()
            .enumerate()
            .any(|(i, other)| i != pos && other.matches(&key));
        if collides {
            return Err(DeckError::DuplicateEntry(key));
        }
        Ok(())
    }

    fn position(&self, key: &EntryKey) -> Option<usize> {
        self.entries.iter().position(|e| e.matches(key))
    }

    fn require(&self, key: &EntryKey) -> Result<usize> {
        self.position(key).ok_or_else(|| {
            log::warn!("stale deck entry reference: {}", key);
            DeckError::NotFound(key.clone())
        })
    }
}

/// Trim every tag on `entry` in place, rejecting empty ones.
fn normalize_entry_tags(entry: &mut DeckEntry) -> Result<()> {
    for scope in TagScope::ALL {
        let normalized = entry
            .tags(scope)
            .iter()
            .map(|tag| normalize_tag(tag))
            .collect::<std::result::Result<BTreeSet<_>, _>>()?;
        *entry.tags_mut(scope) = normalized;
    }
    Ok(())
}

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct DeckFixture {
        pub store: DeckStore,
    }

    impl Default for DeckFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DeckFixture {
        pub fn new() -> Self {
            Self {
                store: DeckStore::new(),
            }
        }

        pub fn with_entry(mut self, name: &str, set: &str, collector_number: &str) -> Self {
            self.store
                .add(DeckEntry::new(name, set, collector_number))
                .unwrap();
            self
        }

        pub fn with_tagged_entry(
            mut self,
            name: &str,
            set: &str,
            collector_number: &str,
            global: &[&str],
            deck: &[&str],
        ) -> Self {
            let mut entry = DeckEntry::new(name, set, collector_number);
            for tag in global {
                entry = entry.with_tag(TagScope::Global, *tag);
            }
            for tag in deck {
                entry = entry.with_tag(TagScope::DeckSpecific, *tag);
            }
            self.store.add(entry).unwrap();
            self
        }

        /// Return the store with the edited flag cleared.
        pub fn build(mut self) -> DeckStore {
            self.store.mark_tags_saved();
            self.store
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::DeckFixture;
    use super::*;

    fn bolt() -> EntryKey {
        EntryKey::new("Lightning Bolt", "2xm", "141")
    }

    fn sample() -> DeckStore {
        DeckFixture::new()
            .with_entry("Lightning Bolt", "2xm", "141")
            .with_entry("Counterspell", "mh2", "267")
            .with_entry("Sol Ring", "c21", "263")
            .build()
    }

    fn names(store: &DeckStore) -> Vec<&str> {
        store.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let store = sample();
        assert_eq!(names(&store), vec!["Lightning Bolt", "Counterspell", "Sol Ring"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_add_duplicate_is_rejected() {
        let mut store = sample();
        let err = store
            .add(DeckEntry::new("Lightning Bolt", "2xm", "141"))
            .unwrap_err();
        assert!(matches!(err, DeckError::DuplicateEntry(key) if key == bolt()));
        assert_eq!(store.len(), 3);
        assert!(!store.is_tags_edited());
    }

    #[test]
    fn test_foil_copy_is_a_separate_entry() {
        let mut store = sample();
        store
            .add(DeckEntry::new("Lightning Bolt", "2xm", "141").foil())
            .unwrap();
        assert_eq!(store.len(), 4);
        assert!(store.get(&bolt().foil()).is_some());
    }

    #[test]
    fn test_add_zero_amount_is_rejected() {
        let mut store = DeckStore::new();
        let mut entry = DeckEntry::new("Island", "dmu", "262");
        entry.amount = 0;
        assert!(matches!(store.add(entry), Err(DeckError::InvalidAmount)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_preserves_order_of_rest() {
        let mut store = sample();
        let removed = store
            .remove(&EntryKey::new("Counterspell", "mh2", "267"))
            .unwrap();
        assert_eq!(removed.name, "Counterspell");
        assert_eq!(names(&store), vec!["Lightning Bolt", "Sol Ring"]);
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let mut store = sample();
        let key = EntryKey::new("Black Lotus", "lea", "232");
        assert!(matches!(store.remove(&key), Err(DeckError::NotFound(k)) if k == key));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_add_then_remove_restores_state() {
        let mut store = sample();
        let before = store.entries().to_vec();
        let entry = DeckEntry::new("Brainstorm", "ice", "61");
        let key = entry.key();
        store.add(entry).unwrap();
        store.remove(&key).unwrap();
        assert_eq!(store.entries(), before.as_slice());
    }

    #[test]
    fn test_update_changes_amount_in_place() {
        let mut store = sample();
        store.update(&bolt(), |e| e.amount = 4).unwrap();
        assert_eq!(store.get(&bolt()).unwrap().amount, 4);
        assert_eq!(store.total_cards(), 6);
        assert!(store.is_tags_edited());
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut store = sample();
        let result = store.update(&EntryKey::new("Nope", "xyz", "1"), |e| e.amount = 2);
        assert!(matches!(result, Err(DeckError::NotFound(_))));
        assert!(!store.is_tags_edited());
    }

    #[test]
    fn test_update_rolls_back_zero_amount() {
        let mut store = sample();
        let result = store.update(&bolt(), |e| e.amount = 0);
        assert!(matches!(result, Err(DeckError::InvalidAmount)));
        assert_eq!(store.get(&bolt()).unwrap().amount, 1);
    }

    #[test]
    fn test_update_rolls_back_key_collision() {
        let mut store = sample();
        let result = store.update(&bolt(), |e| {
            e.name = "Sol Ring".to_string();
            e.set = "c21".to_string();
            e.collector_number = "263".to_string();
        });
        assert!(matches!(result, Err(DeckError::DuplicateEntry(_))));
        assert!(store.get(&bolt()).is_some());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_update_rolls_back_collision_with_later_entry() {
        let mut store = DeckStore::new();
        store.add(DeckEntry::new("Lightning Bolt", "2xm", "141")).unwrap();
        store
            .add(DeckEntry::new("Lightning Bolt", "2xm", "141").foil())
            .unwrap();
        store.mark_tags_saved();

        let result = store.update(&bolt(), |e| e.is_foil = true);
        assert!(matches!(result, Err(DeckError::DuplicateEntry(key)) if key == bolt().foil()));
        assert!(store.get(&bolt()).is_some());
        assert!(store.get(&bolt().foil()).is_some());
        assert_eq!(store.len(), 2);
        assert!(!store.is_tags_edited());
    }

    #[test]
    fn test_update_may_change_finish() {
        let mut store = sample();
        let new_key = store.update(&bolt(), |e| e.is_foil = true).unwrap();
        assert_eq!(new_key, bolt().foil());
        assert!(store.get(&bolt()).is_none());
        assert!(store.get(&bolt().foil()).is_some());
        assert_eq!(names(&store)[0], "Lightning Bolt");
    }

    #[test]
    fn test_tag_helpers_touch_one_namespace() {
        let mut store = sample();
        assert!(store.add_global_tag(&bolt(), "staple").unwrap());
        assert!(store.add_deck_tag(&bolt(), "burn").unwrap());

        let entry = store.get(&bolt()).unwrap();
        assert!(entry.global_tags.contains("staple"));
        assert!(!entry.global_tags.contains("burn"));
        assert!(entry.deck_specific_tags.contains("burn"));

        assert!(store.remove_global_tag(&bolt(), "staple").unwrap());
        let entry = store.get(&bolt()).unwrap();
        assert!(entry.global_tags.is_empty());
        assert!(entry.deck_specific_tags.contains("burn"));

        assert!(store.remove_deck_tag(&bolt(), "burn").unwrap());
        assert!(store.get(&bolt()).unwrap().deck_specific_tags.is_empty());
    }

    #[test]
    fn test_tags_are_trimmed() {
        let mut store = sample();
        store.add_deck_tag(&bolt(), "  burn ").unwrap();
        assert!(store.get(&bolt()).unwrap().deck_specific_tags.contains("burn"));
        assert!(store.remove_deck_tag(&bolt(), "burn  ").unwrap());
    }

    #[test]
    fn test_empty_tag_is_rejected() {
        let mut store = sample();
        let err = store.add_global_tag(&bolt(), "   ").unwrap_err();
        assert!(matches!(err, DeckError::InvalidTag(_)));
        assert!(!store.is_tags_edited());
    }

    #[test]
    fn test_duplicate_and_missing_tags_are_noops() {
        let mut store = sample();
        store.add_global_tag(&bolt(), "staple").unwrap();
        let before = store.get(&bolt()).unwrap().clone();

        assert!(!store.add_global_tag(&bolt(), "staple").unwrap());
        assert!(!store.remove_global_tag(&bolt(), "never-added").unwrap());
        assert_eq!(store.get(&bolt()).unwrap(), &before);
    }

    #[test]
    fn test_tag_on_missing_entry_is_not_found() {
        let mut store = sample();
        let key = EntryKey::new("Nope", "xyz", "1");
        assert!(matches!(
            store.add_deck_tag(&key, "combo"),
            Err(DeckError::NotFound(_))
        ));
    }

    #[test]
    fn test_edited_flag_lifecycle() {
        let mut store = sample();
        assert!(!store.is_tags_edited());

        store.add_global_tag(&bolt(), "staple").unwrap();
        assert!(store.is_tags_edited());

        store.mark_tags_saved();
        assert!(!store.is_tags_edited());

        // Still flagged for a no-op add.
        store.add_global_tag(&bolt(), "staple").unwrap();
        assert!(store.is_tags_edited());
    }

    #[test]
    fn test_tag_names_are_sorted_and_distinct() {
        let store = DeckFixture::new()
            .with_tagged_entry("Sol Ring", "c21", "263", &["ramp", "staple"], &["t1"])
            .with_tagged_entry("Arcane Signet", "c21", "231", &["ramp"], &[])
            .build();
        assert_eq!(store.tag_names(TagScope::Global), vec!["ramp", "staple"]);
        assert_eq!(store.tag_names(TagScope::DeckSpecific), vec!["t1"]);
    }

    #[test]
    fn test_rename_tag_across_entries() {
        let mut store = DeckFixture::new()
            .with_tagged_entry("Sol Ring", "c21", "263", &["ramp"], &["ramp"])
            .with_tagged_entry("Arcane Signet", "c21", "231", &["ramp"], &[])
            .build();
        let changed = store.rename_tag(TagScope::Global, "ramp", "mana").unwrap();
        assert_eq!(changed, Some(2));
        assert_eq!(store.tag_names(TagScope::Global), vec!["mana"]);
        assert_eq!(store.tag_names(TagScope::DeckSpecific), vec!["ramp"]);
        assert!(store.is_tags_edited());
    }

    #[test]
    fn test_rename_unknown_tag_changes_nothing() {
        let mut store = sample();
        assert_eq!(store.rename_tag(TagScope::Global, "ramp", "mana").unwrap(), None);
        assert!(store.tag_names(TagScope::Global).is_empty());
        assert!(!store.is_tags_edited());
    }

    #[test]
    fn test_delete_tag_across_entries() {
        let mut store = DeckFixture::new()
            .with_tagged_entry("Sol Ring", "c21", "263", &[], &["cut"])
            .with_tagged_entry("Arcane Signet", "c21", "231", &[], &["cut", "keep"])
            .build();
        assert_eq!(store.delete_tag(TagScope::DeckSpecific, "cut"), Some(2));
        assert_eq!(store.tag_names(TagScope::DeckSpecific), vec!["keep"]);
        assert_eq!(store.delete_tag(TagScope::DeckSpecific, "cut"), None);
    }

    #[test]
    fn test_create_tag_before_any_use() {
        let mut store = sample();
        assert!(store.create_tag(TagScope::Global, " removal ").unwrap());
        assert!(!store.create_tag(TagScope::Global, "removal").unwrap());
        assert!(store.is_tags_edited());

        assert_eq!(store.tag_names(TagScope::Global), vec!["removal"]);
        assert!(store.tag_names(TagScope::DeckSpecific).is_empty());
        assert!(store.entries().iter().all(|e| e.global_tags.is_empty()));

        assert!(matches!(
            store.create_tag(TagScope::Global, "  "),
            Err(DeckError::InvalidTag(_))
        ));
    }

    #[test]
    fn test_unused_tag_can_be_renamed_and_deleted() {
        let mut store = sample();
        store.create_tag(TagScope::DeckSpecific, "sideboard").unwrap();

        assert_eq!(
            store.rename_tag(TagScope::DeckSpecific, "sideboard", "side").unwrap(),
            Some(0)
        );
        assert_eq!(store.tag_names(TagScope::DeckSpecific), vec!["side"]);

        assert_eq!(store.delete_tag(TagScope::DeckSpecific, "side"), Some(0));
        assert!(store.tag_names(TagScope::DeckSpecific).is_empty());
    }

    #[test]
    fn test_removing_last_use_keeps_tag_registered() {
        let mut store = sample();
        store.add_global_tag(&bolt(), "staple").unwrap();
        store.remove_global_tag(&bolt(), "staple").unwrap();
        assert_eq!(store.tag_names(TagScope::Global), vec!["staple"]);

        store.remove(&bolt()).unwrap();
        assert!(store.registry().contains(TagScope::Global, "staple"));
    }

    #[test]
    fn test_add_normalizes_entry_tags() {
        let mut store = DeckStore::new();
        store
            .add(DeckEntry::new("Sol Ring", "c21", "263").with_tag(TagScope::Global, "  ramp "))
            .unwrap();
        let key = EntryKey::new("Sol Ring", "c21", "263");
        assert!(store.get(&key).unwrap().global_tags.contains("ramp"));
        assert_eq!(store.tag_names(TagScope::Global), vec!["ramp"]);

        let err = store
            .add(DeckEntry::new("Island", "dmu", "262").with_tag(TagScope::Global, "   "))
            .unwrap_err();
        assert!(matches!(err, DeckError::InvalidTag(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_from_entries_rejects_empty_tags() {
        let json = r#"[{"name": "Sol Ring", "amount": 1, "set": "c21",
            "collectorNumber": "263", "deckSpecificTags": [""]}]"#;
        let entries: Vec<DeckEntry> = serde_json::from_str(json).unwrap();
        assert!(matches!(
            DeckStore::from_entries(entries),
            Err(DeckError::InvalidTag(_))
        ));
    }

    #[test]
    fn test_update_rolls_back_empty_tag() {
        let mut store = sample();
        let result = store.update(&bolt(), |e| {
            e.amount = 3;
            e.deck_specific_tags.insert(" ".to_string());
        });
        assert!(matches!(result, Err(DeckError::InvalidTag(_))));
        let entry = store.get(&bolt()).unwrap();
        assert_eq!(entry.amount, 1);
        assert!(entry.deck_specific_tags.is_empty());
        assert!(!store.is_tags_edited());
    }

    #[test]
    fn test_update_registers_new_tags() {
        let mut store = sample();
        store
            .update(&bolt(), |e| {
                e.global_tags.insert(" burn".to_string());
            })
            .unwrap();
        assert!(store.get(&bolt()).unwrap().global_tags.contains("burn"));
        assert_eq!(store.tag_names(TagScope::Global), vec!["burn"]);
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let entries = vec![
            DeckEntry::new("Sol Ring", "c21", "263"),
            DeckEntry::new("Sol Ring", "c21", "263"),
        ];
        assert!(matches!(
            DeckStore::from_entries(entries),
            Err(DeckError::DuplicateEntry(_))
        ));

        let store = DeckStore::from_entries(vec![DeckEntry::new("Sol Ring", "c21", "263")]).unwrap();
        assert!(!store.is_tags_edited());
    }
}
