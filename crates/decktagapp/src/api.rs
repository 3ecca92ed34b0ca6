//! # API Facade
//!
//! [`DeckApi`] is the single entry point a UI talks to. It owns the three
//! components and the UI gating flags:
//!
//! - the [`DeckStore`] (user-declared entries and their tags)
//! - the [`CardCache`] (records from the last fetch)
//! - the [`SettingsStore`] (persisted tag mode)
//! - [`UiFlags`] (plain booleans the UI toggles)
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Dispatches** to the component that owns each operation
//! - **Notifies** subscribers with one [`ChangeEvent`] per successful call
//! - **Joins** the components into view rows on demand
//!
//! Business rules (uniqueness, tag validation, defaulting) live in the
//! components, not here.
//!
//! ## Generic Over StorageBackend
//!
//! `DeckApi<B: StorageBackend>` only touches storage through settings:
//! - Production: `DeckApi<FsBackend>` via [`DeckApi::open`]
//! - Testing: `DeckApi<MemBackend>`

use crate::cache::{CardCache, CardView, FaceSelector};
use crate::card::CardRecord;
use crate::config::DeckConfig;
use crate::deck::DeckStore;
use crate::error::Result;
use crate::events::{ChangeEvent, Observers, SubscriptionId};
use crate::model::{DeckEntry, EntryKey};
use crate::settings::{Settings, SettingsStore};
use crate::store::{FsBackend, StorageBackend};
use crate::tags::{visible_tags, TagMode, TagScope, VisibleTags};
use crate::view::{reconcile, RowSummary, ViewRow};

/// Booleans the UI uses to gate dialogs. The engine attaches no meaning to
/// them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiFlags {
    pub is_settings_opened: bool,
    pub is_add_tag_open: bool,
}

pub struct DeckApi<B: StorageBackend> {
    deck: DeckStore,
    cards: CardCache,
    settings: SettingsStore<B>,
    ui: UiFlags,
    observers: Observers,
}

impl DeckApi<FsBackend> {
    /// Open with filesystem storage at the configured data directory.
    pub fn open(config: &DeckConfig) -> Result<Self> {
        Self::load(config.fs_backend()?, &config.settings_key)
    }
}

impl<B: StorageBackend> DeckApi<B> {
    /// Load settings from `backend` under `settings_key` and start with an
    /// empty deck and an empty cache.
    pub fn load(backend: B, settings_key: &str) -> Result<Self> {
        Ok(Self {
            deck: DeckStore::new(),
            cards: CardCache::new(),
            settings: SettingsStore::load(backend, settings_key)?,
            ui: UiFlags::default(),
            observers: Observers::new(),
        })
    }

    pub fn with_deck(mut self, deck: DeckStore) -> Self {
        self.deck = deck;
        self
    }

    // --- Components ---

    pub fn deck(&self) -> &DeckStore {
        &self.deck
    }

    pub fn cards(&self) -> &CardCache {
        &self.cards
    }

    pub fn settings(&self) -> &Settings {
        self.settings.settings()
    }

    pub fn settings_store(&self) -> &SettingsStore<B> {
        &self.settings
    }

    // --- Deck entries ---

    pub fn add_entry(&mut self, entry: DeckEntry) -> Result<()> {
        let result = self.deck.add(entry);
        self.notify(result, ChangeEvent::DeckChanged)
    }

    /// Emits `TagsChanged` when the mutator only touched tags, else
    /// `DeckChanged`.
    pub fn update_entry<F>(&mut self, key: &EntryKey, mutator: F) -> Result<()>
    where
        F: FnOnce(&mut DeckEntry),
    {
        let before = self.deck.get(key).cloned();
        let new_key = self.deck.update(key, mutator)?;
        let tags_only = match (&before, self.deck.get(&new_key)) {
            (Some(before), Some(after)) => before.eq_ignoring_tags(after),
            _ => false,
        };
        self.observers.emit(if tags_only {
            ChangeEvent::TagsChanged
        } else {
            ChangeEvent::DeckChanged
        });
        Ok(())
    }

    pub fn remove_entry(&mut self, key: &EntryKey) -> Result<DeckEntry> {
        let result = self.deck.remove(key);
        self.notify(result, ChangeEvent::DeckChanged)
    }

    // --- Tags ---

    pub fn add_tag(&mut self, key: &EntryKey, scope: TagScope, tag: &str) -> Result<bool> {
        let result = self.deck.add_tag(key, scope, tag);
        self.notify(result, ChangeEvent::TagsChanged)
    }

    pub fn remove_tag(&mut self, key: &EntryKey, scope: TagScope, tag: &str) -> Result<bool> {
        let result = self.deck.remove_tag(key, scope, tag);
        self.notify(result, ChangeEvent::TagsChanged)
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

    pub fn create_tag(&mut self, scope: TagScope, name: &str) -> Result<bool> {
        let created = self.deck.create_tag(scope, name)?;
        if created {
            self.observers.emit(ChangeEvent::TagsChanged);
        }
        Ok(created)
    }

    pub fn rename_tag(&mut self, scope: TagScope, from: &str, to: &str) -> Result<Option<usize>> {
        let changed = self.deck.rename_tag(scope, from, to)?;
        if changed.is_some() {
            self.observers.emit(ChangeEvent::TagsChanged);
        }
        Ok(changed)
    }

    pub fn delete_tag(&mut self, scope: TagScope, name: &str) -> Option<usize> {
        let changed = self.deck.delete_tag(scope, name);
        if changed.is_some() {
            self.observers.emit(ChangeEvent::TagsChanged);
        }
        changed
    }

    pub fn tag_names(&self, scope: TagScope) -> Vec<String> {
        self.deck.tag_names(scope)
    }

    /// Tags of one entry under the current mode.
    pub fn visible_tags(&self, key: &EntryKey) -> Option<VisibleTags<'_>> {
        self.deck
            .get(key)
            .map(|entry| visible_tags(self.tag_mode(), entry))
    }

    pub fn is_tags_edited(&self) -> bool {
        self.deck.is_tags_edited()
    }

    /// Called by the UI once it has saved the deck's tags.
    pub fn mark_tags_saved(&mut self) {
        self.deck.mark_tags_saved();
        self.observers.emit(ChangeEvent::TagsSaved);
    }

    // --- Card records ---

    pub fn replace_cards(&mut self, records: Vec<CardRecord>) {
        let count = records.len();
        self.cards.replace(records);
        self.observers.emit(ChangeEvent::CardsReplaced { count });
    }

    pub fn lookup_face(
        &self,
        set: &str,
        collector_number: &str,
        selector: FaceSelector,
    ) -> Result<Option<CardView<'_>>> {
        self.cards.lookup_face(set, collector_number, selector)
    }

    // --- View ---

    pub fn rows(&self) -> Vec<ViewRow<'_>> {
        reconcile(&self.deck, &self.cards, self.tag_mode())
    }

    pub fn summaries(&self) -> Vec<RowSummary> {
        self.rows().iter().map(RowSummary::from).collect()
    }

    // --- Settings ---

    pub fn tag_mode(&self) -> TagMode {
        self.settings.tag_mode()
    }

    pub fn set_tag_mode(&mut self, mode: TagMode) -> Result<()> {
        let result = self.settings.set_tag_mode(mode);
        self.notify(result, ChangeEvent::TagModeChanged(mode))
    }

    // --- UI flags ---

    pub fn ui_flags(&self) -> &UiFlags {
        &self.ui
    }

    /// Direct access for UIs that toggle flags without notification.
    pub fn ui_flags_mut(&mut self) -> &mut UiFlags {
        &mut self.ui
    }

    pub fn set_settings_opened(&mut self, opened: bool) {
        self.ui.is_settings_opened = opened;
        self.observers.emit(ChangeEvent::UiFlagsChanged);
    }

    pub fn set_add_tag_open(&mut self, open: bool) {
        self.ui.is_add_tag_open = open;
        self.observers.emit(ChangeEvent::UiFlagsChanged);
    }

    // --- Notifications ---

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn notify<T>(&mut self, result: Result<T>, event: ChangeEvent) -> Result<T> {
        if result.is_ok() {
            self.observers.emit(event);
        }
        result
    }
}
