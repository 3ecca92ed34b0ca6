//! # Decktag Architecture
//!
//! Decktag is a **UI-agnostic deck engine**. It keeps the cards a user has
//! declared for a deck, joins them against card metadata fetched from a
//! remote catalog, and manages two namespaces of user tags on each entry.
//! Rendering, fetching and deck file parsing belong to whatever UI embeds it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - DeckApi facade, one entry point for the UI               │
//! │  - Emits a ChangeEvent per successful mutation              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Components                                                 │
//! │  - deck.rs: DeckStore (entries, tags, edited flag)          │
//! │  - cache.rs: CardCache (records keyed by printing)          │
//! │  - settings.rs: SettingsStore (tagMode, defaulting)         │
//! │  - view.rs: reconcile() joins deck and cache into rows      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StorageBackend trait over JSON blobs                     │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Join
//!
//! A deck entry is identified by its [`model::EntryKey`]: name, set,
//! collector number and the two finish flags. A card record is identified
//! by its printing, `(set, collector_number)`. Several entries (a nonfoil and
//! a foil copy, say) can therefore share one record. A printing missing from
//! the cache never fails the join; the row is marked unavailable.
//!
//! ## Tags
//!
//! Each entry carries deck-specific and global tags. The persisted
//! [`tags::TagMode`] decides which of the two namespaces are shown. See
//! [`tags`] for the visibility table.
//!
//! ## No I/O Assumptions in Core
//!
//! Nothing in this crate writes to stdout or assumes a terminal. The only
//! filesystem access is [`store::FsBackend`], chosen by the caller. Logging
//! goes through the `log` facade; the embedding application picks the
//! logger.
//!
//! ## Testing Strategy
//!
//! 1. **Components**: unit tests of business logic next to each module, with
//!    `MemBackend` for anything that persists.
//! 2. **API**: dispatch and notification tests in `api.rs`.
//! 3. **Storage**: `FsBackend` tests against temp directories in `tests/`.
//!
//! Fixtures live in `card::fixtures` and `deck::fixtures`, exported under
//! the `test_utils` feature for downstream crates.

pub mod api;
pub mod cache;
pub mod card;
pub mod config;
pub mod deck;
pub mod error;
pub mod events;
pub mod model;
pub mod settings;
pub mod store;
pub mod tags;
pub mod view;
