//! # Storage Layer
//!
//! Persistence is delegated to a substrate that stores JSON blobs under
//! string keys. The engine only needs three operations from it, captured by
//! [`backend::StorageBackend`]:
//!
//! - `get(key)`: the stored blob, or `None` if nothing was ever written
//! - `set(key, value)`: replace the blob
//! - `merge(key, patch)`: overlay `patch` onto the stored blob (patch wins)
//!
//! There is no transactional guarantee beyond last write wins. The engine is
//! single-user, single-device state, so that is enough.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one `<key>.json` file per key under a root
//!   directory, written atomically (temp file then rename).
//! - [`mem_backend::MemBackend`]: a `HashMap` behind a `RefCell`, for tests.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! └── settings.json      # { "tagMode": "deckSpecific" }
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::StorageBackend;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
