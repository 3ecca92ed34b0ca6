//! # User Settings
//!
//! Settings are one JSON object persisted under a fixed storage key:
//!
//! ```json
//! { "tagMode": "deckSpecific" }
//! ```
//!
//! ## Forward-Compatible Defaulting
//!
//! On load the persisted object is merged over the compiled defaults with
//! [`merge_defaults`]:
//!
//! - A key missing from storage (new install, or a key added by a newer
//!   version) takes the default.
//! - A key present in storage always wins over the default.
//! - A key with an unusable value (wrong type, unknown enum variant) falls
//!   back to the default for that key only. Loading never fails because of
//!   stored content.
//! - Keys this version doesn't know about are kept and written back, so a
//!   downgrade doesn't erase a newer version's settings.
//!
//! Every write persists the full merged object immediately.
//!
//! ## Available Settings
//!
//! | Key | Default | Values |
//! |-----|---------|--------|
//! | `tagMode` | `deckSpecific` | `none`, `deckSpecific`, `global`, `all` |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DeckError, Result};
use crate::store::StorageBackend;
use crate::tags::TagMode;

pub const DEFAULT_SETTINGS_KEY: &str = "settings";

/// Overlay `persisted` onto `defaults`.
///
/// Objects merge recursively, key by key. For any other pair the persisted
/// value wins, except that a `null` persisted value, or a non-object where
/// the defaults hold an object, falls back to the default.
///
/// ```
/// use decktagapp::settings::merge_defaults;
/// use serde_json::json;
///
/// let defaults = json!({"tagMode": "deckSpecific"});
/// assert_eq!(merge_defaults(&defaults, &json!({})), defaults);
/// assert_eq!(
///     merge_defaults(&defaults, &json!({"tagMode": "global"})),
///     json!({"tagMode": "global"})
/// );
/// ```
pub fn merge_defaults(defaults: &Value, persisted: &Value) -> Value {
    match (defaults, persisted) {
        (Value::Object(base), Value::Object(overlay)) => {
            let mut merged = Map::new();
            for (key, default_value) in base {
                let value = match overlay.get(key) {
                    Some(stored) => merge_defaults(default_value, stored),
                    None => default_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            for (key, stored) in overlay {
                if !base.contains_key(key) {
                    merged.insert(key.clone(), stored.clone());
                }
            }
            Value::Object(merged)
        }
        (_, Value::Null) => defaults.clone(),
        (Value::Object(_), _) => defaults.clone(),
        (_, stored) => stored.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub tag_mode: TagMode,
}

impl Settings {
    pub fn defaults_value() -> Value {
        serde_json::to_value(Settings::default()).unwrap_or(Value::Null)
    }

    /// Decode a merged settings object, key by key.
    ///
    /// Unusable values fall back to the default for that key.
    pub fn from_value(value: &Value) -> Self {
        let defaults = Settings::default();
        let tag_mode = match value.get("tagMode") {
            None => defaults.tag_mode,
            Some(raw) => match raw.as_str().and_then(TagMode::parse) {
                Some(mode) => mode,
                None => {
                    log::warn!(
                        "ignoring invalid persisted tagMode {}, using {}",
                        raw,
                        defaults.tag_mode
                    );
                    defaults.tag_mode
                }
            },
        };
        Settings { tag_mode }
    }
}

/// Settings bound to a storage backend.
///
/// Loaded once with [`SettingsStore::load`]; every setter persists.
pub struct SettingsStore<B: StorageBackend> {
    backend: B,
    key: String,
    settings: Settings,
    // Full merged object, including keys this version doesn't model.
    raw: Value,
}

impl<B: StorageBackend> SettingsStore<B> {
    pub fn load(backend: B, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let persisted = match backend.get(&key) {
            Ok(value) => value.unwrap_or(Value::Null),
            Err(DeckError::Serialization(e)) => {
                log::warn!("persisted settings under {:?} are not valid JSON: {}", key, e);
                Value::Null
            }
            Err(e) => return Err(e),
        };
        let raw = merge_defaults(&Settings::defaults_value(), &persisted);
        let settings = Settings::from_value(&raw);
        Ok(Self {
            backend,
            key,
            settings,
            raw,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tag_mode(&self) -> TagMode {
        self.settings.tag_mode
    }

    /// Change the tag mode and persist. On a failed write the previous mode
    /// is kept.
    pub fn set_tag_mode(&mut self, mode: TagMode) -> Result<()> {
        let previous = self.settings.tag_mode;
        self.settings.tag_mode = mode;
        if let Err(e) = self.save() {
            self.settings.tag_mode = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Persist the full merged settings object.
    pub fn save(&mut self) -> Result<()> {
        let current = serde_json::to_value(self.settings)?;
        let merged = merge_defaults(&self.raw, &current);
        self.backend.set(&self.key, &merged)?;
        log::info!("settings saved under {:?}: tagMode={}", self.key, self.settings.tag_mode);
        self.raw = merged;
        Ok(())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}
