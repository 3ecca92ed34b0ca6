//! # Card Records
//!
//! [`CardRecord`] is a full metadata snapshot of one printing, in the shape
//! the Scryfall API returns it. Records are produced by the network client,
//! handed to [`crate::cache::CardCache::replace`] and never mutated after
//! that.
//!
//! Field coverage follows the API closely, but the engine only reads a
//! handful of them (identity, printing, finishes, prices, faces). Every
//! field defaults when absent: Scryfall omits keys freely (no `image_uris`
//! on double-faced cards, no `power` on non-creatures, no `oracle_id` on
//! reversible cards) and absence is data, not an error.
//!
//! ## Multi-Faced Cards
//!
//! Split, transform and modal cards carry a `card_faces` array. Each
//! [`CardFace`] repeats the descriptive fields for that face alone. For
//! transforming cards the images live on the faces, not on the record; see
//! [`CardRecord::image_uris_or_front`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::model::Finish;

/// Per-format legality outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Legality {
    Legal,
    NotLegal,
    Restricted,
    Banned,
}

impl Legality {
    /// Restricted cards may still be played (one copy).
    pub fn is_playable(&self) -> bool {
        matches!(self, Legality::Legal | Legality::Restricted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderColor {
    Black,
    White,
    Borderless,
    Silver,
    Gold,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageUris {
    pub small: String,
    pub normal: String,
    pub large: String,
    pub png: String,
    pub art_crop: String,
    pub border_crop: String,
}

/// Price snapshot. Values are decimal strings exactly as Scryfall sends them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prices {
    pub usd: Option<String>,
    pub usd_foil: Option<String>,
    pub usd_etched: Option<String>,
    pub eur: Option<String>,
    pub eur_foil: Option<String>,
    pub tix: Option<String>,
}

impl Prices {
    pub fn usd_for(&self, finish: Finish) -> Option<&str> {
        match finish {
            Finish::Nonfoil => self.usd.as_deref(),
            Finish::Foil => self.usd_foil.as_deref(),
            Finish::Etched => self.usd_etched.as_deref(),
        }
    }

    /// Cardmarket has no separate etched price; etched copies trade as foils.
    pub fn eur_for(&self, finish: Finish) -> Option<&str> {
        match finish {
            Finish::Nonfoil => self.eur.as_deref(),
            Finish::Foil | Finish::Etched => self.eur_foil.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedUris {
    pub gatherer: Option<String>,
    pub tcgplayer_infinite_articles: Option<String>,
    pub tcgplayer_infinite_decks: Option<String>,
    pub edhrec: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseUris {
    pub tcgplayer: Option<String>,
    pub cardmarket: Option<String>,
    pub cardhoarder: Option<String>,
}

/// One face of a multi-faced card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardFace {
    pub artist: Option<String>,
    pub cmc: Option<f64>,
    pub color_indicator: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub flavor_text: Option<String>,
    pub illustration_id: Option<Uuid>,
    pub image_uris: Option<ImageUris>,
    pub layout: Option<String>,
    pub mana_cost: String,
    pub name: String,
    pub oracle_id: Option<Uuid>,
    pub oracle_text: Option<String>,
    pub power: Option<String>,
    pub printed_name: Option<String>,
    pub printed_text: Option<String>,
    pub printed_type_line: Option<String>,
    pub toughness: Option<String>,
    pub type_line: Option<String>,
    pub watermark: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardRecord {
    pub object: String,
    pub id: Uuid,
    pub oracle_id: Option<Uuid>,
    pub multiverse_ids: Vec<u64>,
    pub mtgo_id: Option<u64>,
    pub mtgo_foil_id: Option<u64>,
    pub tcgplayer_id: Option<u64>,
    pub cardmarket_id: Option<u64>,
    pub name: String,
    pub lang: String,
    pub released_at: Option<NaiveDate>,
    pub uri: String,
    pub scryfall_uri: String,
    pub layout: String,
    pub highres_image: bool,
    pub image_status: String,
    pub image_uris: Option<ImageUris>,
    pub mana_cost: Option<String>,
    pub cmc: f64,
    pub type_line: String,
    pub oracle_text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub colors: Option<Vec<String>>,
    pub color_identity: Vec<String>,
    pub keywords: Vec<String>,
    pub legalities: BTreeMap<String, Legality>,
    pub games: Vec<String>,
    pub reserved: bool,
    pub foil: bool,
    pub nonfoil: bool,
    pub finishes: Vec<String>,
    pub oversized: bool,
    pub promo: bool,
    pub reprint: bool,
    pub variation: bool,
    pub set_id: Option<Uuid>,
    pub set: String,
    pub set_name: String,
    pub set_type: String,
    pub set_uri: String,
    pub set_search_uri: String,
    pub scryfall_set_uri: String,
    pub rulings_uri: String,
    pub prints_search_uri: String,
    pub collector_number: String,
    pub digital: bool,
    pub rarity: String,
    pub flavor_text: Option<String>,
    pub card_back_id: Option<Uuid>,
    pub artist: Option<String>,
    pub artist_ids: Vec<Uuid>,
    pub illustration_id: Option<Uuid>,
    pub border_color: Option<BorderColor>,
    pub frame: String,
    pub security_stamp: Option<String>,
    pub full_art: bool,
    pub textless: bool,
    pub booster: bool,
    pub story_spotlight: bool,
    pub edhrec_rank: Option<u32>,
    pub penny_rank: Option<u32>,
    pub prices: Prices,
    pub related_uris: RelatedUris,
    pub purchase_uris: Option<PurchaseUris>,
    pub card_faces: Option<Vec<CardFace>>,
}

/// A search response page, or a bare array of cards.
#[derive(Deserialize)]
#[serde(untagged)]
enum CardPayload {
    Bare(Vec<CardRecord>),
    List { data: Vec<CardRecord> },
}

impl CardRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse either a JSON array of cards or a Scryfall list object
    /// (`{"object": "list", "data": [...]}`).
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        let payload: CardPayload = serde_json::from_str(json)?;
        Ok(match payload {
            CardPayload::Bare(cards) => cards,
            CardPayload::List { data } => data,
        })
    }

    pub fn faces(&self) -> &[CardFace] {
        self.card_faces.as_deref().unwrap_or_default()
    }

    pub fn legality(&self, format: &str) -> Option<Legality> {
        self.legalities.get(format).copied()
    }

    pub fn is_legal_in(&self, format: &str) -> bool {
        self.legality(format).is_some_and(|l| l.is_playable())
    }

    /// Whether this printing exists in the given finish. Older records
    /// without `finishes` fall back to the `foil`/`nonfoil` booleans.
    pub fn has_finish(&self, finish: Finish) -> bool {
        if !self.finishes.is_empty() {
            return self.finishes.iter().any(|f| f == finish.as_str());
        }
        match finish {
            Finish::Nonfoil => self.nonfoil,
            Finish::Foil => self.foil,
            Finish::Etched => false,
        }
    }

    pub fn usd_price(&self, finish: Finish) -> Option<&str> {
        self.prices.usd_for(finish)
    }

    /// Record-level images, else the front face's images.
    pub fn image_uris_or_front(&self) -> Option<&ImageUris> {
        self.image_uris
            .as_ref()
            .or_else(|| self.faces().first().and_then(|f| f.image_uris.as_ref()))
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    //! Hand-built records for tests.

    use super::*;

    /// A single-faced printing that exists in non-foil and foil.
    pub fn single_faced(name: &str, set: &str, collector_number: &str) -> CardRecord {
        CardRecord {
            object: "card".to_string(),
            id: Uuid::new_v4(),
            oracle_id: Some(Uuid::new_v4()),
            name: name.to_string(),
            lang: "en".to_string(),
            layout: "normal".to_string(),
            type_line: "Instant".to_string(),
            set: set.to_string(),
            collector_number: collector_number.to_string(),
            rarity: "common".to_string(),
            foil: true,
            nonfoil: true,
            finishes: vec!["nonfoil".to_string(), "foil".to_string()],
            prices: Prices {
                usd: Some("1.00".to_string()),
                usd_foil: Some("3.50".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// A transforming card with two faces and per-face images.
    pub fn double_faced(front: &str, back: &str, set: &str, collector_number: &str) -> CardRecord {
        let face = |name: &str, png: &str| CardFace {
            name: name.to_string(),
            type_line: Some("Creature".to_string()),
            image_uris: Some(ImageUris {
                png: png.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        CardRecord {
            layout: "transform".to_string(),
            name: format!("{} // {}", front, back),
            card_faces: Some(vec![face(front, "front.png"), face(back, "back.png")]),
            ..single_faced(front, set, collector_number)
        }
    }
}
