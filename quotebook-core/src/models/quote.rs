use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

/// A stored quote. Every content field is optional; absent fields are
/// omitted from the JSON representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Quote {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<f64>,
    /// Referenced thinker, set only through the thinker-scoped create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[sqlx(rename = "thinker_id")]
    pub thinker: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a quote. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewQuote {
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub mood: Option<f64>,
    #[serde(skip)]
    pub thinker: Option<Uuid>,
}

impl NewQuote {
    pub fn for_thinker(mut self, thinker_id: Uuid) -> Self {
        self.thinker = Some(thinker_id);
        self
    }
}

/// Partial update. A field is applied whenever it is present in the
/// payload, including empty strings and zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotePatch {
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub mood: Option<f64>,
}

impl Document for Quote {
    type New = NewQuote;
    type Patch = QuotePatch;

    fn create(id: Uuid, created_at: DateTime<Utc>, new: NewQuote) -> Self {
        Self {
            id,
            quote: new.quote,
            author: new.author,
            category: new.category,
            mood: new.mood,
            thinker: new.thinker,
            created_at,
        }
    }

    fn apply(&mut self, patch: QuotePatch) {
        if let Some(quote) = patch.quote {
            self.quote = Some(quote);
        }
        if let Some(author) = patch.author {
            self.author = Some(author);
        }
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(mood) = patch.mood {
            self.mood = Some(mood);
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Quote {
        Quote::create(
            Uuid::new_v4(),
            Utc::now(),
            NewQuote {
                quote: Some("Know thyself.".to_string()),
                author: Some("Socrates".to_string()),
                category: Some("Ancient".to_string()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn serializes_id_as_underscore_id_and_omits_absent_fields() {
        let quote = sample();
        let json = serde_json::to_value(&quote).unwrap();

        assert_eq!(json["_id"], quote.id.to_string());
        assert_eq!(json["quote"], "Know thyself.");
        assert!(json.get("mood").is_none());
        assert!(json.get("thinker").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn new_quote_ignores_unknown_fields_and_thinker() {
        let new: NewQuote = serde_json::from_value(serde_json::json!({
            "quote": "Sapere aude",
            "colour": "blue",
            "thinker": "0b7e7f53-3f43-4a3c-9d43-7c2b7f0f5f0e",
        }))
        .unwrap();

        assert_eq!(new.quote.as_deref(), Some("Sapere aude"));
        assert!(new.author.is_none());
        assert!(new.thinker.is_none());
    }

    #[test]
    fn patch_applies_present_fields_only() {
        let mut quote = sample();
        let patch: QuotePatch = serde_json::from_value(serde_json::json!({ "author": "Plato" })).unwrap();
        quote.apply(patch);

        assert_eq!(quote.author.as_deref(), Some("Plato"));
        assert_eq!(quote.quote.as_deref(), Some("Know thyself."));
        assert_eq!(quote.category.as_deref(), Some("Ancient"));
    }

    #[test]
    fn patch_applies_empty_string_and_zero() {
        let mut quote = sample();
        let patch: QuotePatch =
            serde_json::from_value(serde_json::json!({ "category": "", "mood": 0 })).unwrap();
        quote.apply(patch);

        assert_eq!(quote.category.as_deref(), Some(""));
        assert_eq!(quote.mood, Some(0.0));
    }
}
