use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Thinker {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discipline: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewThinker {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub discipline: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThinkerPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub discipline: Option<String>,
}

impl Document for Thinker {
    type New = NewThinker;
    type Patch = ThinkerPatch;

    fn create(id: Uuid, created_at: DateTime<Utc>, new: NewThinker) -> Self {
        Self {
            id,
            name: new.name,
            discipline: new.discipline,
            created_at,
        }
    }

    fn apply(&mut self, patch: ThinkerPatch) {
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(discipline) = patch.discipline {
            self.discipline = Some(discipline);
        }
    }

    fn id(&self) -> Uuid {
        self.id
    }
}
