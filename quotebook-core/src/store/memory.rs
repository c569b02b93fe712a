use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Collection, Document, QuoteCollection};
use crate::error::StoreError;
use crate::models::Quote;

/// Process-local collection that keeps records in insertion order.
pub struct MemoryCollection<D> {
    docs: RwLock<Vec<D>>,
}

impl<D: Document> MemoryCollection<D> {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }
}

impl<D: Document> Default for MemoryCollection<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D: Document> Collection<D> for MemoryCollection<D> {
    async fn insert(&self, new: D::New) -> Result<D, StoreError> {
        let doc = D::create(Uuid::new_v4(), Utc::now(), new);
        self.docs.write().await.push(doc.clone());
        Ok(doc)
    }

    async fn find_all(&self) -> Result<Vec<D>, StoreError> {
        Ok(self.docs.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<D>, StoreError> {
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|d| d.id() == id).cloned())
    }

    async fn update(&self, id: Uuid, patch: D::Patch) -> Result<Option<D>, StoreError> {
        let mut docs = self.docs.write().await;
        let Some(doc) = docs.iter_mut().find(|d| d.id() == id) else {
            return Ok(None);
        };
        doc.apply(patch);
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut docs = self.docs.write().await;
        match docs.iter().position(|d| d.id() == id) {
            Some(index) => {
                docs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.docs.read().await.len() as u64)
    }

    async fn find_nth(&self, offset: u64) -> Result<Option<D>, StoreError> {
        let docs = self.docs.read().await;
        Ok(usize::try_from(offset)
            .ok()
            .and_then(|index| docs.get(index))
            .cloned())
    }
}

#[async_trait]
impl QuoteCollection for MemoryCollection<Quote> {
    async fn find_by_category(&self, category: &str) -> Result<Vec<Quote>, StoreError> {
        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .filter(|q| q.category.as_deref() == Some(category))
            .cloned()
            .collect())
    }

    async fn find_by_thinker(&self, thinker_id: Uuid) -> Result<Vec<Quote>, StoreError> {
        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .filter(|q| q.thinker == Some(thinker_id))
            .cloned()
            .collect())
    }
}
