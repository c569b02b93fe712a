//! Per-entity operations behind the HTTP handlers.
//!
//! Identifiers arrive as raw path segments. A segment that does not parse as
//! a UUID can never match a record, so it is treated exactly like an absent
//! record: the lookup resolves to `None` and the caller answers 404.

use quotebook_core::{Collection, Document, StoreError};
use uuid::Uuid;

pub mod quotes;
pub mod thinkers;

pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

pub(crate) async fn find_by_raw_id<D, C>(
    collection: &C,
    raw_id: &str,
) -> Result<Option<D>, StoreError>
where
    D: Document,
    C: Collection<D> + ?Sized,
{
    match parse_id(raw_id) {
        Some(id) => collection.find_by_id(id).await,
        None => Ok(None),
    }
}

pub(crate) async fn update_by_raw_id<D, C>(
    collection: &C,
    raw_id: &str,
    patch: D::Patch,
) -> Result<Option<D>, StoreError>
where
    D: Document,
    C: Collection<D> + ?Sized,
{
    match parse_id(raw_id) {
        Some(id) => collection.update(id, patch).await,
        None => Ok(None),
    }
}

pub(crate) async fn delete_by_raw_id<D, C>(
    collection: &C,
    raw_id: &str,
) -> Result<bool, StoreError>
where
    D: Document,
    C: Collection<D> + ?Sized,
{
    match parse_id(raw_id) {
        Some(id) => collection.delete(id).await,
        None => Ok(false),
    }
}
