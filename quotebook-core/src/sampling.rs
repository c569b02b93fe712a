//! Uniform random selection over collections and materialized lists.
//!
//! Both strategies draw `r` uniformly from `[0, n)` and return the element at
//! position `r`, so every candidate is selected with probability `1/n`. An
//! empty candidate set yields `None` rather than an error.

use rand::Rng;

use crate::error::StoreError;
use crate::store::{Collection, Document};

/// Uniform index into a sequence of `len` elements, or `None` when empty.
pub fn pick_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.gen_range(0..len))
    }
}

/// Take one element of `items` uniformly at random.
pub fn pick<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> Option<T> {
    let index = pick_index(items.len(), rng)?;
    Some(items.swap_remove(index))
}

/// Count the collection, draw an offset, and fetch the record at that offset.
///
/// Count and fetch are separate operations; a record deleted in between
/// yields `None`.
pub async fn random_document<D, C, R>(collection: &C, rng: &mut R) -> Result<Option<D>, StoreError>
where
    D: Document,
    C: Collection<D> + ?Sized,
    R: Rng + Send,
{
    let count = collection.count().await?;
    if count == 0 {
        return Ok(None);
    }
    let offset = rng.gen_range(0..count);
    collection.find_nth(offset).await
}
