use quotebook_core::sampling;
use quotebook_core::{Collection, NewQuote, Quote, QuoteCollection, QuotePatch, Store};
use rand::Rng;

use super::{delete_by_raw_id, find_by_raw_id, update_by_raw_id};
use crate::error::ApiError;

pub async fn create(store: &Store, new: NewQuote) -> Result<Quote, ApiError> {
    let quote = store.quotes.insert(new).await?;
    tracing::info!(quote_id = %quote.id, category = ?quote.category, "Quote created");
    Ok(quote)
}

pub async fn list(store: &Store) -> Result<Vec<Quote>, ApiError> {
    Ok(store.quotes.find_all().await?)
}

pub async fn find(store: &Store, raw_id: &str) -> Result<Quote, ApiError> {
    find_by_raw_id::<Quote, _>(&*store.quotes, raw_id)
        .await?
        .ok_or(ApiError::QuoteNotFound)
}

pub async fn update(store: &Store, raw_id: &str, patch: QuotePatch) -> Result<Quote, ApiError> {
    update_by_raw_id::<Quote, _>(&*store.quotes, raw_id, patch)
        .await?
        .ok_or(ApiError::QuoteNotFound)
}

pub async fn delete(store: &Store, raw_id: &str) -> Result<(), ApiError> {
    if !delete_by_raw_id::<Quote, _>(&*store.quotes, raw_id).await? {
        return Err(ApiError::QuoteNotFound);
    }
    tracing::info!(quote_id = %raw_id, "Quote deleted");
    Ok(())
}

/// Quotes whose category equals `category`. No match is an empty list.
pub async fn list_by_category(store: &Store, category: &str) -> Result<Vec<Quote>, ApiError> {
    Ok(store.quotes.find_by_category(category).await?)
}

/// A uniformly chosen quote from the whole collection, `None` when empty.
pub async fn random<R: Rng + Send>(store: &Store, rng: &mut R) -> Result<Option<Quote>, ApiError> {
    Ok(sampling::random_document::<Quote, _, R>(&*store.quotes, rng).await?)
}

/// A uniformly chosen quote among those in `category`, `None` when none match.
pub async fn random_by_category<R: Rng + Send>(
    store: &Store,
    category: &str,
    rng: &mut R,
) -> Result<Option<Quote>, ApiError> {
    let candidates = store.quotes.find_by_category(category).await?;
    Ok(sampling::pick(candidates, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    async fn seed(store: &Store, entries: &[(&str, &str)]) -> Vec<Quote> {
        let mut created = Vec::new();
        for (text, category) in entries {
            let quote = create(
                store,
                NewQuote {
                    quote: Some(text.to_string()),
                    category: Some(category.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
            created.push(quote);
        }
        created
    }

    #[tokio::test]
    async fn test_find_malformed_id_is_not_found() {
        let store = Store::in_memory();
        let err = find(&store, "12345").await.unwrap_err();
        assert!(matches!(err, ApiError::QuoteNotFound));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id_are_not_found() {
        let store = Store::in_memory();
        let id = uuid::Uuid::new_v4().to_string();

        let err = update(&store, &id, QuotePatch::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::QuoteNotFound));

        let err = delete(&store, &id).await.unwrap_err();
        assert!(matches!(err, ApiError::QuoteNotFound));
    }

    #[tokio::test]
    async fn test_random_by_category_respects_filter() {
        let store = Store::in_memory();
        seed(
            &store,
            &[
                ("E = mc^2", "Scientists"),
                ("Stay hungry, stay foolish", "Entrepreneurs"),
                ("Nothing in life is to be feared", "Scientists"),
                ("Art is never finished", "Artists"),
            ],
        )
        .await;

        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..500 {
            let quote = random_by_category(&store, "Scientists", &mut rng)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(quote.category.as_deref(), Some("Scientists"));
        }
    }

    #[tokio::test]
    async fn test_random_on_empty_sets_is_none() {
        let store = Store::in_memory();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(random(&store, &mut rng).await.unwrap().is_none());

        seed(&store, &[("Cogito, ergo sum", "Enlightenment")]).await;
        assert!(random_by_category(&store, "Modern", &mut rng)
            .await
            .unwrap()
            .is_none());
        assert!(random(&store, &mut rng).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_by_category_without_match_is_empty() {
        let store = Store::in_memory();
        seed(&store, &[("Veni, vidi, vici", "Ancient")]).await;
        assert!(list_by_category(&store, "Modern").await.unwrap().is_empty());
    }
}
