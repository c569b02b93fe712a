use quotebook_core::{
    Collection, NewQuote, NewThinker, Quote, QuoteCollection, Store, Thinker, ThinkerPatch,
};

use super::{delete_by_raw_id, find_by_raw_id, update_by_raw_id};
use crate::error::ApiError;

pub async fn create(store: &Store, new: NewThinker) -> Result<Thinker, ApiError> {
    let thinker = store.thinkers.insert(new).await?;
    tracing::info!(thinker_id = %thinker.id, "Thinker created");
    Ok(thinker)
}

pub async fn list(store: &Store) -> Result<Vec<Thinker>, ApiError> {
    Ok(store.thinkers.find_all().await?)
}

pub async fn find(store: &Store, raw_id: &str) -> Result<Thinker, ApiError> {
    find_by_raw_id::<Thinker, _>(&*store.thinkers, raw_id)
        .await?
        .ok_or(ApiError::ThinkerNotFound)
}

pub async fn update(
    store: &Store,
    raw_id: &str,
    patch: ThinkerPatch,
) -> Result<Thinker, ApiError> {
    update_by_raw_id::<Thinker, _>(&*store.thinkers, raw_id, patch)
        .await?
        .ok_or(ApiError::ThinkerNotFound)
}

/// Remove a thinker. Quotes referencing it are left untouched.
pub async fn delete(store: &Store, raw_id: &str) -> Result<(), ApiError> {
    if !delete_by_raw_id::<Thinker, _>(&*store.thinkers, raw_id).await? {
        return Err(ApiError::ThinkerNotFound);
    }
    tracing::info!(thinker_id = %raw_id, "Thinker deleted");
    Ok(())
}

/// The thinker a nested `/thinkers/:id/quotes` request is scoped to.
pub async fn find_parent(store: &Store, raw_thinker_id: &str) -> Result<Thinker, ApiError> {
    find_by_raw_id::<Thinker, _>(&*store.thinkers, raw_thinker_id)
        .await?
        .ok_or(ApiError::ParentThinkerNotFound)
}

/// Create a quote attributed to an existing thinker.
///
/// The thinker is looked up first; an unknown or malformed id creates
/// nothing. Lookup and insert are not atomic, so a thinker deleted in
/// between still ends up referenced.
pub async fn create_quote(
    store: &Store,
    raw_thinker_id: &str,
    new: NewQuote,
) -> Result<Quote, ApiError> {
    let thinker = find_parent(store, raw_thinker_id).await?;

    let quote = store.quotes.insert(new.for_thinker(thinker.id)).await?;
    tracing::info!(quote_id = %quote.id, thinker_id = %thinker.id, "Quote created for thinker");
    Ok(quote)
}

/// Every quote referencing the thinker.
pub async fn list_quotes(store: &Store, raw_thinker_id: &str) -> Result<Vec<Quote>, ApiError> {
    let thinker = find_parent(store, raw_thinker_id).await?;
    Ok(store.quotes.find_by_thinker(thinker.id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_thinker(name: &str, discipline: &str) -> NewThinker {
        NewThinker {
            name: Some(name.to_string()),
            discipline: Some(discipline.to_string()),
        }
    }

    #[tokio::test]
    async fn test_partial_update_keeps_name() {
        let store = Store::in_memory();
        let curie = create(&store, new_thinker("Marie Curie", "Physics"))
            .await
            .unwrap();

        let updated = update(
            &store,
            &curie.id.to_string(),
            ThinkerPatch {
                discipline: Some("Chemistry".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name.as_deref(), Some("Marie Curie"));
        assert_eq!(updated.discipline.as_deref(), Some("Chemistry"));
    }

    #[tokio::test]
    async fn test_create_quote_for_unknown_thinker_creates_nothing() {
        let store = Store::in_memory();
        let unknown = uuid::Uuid::new_v4().to_string();

        let err = create_quote(&store, &unknown, NewQuote::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ParentThinkerNotFound));

        let err = create_quote(&store, "not-an-id", NewQuote::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ParentThinkerNotFound));

        assert_eq!(store.quotes.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_quote_links_verified_thinker() {
        let store = Store::in_memory();
        let newton = create(&store, new_thinker("Isaac Newton", "Physics"))
            .await
            .unwrap();

        let quote = create_quote(
            &store,
            &newton.id.to_string(),
            NewQuote {
                quote: Some("If I have seen further...".to_string()),
                mood: Some(3.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(quote.thinker, Some(newton.id));
        assert_eq!(quote.mood, Some(3.0));

        let linked = list_quotes(&store, &newton.id.to_string()).await.unwrap();
        assert_eq!(linked, vec![quote]);
    }

    #[tokio::test]
    async fn test_delete_thinker_leaves_quotes() {
        let store = Store::in_memory();
        let hypatia = create(&store, new_thinker("Hypatia", "Mathematics"))
            .await
            .unwrap();
        let id = hypatia.id.to_string();
        create_quote(&store, &id, NewQuote::default()).await.unwrap();

        delete(&store, &id).await.unwrap();

        assert!(matches!(
            find(&store, &id).await.unwrap_err(),
            ApiError::ThinkerNotFound
        ));
        assert_eq!(store.quotes.count().await.unwrap(), 1);
        assert!(matches!(
            list_quotes(&store, &id).await.unwrap_err(),
            ApiError::ParentThinkerNotFound
        ));
    }
}
