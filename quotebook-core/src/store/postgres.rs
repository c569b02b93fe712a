use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Collection, QuoteCollection};
use crate::error::StoreError;
use crate::models::{NewQuote, NewThinker, Quote, QuotePatch, Thinker, ThinkerPatch};

const QUOTE_COLUMNS: &str = "id, quote, author, category, mood, thinker_id, created_at";
const THINKER_COLUMNS: &str = "id, name, discipline, created_at";

/// Natural enumeration order shared by listing and offset lookups.
const NATURAL_ORDER: &str = "ORDER BY created_at, id";

pub struct PgQuotes {
    pool: PgPool,
}

impl PgQuotes {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Collection<Quote> for PgQuotes {
    async fn insert(&self, new: NewQuote) -> Result<Quote, StoreError> {
        let sql = format!(
            "INSERT INTO quotes (id, quote, author, category, mood, thinker_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {QUOTE_COLUMNS}"
        );
        let quote = sqlx::query_as::<_, Quote>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.quote)
            .bind(new.author)
            .bind(new.category)
            .bind(new.mood)
            .bind(new.thinker)
            .fetch_one(&self.pool)
            .await?;
        Ok(quote)
    }

    async fn find_all(&self) -> Result<Vec<Quote>, StoreError> {
        let sql = format!("SELECT {QUOTE_COLUMNS} FROM quotes {NATURAL_ORDER}");
        Ok(sqlx::query_as::<_, Quote>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Quote>, StoreError> {
        let sql = format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = $1");
        Ok(sqlx::query_as::<_, Quote>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update(&self, id: Uuid, patch: QuotePatch) -> Result<Option<Quote>, StoreError> {
        // COALESCE keeps the stored value for every field the patch leaves out
        let sql = format!(
            "UPDATE quotes SET \
                quote = COALESCE($2, quote), \
                author = COALESCE($3, author), \
                category = COALESCE($4, category), \
                mood = COALESCE($5, mood) \
             WHERE id = $1 RETURNING {QUOTE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Quote>(&sql)
            .bind(id)
            .bind(patch.quote)
            .bind(patch.author)
            .bind(patch.category)
            .bind(patch.mood)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM quotes")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0.max(0) as u64)
    }

    async fn find_nth(&self, offset: u64) -> Result<Option<Quote>, StoreError> {
        let Ok(offset) = i64::try_from(offset) else {
            return Ok(None);
        };
        let sql = format!("SELECT {QUOTE_COLUMNS} FROM quotes {NATURAL_ORDER} OFFSET $1 LIMIT 1");
        Ok(sqlx::query_as::<_, Quote>(&sql)
            .bind(offset)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl QuoteCollection for PgQuotes {
    async fn find_by_category(&self, category: &str) -> Result<Vec<Quote>, StoreError> {
        let sql = format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE category = $1 {NATURAL_ORDER}");
        Ok(sqlx::query_as::<_, Quote>(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_thinker(&self, thinker_id: Uuid) -> Result<Vec<Quote>, StoreError> {
        let sql =
            format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE thinker_id = $1 {NATURAL_ORDER}");
        Ok(sqlx::query_as::<_, Quote>(&sql)
            .bind(thinker_id)
            .fetch_all(&self.pool)
            .await?)
    }
}

pub struct PgThinkers {
    pool: PgPool,
}

impl PgThinkers {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Collection<Thinker> for PgThinkers {
    async fn insert(&self, new: NewThinker) -> Result<Thinker, StoreError> {
        let sql = format!(
            "INSERT INTO thinkers (id, name, discipline) VALUES ($1, $2, $3) \
             RETURNING {THINKER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Thinker>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.name)
            .bind(new.discipline)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_all(&self) -> Result<Vec<Thinker>, StoreError> {
        let sql = format!("SELECT {THINKER_COLUMNS} FROM thinkers {NATURAL_ORDER}");
        Ok(sqlx::query_as::<_, Thinker>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Thinker>, StoreError> {
        let sql = format!("SELECT {THINKER_COLUMNS} FROM thinkers WHERE id = $1");
        Ok(sqlx::query_as::<_, Thinker>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update(&self, id: Uuid, patch: ThinkerPatch) -> Result<Option<Thinker>, StoreError> {
        let sql = format!(
            "UPDATE thinkers SET \
                name = COALESCE($2, name), \
                discipline = COALESCE($3, discipline) \
             WHERE id = $1 RETURNING {THINKER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Thinker>(&sql)
            .bind(id)
            .bind(patch.name)
            .bind(patch.discipline)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM thinkers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM thinkers")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0.max(0) as u64)
    }

    async fn find_nth(&self, offset: u64) -> Result<Option<Thinker>, StoreError> {
        let Ok(offset) = i64::try_from(offset) else {
            return Ok(None);
        };
        let sql =
            format!("SELECT {THINKER_COLUMNS} FROM thinkers {NATURAL_ORDER} OFFSET $1 LIMIT 1");
        Ok(sqlx::query_as::<_, Thinker>(&sql)
            .bind(offset)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pool with migrations applied, or None if `DATABASE_CONN` is unset or unreachable
    async fn make_pool() -> Option<PgPool> {
        let url = std::env::var(crate::config::DATABASE_CONN_ENV).ok()?;
        let pool = PgPool::connect(&url).await.ok()?;
        crate::db::run_migrations(&pool).await.ok()?;
        Some(pool)
    }

    #[tokio::test]
    async fn test_pg_quote_round_trip() {
        let pool = match make_pool().await {
            Some(p) => p,
            None => {
                eprintln!("Skipping test_pg_quote_round_trip: DB unavailable");
                return;
            }
        };
        let quotes = PgQuotes::new(pool);

        let created = quotes
            .insert(NewQuote {
                quote: Some("The unexamined life is not worth living.".to_string()),
                author: Some("Socrates".to_string()),
                category: Some("pg-round-trip".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let fetched = quotes.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.quote, created.quote);
        assert_eq!(fetched.author.as_deref(), Some("Socrates"));

        let patched = quotes
            .update(
                created.id,
                QuotePatch {
                    author: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(patched.author.as_deref(), Some(""));
        assert_eq!(patched.quote, created.quote);

        let by_category = quotes.find_by_category("pg-round-trip").await.unwrap();
        assert!(by_category.iter().any(|q| q.id == created.id));

        assert!(quotes.delete(created.id).await.unwrap());
        assert!(quotes.find_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pg_thinker_partial_update() {
        let pool = match make_pool().await {
            Some(p) => p,
            None => {
                eprintln!("Skipping test_pg_thinker_partial_update: DB unavailable");
                return;
            }
        };
        let thinkers = PgThinkers::new(pool);

        let created = thinkers
            .insert(NewThinker {
                name: Some("Ada Lovelace".to_string()),
                discipline: Some("Mathematics".to_string()),
            })
            .await
            .unwrap();

        let updated = thinkers
            .update(
                created.id,
                ThinkerPatch {
                    discipline: Some("Computing".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(updated.discipline.as_deref(), Some("Computing"));

        assert!(thinkers.delete(created.id).await.unwrap());
        assert!(thinkers
            .update(created.id, ThinkerPatch::default())
            .await
            .unwrap()
            .is_none());
    }
}
