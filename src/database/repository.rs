use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::database::models::{CashCard, SaveCashCard};
use crate::filter::{FilterOrder, PageRequest};

/// Row-level persistence for cash cards.
///
/// Every lookup that takes an owner treats "exists but belongs to someone else"
/// exactly like "does not exist", so callers cannot discover other owners' ids.
#[async_trait]
pub trait CashCardRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<CashCard>, DatabaseError>;

    async fn find_by_id_and_owner(&self, id: i64, owner: &str) -> Result<Option<CashCard>, DatabaseError>;

    async fn find_by_owner(&self, owner: &str, page: &PageRequest) -> Result<Vec<CashCard>, DatabaseError>;

    async fn exists_by_id_and_owner(&self, id: i64, owner: &str) -> Result<bool, DatabaseError>;

    /// Insert when `card.id` is `None`, otherwise overwrite the row with that id.
    /// Overwriting an id that no longer exists is `DatabaseError::NotFound`.
    async fn save(&self, card: SaveCashCard) -> Result<CashCard, DatabaseError>;

    async fn delete_by_id(&self, id: i64) -> Result<(), DatabaseError>;
}

pub struct SqlxCashCardRepository {
    pool: SqlitePool,
}

impl SqlxCashCardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CashCardRepository for SqlxCashCardRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<CashCard>, DatabaseError> {
        let card = sqlx::query_as::<_, CashCard>("SELECT id, amount, owner FROM cash_card WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(card)
    }

    async fn find_by_id_and_owner(&self, id: i64, owner: &str) -> Result<Option<CashCard>, DatabaseError> {
        let card = sqlx::query_as::<_, CashCard>(
            "SELECT id, amount, owner FROM cash_card WHERE id = ? AND owner = ?",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(card)
    }

    async fn find_by_owner(&self, owner: &str, page: &PageRequest) -> Result<Vec<CashCard>, DatabaseError> {
        // The ORDER BY column comes from a closed enum, never from raw input.
        let sql = format!(
            "SELECT id, amount, owner FROM cash_card WHERE owner = ? {} LIMIT ? OFFSET ?",
            FilterOrder::generate(&page.order)
        );
        debug!(owner, sql = %sql, "listing cash cards");

        let cards = sqlx::query_as::<_, CashCard>(&sql)
            .bind(owner)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(cards)
    }

    async fn exists_by_id_and_owner(&self, id: i64, owner: &str) -> Result<bool, DatabaseError> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM cash_card WHERE id = ? AND owner = ?)",
        )
        .bind(id)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists != 0)
    }

    async fn save(&self, card: SaveCashCard) -> Result<CashCard, DatabaseError> {
        match card.id {
            None => {
                let saved = sqlx::query_as::<_, CashCard>(
                    "INSERT INTO cash_card (amount, owner) VALUES (?, ?) RETURNING id, amount, owner",
                )
                .bind(card.amount)
                .bind(&card.owner)
                .fetch_one(&self.pool)
                .await?;
                Ok(saved)
            }
            Some(id) => sqlx::query_as::<_, CashCard>(
                "UPDATE cash_card SET amount = ?, owner = ? WHERE id = ? RETURNING id, amount, owner",
            )
            .bind(card.amount)
            .bind(&card.owner)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("cash card {} not found", id))),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM cash_card WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
