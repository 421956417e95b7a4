use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A monetary record owned by exactly one principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CashCard {
    pub id: i64,
    pub amount: f64,
    pub owner: String,
}

/// Client payload for create and replace. Only `amount` is honoured; any `id`
/// or `owner` the client sends is dropped during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct CashCardRequest {
    pub amount: f64,
}

/// Input to `CashCardRepository::save`: no id inserts, an id overwrites.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveCashCard {
    pub id: Option<i64>,
    pub amount: f64,
    pub owner: String,
}

impl SaveCashCard {
    pub fn new(amount: f64, owner: impl Into<String>) -> Self {
        Self {
            id: None,
            amount,
            owner: owner.into(),
        }
    }

    /// Replacement for an existing card: same id and owner, new amount.
    pub fn replacing(existing: &CashCard, amount: f64) -> Self {
        Self {
            id: Some(existing.id),
            amount,
            owner: existing.owner.clone(),
        }
    }
}
