pub mod manager;
pub mod models;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use models::{CashCard, CashCardRequest, SaveCashCard};
pub use repository::{CashCardRepository, SqlxCashCardRepository};
