// handlers/mod.rs - HTTP entry points
//
// Public (no auth) → /health
// Card owners (Basic auth + CARD-OWNER role) → /cashcards[/:id]
pub mod cashcards;
pub mod health;
