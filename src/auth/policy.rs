use axum::extract::Request;

use super::Principal;
use crate::database::CashCard;

/// Outcome of a single access rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

/// One predicate in the endpoint guard chain, evaluated before any handler runs.
pub trait AccessRule: Send + Sync {
    fn evaluate(&self, request: &Request, principal: &Principal) -> Decision;
}

/// Endpoint-level capability gate: the caller must hold `role`.
#[derive(Debug, Clone)]
pub struct RequireRole {
    role: String,
}

impl RequireRole {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }
}

impl AccessRule for RequireRole {
    fn evaluate(&self, _request: &Request, principal: &Principal) -> Decision {
        if principal.has_role(&self.role) {
            Decision::Allow
        } else {
            Decision::Deny(format!("Role '{}' required", self.role))
        }
    }
}

/// Record-level gate: only the owner may read or write a card.
pub fn can_access(principal: &Principal, card: &CashCard) -> bool {
    card.owner == principal.username
}
