use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::auth::policy::{AccessRule, Decision};
use crate::auth::Principal;
use crate::error::ApiError;

/// Ordered list of access rules; the first denial wins.
#[derive(Clone, Default)]
pub struct GuardChain {
    rules: Vec<Arc<dyn AccessRule>>,
}

impl GuardChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: impl AccessRule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn evaluate(&self, request: &Request, principal: &Principal) -> Decision {
        self.rules
            .iter()
            .map(|rule| rule.evaluate(request, principal))
            .find(|decision| matches!(decision, Decision::Deny(_)))
            .unwrap_or(Decision::Allow)
    }
}

/// Runs the guard chain against the authenticated principal. Must sit inside
/// `basic_auth_middleware`, so a 403 here always precedes any per-record 404.
pub async fn guard_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(principal) = request.extensions().get::<Principal>().cloned() else {
        return ApiError::unauthorized("Authentication required").into_response();
    };

    match state.guards.evaluate(&request, &principal) {
        Decision::Allow => next.run(request).await,
        Decision::Deny(reason) => {
            tracing::warn!(user = %principal.username, path = %request.uri().path(), "access denied: {}", reason);
            ApiError::forbidden(reason).into_response()
        }
    }
}
