use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::auth::policy::RequireRole;
use crate::auth::{AuthError, Authenticator, InMemoryUserRegistry, UserLookup, CARD_OWNER};
use crate::config::{AppConfig, PaginationConfig};
use crate::database::{CashCardRepository, DatabaseError, DatabaseManager, SqlxCashCardRepository};
use crate::handlers;
use crate::middleware::{basic_auth_middleware, guard_middleware, GuardChain};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database initialization failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("user registry initialization failed: {0}")]
    Auth(#[from] AuthError),
}

/// Shared per-request context
#[derive(Clone)]
pub struct AppState {
    pub database: DatabaseManager,
    pub cards: Arc<dyn CashCardRepository>,
    pub authenticator: Authenticator,
    pub guards: GuardChain,
    pub pagination: PaginationConfig,
    pub realm: String,
}

impl AppState {
    /// Connect the store and wire the demo user registry behind the card-owner gate.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let database = DatabaseManager::connect(&config.database).await?;
        let users: Arc<dyn UserLookup> = Arc::new(InMemoryUserRegistry::demo()?);
        info!(
            seed = config.database.seed,
            default_page_size = config.pagination.default_page_size,
            "Application state ready"
        );

        Ok(Self::new(database, users, config))
    }

    pub fn new(database: DatabaseManager, users: Arc<dyn UserLookup>, config: &AppConfig) -> Self {
        let cards: Arc<dyn CashCardRepository> =
            Arc::new(SqlxCashCardRepository::new(database.pool().clone()));

        Self {
            database,
            cards,
            authenticator: Authenticator::new(users),
            guards: GuardChain::new().with_rule(RequireRole::new(CARD_OWNER)),
            pagination: config.pagination.clone(),
            realm: config.security.realm.clone(),
        }
    }
}

/// Build the full application router from configuration.
pub async fn build_app(config: &AppConfig) -> Result<Router, StartupError> {
    let state = AppState::from_config(config).await?;
    Ok(router(state, config.security.enable_cors))
}

pub fn router(state: AppState, enable_cors: bool) -> Router {
    // Layers run outside-in: authenticate (401) before the guard chain (403).
    let cashcards = Router::new()
        .route(
            "/cashcards",
            get(handlers::cashcards::list).post(handlers::cashcards::create),
        )
        .route(
            "/cashcards/:id",
            get(handlers::cashcards::get)
                .put(handlers::cashcards::put)
                .delete(handlers::cashcards::delete),
        )
        .route_layer(from_fn_with_state(state.clone(), guard_middleware))
        .route_layer(from_fn_with_state(state.clone(), basic_auth_middleware));

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .merge(cashcards)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}
