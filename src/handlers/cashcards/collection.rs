use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use crate::app::AppState;
use crate::auth::Principal;
use crate::database::{CashCard, CashCardRequest, SaveCashCard};
use crate::error::ApiError;
use crate::filter::PageRequest;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Zero-based page index
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// `field[,asc|desc]`, e.g. `amount,desc`
    pub sort: Option<String>,
}

/// GET /cashcards - one page of the caller's cards. Always 200, even when empty.
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<CashCard>>, ApiError> {
    let Query(query) = query?;
    let page = PageRequest::resolve(query.page, query.size, query.sort.as_deref(), &state.pagination)?;

    let cards = state.cards.find_by_owner(&principal.username, &page).await?;
    Ok(Json(cards))
}

/// POST /cashcards - create a card owned by the caller. The store assigns the id;
/// any id or owner in the body is ignored.
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<CashCardRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;

    let saved = state
        .cards
        .save(SaveCashCard::new(request.amount, principal.username.clone()))
        .await?;
    info!(user = %principal.username, id = saved.id, "cash card created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/cashcards/{}", saved.id))],
    ))
}
