use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path, State,
    },
    http::StatusCode,
    response::Json,
};
use tracing::{debug, info};

use crate::app::AppState;
use crate::auth::{policy, Principal};
use crate::database::{CashCard, CashCardRequest, SaveCashCard};
use crate::error::ApiError;

/// Look up a card the caller owns. Absent and owned-by-someone-else both come
/// back as `ApiError::NotFound`.
async fn find_owned(state: &AppState, principal: &Principal, id: i64) -> Result<CashCard, ApiError> {
    state
        .cards
        .find_by_id_and_owner(id, &principal.username)
        .await?
        .filter(|card| policy::can_access(principal, card))
        .ok_or_else(|| {
            debug!(user = %principal.username, id, "cash card not found or not owned");
            ApiError::not_found()
        })
}

/// GET /cashcards/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<CashCard>, ApiError> {
    let Path(id) = id?;
    let card = find_owned(&state, &principal, id).await?;
    Ok(Json(card))
}

/// PUT /cashcards/:id - replace the amount; id and owner are kept.
pub async fn put(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CashCardRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let Json(update) = payload?;

    let existing = find_owned(&state, &principal, id).await?;
    state
        .cards
        .save(SaveCashCard::replacing(&existing, update.amount))
        .await?;
    info!(user = %principal.username, id, "cash card updated");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /cashcards/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;

    if !state.cards.exists_by_id_and_owner(id, &principal.username).await? {
        debug!(user = %principal.username, id, "delete refused: not found or not owned");
        return Err(ApiError::not_found());
    }

    state.cards.delete_by_id(id).await?;
    info!(user = %principal.username, id, "cash card deleted");

    Ok(StatusCode::NO_CONTENT)
}
