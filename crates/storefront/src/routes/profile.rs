//! Shipping profile route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Profile, ProfileUpdate};
use crate::state::AppState;
use crate::stores::ProfileStore;

/// `GET /profile` - the current user's profile.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Profile>> {
    let profile = state
        .profiles()
        .get_by_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("profile for user {user_id}")))?;
    Ok(Json(profile))
}

/// `PUT /profile` - create or replace the current user's profile.
///
/// The user id always comes from the resolved identity, never the body.
#[instrument(skip(state, update))]
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>> {
    let profile = state
        .profiles()
        .upsert(&update.into_profile(user_id))
        .await?;
    Ok(Json(profile))
}
