//! `/profile` routes. The profile written is always the one owned by the
//! authenticated caller; a `userId` sent in the body is overwritten.

use axum::extract::State;
use tracing::{info, warn};

use crate::app::AppState;
use crate::database::dao::UpdateOutcome;
use crate::database::models::Profile;
use crate::error::ApiError;
use crate::middleware::extract::Json;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

async fn resolve_user_id(state: &AppState, user: &AuthUser) -> Result<i32, ApiError> {
    state
        .users
        .get_by_username(&user.username)
        .await
        .map_err(ApiError::database("Error resolving user"))?
        .map(|found| found.user_id)
        .ok_or_else(|| {
            warn!("Token for unknown user {}", user.username);
            ApiError::unauthorized("Unknown user")
        })
}

/// POST /profile. Anonymous callers (registration) keep the body's `userId`.
pub async fn post(
    caller: Option<AuthUser>,
    State(state): State<AppState>,
    Json(mut profile): Json<Profile>,
) -> ApiResult<Profile> {
    if let Some(user) = caller {
        profile.user_id = resolve_user_id(&state, &user).await?;
    }

    let created = state
        .profiles
        .create(&profile)
        .await
        .map_err(ApiError::database("Error creating profile"))?;

    Ok(ApiResponse::created(created))
}

/// GET /profile
pub async fn get(user: AuthUser, State(state): State<AppState>) -> ApiResult<Profile> {
    let user_id = resolve_user_id(&state, &user).await?;

    state
        .profiles
        .get_by_user_id(user_id)
        .await
        .map_err(ApiError::database("Error retrieving profile"))?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("Profile not found"))
}

/// PUT /profile
pub async fn put(
    user: AuthUser,
    State(state): State<AppState>,
    Json(mut profile): Json<Profile>,
) -> ApiResult<Profile> {
    let user_id = resolve_user_id(&state, &user).await?;
    if profile.user_id != 0 && profile.user_id != user_id {
        warn!(
            "{} sent userId {} in profile update; using {}",
            user.username, profile.user_id, user_id
        );
    }
    profile.user_id = user_id;

    let outcome = state
        .profiles
        .update(&profile)
        .await
        .map_err(ApiError::database("Error updating profile"))?;

    match outcome {
        UpdateOutcome::Updated(updated) => {
            info!("{} updated their profile", user.username);
            Ok(ApiResponse::success(updated))
        }
        UpdateOutcome::NotFound => {
            warn!("No profile stored for user {}", user_id);
            Err(ApiError::internal_server_error("Error updating profile"))
        }
    }
}
