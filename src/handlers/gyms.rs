use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Gym;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{CreateGym, GymService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateGymRequest {
    pub name: String,
    pub gym_key: String,
    pub admin_id: Uuid,
}

/// GET /api/gyms - List all gyms
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Gym>> {
    let gyms = GymService::from_state(&state).list_gyms().await?;
    Ok(ApiResponse::success(gyms))
}

/// POST /api/gyms - Create a gym and provision its database. Runs
/// synchronously; the response means the physical database exists.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateGymRequest>,
) -> ApiResult<Gym> {
    if auth_user.access != "admin" {
        return Err(ApiError::forbidden("Staff access required to create gyms"));
    }

    let gym = GymService::from_state(&state)
        .create_gym(CreateGym {
            name: payload.name,
            gym_key: payload.gym_key,
            admin_id: payload.admin_id,
        })
        .await?;
    Ok(ApiResponse::created(gym))
}

/// GET /api/gyms/:id - Retrieve one gym
pub async fn retrieve(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Gym> {
    let gym = GymService::from_state(&state)
        .get_gym(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gym not found"))?;
    Ok(ApiResponse::success(gym))
}
