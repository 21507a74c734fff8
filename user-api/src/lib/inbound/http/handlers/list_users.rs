use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<UserData>>, ApiError> {
    let users = state
        .user_service
        .list_users()
        .await
        .map_err(ApiError::from)?;
    let data: Vec<UserData> = users.iter().map(UserData::from).collect();

    Ok(ApiSuccess::new(StatusCode::OK, data))
}
