use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::user_id;
use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::guards::RequestContext;
use crate::inbound::http::router::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let id = user_id(&context)?;

    state
        .user_service
        .get_user(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
