use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::user_id;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::guards::RequestContext;
use crate::inbound::http::router::AppState;

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
) -> Result<ApiSuccess<DeletedUserData>, ApiError> {
    let id = user_id(&context)?;

    state
        .user_service
        .delete_user(&id)
        .await
        .map_err(ApiError::from)
        .map(|id| ApiSuccess::new(StatusCode::OK, DeletedUserData { id: id.0 }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedUserData {
    pub id: i64,
}
