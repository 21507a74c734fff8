use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::guards::RequestContext;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn create_user(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_service
        .create_user(create_command(&context)?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// Build a full-credential command from a body the guards already checked.
pub(super) fn create_command(context: &RequestContext) -> Result<CreateUserCommand, ApiError> {
    let username = Username::new(context.field("username").unwrap_or_default().to_string())
        .map_err(UserError::from)?;
    let password = context.field("password").unwrap_or_default().to_string();
    Ok(CreateUserCommand::new(username, password))
}
