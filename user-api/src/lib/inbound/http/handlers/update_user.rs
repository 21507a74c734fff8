use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::create_user::create_command;
use super::user_id;
use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::PasswordChange;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::guards::RequestContext;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// `PUT /user/:userId`: replace username and password.
pub async fn replace_user(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let id = user_id(&context)?;
    let command = create_command(&context)?;

    state
        .user_service
        .replace_user(&id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// `PATCH /user/:userId`: change the username, the password, or both.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let id = user_id(&context)?;
    let command = update_command(&context)?;

    state
        .user_service
        .update_user(&id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

fn update_command(context: &RequestContext) -> Result<UpdateUserCommand, ApiError> {
    let username = context
        .field("username")
        .map(|username| Username::new(username.to_string()))
        .transpose()
        .map_err(UserError::from)?;

    let old_password = context.field("oldPassword").unwrap_or_default();
    let password = context
        .field("password")
        .map(|new_password| PasswordChange {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        });

    Ok(UpdateUserCommand { username, password })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::http::HeaderMap;
    use axum::http::Method;
    use serde_json::json;

    use super::*;

    fn patch(body: serde_json::Value) -> RequestContext {
        RequestContext::new(Method::PATCH, HeaderMap::new(), HashMap::new(), body)
    }

    #[test]
    fn test_update_command_password_change() {
        let command = update_command(&patch(json!({
            "password": "new",
            "oldPassword": "old",
        })))
        .unwrap();

        assert!(command.username.is_none());
        let change = command.password.unwrap();
        assert_eq!(change.old_password, "old");
        assert_eq!(change.new_password, "new");
    }

    #[test]
    fn test_update_command_ignores_empty_fields() {
        let command = update_command(&patch(json!({
            "username": "bob",
            "password": "",
        })))
        .unwrap();

        assert_eq!(command.username.unwrap().as_str(), "bob");
        assert!(command.password.is_none());
    }

    #[test]
    fn test_update_command_rejects_long_username() {
        let err = update_command(&patch(json!({ "username": "x".repeat(65) }))).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
