use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::user::models::UserId;
use crate::inbound::http::guards::user::USER_ID_PARAM;
use crate::inbound::http::guards::RequestContext;
use crate::user::errors::UserError;

pub mod create_user;
pub mod delete_user;
pub mod get_user;
pub mod issue_tokens;
pub mod list_users;
pub mod update_user;

pub const AUTH_REQUIRED: &str = "Authentication required";
pub const INVALID_BODY: &str = "Invalid body request";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";
pub const INVALID_USER_ID: &str = "Invalid user id";
pub const MISSING_OLD_PASSWORD: &str = "Missing old password";
pub const MISSING_PARAM_ID: &str = "Missing required parameter: id";
pub const USERNAME_EXISTS: &str = "Username already exists";
pub const USER_NOT_FOUND: &str = "User not found";

const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Every way a request can fail, rendered as `{"error": message}`.
///
/// Internal errors keep their detail for the log only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Message sent to the client.
    pub fn message(&self) -> &str {
        match self {
            ApiError::InternalServerError(_) => INTERNAL_ERROR,
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::InternalServerError(detail) = &self {
            tracing::error!(error = %detail, "Request failed");
        }

        (
            self.status(),
            Json(ApiErrorBody {
                error: self.message().to_string(),
            }),
        )
            .into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(USER_NOT_FOUND.to_string()),
            UserError::UsernameAlreadyExists(_) => {
                ApiError::BadRequest(USERNAME_EXISTS.to_string())
            }
            UserError::InvalidCredentials => ApiError::BadRequest(INVALID_CREDENTIALS.to_string()),
            UserError::IncorrectOldPassword => ApiError::BadRequest(err.to_string()),
            UserError::InvalidUserId(_) => ApiError::BadRequest(INVALID_USER_ID.to_string()),
            UserError::InvalidUsername(_) => ApiError::BadRequest(err.to_string()),
            UserError::Password(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<auth::TokenError> for ApiError {
    fn from(err: auth::TokenError) -> Self {
        match err {
            auth::TokenError::Missing => ApiError::Unauthorized(AUTH_REQUIRED.to_string()),
            auth::TokenError::Signing(_) => ApiError::InternalServerError(err.to_string()),
            auth::TokenError::InvalidSignature
            | auth::TokenError::Expired
            | auth::TokenError::WrongKind
            | auth::TokenError::Malformed(_) => ApiError::Forbidden(err.to_string()),
        }
    }
}

/// Route user id, already checked by `UserExists`.
pub(crate) fn user_id(context: &RequestContext) -> Result<UserId, ApiError> {
    let param = context
        .param(USER_ID_PARAM)
        .ok_or_else(|| ApiError::BadRequest(MISSING_PARAM_ID.to_string()))?;
    UserId::from_string(param).map_err(|e| UserError::from(e).into())
}

/// Fallback for `/user` without an id.
pub async fn missing_user_id() -> ApiError {
    ApiError::BadRequest(MISSING_PARAM_ID.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Outward user representation; never carries password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: i64,
    pub username: String,
}

impl From<&crate::domain::user::models::User> for UserData {
    fn from(user: &crate::domain::user::models::User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.as_str().to_string(),
        }
    }
}
