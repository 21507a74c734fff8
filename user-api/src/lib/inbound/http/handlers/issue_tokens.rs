use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::guards::RequestContext;
use crate::inbound::http::router::AppState;

/// Issue a token pair for the identity established by the route's guards.
///
/// Serves both `POST /login` and `POST /login/refresh_token`.
pub async fn issue_tokens(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
) -> Result<ApiSuccess<TokenPairData>, ApiError> {
    let Some(identity) = context.identity else {
        return Err(ApiError::InternalServerError(
            "token issuance reached without an identity".to_string(),
        ));
    };

    let pair = state.token_issuer.issue_pair(&identity)?;
    tracing::info!(user_id = identity.subject_id, "Token pair issued");

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        TokenPairData {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairData {
    pub access_token: String,
    pub refresh_token: String,
}
