use std::sync::Arc;

use async_trait::async_trait;
use auth::TokenError;
use auth::TokenIssuer;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use super::Guard;
use super::GuardResult;
use super::RequestContext;
use crate::inbound::http::handlers::ApiError;

pub const REFRESH_TOKEN_FIELD: &str = "refreshToken";

/// Bearer token from the Authorization header.
///
/// An absent header or an empty token is `Missing`; a header that is not a
/// bearer credential at all is present-but-invalid.
fn bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(TokenError::Missing);
    };

    let value = value
        .to_str()
        .map_err(|_| TokenError::Malformed("Authorization header is not ASCII".to_string()))?
        .trim();

    if value.is_empty() || value == "Bearer" {
        return Err(TokenError::Missing);
    }

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| TokenError::Malformed("Expected: Bearer <token>".to_string()))
}

/// Requires a valid access token; sets the request principal.
///
/// 401 when no token is supplied, 403 when one is supplied but invalid,
/// expired or of the wrong kind.
pub struct RequireAccessToken {
    issuer: Arc<TokenIssuer>,
}

impl RequireAccessToken {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }
}

#[async_trait]
impl Guard for RequireAccessToken {
    fn name(&self) -> &'static str {
        "require_access_token"
    }

    async fn evaluate(&self, mut context: RequestContext) -> GuardResult {
        let claims = bearer_token(&context.headers)
            .and_then(|token| self.issuer.validate_access_token(token));

        match claims {
            Ok(claims) => {
                context.principal = Some(claims);
                GuardResult::Continue(context)
            }
            Err(e) => {
                if !matches!(e, TokenError::Missing) {
                    tracing::warn!(error = ?e, "Access token rejected");
                }
                GuardResult::Halt(e.into())
            }
        }
    }
}

/// Validates the body's refresh token against the already-validated access
/// token. Both must name the same subject; on success the refresh token's
/// claims become the identity to reissue for.
pub struct VerifyRefreshToken {
    issuer: Arc<TokenIssuer>,
}

impl VerifyRefreshToken {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }
}

#[async_trait]
impl Guard for VerifyRefreshToken {
    fn name(&self) -> &'static str {
        "verify_refresh_token"
    }

    async fn evaluate(&self, mut context: RequestContext) -> GuardResult {
        let Some(principal) = context.principal.as_ref() else {
            return GuardResult::Halt(TokenError::Missing.into());
        };

        let token = context.field(REFRESH_TOKEN_FIELD).unwrap_or_default();
        let claims = match self.issuer.validate_refresh_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(error = ?e, "Refresh token rejected");
                // An unusable refresh token is never "no authentication".
                let e = match e {
                    TokenError::Missing => TokenError::Malformed("Empty refresh token".to_string()),
                    e => e,
                };
                return GuardResult::Halt(e.into());
            }
        };

        if claims.subject_id != principal.subject_id {
            tracing::warn!(
                access_subject = principal.subject_id,
                refresh_subject = claims.subject_id,
                "Refresh token bound to another subject"
            );
            return GuardResult::Halt(ApiError::Forbidden("Invalid refresh token".to_string()));
        }

        context.identity = Some(claims);
        GuardResult::Continue(context)
    }
}
