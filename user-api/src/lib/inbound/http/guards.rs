//! Ordered request guards.
//!
//! Every route declares a [`GuardPipeline`]. The pipeline runs before the
//! handler, owns the parsed request for its duration, and either hands the
//! final [`RequestContext`] to the handler as an extension or answers the
//! request itself with the first guard's [`ApiError`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthClaims;
use axum::body::Body;
use axum::extract::Path;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use serde_json::Map;
use serde_json::Value;

use super::handlers::ApiError;
use super::handlers::INVALID_BODY;

pub mod body;
pub mod credentials;
pub mod token;
pub mod user;

pub use body::RequireFields;
pub use body::RequireOldPassword;
pub use body::RequireUserFields;
pub use credentials::VerifyCredentials;
pub use token::RequireAccessToken;
pub use token::VerifyRefreshToken;
pub use user::UserExists;
pub use user::UsernameAvailable;

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Request state threaded through the guards of one route.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub headers: HeaderMap,
    pub params: HashMap<String, String>,
    pub body: Value,
    /// Caller identity from a validated access token.
    pub principal: Option<AuthClaims>,
    /// Identity a token pair is to be issued for.
    pub identity: Option<AuthClaims>,
}

impl RequestContext {
    pub fn new(
        method: Method,
        headers: HeaderMap,
        params: HashMap<String, String>,
        body: Value,
    ) -> Self {
        Self {
            method,
            headers,
            params,
            body,
            principal: None,
            identity: None,
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// String body field, treating empty strings and non-strings as absent.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.body
            .get(name)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }
}

pub enum GuardResult {
    Continue(RequestContext),
    Halt(ApiError),
}

/// One stateless step of a route's pipeline.
///
/// Guards hold only shared collaborators, never per-request state.
#[async_trait]
pub trait Guard: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn evaluate(&self, context: RequestContext) -> GuardResult;
}

#[derive(Clone, Default)]
pub struct GuardPipeline {
    guards: Vec<Arc<dyn Guard>>,
}

impl GuardPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, guard: impl Guard) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }

    pub fn with_shared(mut self, guard: Arc<dyn Guard>) -> Self {
        self.guards.push(guard);
        self
    }

    /// Run guards in order, stopping at the first halt.
    pub async fn run(&self, mut context: RequestContext) -> GuardResult {
        for guard in &self.guards {
            context = match guard.evaluate(context).await {
                GuardResult::Continue(context) => context,
                GuardResult::Halt(error) => {
                    tracing::debug!(
                        guard = guard.name(),
                        status = error.status().as_u16(),
                        error = error.message(),
                        "Request halted"
                    );
                    return GuardResult::Halt(error);
                }
            };
        }
        GuardResult::Continue(context)
    }
}

/// Axum middleware running a route's pipeline.
///
/// Install with `middleware::from_fn_with_state(pipeline, guard_request)`.
pub async fn guard_request(
    State(pipeline): State<GuardPipeline>,
    params: Option<Path<HashMap<String, String>>>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let body = match read_json_body(body).await {
        Ok(body) => body,
        Err(error) => return error.into_response(),
    };

    let context = RequestContext::new(
        parts.method.clone(),
        parts.headers.clone(),
        params.map(|Path(params)| params).unwrap_or_default(),
        body,
    );

    match pipeline.run(context).await {
        GuardResult::Continue(context) => {
            parts.extensions.insert(context);
            next.run(Request::from_parts(parts, Body::empty())).await
        }
        GuardResult::Halt(error) => error.into_response(),
    }
}

async fn read_json_body(body: Body) -> Result<Value, ApiError> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| ApiError::BadRequest(INVALID_BODY.to_string()))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(&bytes).map_err(|_| ApiError::BadRequest(INVALID_BODY.to_string()))
}
