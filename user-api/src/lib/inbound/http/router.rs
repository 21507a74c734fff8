use std::sync::Arc;
use std::time::Duration;

use auth::TokenIssuer;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::routing::put;
use axum::routing::MethodRouter;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::guards::guard_request;
use super::guards::Guard;
use super::guards::GuardPipeline;
use super::guards::RequireAccessToken;
use super::guards::RequireFields;
use super::guards::RequireOldPassword;
use super::guards::RequireUserFields;
use super::guards::UserExists;
use super::guards::UsernameAvailable;
use super::guards::VerifyCredentials;
use super::guards::VerifyRefreshToken;
use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::issue_tokens::issue_tokens;
use super::handlers::list_users::list_users;
use super::handlers::missing_user_id;
use super::handlers::update_user::replace_user;
use super::handlers::update_user::update_user;
use crate::domain::credentials::CredentialVerifier;
use crate::domain::user::ports::UserDirectory;
use crate::domain::user::ports::UserServicePort;
use crate::domain::user::service::UserService;

const CREDENTIAL_FIELDS: &[&str] = &["username", "password"];
const REFRESH_FIELDS: &[&str] = &["refreshToken"];

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub token_issuer: Arc<TokenIssuer>,
}

fn guarded(route: MethodRouter<AppState>, pipeline: GuardPipeline) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(pipeline, guard_request))
}

pub fn create_router<UD>(directory: Arc<UD>, token_issuer: Arc<TokenIssuer>) -> Router
where
    UD: UserDirectory,
{
    let state = AppState {
        user_service: Arc::new(UserService::new(Arc::clone(&directory))),
        token_issuer: Arc::clone(&token_issuer),
    };

    let verifier = Arc::new(CredentialVerifier::new(Arc::clone(&directory)));
    let access: Arc<dyn Guard> = Arc::new(RequireAccessToken::new(Arc::clone(&token_issuer)));
    let user_exists: Arc<dyn Guard> = Arc::new(UserExists::new(Arc::clone(&directory)));
    let username_available: Arc<dyn Guard> =
        Arc::new(UsernameAvailable::new(Arc::clone(&directory)));

    let authenticated = GuardPipeline::new().with_shared(Arc::clone(&access));
    let existing_user = authenticated.clone().with_shared(Arc::clone(&user_exists));

    let login = GuardPipeline::new()
        .with(RequireFields::new(CREDENTIAL_FIELDS))
        .with(VerifyCredentials::new(verifier));

    let refresh = authenticated
        .clone()
        .with(RequireFields::new(REFRESH_FIELDS))
        .with(VerifyRefreshToken::new(Arc::clone(&token_issuer)));

    let create = GuardPipeline::new()
        .with(RequireUserFields)
        .with(RequireFields::new(CREDENTIAL_FIELDS))
        .with_shared(Arc::clone(&username_available));

    let replace = existing_user
        .clone()
        .with(RequireUserFields)
        .with(RequireFields::new(CREDENTIAL_FIELDS))
        .with_shared(Arc::clone(&username_available));

    let update = existing_user
        .clone()
        .with(RequireUserFields)
        .with(RequireOldPassword)
        .with_shared(Arc::clone(&username_available));

    let routes = Router::new()
        .route("/login", guarded(post(issue_tokens), login))
        .route("/login/refresh_token", guarded(post(issue_tokens), refresh))
        .route("/user", guarded(post(create_user), create))
        .route(
            "/user",
            guarded(
                put(missing_user_id)
                    .patch(missing_user_id)
                    .delete(missing_user_id),
                existing_user.clone(),
            ),
        )
        .route(
            "/user/:userId",
            guarded(get(get_user), existing_user.clone()),
        )
        .route("/user/:userId", guarded(put(replace_user), replace))
        .route("/user/:userId", guarded(patch(update_user), update))
        .route("/user/:userId", guarded(delete(delete_user), existing_user))
        .route("/users", guarded(get(list_users), authenticated));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    routes
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
