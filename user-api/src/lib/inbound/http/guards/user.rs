use std::sync::Arc;

use async_trait::async_trait;
use axum::http::Method;

use super::Guard;
use super::GuardResult;
use super::RequestContext;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::INVALID_USER_ID;
use crate::inbound::http::handlers::MISSING_PARAM_ID;
use crate::inbound::http::handlers::USERNAME_EXISTS;
use crate::inbound::http::handlers::USER_NOT_FOUND;
use crate::user::errors::UserError;
use crate::user::ports::UserDirectory;

pub const USER_ID_PARAM: &str = "userId";

/// Requires the `userId` route parameter to name a live user.
pub struct UserExists<UD>
where
    UD: UserDirectory,
{
    directory: Arc<UD>,
}

impl<UD> UserExists<UD>
where
    UD: UserDirectory,
{
    pub fn new(directory: Arc<UD>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl<UD> Guard for UserExists<UD>
where
    UD: UserDirectory,
{
    fn name(&self) -> &'static str {
        "user_exists"
    }

    async fn evaluate(&self, context: RequestContext) -> GuardResult {
        let Some(param) = context.param(USER_ID_PARAM) else {
            return GuardResult::Halt(ApiError::BadRequest(MISSING_PARAM_ID.to_string()));
        };

        let Ok(id) = UserId::from_string(param) else {
            return GuardResult::Halt(ApiError::BadRequest(INVALID_USER_ID.to_string()));
        };

        match self.directory.find_by_id(&id).await {
            Ok(Some(_)) => GuardResult::Continue(context),
            Ok(None) => GuardResult::Halt(ApiError::NotFound(USER_NOT_FOUND.to_string())),
            Err(e) => GuardResult::Halt(e.into()),
        }
    }
}

/// Rejects a username held by a different user.
///
/// On updates the user may keep its own username. Bodies without a
/// username pass. The directory's unique constraint still decides races.
pub struct UsernameAvailable<UD>
where
    UD: UserDirectory,
{
    directory: Arc<UD>,
}

impl<UD> UsernameAvailable<UD>
where
    UD: UserDirectory,
{
    pub fn new(directory: Arc<UD>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl<UD> Guard for UsernameAvailable<UD>
where
    UD: UserDirectory,
{
    fn name(&self) -> &'static str {
        "username_available"
    }

    async fn evaluate(&self, context: RequestContext) -> GuardResult {
        let Some(username) = context.field("username") else {
            return GuardResult::Continue(context);
        };

        let username = match Username::new(username.to_string()) {
            Ok(username) => username,
            Err(e) => return GuardResult::Halt(UserError::from(e).into()),
        };

        let holder = match self.directory.find_by_username(&username).await {
            Ok(holder) => holder,
            Err(e) => return GuardResult::Halt(e.into()),
        };

        let updating = context.method == Method::PUT || context.method == Method::PATCH;
        let own_id = context
            .param(USER_ID_PARAM)
            .and_then(|param| UserId::from_string(param).ok());

        match holder {
            Some(holder) if !(updating && own_id == Some(holder.id)) => {
                GuardResult::Halt(ApiError::BadRequest(USERNAME_EXISTS.to_string()))
            }
            _ => GuardResult::Continue(context),
        }
    }
}
