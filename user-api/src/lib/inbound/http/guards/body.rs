use async_trait::async_trait;

use super::Guard;
use super::GuardResult;
use super::RequestContext;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::INVALID_BODY;
use crate::inbound::http::handlers::MISSING_OLD_PASSWORD;

/// "Missing required field: a" or "Missing required fields: a, b and c".
pub fn missing_fields_message(missing: &[&str]) -> String {
    match missing {
        [] => String::new(),
        [only] => format!("Missing required field: {}", only),
        [init @ .., last] => format!("Missing required fields: {} and {}", init.join(", "), last),
    }
}

/// Requires every listed string field to be present and non-empty.
///
/// Fields are reported in the order they were listed.
pub struct RequireFields {
    fields: &'static [&'static str],
}

impl RequireFields {
    pub fn new(fields: &'static [&'static str]) -> Self {
        Self { fields }
    }
}

#[async_trait]
impl Guard for RequireFields {
    fn name(&self) -> &'static str {
        "require_fields"
    }

    async fn evaluate(&self, context: RequestContext) -> GuardResult {
        let missing: Vec<&str> = self
            .fields
            .iter()
            .copied()
            .filter(|field| context.field(field).is_none())
            .collect();

        if missing.is_empty() {
            GuardResult::Continue(context)
        } else {
            GuardResult::Halt(ApiError::BadRequest(missing_fields_message(&missing)))
        }
    }
}

/// Rejects user bodies that carry neither a username nor a password.
pub struct RequireUserFields;

#[async_trait]
impl Guard for RequireUserFields {
    fn name(&self) -> &'static str {
        "require_user_fields"
    }

    async fn evaluate(&self, context: RequestContext) -> GuardResult {
        if context.field("username").is_some() || context.field("password").is_some() {
            GuardResult::Continue(context)
        } else {
            GuardResult::Halt(ApiError::BadRequest(INVALID_BODY.to_string()))
        }
    }
}

/// A password change through PATCH must carry the old password.
pub struct RequireOldPassword;

#[async_trait]
impl Guard for RequireOldPassword {
    fn name(&self) -> &'static str {
        "require_old_password"
    }

    async fn evaluate(&self, context: RequestContext) -> GuardResult {
        if context.field("password").is_some() && context.field("oldPassword").is_none() {
            GuardResult::Halt(ApiError::BadRequest(MISSING_OLD_PASSWORD.to_string()))
        } else {
            GuardResult::Continue(context)
        }
    }
}
