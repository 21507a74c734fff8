use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::Guard;
use super::GuardResult;
use super::RequestContext;
use crate::domain::credentials::CredentialVerifier;
use crate::user::ports::UserDirectory;

/// Verifies the body's username and password.
///
/// On success the body is narrowed to `{id, username, provider}` so the
/// password goes no further, and the verified claims become the identity.
pub struct VerifyCredentials<UD>
where
    UD: UserDirectory,
{
    verifier: Arc<CredentialVerifier<UD>>,
}

impl<UD> VerifyCredentials<UD>
where
    UD: UserDirectory,
{
    pub fn new(verifier: Arc<CredentialVerifier<UD>>) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl<UD> Guard for VerifyCredentials<UD>
where
    UD: UserDirectory,
{
    fn name(&self) -> &'static str {
        "verify_credentials"
    }

    async fn evaluate(&self, mut context: RequestContext) -> GuardResult {
        let username = context.field("username").unwrap_or_default();
        let password = context.field("password").unwrap_or_default();

        match self.verifier.verify_credentials(username, password).await {
            Ok(claims) => {
                tracing::info!(user_id = claims.subject_id, "Credentials verified");
                context.body = json!({
                    "id": claims.subject_id,
                    "username": claims.username,
                    "provider": claims.provider,
                });
                context.identity = Some(claims);
                GuardResult::Continue(context)
            }
            Err(e) => GuardResult::Halt(e.into()),
        }
    }
}
