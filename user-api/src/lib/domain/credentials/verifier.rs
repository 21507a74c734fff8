use std::sync::Arc;

use auth::AuthClaims;
use auth::PasswordHasher;

use crate::domain::user::models::Username;
use crate::domain::user::passwords;
use crate::user::errors::UserError;
use crate::user::ports::UserDirectory;

/// Turns a username/password pair into verified identity claims.
///
/// An unknown username and a wrong password produce the same
/// `InvalidCredentials` error, and both cost one key derivation, so callers
/// cannot enumerate usernames. Directory failures are surfaced as-is.
pub struct CredentialVerifier<UD>
where
    UD: UserDirectory,
{
    directory: Arc<UD>,
    password_hasher: PasswordHasher,
}

impl<UD> CredentialVerifier<UD>
where
    UD: UserDirectory,
{
    pub fn new(directory: Arc<UD>) -> Self {
        Self {
            directory,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// Verify a login attempt.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `DatabaseError` - Directory lookup failed
    /// * `Password` - The stored credential is corrupt
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthClaims, UserError> {
        let Ok(username) = Username::new(username.to_string()) else {
            return Err(UserError::InvalidCredentials);
        };

        let Some(credential) = self.directory.find_by_username(&username).await? else {
            // Same cost as a real check.
            passwords::hash(self.password_hasher, password.to_string()).await?;
            return Err(UserError::InvalidCredentials);
        };

        if !passwords::verify(self.password_hasher, password.to_string(), &credential).await? {
            tracing::debug!(user_id = %credential.id, "Password mismatch");
            return Err(UserError::InvalidCredentials);
        }

        Ok(AuthClaims::new(
            credential.id.0,
            credential.username.as_str(),
        ))
    }
}
