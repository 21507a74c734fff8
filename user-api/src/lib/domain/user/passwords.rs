//! Password hashing on the blocking thread pool.
//!
//! PBKDF2 is CPU-bound; running it inline would stall every other request
//! scheduled on the same runtime worker.

use auth::HashedPassword;
use auth::PasswordHasher;

use crate::domain::user::models::Credential;
use crate::user::errors::UserError;

pub async fn hash(hasher: PasswordHasher, password: String) -> Result<HashedPassword, UserError> {
    let hashed = tokio::task::spawn_blocking(move || hasher.hash(&password));
    Ok(hashed.await??)
}

pub async fn verify(
    hasher: PasswordHasher,
    password: String,
    credential: &Credential,
) -> Result<bool, UserError> {
    let hash = credential.password_hash.clone();
    let salt = credential.salt.clone();

    let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash, &salt));
    Ok(verified.await??)
}
