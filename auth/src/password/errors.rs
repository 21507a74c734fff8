use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Salt generation failed, OS random number generator unavailable: {0}")]
    HashingFailed(String),

    #[error("Stored password hash is not valid base64: {0}")]
    VerificationFailed(String),
}
