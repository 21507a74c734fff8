use chrono::Duration;

use crate::jwt::AuthClaims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenClaims;
use crate::jwt::TokenKind;

/// Access and refresh token minted together for one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token validation and issuance errors.
///
/// `Missing` means no token material was supplied at all; every other
/// validation variant means a token was present but cannot be trusted.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TokenError {
    #[error("Authentication required")]
    Missing,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token type")]
    WrongKind,

    #[error("Invalid token")]
    Malformed(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl From<JwtError> for TokenError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => TokenError::Expired,
            JwtError::InvalidSignature => TokenError::InvalidSignature,
            JwtError::InvalidToken(reason) => TokenError::Malformed(reason),
            JwtError::EncodingFailed(reason) => TokenError::Signing(reason),
        }
    }
}

/// Mints and validates stateless access/refresh token pairs.
///
/// Validity is decided by signature, kind and expiry alone; there is no
/// server-side session store. Shared across requests without locking.
pub struct TokenIssuer {
    jwt_handler: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create a new issuer.
    ///
    /// # Arguments
    /// * `secret` - Process-wide signing secret
    /// * `access_ttl` - Lifetime of access tokens
    /// * `refresh_ttl` - Lifetime of refresh tokens, expected to be much longer
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Mint a fresh access/refresh pair bound to the same claims.
    ///
    /// Used on login and on refresh, so a refresh always rotates the refresh
    /// token as well.
    ///
    /// # Errors
    /// * `Signing` - Token encoding failed
    pub fn issue_pair(&self, claims: &AuthClaims) -> Result<TokenPair, TokenError> {
        let access = TokenClaims::new(claims, TokenKind::Access, self.access_ttl);
        let refresh = TokenClaims::new(claims, TokenKind::Refresh, self.refresh_ttl);

        Ok(TokenPair {
            access_token: self.jwt_handler.encode(&access)?,
            refresh_token: self.jwt_handler.encode(&refresh)?,
        })
    }

    /// Validate an access token and return the identity it carries.
    pub fn validate_access_token(&self, token: &str) -> Result<AuthClaims, TokenError> {
        self.validate(token, TokenKind::Access)
    }

    /// Validate a refresh token and return the identity it carries.
    pub fn validate_refresh_token(&self, token: &str) -> Result<AuthClaims, TokenError> {
        self.validate(token, TokenKind::Refresh)
    }

    fn validate(&self, token: &str, expected: TokenKind) -> Result<AuthClaims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let claims: TokenClaims = self.jwt_handler.decode(token)?;

        if claims.kind != expected {
            return Err(TokenError::WrongKind);
        }

        AuthClaims::try_from(claims)
            .map_err(|claims| TokenError::Malformed(format!("Invalid subject: {}", claims.sub)))
    }
}
