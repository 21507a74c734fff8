use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// How the subject proved its identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Username,
}

/// Discriminates access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Minimal identity produced by a successful credential check.
///
/// Carried inside tokens, never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthClaims {
    pub subject_id: i64,
    pub username: String,
    pub provider: Provider,
}

impl AuthClaims {
    pub fn new(subject_id: i64, username: impl Into<String>) -> Self {
        Self {
            subject_id,
            username: username.into(),
            provider: Provider::Username,
        }
    }
}

/// JWT payload for both token kinds.
///
/// Standard RFC 7519 claims (`sub`, `iat`, `exp`, `jti`) plus the identity
/// fields and the token kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (decimal user id)
    pub sub: String,

    pub username: String,

    pub provider: Provider,

    pub kind: TokenKind,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// JWT ID, unique per minted token
    pub jti: String,
}

impl TokenClaims {
    /// Create claims of the given kind for an identity, expiring after `ttl`.
    pub fn new(identity: &AuthClaims, kind: TokenKind, ttl: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + ttl;

        Self {
            sub: identity.subject_id.to_string(),
            username: identity.username.clone(),
            provider: identity.provider,
            kind,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Subject id parsed from `sub`, if it is a valid integer.
    pub fn subject_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

impl TryFrom<TokenClaims> for AuthClaims {
    type Error = TokenClaims;

    fn try_from(claims: TokenClaims) -> Result<Self, Self::Error> {
        match claims.subject_id() {
            Some(subject_id) => Ok(Self {
                subject_id,
                username: claims.username,
                provider: claims.provider,
            }),
            None => Err(claims),
        }
    }
}
