//! Authentication utilities library
//!
//! Provides the credential and token primitives used by the user API:
//! - Password hashing (PBKDF2-HMAC-SHA512, salted)
//! - JWT encoding and validation
//! - Access/refresh token pair issuance
//!
//! Everything here is synchronous and free of I/O. Services own their storage
//! and decide where CPU-heavy hashing runs.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hashed = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hashed.hash, &hashed.salt).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Token Pairs
//! ```
//! use auth::{AuthClaims, TokenIssuer};
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::minutes(15),
//!     Duration::days(7),
//! );
//! let pair = issuer.issue_pair(&AuthClaims::new(1, "alice")).unwrap();
//! let claims = issuer.validate_access_token(&pair.access_token).unwrap();
//! assert_eq!(claims.subject_id, 1);
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use issuer::TokenError;
pub use issuer::TokenIssuer;
pub use issuer::TokenPair;
pub use jwt::AuthClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::Provider;
pub use jwt::TokenClaims;
pub use jwt::TokenKind;
pub use password::HashedPassword;
pub use password::PasswordError;
pub use password::PasswordHasher;
