use std::fmt;

use auth::HashedPassword;

use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// Stored credential record.
///
/// Holds the password hash and salt, so it is never serialized outward;
/// convert to [`User`] for responses.
#[derive(Debug, Clone)]
pub struct Credential {
    pub id: UserId,
    pub username: Username,
    pub password_hash: String,
    pub salt: String,
}

/// Outward-facing user representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
}

impl From<&Credential> for User {
    fn from(credential: &Credential) -> Self {
        Self {
            id: credential.id,
            username: credential.username.clone(),
        }
    }
}

impl From<Credential> for User {
    fn from(credential: Credential) -> Self {
        Self {
            id: credential.id,
            username: credential.username,
        }
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from a route parameter.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a decimal integer
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        s.trim()
            .parse::<i64>()
            .map(UserId)
            .map_err(|_| UserIdError::InvalidFormat(s.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Case-sensitive and compared exactly. Must be non-empty and at most 64 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MAX_LENGTH: usize = 64;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `Empty` - Username is empty
    /// * `TooLong` - Username longer than 64 characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length == 0 {
            Err(UsernameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(username))
        }
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Credential to be inserted by the directory.
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub username: Username,
    pub password: HashedPassword,
}

/// Partial change to a stored credential. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CredentialChanges {
    pub username: Option<Username>,
    pub password: Option<HashedPassword>,
}

/// Command to create a new user, or to replace every field of an existing one.
#[derive(Debug)]
pub struct CreateUserCommand {
    pub username: Username,
    pub password: String,
}

impl CreateUserCommand {
    /// Construct a new create user command.
    ///
    /// # Arguments
    /// * `username` - Validated username
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(username: Username, password: String) -> Self {
        Self { username, password }
    }
}

/// Password change requested through a partial update.
#[derive(Debug)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

/// Command to update an existing user with optional validated fields.
///
/// Only provided fields will be updated.
#[derive(Debug)]
pub struct UpdateUserCommand {
    pub username: Option<Username>,
    pub password: Option<PasswordChange>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_validation() {
        assert!(Username::new("Username 1".to_string()).is_ok());
        assert_eq!(Username::new(String::new()), Err(UsernameError::Empty));
        assert!(matches!(
            Username::new("a".repeat(65)),
            Err(UsernameError::TooLong {
                max: 64,
                actual: 65,
            })
        ));
    }

    #[test]
    fn test_username_is_case_sensitive() {
        let lower = Username::new("alice".to_string()).unwrap();
        let upper = Username::new("Alice".to_string()).unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_user_id_parsing() {
        assert_eq!(UserId::from_string("42"), Ok(UserId(42)));
        assert!(UserId::from_string("abc").is_err());
        assert!(UserId::from_string("").is_err());
    }

    #[test]
    fn test_user_drops_secrets() {
        let credential = Credential {
            id: UserId(1),
            username: Username::new("alice".to_string()).unwrap(),
            password_hash: "hash".to_string(),
            salt: "salt".to_string(),
        };

        let user = User::from(&credential);
        assert_eq!(user.id, UserId(1));
        assert_eq!(user.username.as_str(), "alice");
    }
}
