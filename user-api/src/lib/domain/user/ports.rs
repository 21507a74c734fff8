use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Credential;
use crate::domain::user::models::CredentialChanges;
use crate::domain::user::models::NewCredential;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Create new user, hashing the password with a fresh salt.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Retrieve every live user, ordered by id.
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Replace username and password of an existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` - New username belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn replace_user(
        &self,
        id: &UserId,
        command: CreateUserCommand,
    ) -> Result<User, UserError>;

    /// Update existing user with optional fields.
    ///
    /// A password change is only applied when the old password verifies
    /// against the stored credential.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `IncorrectOldPassword` - Old password does not match
    /// * `UsernameAlreadyExists` - New username belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn update_user(
        &self,
        id: &UserId,
        update_command: UpdateUserCommand,
    ) -> Result<User, UserError>;

    /// Delete existing user.
    ///
    /// # Returns
    /// The id of the deleted user
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, id: &UserId) -> Result<UserId, UserError>;
}

/// Credential storage, implemented by the persistence layer.
///
/// Must be safe for concurrent use. Username uniqueness is enforced by the
/// storage itself: a racing second insert or rename is rejected with
/// `UsernameAlreadyExists` even if an earlier lookup found nothing.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Persist new credential to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, credential: NewCredential) -> Result<Credential, UserError>;

    /// Retrieve credential by identifier.
    ///
    /// # Returns
    /// Optional credential (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Credential>, UserError>;

    /// Retrieve credential by exact, case-sensitive username.
    ///
    /// # Returns
    /// Optional credential (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<Credential>, UserError>;

    /// Retrieve all credentials, ordered by id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<Credential>, UserError>;

    /// Apply changes to a stored credential.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn update(
        &self,
        id: &UserId,
        changes: CredentialChanges,
    ) -> Result<Credential, UserError>;

    /// Remove credential from storage.
    ///
    /// # Returns
    /// The removed id
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<UserId, UserError>;
}
