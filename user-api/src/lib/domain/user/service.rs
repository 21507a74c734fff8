use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::CredentialChanges;
use crate::domain::user::models::NewCredential;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::passwords;
use crate::user::errors::UserError;
use crate::user::ports::UserDirectory;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UD>
where
    UD: UserDirectory,
{
    directory: Arc<UD>,
    password_hasher: PasswordHasher,
}

impl<UD> UserService<UD>
where
    UD: UserDirectory,
{
    /// Create a new user service backed by the given directory.
    pub fn new(directory: Arc<UD>) -> Self {
        Self {
            directory,
            password_hasher: PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<UD> UserServicePort for UserService<UD>
where
    UD: UserDirectory,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password = passwords::hash(self.password_hasher, command.password).await?;

        let created = self
            .directory
            .create(NewCredential {
                username: command.username,
                password,
            })
            .await?;

        tracing::info!(user_id = %created.id, "User created");

        Ok(created.into())
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.directory
            .find_by_id(id)
            .await?
            .map(User::from)
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self
            .directory
            .list_all()
            .await?
            .into_iter()
            .map(User::from)
            .collect())
    }

    async fn replace_user(
        &self,
        id: &UserId,
        command: CreateUserCommand,
    ) -> Result<User, UserError> {
        let password = passwords::hash(self.password_hasher, command.password).await?;

        let updated = self
            .directory
            .update(
                id,
                CredentialChanges {
                    username: Some(command.username),
                    password: Some(password),
                },
            )
            .await?;

        tracing::info!(user_id = %updated.id, "User replaced");

        Ok(updated.into())
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let password = match command.password {
            Some(change) => {
                let credential = self
                    .directory
                    .find_by_id(id)
                    .await?
                    .ok_or(UserError::NotFound(id.to_string()))?;

                if !passwords::verify(self.password_hasher, change.old_password, &credential)
                    .await?
                {
                    return Err(UserError::IncorrectOldPassword);
                }

                Some(passwords::hash(self.password_hasher, change.new_password).await?)
            }
            None => None,
        };

        let updated = self
            .directory
            .update(
                id,
                CredentialChanges {
                    username: command.username,
                    password,
                },
            )
            .await?;

        tracing::info!(user_id = %updated.id, "User updated");

        Ok(updated.into())
    }

    async fn delete_user(&self, id: &UserId) -> Result<UserId, UserError> {
        let deleted = self.directory.delete(id).await?;

        tracing::info!(user_id = %deleted, "User deleted");

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::Credential;
    use crate::domain::user::models::PasswordChange;
    use crate::domain::user::models::Username;

    mock! {
        pub TestUserDirectory {}

        #[async_trait]
        impl UserDirectory for TestUserDirectory {
            async fn create(&self, credential: NewCredential) -> Result<Credential, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<Credential>, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<Credential>, UserError>;
            async fn list_all(&self) -> Result<Vec<Credential>, UserError>;
            async fn update(&self, id: &UserId, changes: CredentialChanges) -> Result<Credential, UserError>;
            async fn delete(&self, id: &UserId) -> Result<UserId, UserError>;
        }
    }

    fn username(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    fn credential(id: i64, name: &str, password: &str) -> Credential {
        let hashed = PasswordHasher::new().hash(password).unwrap();
        Credential {
            id: UserId(id),
            username: username(name),
            password_hash: hashed.hash,
            salt: hashed.salt,
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_create()
            .withf(|credential| {
                credential.username.as_str() == "testuser"
                    && PasswordHasher::new()
                        .verify(
                            "password123",
                            &credential.password.hash,
                            &credential.password.salt,
                        )
                        .unwrap()
            })
            .times(1)
            .returning(|credential| {
                Ok(Credential {
                    id: UserId(1),
                    username: credential.username,
                    password_hash: credential.password.hash,
                    salt: credential.password.salt,
                })
            });

        let service = UserService::new(Arc::new(directory));

        let command = CreateUserCommand::new(username("testuser"), "password123".to_string());

        let user = service.create_user(command).await.unwrap();
        assert_eq!(user.id, UserId(1));
        assert_eq!(user.username.as_str(), "testuser");
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let mut directory = MockTestUserDirectory::new();

        directory.expect_create().times(1).returning(|credential| {
            Err(UserError::UsernameAlreadyExists(
                credential.username.as_str().to_string(),
            ))
        });

        let service = UserService::new(Arc::new(directory));

        let command = CreateUserCommand::new(username("testuser"), "password456".to_string());

        let result = service.create_user(command).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut directory = MockTestUserDirectory::new();

        let stored = credential(7, "testuser", "secret");
        directory
            .expect_find_by_id()
            .withf(|id| *id == UserId(7))
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let service = UserService::new(Arc::new(directory));

        let user = service.get_user(&UserId(7)).await.unwrap();
        assert_eq!(user.id, UserId(7));
        assert_eq!(user.username.as_str(), "testuser");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(directory));

        let result = service.get_user(&UserId(99)).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_user_database_error_is_not_not_found() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_find_by_id()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection refused".to_string())));

        let service = UserService::new(Arc::new(directory));

        let result = service.get_user(&UserId(1)).await;
        assert!(matches!(result.unwrap_err(), UserError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_list_users() {
        let mut directory = MockTestUserDirectory::new();

        let stored = vec![credential(1, "user1", "a"), credential(2, "user2", "b")];
        directory
            .expect_list_all()
            .times(1)
            .returning(move || Ok(stored.clone()));

        let service = UserService::new(Arc::new(directory));

        let users = service.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].username.as_str(), "user2");
    }

    #[tokio::test]
    async fn test_replace_user_rehashes_password() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_update()
            .withf(|id, changes| {
                *id == UserId(3)
                    && changes.username.as_ref().map(Username::as_str) == Some("renamed")
                    && changes.password.is_some()
            })
            .times(1)
            .returning(|id, changes| {
                let password = changes.password.unwrap();
                Ok(Credential {
                    id: *id,
                    username: changes.username.unwrap(),
                    password_hash: password.hash,
                    salt: password.salt,
                })
            });

        let service = UserService::new(Arc::new(directory));

        let command = CreateUserCommand::new(username("renamed"), "new-secret".to_string());
        let user = service.replace_user(&UserId(3), command).await.unwrap();
        assert_eq!(user.username.as_str(), "renamed");
    }

    #[tokio::test]
    async fn test_update_username_only_keeps_password() {
        let mut directory = MockTestUserDirectory::new();

        directory.expect_find_by_id().times(0);

        let stored = credential(5, "old", "secret");
        directory
            .expect_update()
            .withf(|_, changes| changes.username.is_some() && changes.password.is_none())
            .times(1)
            .returning(move |_, changes| {
                let mut updated = stored.clone();
                updated.username = changes.username.unwrap();
                Ok(updated)
            });

        let service = UserService::new(Arc::new(directory));

        let command = UpdateUserCommand {
            username: Some(username("new")),
            password: None,
        };

        let user = service.update_user(&UserId(5), command).await.unwrap();
        assert_eq!(user.username.as_str(), "new");
    }

    #[tokio::test]
    async fn test_update_password_with_correct_old_password() {
        let mut directory = MockTestUserDirectory::new();

        let stored = credential(5, "alice", "old-secret");
        let returned = stored.clone();
        directory
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        directory
            .expect_update()
            .withf(|_, changes| {
                changes.password.as_ref().is_some_and(|password| {
                    PasswordHasher::new()
                        .verify("new-secret", &password.hash, &password.salt)
                        .unwrap()
                })
            })
            .times(1)
            .returning(move |_, _| Ok(stored.clone()));

        let service = UserService::new(Arc::new(directory));

        let command = UpdateUserCommand {
            username: None,
            password: Some(PasswordChange {
                old_password: "old-secret".to_string(),
                new_password: "new-secret".to_string(),
            }),
        };

        assert!(service.update_user(&UserId(5), command).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_password_with_wrong_old_password() {
        let mut directory = MockTestUserDirectory::new();

        let stored = credential(5, "alice", "old-secret");
        directory
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        directory.expect_update().times(0);

        let service = UserService::new(Arc::new(directory));

        let command = UpdateUserCommand {
            username: None,
            password: Some(PasswordChange {
                old_password: "guess".to_string(),
                new_password: "new-secret".to_string(),
            }),
        };

        let result = service.update_user(&UserId(5), command).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::IncorrectOldPassword
        ));
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_update()
            .times(1)
            .returning(|id, _| Err(UserError::NotFound(id.to_string())));

        let service = UserService::new(Arc::new(directory));

        let command = UpdateUserCommand {
            username: Some(username("newuser")),
            password: None,
        };

        let result = service.update_user(&UserId(404), command).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_user_success() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_delete()
            .withf(|id| *id == UserId(9))
            .times(1)
            .returning(|id| Ok(*id));

        let service = UserService::new(Arc::new(directory));

        assert_eq!(service.delete_user(&UserId(9)).await.unwrap(), UserId(9));
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_delete()
            .times(1)
            .returning(|id| Err(UserError::NotFound(id.to_string())));

        let service = UserService::new(Arc::new(directory));

        let result = service.delete_user(&UserId(9)).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }
}
