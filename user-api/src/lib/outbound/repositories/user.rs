use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::user::models::Credential;
use crate::domain::user::models::CredentialChanges;
use crate::domain::user::models::NewCredential;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserDirectory;
use crate::user::errors::UserError;

/// PostgreSQL-backed [`UserDirectory`].
///
/// Each query borrows a connection from the pool for its own duration only.
/// Deleted users are soft-deleted through `deleted_at` and invisible to every
/// lookup.
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CredentialRow {
    id: i64,
    username: String,
    password_hash: String,
    salt: String,
}

impl TryFrom<CredentialRow> for Credential {
    type Error = UserError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        Ok(Credential {
            id: UserId(row.id),
            username: Username::new(row.username)?,
            password_hash: row.password_hash,
            salt: row.salt,
        })
    }
}

fn map_write_error(e: sqlx::Error, username: Option<&Username>) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return UserError::UsernameAlreadyExists(
                username.map(|u| u.as_str().to_string()).unwrap_or_default(),
            );
        }
    }
    UserError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn create(&self, credential: NewCredential) -> Result<Credential, UserError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            INSERT INTO users (username, password_hash, salt)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, salt
            "#,
        )
        .bind(credential.username.as_str())
        .bind(&credential.password.hash)
        .bind(&credential.password.salt)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, Some(&credential.username)))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Credential>, UserError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, username, password_hash, salt
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(Credential::try_from).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Credential>, UserError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, username, password_hash, salt
            FROM users
            WHERE username = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(Credential::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Credential>, UserError> {
        let rows = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, username, password_hash, salt
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Credential::try_from).collect()
    }

    async fn update(
        &self,
        id: &UserId,
        changes: CredentialChanges,
    ) -> Result<Credential, UserError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                password_hash = COALESCE($3, password_hash),
                salt = COALESCE($4, salt)
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, username, password_hash, salt
            "#,
        )
        .bind(id.0)
        .bind(changes.username.as_ref().map(Username::as_str))
        .bind(changes.password.as_ref().map(|p| p.hash.as_str()))
        .bind(changes.password.as_ref().map(|p| p.salt.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, changes.username.as_ref()))?;

        row.ok_or(UserError::NotFound(id.to_string()))?.try_into()
    }

    async fn delete(&self, id: &UserId) -> Result<UserId, UserError> {
        let deleted = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE users
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        match deleted {
            Some(deleted_id) => Ok(UserId(deleted_id)),
            None => Err(UserError::NotFound(id.to_string())),
        }
    }
}
