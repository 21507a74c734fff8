use std::sync::Arc;

use async_trait::async_trait;
use auth::TokenIssuer;
use serde_json::json;
use serde_json::Value;
use tokio::sync::RwLock;
use user_api::inbound::http::router::create_router;
use user_api::user::errors::UserError;
use user_api::user::models::Credential;
use user_api::user::models::CredentialChanges;
use user_api::user::models::NewCredential;
use user_api::user::models::UserId;
use user_api::user::models::Username;
use user_api::user::ports::UserDirectory;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub token_issuer: TokenIssuer,
}

pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn token_issuer() -> TokenIssuer {
    TokenIssuer::new(
        JWT_SECRET,
        chrono::Duration::minutes(15),
        chrono::Duration::hours(24),
    )
}

impl TestApp {
    /// Spawn the application over an empty in-memory directory
    pub async fn spawn() -> Self {
        Self::spawn_with(InMemoryUserDirectory::default()).await
    }

    pub async fn spawn_with<UD: UserDirectory>(directory: UD) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(Arc::new(directory), Arc::new(token_issuer()));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            token_issuer: token_issuer(),
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(format!("{}{}", self.address, path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Create a user through the public endpoint and return its id
    pub async fn create_user(&self, username: &str, password: &str) -> i64 {
        let response = self
            .post("/user")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["id"].as_i64().expect("Missing user id")
    }

    /// Log in and return the issued token pair
    pub async fn login(&self, username: &str, password: &str) -> TokenPair {
        let response = self
            .post("/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        TokenPair {
            access_token: body["accessToken"].as_str().unwrap().to_string(),
            refresh_token: body["refreshToken"].as_str().unwrap().to_string(),
        }
    }
}

/// Directory kept in memory, enforcing username uniqueness among live users
#[derive(Default)]
pub struct InMemoryUserDirectory {
    credentials: RwLock<Vec<Credential>>,
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn create(&self, credential: NewCredential) -> Result<Credential, UserError> {
        let mut credentials = self.credentials.write().await;
        if credentials.iter().any(|c| c.username == credential.username) {
            return Err(UserError::UsernameAlreadyExists(
                credential.username.to_string(),
            ));
        }

        let id = credentials.iter().map(|c| c.id.0).max().unwrap_or(0) + 1;
        let stored = Credential {
            id: UserId(id),
            username: credential.username,
            password_hash: credential.password.hash,
            salt: credential.password.salt,
        };
        credentials.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Credential>, UserError> {
        let credentials = self.credentials.read().await;
        Ok(credentials.iter().find(|c| c.id == *id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Credential>, UserError> {
        let credentials = self.credentials.read().await;
        Ok(credentials.iter().find(|c| c.username == *username).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Credential>, UserError> {
        Ok(self.credentials.read().await.clone())
    }

    async fn update(
        &self,
        id: &UserId,
        changes: CredentialChanges,
    ) -> Result<Credential, UserError> {
        let mut credentials = self.credentials.write().await;
        if let Some(username) = &changes.username {
            if credentials
                .iter()
                .any(|c| c.username == *username && c.id != *id)
            {
                return Err(UserError::UsernameAlreadyExists(username.to_string()));
            }
        }

        let credential = credentials
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        if let Some(username) = changes.username {
            credential.username = username;
        }
        if let Some(password) = changes.password {
            credential.password_hash = password.hash;
            credential.salt = password.salt;
        }
        Ok(credential.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<UserId, UserError> {
        let mut credentials = self.credentials.write().await;
        let position = credentials
            .iter()
            .position(|c| c.id == *id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        credentials.remove(position);
        Ok(*id)
    }
}

/// Directory whose backend is unreachable
pub struct UnreachableUserDirectory;

fn unreachable() -> UserError {
    UserError::DatabaseError("connection refused".to_string())
}

#[async_trait]
impl UserDirectory for UnreachableUserDirectory {
    async fn create(&self, _credential: NewCredential) -> Result<Credential, UserError> {
        Err(unreachable())
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<Credential>, UserError> {
        Err(unreachable())
    }

    async fn find_by_username(
        &self,
        _username: &Username,
    ) -> Result<Option<Credential>, UserError> {
        Err(unreachable())
    }

    async fn list_all(&self) -> Result<Vec<Credential>, UserError> {
        Err(unreachable())
    }

    async fn update(
        &self,
        _id: &UserId,
        _changes: CredentialChanges,
    ) -> Result<Credential, UserError> {
        Err(unreachable())
    }

    async fn delete(&self, _id: &UserId) -> Result<UserId, UserError> {
        Err(unreachable())
    }
}
