use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{RegisterRequest, User, UserResponse};
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Register a new user with password hashing
    pub async fn register(&self, input: RegisterRequest) -> UserResult<UserResponse> {
        let password_hash = self.hash_password(&input.password)?;
        let user = User::new(input.email, input.name, password_hash);

        let created = self.repository.create(user).await?;

        tracing::info!(user_id = %created.id, "Registered user");
        Ok(created.into())
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(user.into())
    }

    /// Verify user credentials (for token issuance)
    pub async fn verify_credentials(&self, email: &str, password: &str) -> UserResult<User> {
        let user = self
            .repository
            .get_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegisterRequest;
    use crate::repository::InMemoryUserRepository;

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "correct horse battery staple".to_string(),
            name: "Buyer".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let repo = InMemoryUserRepository::new();
        let service = UserService::new(repo.clone());

        let response = service
            .register(register_request("buyer@example.com"))
            .await
            .unwrap();

        let stored = repo.get_by_id(response.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "correct horse battery staple");
        assert!(stored.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_verify_credentials_roundtrip() {
        let service = UserService::new(InMemoryUserRepository::new());
        service
            .register(register_request("buyer@example.com"))
            .await
            .unwrap();

        let user = service
            .verify_credentials("buyer@example.com", "correct horse battery staple")
            .await
            .unwrap();
        assert_eq!(user.email, "buyer@example.com");

        let wrong_password = service
            .verify_credentials("buyer@example.com", "wrong")
            .await;
        assert!(matches!(wrong_password, Err(UserError::InvalidCredentials)));

        let unknown_email = service
            .verify_credentials("nobody@example.com", "correct horse battery staple")
            .await;
        assert!(matches!(unknown_email, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_repository_failure_propagates() {
        use crate::repository::MockUserRepository;

        let mut mock = MockUserRepository::new();
        mock.expect_create()
            .times(1)
            .returning(|_| Err(UserError::Internal("connection lost".to_string())));

        let service = UserService::new(mock);
        let result = service.register(register_request("buyer@example.com")).await;
        assert!(matches!(result, Err(UserError::Internal(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_fails() {
        let service = UserService::new(InMemoryUserRepository::new());
        service
            .register(register_request("buyer@example.com"))
            .await
            .unwrap();

        let result = service.register(register_request("buyer@example.com")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }
}
