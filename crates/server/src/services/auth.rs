//! Authentication service.
//!
//! Username/password accounts with argon2 hashing. Session state itself is
//! handled at the route layer; this service owns validation, hashing, and
//! the user lookup.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

use vitrine_core::{Email, EmailError};

use crate::models::{NewUser, User};
use crate::storage::{Storage, StorageError};

/// Minimum password length for new accounts.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong username or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The username is already registered.
    #[error("username already exists")]
    UsernameTaken,

    /// The email is already registered.
    #[error("email already exists")]
    EmailTaken,

    /// The email address failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The password failed validation.
    #[error("{0}")]
    WeakPassword(String),

    /// Password hashing or verification failed unexpectedly.
    #[error("password hashing error: {0}")]
    Hash(String),

    /// Storage operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Registration input, pre-validation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
}

/// Account registration and credential verification.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Storage>,
}

impl AuthService {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// Register a new account.
    ///
    /// Validates the email and password, hashes the password with argon2,
    /// and creates the user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UsernameTaken` / `AuthError::EmailTaken` on
    /// duplicates, `AuthError::InvalidEmail` / `AuthError::WeakPassword` on
    /// validation failures, `AuthError::Storage` for storage failures.
    #[tracing::instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        let email = Email::parse(&registration.email)?;

        if registration.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        if self
            .store
            .get_user_by_username(&registration.username)
            .await?
            .is_some()
        {
            return Err(AuthError::UsernameTaken);
        }

        if self
            .store
            .get_user_by_email(email.as_str())
            .await?
            .is_some()
        {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(&registration.password)?;

        let user = self
            .store
            .create_user(NewUser {
                username: registration.username,
                password: password_hash,
                email,
                name: registration.name,
                address: registration.address,
                city: registration.city,
                state: registration.state,
                zipcode: registration.zipcode,
            })
            .await
            .map_err(|e| match e {
                // A concurrent registration can still slip past the pre-checks
                StorageError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Storage(other),
            })?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Verify a username/password pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the user does not exist
    /// or the password does not match, `AuthError::Storage` for storage
    /// failures.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let Some(user) = self.store.get_user_by_username(username).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if verify_password(password, &user.password)? {
            Ok(user)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Load a user by ID (for the session extractor).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the lookup fails.
    pub async fn get_user(&self, id: vitrine_core::UserId) -> Result<Option<User>, AuthError> {
        Ok(self.store.get_user(id).await?)
    }
}

/// Hash a password with argon2 and a fresh random salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against a stored argon2 hash.
fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemStorage;

    fn registration(username: &str, email: &str) -> Registration {
        Registration {
            username: username.to_owned(),
            password: "correct horse battery".to_owned(),
            email: email.to_owned(),
            name: "Test User".to_owned(),
            address: None,
            city: None,
            state: None,
            zipcode: None,
        }
    }

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemStorage::new()))
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let service = service();
        let user = service
            .register(registration("alice", "alice@example.com"))
            .await
            .expect("register");

        // The stored password is a hash, not the plaintext
        assert_ne!(user.password, "correct horse battery");
        assert!(user.password.starts_with("$argon2"));

        let logged_in = service
            .login("alice", "correct horse battery")
            .await
            .expect("login");
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let service = service();
        service
            .register(registration("alice", "alice@example.com"))
            .await
            .expect("register");

        let err = service
            .login("alice", "wrong password")
            .await
            .expect_err("wrong password");
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let err = service()
            .login("nobody", "whatever1")
            .await
            .expect_err("unknown user");
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let service = service();
        service
            .register(registration("alice", "alice@example.com"))
            .await
            .expect("register");

        let err = service
            .register(registration("alice", "alice2@example.com"))
            .await
            .expect_err("duplicate username");
        assert!(matches!(err, AuthError::UsernameTaken));
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let service = service();
        service
            .register(registration("alice", "alice@example.com"))
            .await
            .expect("register");

        let err = service
            .register(registration("bob", "alice@example.com"))
            .await
            .expect_err("duplicate email");
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let mut reg = registration("alice", "alice@example.com");
        reg.password = "short".to_owned();

        let err = service().register(reg).await.expect_err("weak password");
        assert!(matches!(err, AuthError::WeakPassword(_)));
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let err = service()
            .register(registration("alice", "not-an-email"))
            .await
            .expect_err("invalid email");
        assert!(matches!(err, AuthError::InvalidEmail(_)));
    }
}
