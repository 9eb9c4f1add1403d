//! User management service: application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, UpdateUserDto, User, UserRepositoryInterface,
};
use crate::infrastructure::crypto::password::hash_password;
use crate::shared::present;

/// Orchestrates all user-management use-cases.
///
/// The repository is injected so the same service runs on SeaORM in
/// production and on the in-memory store in tests.
pub struct UserService {
    repo: Arc<dyn UserRepositoryInterface>,
    password_cost: u32,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepositoryInterface>, password_cost: u32) -> Self {
        Self {
            repo,
            password_cost,
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    /// All users, oldest first.
    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.repo.list_users().await
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Create a user with a freshly hashed password.
    pub async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let (
            Some(first_name),
            Some(last_name),
            Some(mobile_number),
            Some(email),
            Some(image),
            Some(password),
        ) = (
            present(&dto.first_name),
            present(&dto.last_name),
            present(&dto.mobile_number),
            present(&dto.email),
            present(&dto.image),
            present(&dto.password),
        )
        else {
            return Err(DomainError::Validation("All fields are required".into()));
        };

        if self.repo.get_user_by_email(email).await?.is_some() {
            warn!(email, "Rejected user creation: e-mail already in use");
            return Err(DomainError::duplicate_user());
        }

        let password_hash = self.hash(password).await?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            mobile_number: mobile_number.to_string(),
            email: email.to_string(),
            image: image.to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        };

        match self.repo.insert_user(user).await {
            Ok(user) => {
                info!(user_id = %user.id, email = %user.email, "New user created");
                Ok(user)
            }
            Err(e @ DomainError::Conflict(_)) => {
                warn!(email, "Rejected user creation: e-mail claimed concurrently");
                Err(e)
            }
            Err(e) => {
                error!(error = ?e, "Failed to persist new user");
                Err(DomainError::InvalidData("Invalid user data received".into()))
            }
        }
    }

    /// Overwrite a user's profile fields, rehashing the password only when
    /// a new one is supplied.
    pub async fn update_user(&self, dto: UpdateUserDto) -> DomainResult<User> {
        let (
            Some(id),
            Some(first_name),
            Some(last_name),
            Some(mobile_number),
            Some(email),
            Some(image),
        ) = (
            present(&dto.id),
            present(&dto.first_name),
            present(&dto.last_name),
            present(&dto.mobile_number),
            present(&dto.email),
            present(&dto.image),
        )
        else {
            return Err(DomainError::Validation(
                "All fields except password are required".into(),
            ));
        };

        let mut user = self
            .repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        if let Some(owner) = self.repo.get_user_by_email(email).await? {
            if owner.id != user.id {
                warn!(user_id = id, email, "Rejected user update: e-mail already in use");
                return Err(DomainError::duplicate_user());
            }
        }

        user.first_name = first_name.to_string();
        user.last_name = last_name.to_string();
        user.mobile_number = mobile_number.to_string();
        user.email = email.to_string();
        user.image = image.to_string();

        if let Some(password) = present(&dto.password) {
            user.password_hash = self.hash(password).await?;
        }

        user.updated_at = Utc::now();

        let updated = self.repo.save_user(user).await?;
        info!(user_id = %updated.id, "User updated");
        Ok(updated)
    }

    /// Permanently remove a user, returning the record that was deleted.
    pub async fn delete_user(&self, id: Option<&str>) -> DomainResult<User> {
        let Some(id) = id.filter(|v| !v.is_empty()) else {
            return Err(DomainError::Validation("User ID Required".into()));
        };

        let user = self
            .repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        self.repo.delete_user(&user.id).await?;

        info!(user_id = %user.id, "User deleted");
        Ok(user)
    }

    // ── Helpers ─────────────────────────────────────────────────

    /// bcrypt is CPU bound; keep it off the async workers.
    async fn hash(&self, password: &str) -> DomainResult<String> {
        let cost = self.password_cost;
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| DomainError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))
    }
}
