use async_trait::async_trait;

use super::User;
use crate::shared::DomainResult;

/// Persistence port for user records.
///
/// Implementations own the canonical records; callers only ever hold
/// copies. `insert_user` and `save_user` must reject a record whose e-mail
/// belongs to another user with `DomainError::Conflict`.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn list_users(&self) -> DomainResult<Vec<User>>;
    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    async fn insert_user(&self, user: User) -> DomainResult<User>;
    async fn save_user(&self, user: User) -> DomainResult<User>;
    async fn delete_user(&self, id: &str) -> DomainResult<()>;
}
