//! In-memory user repository

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{DomainError, DomainResult, User, UserRepositoryInterface};

/// In-memory storage for development and testing
///
/// `emails` maps each e-mail to the id owning it and is updated through the
/// entry API, so two writers can never both claim the same address.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
    emails: DashMap<String, String>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|e| e.value().clone()).collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let Some(id) = self.emails.get(email).map(|e| e.value().clone()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn insert_user(&self, user: User) -> DomainResult<User> {
        // Lock order is always `users` then `emails`.
        let Entry::Vacant(user_slot) = self.users.entry(user.id.clone()) else {
            return Err(DomainError::Internal(format!(
                "primary key {} already present",
                user.id
            )));
        };

        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(DomainError::duplicate_user()),
            Entry::Vacant(email_slot) => {
                email_slot.insert(user.id.clone());
                user_slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn save_user(&self, user: User) -> DomainResult<User> {
        // Holding the record guard serializes concurrent saves of one user,
        // so the index swap below always starts from the stored e-mail.
        let mut current = self
            .users
            .get_mut(&user.id)
            .ok_or_else(|| DomainError::user_not_found(&user.id))?;

        if current.email != user.email {
            match self.emails.entry(user.email.clone()) {
                Entry::Occupied(owner) if owner.get() != &user.id => {
                    return Err(DomainError::duplicate_user());
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    slot.insert(user.id.clone());
                }
            }
            self.emails.remove(&current.email);
        }

        *current = user.clone();
        Ok(user)
    }

    async fn delete_user(&self, id: &str) -> DomainResult<()> {
        let (_, removed) = self
            .users
            .remove(id)
            .ok_or_else(|| DomainError::user_not_found(id))?;
        self.emails.remove(&removed.email);
        Ok(())
    }
}

/// Store whose inserts always fail with a non-conflict error.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct FailingInsertRepository {
    inner: InMemoryUserRepository,
}

#[cfg(test)]
#[async_trait]
impl UserRepositoryInterface for FailingInsertRepository {
    async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.inner.list_users().await
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        self.inner.get_user_by_id(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        self.inner.get_user_by_email(email).await
    }

    async fn insert_user(&self, _user: User) -> DomainResult<User> {
        Err(DomainError::Internal("disk I/O error".into()))
    }

    async fn save_user(&self, user: User) -> DomainResult<User> {
        self.inner.save_user(user).await
    }

    async fn delete_user(&self, id: &str) -> DomainResult<()> {
        self.inner.delete_user(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use tokio::sync::Barrier;

    fn sample(id: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id: id.to_string(),
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            mobile_number: "555".into(),
            email: email.to_string(),
            image: "img1".into(),
            password_hash: "hash".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_on_insert() {
        let repo = InMemoryUserRepository::new();
        repo.insert_user(sample("u1", "a@x.com")).await.unwrap();

        let err = repo.insert_user(sample("u2", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn email_change_releases_old_address() {
        let repo = InMemoryUserRepository::new();
        repo.insert_user(sample("u1", "a@x.com")).await.unwrap();

        repo.save_user(sample("u1", "b@x.com")).await.unwrap();

        assert!(repo.get_user_by_email("a@x.com").await.unwrap().is_none());
        assert_eq!(
            repo.get_user_by_email("b@x.com").await.unwrap().unwrap().id,
            "u1"
        );
        repo.insert_user(sample("u2", "a@x.com")).await.unwrap();
    }

    #[tokio::test]
    async fn save_cannot_steal_another_users_email() {
        let repo = InMemoryUserRepository::new();
        repo.insert_user(sample("u1", "a@x.com")).await.unwrap();
        repo.insert_user(sample("u2", "b@x.com")).await.unwrap();

        let err = repo.save_user(sample("u2", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(
            repo.get_user_by_id("u2").await.unwrap().unwrap().email,
            "b@x.com"
        );
    }

    #[tokio::test]
    async fn delete_frees_email_and_reports_missing() {
        let repo = InMemoryUserRepository::new();
        repo.insert_user(sample("u1", "a@x.com")).await.unwrap();

        repo.delete_user("u1").await.unwrap();
        assert!(repo.is_empty());
        assert!(repo.get_user_by_email("a@x.com").await.unwrap().is_none());

        let err = repo.delete_user("u1").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_email_changes_leave_one_index_entry() {
        for _ in 0..500 {
            let repo = Arc::new(InMemoryUserRepository::new());
            repo.insert_user(sample("u1", "a@x.com")).await.unwrap();
            let barrier = Arc::new(Barrier::new(2));

            let tasks: Vec<_> = ["b@x.com", "c@x.com"]
                .into_iter()
                .map(|email| {
                    let repo = repo.clone();
                    let barrier = barrier.clone();
                    tokio::spawn(async move {
                        barrier.wait().await;
                        repo.save_user(sample("u1", email)).await
                    })
                })
                .collect();
            for task in tasks {
                task.await.unwrap().unwrap();
            }

            let stored = repo.get_user_by_id("u1").await.unwrap().unwrap();
            assert_eq!(repo.emails.len(), 1);
            assert_eq!(repo.emails.get(&stored.email).unwrap().value(), "u1");

            for free in ["a@x.com", "b@x.com", "c@x.com"] {
                if free != stored.email {
                    assert!(repo.get_user_by_email(free).await.unwrap().is_none());
                }
            }
        }
    }
}
