use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::domain::{DomainError, DomainResult, User, UserRepositoryInterface};
use crate::infrastructure::database::entities::user;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        mobile_number: model.mobile_number,
        email: model.email,
        image: model.image,
        password_hash: model.password_hash,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn domain_to_active_model(u: User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(u.id),
        first_name: Set(u.first_name),
        last_name: Set(u.last_name),
        mobile_number: Set(u.mobile_number),
        email: Set(u.email),
        image: Set(u.image),
        password_hash: Set(u.password_hash),
        created_at: Set(u.created_at),
        updated_at: Set(u.updated_at),
    }
}

fn write_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::duplicate_user(),
        _ => DomainError::from(e),
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(model.map(user_model_to_domain))
    }

    async fn insert_user(&self, u: User) -> DomainResult<User> {
        let inserted = domain_to_active_model(u)
            .insert(&self.db)
            .await
            .map_err(write_err)?;

        Ok(user_model_to_domain(inserted))
    }

    async fn save_user(&self, u: User) -> DomainResult<User> {
        let id = u.id.clone();
        let updated = domain_to_active_model(u)
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => DomainError::user_not_found(&id),
                other => write_err(other),
            })?;

        Ok(user_model_to_domain(updated))
    }

    async fn delete_user(&self, id: &str) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::user_not_found(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::migrator::Migrator;
    use chrono::{Duration, Utc};
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;

    async fn repo() -> UserRepository {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        UserRepository::new(db)
    }

    fn sample(id: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id: id.to_string(),
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            mobile_number: "555".into(),
            email: email.to_string(),
            image: "img1".into(),
            password_hash: "$2b$04$hash".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_then_lookup_by_id_and_email() {
        let repo = repo().await;
        repo.insert_user(sample("u1", "a@x.com")).await.unwrap();

        let by_id = repo.get_user_by_id("u1").await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");

        let by_email = repo.get_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, "u1");

        assert!(repo.get_user_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unique_index_rejects_duplicate_email() {
        let repo = repo().await;
        repo.insert_user(sample("u1", "a@x.com")).await.unwrap();

        let err = repo.insert_user(sample("u2", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(repo.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_is_ordered_by_creation() {
        let repo = repo().await;
        let mut older = sample("old", "old@x.com");
        older.created_at = Utc::now() - Duration::hours(1);
        repo.insert_user(sample("new", "new@x.com")).await.unwrap();
        repo.insert_user(older).await.unwrap();

        let ids: Vec<String> = repo
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec!["old".to_string(), "new".to_string()]);
    }

    #[tokio::test]
    async fn save_overwrites_fields() {
        let repo = repo().await;
        repo.insert_user(sample("u1", "a@x.com")).await.unwrap();

        let mut changed = sample("u1", "b@x.com");
        changed.first_name = "Bea".into();
        let saved = repo.save_user(changed).await.unwrap();
        assert_eq!(saved.first_name, "Bea");

        let stored = repo.get_user_by_id("u1").await.unwrap().unwrap();
        assert_eq!(stored.email, "b@x.com");
        assert!(repo.get_user_by_email("a@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_unknown_user_is_not_found() {
        let repo = repo().await;
        let err = repo.save_user(sample("ghost", "g@x.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_removes_only_target() {
        let repo = repo().await;
        repo.insert_user(sample("u1", "a@x.com")).await.unwrap();
        repo.insert_user(sample("u2", "b@x.com")).await.unwrap();

        repo.delete_user("u1").await.unwrap();

        assert!(repo.get_user_by_id("u1").await.unwrap().is_none());
        assert!(repo.get_user_by_id("u2").await.unwrap().is_some());

        let err = repo.delete_user("u1").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
