//! User repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::NewUser;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, username, first_name, last_name, created_at, last_login_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email address.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, username, first_name, last_name, created_at, last_login_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Returns the user with this email, creating it if absent.
    ///
    /// An existing user's names are left untouched.
    pub async fn get_or_create(&self, new_user: &NewUser) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("get_or_create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (email, username, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE SET email = users.email
            RETURNING id, email, username, first_name, last_name, created_at, last_login_at
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update user's last login timestamp.
    pub async fn update_last_login(
        &self,
        user_id: Uuid,
        last_login_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("update_user_last_login");
        sqlx::query(
            r#"
            UPDATE users
            SET last_login_at = $1
            WHERE id = $2
            "#,
        )
        .bind(last_login_at)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }
}
