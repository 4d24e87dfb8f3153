use std::fmt;

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::repo_types::{NewUser, User, UserChanges},
    error::AppResult,
};

const USER_COLUMNS: &str = "id, username, email, password_hash, profile_banner, \
     reset_token_hash, reset_token_expires_at, created_at, updated_at";

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create(&self, new: NewUser) -> AppResult<User>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_reset_token(&self, token_hash: &str) -> AppResult<Option<User>>;
    /// Applies the non-empty fields of `changes`. Setting a password also drops any pending reset token.
    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<bool>;
    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: OffsetDateTime,
    ) -> AppResult<()>;
    async fn clear_reset_token(&self, id: Uuid) -> AppResult<()>;
    /// Swaps the password if `token_hash` is still present and unexpired; false otherwise.
    async fn consume_reset_token(&self, token_hash: &str, password_hash: &str) -> AppResult<bool>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl fmt::Debug for PgUserRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgUserRepo")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn create(&self, new: NewUser) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_reset_token(&self, token_hash: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE reset_token_hash = $1"
        ))
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<bool> {
        let res = sqlx::query(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                profile_banner = COALESCE($5, profile_banner),
                reset_token_hash = CASE WHEN $4 IS NULL THEN reset_token_hash END,
                reset_token_expires_at = CASE WHEN $4 IS NULL THEN reset_token_expires_at END,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.username)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(changes.profile_banner)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: OffsetDateTime,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_token_hash = $2, reset_token_expires_at = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn clear_reset_token(&self, id: Uuid) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_token_hash = NULL, reset_token_expires_at = NULL
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn consume_reset_token(&self, token_hash: &str, password_hash: &str) -> AppResult<bool> {
        let res = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2,
                reset_token_hash = NULL,
                reset_token_expires_at = NULL,
                updated_at = now()
            WHERE reset_token_hash = $1 AND reset_token_expires_at > now()
            "#,
        )
        .bind(token_hash)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
