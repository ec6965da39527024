/*
 * Responsibility
 * - users テーブル向け SQLx 操作 (admission に必要な lookup のみ)
 * - password 列は SELECT しない。UserRow 型にも secret を持たせない
 * - DB エラーは RepoError に変換して返す
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

/// Public profile columns of a user. Never carries the password column.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    #[sqlx(rename = "userName")]
    pub user_name: String,
    pub email: String,
    pub address: Option<String>,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Storage lookup consumed by the identity resolver.
///
/// Implementations own their timeout policy; callers never retry.
#[async_trait]
pub trait UserRepo: Send + Sync + 'static {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRow>, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRow>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId", "userName", email, address, "createdAt"
            FROM users
            WHERE "userId" = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }
}
