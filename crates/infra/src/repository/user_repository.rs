//! # UserRepository
//!
//! 保護者・患者アカウントの永続化を担当するリポジトリ。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clinic_domain::{
    password::PasswordHash,
    user::{Email, LoginIdentity, MobileNumber, User, UserId},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::InfraError;

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを作成する
    async fn insert(&self, user: &User) -> Result<(), InfraError>;

    /// 照合キー（保護者名 + 患者名 + メールアドレス）で検索する
    ///
    /// 複数件一致した場合は最も古いものを返す。
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(user))`: 一致するユーザーが見つかった場合
    /// - `Ok(None)`: 見つからない場合
    async fn find_by_login_identity(
        &self,
        identity: &LoginIdentity,
    ) -> Result<Option<User>, InfraError>;

    /// 全ユーザーを作成順に取得する
    async fn find_all(&self) -> Result<Vec<User>, InfraError>;
}

/// PostgreSQL 実装の UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id:            Uuid,
    parent_name:   String,
    patient_name:  String,
    mobile:        String,
    email:         String,
    password_hash: String,
    created_at:    DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = InfraError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User::from_db(
            UserId::from_uuid(row.id),
            row.parent_name,
            row.patient_name,
            MobileNumber::new(row.mobile).map_err(|e| InfraError::unexpected(e.to_string()))?,
            Email::new(row.email).map_err(|e| InfraError::unexpected(e.to_string()))?,
            PasswordHash::new(row.password_hash),
            row.created_at,
        ))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %user.id()))]
    async fn insert(&self, user: &User) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, parent_name, patient_name, mobile, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.parent_name())
        .bind(user.patient_name())
        .bind(user.mobile().as_str())
        .bind(user.email().as_str())
        .bind(user.password_hash().as_str())
        .bind(user.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_login_identity(
        &self,
        identity: &LoginIdentity,
    ) -> Result<Option<User>, InfraError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, parent_name, patient_name, mobile, email, password_hash, created_at
            FROM users
            WHERE email = $1 AND parent_name = $2 AND patient_name = $3
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(identity.email.as_str())
        .bind(&identity.parent_name)
        .bind(&identity.patient_name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<User>, InfraError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, parent_name, patient_name, mobile, email, password_hash, created_at
            FROM users
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }
}
