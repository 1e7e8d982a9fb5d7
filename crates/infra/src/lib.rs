//! # Clinic インフラ層
//!
//! 外部システムとの接続を担当するインフラストラクチャ層。
//! アカウントサービスから見た「データアクセスファサード」にあたる。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プール管理とマイグレーション
//! - **リポジトリ実装**: User / Patient の作成・検索
//! - **パスワードハッシュ**: Argon2id によるハッシュ化と検証
//! - **トークン発行**: HS256 署名の JWT
//! - **医師名簿の読み込み**: JSON ファイルから [`DoctorRoster`] を構築
//!
//! ## 依存関係
//!
//! ```text
//! clinic-service → infra → domain
//! ```
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use clinic_infra::{db, repository::PostgresUserRepository};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool("postgres://localhost/clinic").await?;
//!     db::run_migrations(&pool).await?;
//!     let users = PostgresUserRepository::new(pool);
//!     Ok(())
//! }
//! ```
//!
//! [`DoctorRoster`]: clinic_domain::doctor::DoctorRoster

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod password;
pub mod repository;
pub mod roster;
pub mod token;

pub use error::{InfraError, InfraErrorKind};
pub use password::{Argon2PasswordChecker, PasswordChecker};
pub use token::{JwtTokenIssuer, TokenIssuer};
