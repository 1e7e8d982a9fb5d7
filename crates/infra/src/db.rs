//! # PostgreSQL データベース接続管理
//!
//! 接続プールの作成とマイグレーションの適用を行う。
//!
//! ## 本番環境での推奨設定
//!
//! ```rust,ignore
//! PgPoolOptions::new()
//!     .max_connections(20)
//!     .acquire_timeout(Duration::from_secs(5))
//!     .idle_timeout(Duration::from_secs(600))
//! ```

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

/// データベースマイグレーションを実行する
///
/// `sqlx::migrate!()` で埋め込まれたマイグレーションを順番に適用する。
/// 適用済みのものはスキップされる。
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// PostgreSQL 接続プールを作成する
///
/// 起動時に一度だけ呼び出し、アプリケーション全体で共有する。
///
/// - `max_connections(10)`: 最大接続数
/// - `acquire_timeout(5秒)`: 接続取得のタイムアウト
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// 接続確認（Readiness Check 用）
pub async fn ping(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}
