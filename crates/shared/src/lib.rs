//! # クリニックサービス共有ユーティリティ
//!
//! サービス本体・インフラ層から共通で使用するユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - トレーシング関連の依存は `observability` feature の背後に置く

#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod health;
pub mod observability;

pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
