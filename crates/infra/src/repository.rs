//! # リポジトリ
//!
//! 永続化操作のトレイトと PostgreSQL 実装。
//!
//! | リポジトリ | 操作 |
//! |-----------|------|
//! | [`UserRepository`] | 作成 / 照合キーで 1 件検索 / 全件取得 |
//! | [`PatientRepository`] | 作成 / 予約番号の存在確認 / 全件取得 |

pub mod patient_repository;
pub mod user_repository;

pub use patient_repository::{PatientRepository, PostgresPatientRepository};
pub use user_repository::{PostgresUserRepository, UserRepository};
