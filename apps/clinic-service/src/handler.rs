//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置し、親モジュールで re-export する
//! - ハンドラは薄く保ち、ビジネスロジックは usecase 層に委譲
//! - エラーはエンドポイントごとの [`FailureStyle`](crate::error::FailureStyle) でレスポンスに変換する
//!
//! ## ハンドラ一覧
//!
//! - `account`: アカウント作成・ログイン・一覧
//! - `doctor`: 医師名簿の参照
//! - `patient`: 患者レコードの作成・一覧
//! - `health`: ヘルスチェック

pub mod account;
pub mod doctor;
pub mod health;
pub mod patient;

pub use account::{AccountState, create_user, list_users, login_doctor, login_user};
pub use doctor::{get_doctor_data, list_doctors, post_doctor_data};
pub use health::{ReadinessState, health_check, readiness_check};
pub use patient::{PatientState, create_patient, list_patients};
