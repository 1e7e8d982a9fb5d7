//! # Clinic ドメイン層
//!
//! クリニック向けアカウント管理の中核となるドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! clinic-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、JWT、ハッシュ実装）に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`clock`] - 時刻プロバイダ
//! - [`password`] - パスワード関連の値オブジェクト
//! - [`user`] - 保護者・患者アカウント（User）
//! - [`patient`] - 患者レコードと予約番号
//! - [`doctor`] - 医師と医師名簿（ロスター）
//! - [`session`] - セッショントークンの主体
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use clinic_domain::{DomainError, user::MobileNumber};
//!
//! let mobile = MobileNumber::new("0312345678")?;
//! assert_eq!(mobile.as_str(), "0312345678");
//!
//! let error = MobileNumber::new("12345").unwrap_err();
//! assert!(matches!(error, DomainError::Validation(_)));
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod macros;

pub mod clock;
pub mod doctor;
pub mod error;
pub mod password;
pub mod patient;
pub mod session;
pub mod user;

pub use error::DomainError;
