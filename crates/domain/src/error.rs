//! # ドメイン層エラー定義
//!
//! ビジネスルール違反を表現するエラー型。
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 値オブジェクトの生成失敗 |
//!
//! ## 使用例
//!
//! ```rust
//! use clinic_domain::DomainError;
//!
//! fn validate_name(name: &str) -> Result<(), DomainError> {
//!     if name.is_empty() {
//!         return Err(DomainError::Validation("名前は必須です".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_name("").is_err());
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、フィールド違反として 400 に変換する。
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 値オブジェクトの不変条件を満たさない入力に使用する。
    ///
    /// # 例
    ///
    /// - 携帯番号が 10 桁の数字でない
    /// - 予約番号が 6 桁の数字でない
    /// - メールアドレスの形式が不正
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
