//! # パスワード
//!
//! パスワード関連の値オブジェクトを定義する。
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`PlainPassword`] | 平文パスワード | アカウント作成・ログイン時の入力値 |
//! | [`PasswordHash`] | パスワードハッシュ | User の永続化、医師名簿の保持 |
//! | [`PasswordVerifyResult`] | 検証結果 | パスワード検証の成否 |
//!
//! 保護者アカウントも医師も同じハッシュ形式（Argon2id PHC 文字列）で保持し、
//! 平文比較は行わない。

use serde::Deserialize;

/// 平文パスワード（入力値）
///
/// Debug 出力ではパスワードの値をマスクする。
#[derive(Clone)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
    }
}

impl PlainPassword {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// パスワードハッシュ
///
/// Argon2id でハッシュ化された PHC 文字列（`$argon2id$v=19$...`）。
/// ソルトはハッシュ文字列に埋め込まれている。
///
/// 医師名簿 JSON から直接デシリアライズできるよう `Deserialize` を実装するが、
/// レスポンスに混入しないよう `Serialize` は実装しない。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// ハッシュ文字列からインスタンスを作成する
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// パスワード検証結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVerifyResult {
    /// パスワードが一致した
    Match,
    /// パスワードが一致しなかった
    Mismatch,
}

impl PasswordVerifyResult {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch)
    }
}

impl From<bool> for PasswordVerifyResult {
    fn from(matched: bool) -> Self {
        if matched { Self::Match } else { Self::Mismatch }
    }
}
