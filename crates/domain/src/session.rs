//! # セッショントークン
//!
//! 認証成功時に発行する署名付きトークンと、その主体を定義する。
//! 有効期限・リフレッシュの概念は持たない。

use strum::IntoStaticStr;

use crate::{doctor::DoctorId, user::UserId};

/// アカウント種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AccountKind {
    /// 保護者・患者アカウント
    User,
    /// 医師
    Doctor,
}

/// トークンの主体
///
/// トークンのペイロードは `{"user": {"id": ...}}` または
/// `{"doctor": {"id": ...}}` の形になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSubject {
    User(UserId),
    Doctor(DoctorId),
}

impl SessionSubject {
    pub fn kind(&self) -> AccountKind {
        match self {
            Self::User(_) => AccountKind::User,
            Self::Doctor(_) => AccountKind::Doctor,
        }
    }

    /// ペイロードに埋め込む ID 文字列
    pub fn id_string(&self) -> String {
        match self {
            Self::User(id) => id.to_string(),
            Self::Doctor(id) => id.to_string(),
        }
    }
}

/// 署名済みトークン
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AuthToken").field(&"[REDACTED]").finish()
    }
}

impl AuthToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
