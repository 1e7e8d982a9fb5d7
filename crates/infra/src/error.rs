//! # インフラ層エラー定義
//!
//! データベース・ファイル・署名処理で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターン:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! `From` 実装や convenience constructor でエラーを生成すると、
//! その時点のスパン情報が自動的にキャプチャされる。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する。
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// データベースエラー
    ///
    /// SQL の実行失敗、接続エラー、制約違反など。
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// シリアライズ/デシリアライズエラー
    ///
    /// JSONB 列や医師名簿 JSON の変換失敗。
    #[error("シリアライズエラー: {0}")]
    Serialization(#[source] serde_json::Error),

    /// ファイル入出力エラー
    #[error("入出力エラー: {0}")]
    Io(#[source] std::io::Error),

    /// トークン署名エラー
    #[error("トークンエラー: {0}")]
    Token(#[source] jsonwebtoken::errors::Error),

    /// パスワードハッシュエラー
    #[error("パスワードハッシュエラー: {0}")]
    PasswordHash(String),

    /// 予期しないエラー
    ///
    /// DB から読み出した値がドメインの不変条件を満たさない場合など。
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 一意制約違反かどうか
    pub fn is_unique_violation(&self) -> bool {
        match &self.kind {
            InfraErrorKind::Database(sqlx::Error::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }

    // ===== Convenience constructors =====

    /// パスワードハッシュエラーを生成する
    pub fn password_hash(msg: impl Into<String>) -> Self {
        Self::from_kind(InfraErrorKind::PasswordHash(msg.into()))
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::from_kind(InfraErrorKind::Unexpected(msg.into()))
    }

    fn from_kind(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        Self::from_kind(InfraErrorKind::Database(source))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(source: serde_json::Error) -> Self {
        Self::from_kind(InfraErrorKind::Serialization(source))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(source: std::io::Error) -> Self {
        Self::from_kind(InfraErrorKind::Io(source))
    }
}

impl From<jsonwebtoken::errors::Error> for InfraError {
    fn from(source: jsonwebtoken::errors::Error) -> Self {
        Self::from_kind(InfraErrorKind::Token(source))
    }
}
