//! # エラー定義
//!
//! ユースケース層のエラー（[`ServiceError`]）と、HTTP レスポンスへの変換を定義する。
//!
//! 同じエラーでもエンドポイントによってレスポンスの形が異なるため、
//! ハンドラは [`FailureStyle`] を指定して [`ApiError`] に変換してから返す。
//!
//! | エラー | Account | DoctorLogin | Listing | PatientCreate | DoctorData |
//! |--------|---------|-------------|---------|---------------|------------|
//! | `Validation` | 400 `{errors:[…]}` | 同左 | 同左 | 同左 | 同左 |
//! | `InvalidCredentials` | 400 `{errors:"…"}` | 同左 | 同左 | 同左 | 同左 |
//! | `InvalidBody` | 400 `{errors:[…]}` | 同左 | 400 `{error}` | 400 `{error}` | 400 `{error}` |
//! | その他 | 500 `{success:false}` | 500 `{success:false,error:"Server error"}` | 500 `{error}` | 400 `{error}` | 500 `{error:"Server error"}` |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clinic_infra::InfraError;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// 認証失敗時にクライアントへ返すメッセージ
pub const INVALID_CREDENTIALS: &str = "Invalid login credentials";

/// 詳細を隠す 5xx のメッセージ
const SERVER_ERROR: &str = "Server error";

/// 入力項目ごとの検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// JSON 上のフィールド名
    pub path: String,
    pub msg:  String,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            msg:  msg.into(),
        }
    }
}

/// ユースケース層で発生するエラー
#[derive(Debug, Error)]
pub enum ServiceError {
    /// 入力検証エラー
    #[error("入力検証エラー: {0:?}")]
    Validation(Vec<FieldViolation>),

    /// リクエストボディを解釈できない
    #[error("{0}")]
    InvalidBody(String),

    /// 認証失敗（アカウントなし・パスワード不一致を区別しない）
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// 医師名簿が読み込まれていない
    #[error("Doctor data is not loaded")]
    RosterNotLoaded,

    /// 永続化・ハッシュ化・トークン発行の失敗
    #[error("{0}")]
    Infra(#[from] InfraError),

    /// 内部エラー
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// 単一フィールドの検証エラーを作る
    pub fn field(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation(vec![FieldViolation::new(path, msg)])
    }

    /// エンドポイントのレスポンス形式を指定して HTTP エラーに変換する
    pub fn with_style(self, style: FailureStyle) -> ApiError {
        ApiError { error: self, style }
    }
}

/// エンドポイントごとのエラーレスポンス形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStyle {
    /// `/createuser`, `/loginuser`
    Account,
    /// `/logindoctor`
    DoctorLogin,
    /// `/users`, `/patients`（GET）, `/doctors`
    Listing,
    /// `/patients`（POST）
    PatientCreate,
    /// `/doctordata`
    DoctorData,
}

/// レスポンス形式が確定したエラー
#[derive(Debug)]
pub struct ApiError {
    error: ServiceError,
    style: FailureStyle,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError { error, style } = self;

        match error {
            ServiceError::Validation(violations) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": violations }))).into_response()
            }
            ServiceError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": INVALID_CREDENTIALS })),
            )
                .into_response(),
            ServiceError::InvalidBody(msg) => match style {
                FailureStyle::Account | FailureStyle::DoctorLogin => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "errors": [FieldViolation::new("body", msg)] })),
                )
                    .into_response(),
                _ => (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response(),
            },
            other => failure_response(&other, style),
        }
    }
}

/// 検証・認証以外の失敗をレスポンスに変換する
fn failure_response(error: &ServiceError, style: FailureStyle) -> Response {
    match style {
        FailureStyle::PatientCreate => {
            tracing::error!(error = %error, "患者レコードの作成に失敗しました");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response()
        }
        FailureStyle::Account => {
            tracing::error!(error = %error, "アカウント処理に失敗しました");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false })),
            )
                .into_response()
        }
        FailureStyle::DoctorLogin => {
            tracing::error!(error = %error, "医師ログインに失敗しました");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": SERVER_ERROR })),
            )
                .into_response()
        }
        FailureStyle::Listing => {
            tracing::error!(error = %error, "一覧の取得に失敗しました");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response()
        }
        FailureStyle::DoctorData => {
            tracing::error!(error = %error, "医師データの取得に失敗しました");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": SERVER_ERROR })),
            )
                .into_response()
        }
    }
}
