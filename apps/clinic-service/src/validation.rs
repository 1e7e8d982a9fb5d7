//! # リクエスト検証
//!
//! `validator` の derive で宣言した規則を、リクエストボディの抽出時に一括で評価する。
//! 違反はフィールドごとの [`FieldViolation`] に変換し、`path` 順に並べて返す。

use std::sync::LazyLock;

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use regex::Regex;
use serde::{
    Deserialize,
    Deserializer,
    de::{DeserializeOwned, Error as _},
};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{ApiError, FailureStyle, FieldViolation, ServiceError};

/// 携帯電話番号（ASCII 数字ちょうど 10 桁）
pub static MOBILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("携帯電話番号の正規表現が不正です"));

/// 構造体レベルの検証エラーが格納されるキー
const STRUCT_LEVEL_KEY: &str = "__all__";

/// 検証済みの JSON ボディ
///
/// デシリアライズ後に [`Validate::validate`] を 1 回だけ実行し、
/// 違反があれば `400 {errors:[{path,msg}]}` で拒否する。
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ServiceError::InvalidBody(rejection.body_text()).with_style(FailureStyle::Account)
        })?;

        value.validate().map_err(|errors| {
            ServiceError::Validation(violations(&errors)).with_style(FailureStyle::Account)
        })?;

        Ok(Self(value))
    }
}

/// `validator` のエラーを `path` 順の違反一覧に変換する
///
/// 構造体レベルの検証エラーはエラーコードを `path` として扱う。
pub fn violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut result: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let key: &str = field.as_ref();
            let field_path = (key != STRUCT_LEVEL_KEY).then(|| json_field_name(key));
            field_errors.iter().map(move |error| {
                let path = field_path
                    .clone()
                    .unwrap_or_else(|| error.code.to_string());
                FieldViolation::new(path, message_of(error))
            })
        })
        .collect();

    result.sort_by(|a, b| a.path.cmp(&b.path));
    result
}

fn message_of(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map_or_else(|| error.code.to_string(), ToString::to_string)
}

/// Rust のフィールド名を JSON のフィールド名（camelCase）に変換する
fn json_field_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = !name.is_empty();
        } else if upper_next {
            name.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            name.push(c);
        }
    }
    name
}

/// 構造体レベルの検証エラーを作る
///
/// `field` は違反として返す JSON のフィールド名。
pub fn struct_level_error(field: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(field);
    error.message = Some(message.into());
    error
}

/// 文字列項目を受け取る
///
/// 数値・真偽値は文字列表現に、`null` は空文字に変換する。
/// 配列・オブジェクトはボディの形式エラーとして拒否する。
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected a string value, found {}",
            json_type_name(&other)
        ))),
    }
}

/// 省略可能な文字列項目を受け取る（`null` は未送信として扱う）
pub fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(D::Error::custom(format!(
            "expected a string value, found {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
        _ => "a scalar",
    }
}
