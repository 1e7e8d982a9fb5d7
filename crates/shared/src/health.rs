//! # ヘルスチェック共通型
//!
//! `/health`（liveness）と `/health/ready`（readiness）が返すレスポンス型。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// ヘルスチェックレスポンス
///
/// ```
/// use clinic_shared::HealthResponse;
///
/// let response = HealthResponse::healthy("0.1.0");
/// assert_eq!(response.status, "healthy");
/// ```
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// 稼働状態（`"healthy"`）
    pub status:  String,
    /// アプリケーションバージョン（Cargo.toml から取得）
    pub version: String,
}

impl HealthResponse {
    pub fn healthy(version: impl Into<String>) -> Self {
        Self {
            status:  "healthy".to_string(),
            version: version.into(),
        }
    }
}

/// 個別チェックの結果ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
}

impl From<bool> for CheckStatus {
    fn from(ok: bool) -> Self {
        if ok { Self::Ok } else { Self::Error }
    }
}

/// Readiness 全体のステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    /// すべてのチェックが成功
    Ready,
    /// いずれかのチェックが失敗
    NotReady,
}

/// Readiness Check レスポンス
///
/// `checks` のキーはチェック名（`database`, `doctor_roster` など）。
/// 出力順を安定させるため `BTreeMap` で保持する。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: ReadinessStatus,
    pub checks: BTreeMap<String, CheckStatus>,
}

impl ReadinessResponse {
    /// 個別チェック結果から全体ステータスを導出して構築する
    ///
    /// ```
    /// use clinic_shared::{CheckStatus, ReadinessResponse, ReadinessStatus};
    ///
    /// let response = ReadinessResponse::from_checks([
    ///     ("database", CheckStatus::Ok),
    ///     ("doctor_roster", CheckStatus::Error),
    /// ]);
    /// assert_eq!(response.status, ReadinessStatus::NotReady);
    /// ```
    pub fn from_checks<K: Into<String>>(checks: impl IntoIterator<Item = (K, CheckStatus)>) -> Self {
        let checks: BTreeMap<String, CheckStatus> =
            checks.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let status = if checks.values().all(|c| *c == CheckStatus::Ok) {
            ReadinessStatus::Ready
        } else {
            ReadinessStatus::NotReady
        };
        Self { status, checks }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_health_responseのserializeで正しいjson形状にする() {
        let json = serde_json::to_value(HealthResponse::healthy("0.1.0")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": "healthy",
                "version": "0.1.0"
            })
        );
    }

    #[test]
    fn test_check_statusのserialize結果() {
        assert_eq!(serde_json::to_value(CheckStatus::Ok).unwrap(), "ok");
        assert_eq!(serde_json::to_value(CheckStatus::Error).unwrap(), "error");
    }

    #[test]
    fn test_readiness_status_not_readyのserialize結果() {
        let json = serde_json::to_value(ReadinessStatus::NotReady).unwrap();
        assert_eq!(json, serde_json::json!("not_ready"));
    }

    #[test]
    fn test_全チェック成功でready() {
        let response = ReadinessResponse::from_checks([
            ("database", CheckStatus::Ok),
            ("doctor_roster", CheckStatus::Ok),
        ]);

        assert!(response.is_ready());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["checks"]["doctor_roster"], "ok");
    }

    #[test]
    fn test_一つでも失敗するとnot_ready() {
        let response = ReadinessResponse::from_checks([
            ("database", CheckStatus::from(false)),
            ("doctor_roster", CheckStatus::from(true)),
        ]);

        assert_eq!(response.status, ReadinessStatus::NotReady);
        assert_eq!(response.checks["database"], CheckStatus::Error);
    }
}
