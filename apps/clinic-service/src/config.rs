//! # クリニックサービス設定
//!
//! 環境変数からサーバーの設定を読み込む。

use std::{env, path::PathBuf};

use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    #[error("{name} の値が不正です: {value}")]
    Invalid { name: &'static str, value: String },
}

/// サーバーの設定
#[derive(Debug, Clone)]
pub struct ClinicConfig {
    /// バインドアドレス
    pub host:               String,
    /// ポート番号
    pub port:               u16,
    /// データベース接続 URL
    pub database_url:       String,
    /// セッショントークンの署名鍵
    pub jwt_secret:         String,
    /// 医師名簿ファイルのパス（未設定の場合は名簿なしで起動する）
    pub doctor_roster_path: Option<PathBuf>,
}

impl ClinicConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// テストでは環境変数を書き換えずにこちらを使う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let port_raw = required("CLINIC_PORT")?;
        let port = port_raw.parse().map_err(|_| ConfigError::Invalid {
            name:  "CLINIC_PORT",
            value: port_raw,
        })?;

        Ok(Self {
            host: lookup("CLINIC_HOST")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            doctor_roster_path: lookup("DOCTOR_ROSTER_PATH")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        })
    }
}
