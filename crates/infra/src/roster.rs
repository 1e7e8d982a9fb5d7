//! # 医師名簿の読み込み
//!
//! JSON ファイルから [`DoctorRoster`] を構築する。読み込みは起動時に一度だけ行い、
//! 以降は読み取り専用で共有する。
//!
//! ファイル形式はエントリの配列:
//!
//! ```json
//! [
//!   { "_id": "d-001", "name": "佐藤一郎", "email": "sato@clinic.example.com", "passwordHash": "$argon2id$..." }
//! ]
//! ```

use std::path::Path;

use clinic_domain::doctor::DoctorRoster;

use crate::InfraError;

/// 名簿 JSON 文字列をパースする
pub fn parse_roster(json: &str) -> Result<DoctorRoster, InfraError> {
    Ok(serde_json::from_str(json)?)
}

/// 名簿ファイルを読み込む
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_roster(path: impl AsRef<Path>) -> Result<DoctorRoster, InfraError> {
    let json = tokio::fs::read_to_string(path.as_ref()).await?;
    let roster = parse_roster(&json)?;
    tracing::info!(doctors = roster.len(), "医師名簿を読み込みました");
    Ok(roster)
}
