//! # 医師と医師名簿（ロスター）
//!
//! 医師アカウントはサービスから作成・変更されない。起動時に読み込まれた
//! 名簿（[`DoctorRoster`]）を読み取り専用で参照する。
//!
//! 名簿の読み込み元（ファイル等）はインフラ層の責務。

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::password::PasswordHash;

/// 医師 ID
///
/// 名簿データ側で採番された文字列（`_id`）をそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, derive_more::Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct DoctorId(String);

impl DoctorId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 医師（名簿の 1 エントリ）
///
/// 名簿の JSON 形式:
///
/// ```json
/// { "_id": "d-001", "name": "...", "email": "...", "passwordHash": "$argon2id$...", "department": "..." }
/// ```
///
/// `_id` / `name` / `email` / `passwordHash` 以外の項目は `profile` に保持し、
/// 一覧表示でそのまま返す。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(rename = "_id")]
    pub id:            DoctorId,
    pub name:          String,
    pub email:         String,
    pub password_hash: PasswordHash,
    #[serde(flatten)]
    pub profile:       Map<String, Value>,
}

/// 医師名簿
///
/// 起動後は変更されない。ハンドラ間では `Arc<DoctorRoster>` で共有する。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct DoctorRoster {
    doctors: Vec<Doctor>,
}

impl DoctorRoster {
    pub fn new(doctors: Vec<Doctor>) -> Self {
        Self { doctors }
    }

    /// 名前とメールアドレスが完全一致するエントリを列挙する
    ///
    /// 同じ名前・メールアドレスのエントリが複数ある場合はすべて返す。
    /// どのエントリのパスワードと一致するかは呼び出し側で検証する。
    pub fn candidates<'a>(
        &'a self,
        name: &'a str,
        email: &'a str,
    ) -> impl Iterator<Item = &'a Doctor> + 'a {
        self.doctors
            .iter()
            .filter(move |doctor| doctor.name == name && doctor.email == email)
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn len(&self) -> usize {
        self.doctors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doctors.is_empty()
    }
}
