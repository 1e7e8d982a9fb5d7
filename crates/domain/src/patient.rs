//! # 患者レコード（Patient）
//!
//! 受付で登録される患者レコード。項目は自由形式（JSON オブジェクト）で、
//! 登録時に 6 桁の予約番号が付与される。
//!
//! ## 予約番号
//!
//! - 形式: `^[0-9]{6}$`、先頭は 1〜9（100000〜999999）
//! - 一意性はユースケース層での重複確認と DB の一意制約で担保する
//! - 乱数生成はこのクレートの責務外（[`AppointmentNumber::from_u32`] で受け取る）

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::DomainError;

define_uuid_id! {
    /// 患者レコード ID（UUID v7）
    pub struct PatientId;
}

/// 患者の予約番号（値オブジェクト）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppointmentNumber(String);

impl AppointmentNumber {
    /// 予約番号の下限（6 桁の最小値）
    pub const MIN: u32 = 100_000;
    /// 予約番号の上限（6 桁の最大値）
    pub const MAX: u32 = 999_999;

    /// 文字列から予約番号を作成する
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.len() != 6 || !value.bytes().all(|b| b.is_ascii_digit()) || value.starts_with('0')
        {
            return Err(DomainError::Validation(format!(
                "予約番号は 6 桁の数字である必要があります: {value}"
            )));
        }

        Ok(Self(value))
    }

    /// 数値から予約番号を作成する
    pub fn from_u32(value: u32) -> Result<Self, DomainError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(DomainError::Validation(format!(
                "予約番号は {}〜{} の範囲である必要があります: {value}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AppointmentNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 患者レコード（エンティティ）
#[derive(Debug, Clone)]
pub struct Patient {
    id:                 PatientId,
    fields:             Map<String, Value>,
    appointment_number: AppointmentNumber,
    created_at:         DateTime<Utc>,
}

impl Patient {
    /// 採番側が所有するキー。送信された項目からは取り除く。
    pub const RESERVED_KEYS: [&'static str; 4] = ["id", "_id", "appointmentNumber", "createdAt"];

    /// 新しい患者レコードを作成する
    ///
    /// 送信された項目に予約済みキーが含まれていても、採番値が優先される。
    pub fn new(
        id: PatientId,
        mut fields: Map<String, Value>,
        appointment_number: AppointmentNumber,
        now: DateTime<Utc>,
    ) -> Self {
        for key in Self::RESERVED_KEYS {
            fields.remove(key);
        }

        Self {
            id,
            fields,
            appointment_number,
            created_at: now,
        }
    }

    /// データベースから復元する
    pub fn from_db(
        id: PatientId,
        fields: Map<String, Value>,
        appointment_number: AppointmentNumber,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            fields,
            appointment_number,
            created_at,
        }
    }

    // Getters

    pub fn id(&self) -> &PatientId {
        &self.id
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn appointment_number(&self) -> &AppointmentNumber {
        &self.appointment_number
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
