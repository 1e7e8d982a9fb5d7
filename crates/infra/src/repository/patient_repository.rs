//! # PatientRepository
//!
//! 患者レコードの永続化を担当するリポジトリ。
//! 送信された自由形式の項目は JSONB 列に保持する。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clinic_domain::patient::{AppointmentNumber, Patient, PatientId};
use serde_json::{Map, Value};
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::error::InfraError;

/// 患者リポジトリトレイト
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// 患者レコードを作成する
    ///
    /// 予約番号が既存レコードと重複する場合は一意制約違反のエラーを返す
    /// （[`InfraError::is_unique_violation`] で判定できる）。
    async fn insert(&self, patient: &Patient) -> Result<(), InfraError>;

    /// 予約番号が使用済みかどうか
    async fn exists_by_appointment_number(
        &self,
        number: &AppointmentNumber,
    ) -> Result<bool, InfraError>;

    /// 全患者レコードを作成順に取得する
    async fn find_all(&self) -> Result<Vec<Patient>, InfraError>;
}

/// PostgreSQL 実装の PatientRepository
#[derive(Debug, Clone)]
pub struct PostgresPatientRepository {
    pool: PgPool,
}

impl PostgresPatientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PatientRow {
    id:                 Uuid,
    fields:             Json<Map<String, Value>>,
    appointment_number: String,
    created_at:         DateTime<Utc>,
}

impl TryFrom<PatientRow> for Patient {
    type Error = InfraError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        Ok(Patient::from_db(
            PatientId::from_uuid(row.id),
            row.fields.0,
            AppointmentNumber::new(row.appointment_number)
                .map_err(|e| InfraError::unexpected(e.to_string()))?,
            row.created_at,
        ))
    }
}

#[async_trait]
impl PatientRepository for PostgresPatientRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(patient_id = %patient.id()))]
    async fn insert(&self, patient: &Patient) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO patients (id, fields, appointment_number, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(patient.id().as_uuid())
        .bind(Json(patient.fields()))
        .bind(patient.appointment_number().as_str())
        .bind(patient.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn exists_by_appointment_number(
        &self,
        number: &AppointmentNumber,
    ) -> Result<bool, InfraError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM patients WHERE appointment_number = $1)",
        )
        .bind(number.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Patient>, InfraError> {
        let rows = sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT id, fields, appointment_number, created_at
            FROM patients
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Patient::try_from).collect()
    }
}
