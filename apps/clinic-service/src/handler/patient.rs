//! # 患者ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /patients` - 患者レコード作成（予約番号を採番）
//! - `GET /patients` - 患者レコード一覧
//!
//! 送信項目は自由形式の JSON オブジェクト。レスポンスは送信項目に
//! `id` / `appointmentNumber` / `createdAt` を加えたもの。

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use clinic_domain::patient::Patient;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::{ApiError, FailureStyle, ServiceError},
    usecase::PatientUseCase,
};

/// 患者ハンドラの共有状態
pub struct PatientState {
    pub usecase: Arc<dyn PatientUseCase>,
}

/// 患者レコードのレスポンス
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientData {
    #[serde(flatten)]
    pub fields:             Map<String, Value>,
    pub id:                 String,
    pub appointment_number: String,
    pub created_at:         DateTime<Utc>,
}

impl From<&Patient> for PatientData {
    fn from(patient: &Patient) -> Self {
        Self {
            fields:             patient.fields().clone(),
            id:                 patient.id().to_string(),
            appointment_number: patient.appointment_number().to_string(),
            created_at:         patient.created_at(),
        }
    }
}

/// POST /patients
///
/// ボディが JSON オブジェクトでない場合は `400 {error}`。
pub async fn create_patient(
    State(state): State<Arc<PatientState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PatientData>, ApiError> {
    let fields = object_body(body).map_err(|e| e.with_style(FailureStyle::PatientCreate))?;

    let patient = state
        .usecase
        .create_patient(fields)
        .await
        .map_err(|e| e.with_style(FailureStyle::PatientCreate))?;

    Ok(Json(PatientData::from(&patient)))
}

fn object_body(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Map<String, Value>, ServiceError> {
    match body {
        Ok(Json(Value::Object(fields))) => Ok(fields),
        Ok(Json(_)) => Err(ServiceError::InvalidBody(
            "Request body must be a JSON object".to_string(),
        )),
        Err(rejection) => Err(ServiceError::InvalidBody(rejection.body_text())),
    }
}

/// GET /patients
pub async fn list_patients(
    State(state): State<Arc<PatientState>>,
) -> Result<Json<Vec<PatientData>>, ApiError> {
    let patients = state
        .usecase
        .list_patients()
        .await
        .map_err(|e| e.with_style(FailureStyle::Listing))?;

    Ok(Json(patients.iter().map(PatientData::from).collect()))
}
