//! # 医師名簿ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /doctors` - 医師一覧
//! - `GET /doctordata` - 医師一覧（配列）
//! - `POST /doctordata` - 医師一覧を 1 要素の配列で包んだもの（`[[…]]`）
//!
//! いずれもパスワードハッシュは返さない。

use std::sync::Arc;

use axum::{Json, extract::State};
use clinic_domain::doctor::{Doctor, DoctorRoster};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::{ApiError, FailureStyle},
    handler::AccountState,
};

/// 名簿の追加項目から除外するキー
const SECRET_KEYS: [&str; 2] = ["password", "passwordHash"];

/// 医師一覧の要素
#[derive(Debug, Serialize)]
pub struct DoctorData {
    #[serde(rename = "_id")]
    pub id:      String,
    pub name:    String,
    pub email:   String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl From<&Doctor> for DoctorData {
    fn from(doctor: &Doctor) -> Self {
        let mut profile = doctor.profile.clone();
        for key in SECRET_KEYS {
            profile.remove(key);
        }
        Self {
            id: doctor.id.to_string(),
            name: doctor.name.clone(),
            email: doctor.email.clone(),
            profile,
        }
    }
}

fn doctor_list(roster: &DoctorRoster) -> Vec<DoctorData> {
    roster.doctors().iter().map(DoctorData::from).collect()
}

fn load(state: &AccountState, style: FailureStyle) -> Result<Vec<DoctorData>, ApiError> {
    let roster = state.usecase.roster().map_err(|e| e.with_style(style))?;
    Ok(doctor_list(&roster))
}

/// GET /doctors
pub async fn list_doctors(
    State(state): State<Arc<AccountState>>,
) -> Result<Json<Vec<DoctorData>>, ApiError> {
    Ok(Json(load(&state, FailureStyle::Listing)?))
}

/// GET /doctordata
pub async fn get_doctor_data(
    State(state): State<Arc<AccountState>>,
) -> Result<Json<Vec<DoctorData>>, ApiError> {
    Ok(Json(load(&state, FailureStyle::DoctorData)?))
}

/// POST /doctordata
///
/// リクエストボディは参照しない。
pub async fn post_doctor_data(
    State(state): State<Arc<AccountState>>,
) -> Result<Json<[Vec<DoctorData>; 1]>, ApiError> {
    Ok(Json([load(&state, FailureStyle::DoctorData)?]))
}
