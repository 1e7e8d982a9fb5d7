//! # 患者ユースケース
//!
//! 患者レコードの作成（予約番号の採番を含む）と一覧取得を扱う。

use std::sync::Arc;

use clinic_domain::{
    clock::Clock,
    patient::{AppointmentNumber, Patient, PatientId},
};
use clinic_infra::repository::PatientRepository;
use rand::Rng as _;
use serde_json::{Map, Value};

use crate::error::ServiceError;

/// 予約番号の採番を試みる最大回数
pub const MAX_ALLOCATION_ATTEMPTS: usize = 10;

/// 予約番号の候補を生成するトレイト
///
/// 一意性の確認はユースケース側で行う。
pub trait AppointmentNumberGenerator: Send + Sync {
    fn next_candidate(&self) -> u32;
}

/// 100000〜999999 の一様乱数で候補を生成する
#[derive(Debug, Default)]
pub struct RandomAppointmentNumberGenerator;

impl AppointmentNumberGenerator for RandomAppointmentNumberGenerator {
    fn next_candidate(&self) -> u32 {
        rand::rng().random_range(AppointmentNumber::MIN..=AppointmentNumber::MAX)
    }
}

/// 患者ユースケースの実装
pub struct PatientUseCaseImpl {
    patient_repository: Arc<dyn PatientRepository>,
    number_generator:   Arc<dyn AppointmentNumberGenerator>,
    clock:              Arc<dyn Clock>,
}

impl PatientUseCaseImpl {
    pub fn new(
        patient_repository: Arc<dyn PatientRepository>,
        number_generator: Arc<dyn AppointmentNumberGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            patient_repository,
            number_generator,
            clock,
        }
    }

    /// 予約番号を採番して患者レコードを作成する
    ///
    /// 使用済みの番号を引いた場合は引き直す。確認後に他のリクエストが同じ番号を
    /// 登録した場合も一意制約違反として検出し、引き直す。
    /// [`MAX_ALLOCATION_ATTEMPTS`] 回で採番できなければエラーを返す。
    pub async fn create_patient(
        &self,
        fields: Map<String, Value>,
    ) -> Result<Patient, ServiceError> {
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let candidate = self.number_generator.next_candidate();
            let number = AppointmentNumber::from_u32(candidate)
                .map_err(|e| ServiceError::Internal(e.to_string()))?;

            if self
                .patient_repository
                .exists_by_appointment_number(&number)
                .await?
            {
                tracing::debug!(attempt, %number, "予約番号が使用済みのため引き直します");
                continue;
            }

            let patient = Patient::new(PatientId::new(), fields.clone(), number, self.clock.now());
            match self.patient_repository.insert(&patient).await {
                Ok(()) => {
                    tracing::info!(
                        patient_id = %patient.id(),
                        appointment_number = %patient.appointment_number(),
                        "患者レコードを作成しました"
                    );
                    return Ok(patient);
                }
                Err(e) if e.is_unique_violation() => {
                    tracing::debug!(attempt, "予約番号の一意制約違反のため引き直します");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::Internal(
            "Could not allocate a unique appointment number".to_string(),
        ))
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, ServiceError> {
        Ok(self.patient_repository.find_all().await?)
    }
}
