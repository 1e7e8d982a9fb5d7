//! # ユースケース層
//!
//! クリニックサービスのビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **トレイトベースの設計**: ハンドラのテストでスタブに差し替えられるようトレイトを定義
//! - **依存性注入**: リポジトリ・パスワードチェッカー・トークン発行・医師名簿・時刻を外部から注入
//! - **薄いハンドラ**: 入力検証は抽出時、業務処理はユースケースに集約

pub mod account;
pub mod patient;

use std::sync::Arc;

pub use account::{AccountUseCaseImpl, CreateUserInput, LoginDoctorInput, LoginUserInput};
use async_trait::async_trait;
use clinic_domain::{doctor::DoctorRoster, patient::Patient, session::AuthToken, user::User};
pub use patient::{
    AppointmentNumberGenerator,
    PatientUseCaseImpl,
    RandomAppointmentNumberGenerator,
};
use serde_json::{Map, Value};

use crate::error::ServiceError;

/// アカウントユースケーストレイト
#[async_trait]
pub trait AccountUseCase: Send + Sync {
    /// アカウントを作成してトークンを発行する
    async fn create_user(&self, input: CreateUserInput) -> Result<AuthToken, ServiceError>;

    /// 保護者・患者としてログインする
    ///
    /// アカウントなし・パスワード不一致はどちらも `InvalidCredentials`。
    async fn login_user(&self, input: LoginUserInput) -> Result<AuthToken, ServiceError>;

    /// 医師としてログインする
    ///
    /// 名簿が読み込まれていない場合は `RosterNotLoaded`。
    async fn login_doctor(&self, input: LoginDoctorInput) -> Result<AuthToken, ServiceError>;

    async fn list_users(&self) -> Result<Vec<User>, ServiceError>;

    /// 読み込み済みの医師名簿を返す
    fn roster(&self) -> Result<Arc<DoctorRoster>, ServiceError>;
}

/// 患者ユースケーストレイト
#[async_trait]
pub trait PatientUseCase: Send + Sync {
    /// 予約番号を採番して患者レコードを作成する
    async fn create_patient(&self, fields: Map<String, Value>) -> Result<Patient, ServiceError>;

    async fn list_patients(&self) -> Result<Vec<Patient>, ServiceError>;
}

#[async_trait]
impl AccountUseCase for AccountUseCaseImpl {
    async fn create_user(&self, input: CreateUserInput) -> Result<AuthToken, ServiceError> {
        self.create_user(input).await
    }

    async fn login_user(&self, input: LoginUserInput) -> Result<AuthToken, ServiceError> {
        self.login_user(input).await
    }

    async fn login_doctor(&self, input: LoginDoctorInput) -> Result<AuthToken, ServiceError> {
        self.login_doctor(input).await
    }

    async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        self.list_users().await
    }

    fn roster(&self) -> Result<Arc<DoctorRoster>, ServiceError> {
        self.roster()
    }
}

#[async_trait]
impl PatientUseCase for PatientUseCaseImpl {
    async fn create_patient(&self, fields: Map<String, Value>) -> Result<Patient, ServiceError> {
        self.create_patient(fields).await
    }

    async fn list_patients(&self) -> Result<Vec<Patient>, ServiceError> {
        self.list_patients().await
    }
}
