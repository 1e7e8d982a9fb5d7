//! # アカウントユースケース
//!
//! 保護者・患者アカウントの作成とログイン、医師のログインを扱う。
//!
//! ## タイミング攻撃対策
//!
//! 照合キーに一致するアカウントがない場合もダミーハッシュで検証を実行し、
//! パスワード不一致の場合と処理時間を揃える。どちらの場合も
//! [`ServiceError::InvalidCredentials`] を返し、アカウントの有無を区別しない。

use std::sync::Arc;

use clinic_domain::{
    clock::Clock,
    doctor::DoctorRoster,
    password::PlainPassword,
    session::{AuthToken, SessionSubject},
    user::{Email, LoginIdentity, MobileNumber, NewUser, User, UserId},
};
use clinic_infra::{PasswordChecker, TokenIssuer, repository::UserRepository};

use crate::error::ServiceError;

/// アカウント作成の入力
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub parent_name:  String,
    pub patient_name: String,
    pub mobile:       MobileNumber,
    pub email:        Email,
    pub password:     PlainPassword,
}

/// 保護者・患者ログインの入力
#[derive(Debug, Clone)]
pub struct LoginUserInput {
    pub identity: LoginIdentity,
    pub password: PlainPassword,
}

/// 医師ログインの入力
#[derive(Debug, Clone)]
pub struct LoginDoctorInput {
    pub name:     String,
    pub email:    String,
    pub password: PlainPassword,
}

/// アカウントユースケースの実装
pub struct AccountUseCaseImpl {
    user_repository:  Arc<dyn UserRepository>,
    password_checker: Arc<dyn PasswordChecker>,
    token_issuer:     Arc<dyn TokenIssuer>,
    doctor_roster:    Option<Arc<DoctorRoster>>,
    clock:            Arc<dyn Clock>,
}

impl AccountUseCaseImpl {
    /// `doctor_roster` が `None` の場合、医師関連の操作はすべてサーバーエラーになる
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_checker: Arc<dyn PasswordChecker>,
        token_issuer: Arc<dyn TokenIssuer>,
        doctor_roster: Option<Arc<DoctorRoster>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            password_checker,
            token_issuer,
            doctor_roster,
            clock,
        }
    }

    /// アカウントを作成し、セッショントークンを発行する
    ///
    /// メールアドレス・携帯番号の重複は確認しない。
    pub async fn create_user(&self, input: CreateUserInput) -> Result<AuthToken, ServiceError> {
        let password_hash = self.password_checker.hash(&input.password)?;

        let user = User::new(NewUser {
            id: UserId::new(),
            parent_name: input.parent_name,
            patient_name: input.patient_name,
            mobile: input.mobile,
            email: input.email,
            password_hash,
            now: self.clock.now(),
        });
        self.user_repository.insert(&user).await?;

        let token = self
            .token_issuer
            .issue(&SessionSubject::User(user.id().clone()))?;

        tracing::info!(user_id = %user.id(), "アカウントを作成しました");
        Ok(token)
    }

    /// 照合キーとパスワードでログインする
    pub async fn login_user(&self, input: LoginUserInput) -> Result<AuthToken, ServiceError> {
        let Some(user) = self
            .user_repository
            .find_by_login_identity(&input.identity)
            .await?
        else {
            self.password_checker.verify_dummy(&input.password);
            tracing::debug!("照合キーに一致するアカウントがありません");
            return Err(ServiceError::InvalidCredentials);
        };

        let result = self
            .password_checker
            .verify(&input.password, user.password_hash())?;
        if result.is_mismatch() {
            tracing::debug!(user_id = %user.id(), "パスワードが一致しません");
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(self
            .token_issuer
            .issue(&SessionSubject::User(user.id().clone()))?)
    }

    /// 医師名簿に対してログインする
    ///
    /// 名前とメールアドレスが一致するエントリのうち、パスワードハッシュと
    /// 一致する最初のエントリでトークンを発行する。
    pub async fn login_doctor(&self, input: LoginDoctorInput) -> Result<AuthToken, ServiceError> {
        let roster = self.roster()?;

        let mut candidates = roster.candidates(&input.name, &input.email).peekable();
        if candidates.peek().is_none() {
            self.password_checker.verify_dummy(&input.password);
            tracing::debug!("名前とメールアドレスに一致する医師がいません");
            return Err(ServiceError::InvalidCredentials);
        }

        for doctor in candidates {
            let result = self
                .password_checker
                .verify(&input.password, &doctor.password_hash)?;
            if result.is_match() {
                return Ok(self
                    .token_issuer
                    .issue(&SessionSubject::Doctor(doctor.id.clone()))?);
            }
        }

        tracing::debug!("医師のパスワードが一致しません");
        Err(ServiceError::InvalidCredentials)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.user_repository.find_all().await?)
    }

    /// 読み込み済みの医師名簿
    pub fn roster(&self) -> Result<Arc<DoctorRoster>, ServiceError> {
        self.doctor_roster
            .clone()
            .ok_or(ServiceError::RosterNotLoaded)
    }
}
