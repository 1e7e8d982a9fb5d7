//! # テスト用モックリポジトリ
//!
//! ユースケース・ルーターのテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! clinic-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{
    Arc,
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use clinic_domain::{
    patient::{AppointmentNumber, Patient},
    user::{LoginIdentity, User},
};

use crate::{
    error::InfraError,
    repository::{PatientRepository, UserRepository},
};

// ===== MockUserRepository =====

#[derive(Clone, Default)]
pub struct MockUserRepository {
    users:   Arc<Mutex<Vec<User>>>,
    failing: Arc<AtomicBool>,
    lookups: Arc<AtomicUsize>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// すべての操作がデータベースエラーを返すモック
    pub fn failing() -> Self {
        let repo = Self::default();
        repo.failing.store(true, Ordering::SeqCst);
        repo
    }

    pub fn add_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    /// 保存済みユーザー数
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 照合キー検索の呼び出し回数
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), InfraError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn insert(&self, user: &User) -> Result<(), InfraError> {
        self.check_failure()?;
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn find_by_login_identity(
        &self,
        identity: &LoginIdentity,
    ) -> Result<Option<User>, InfraError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.matches_identity(identity))
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, InfraError> {
        self.check_failure()?;
        Ok(self.users.lock().unwrap().clone())
    }
}

// ===== MockPatientRepository =====

#[derive(Clone, Default)]
pub struct MockPatientRepository {
    patients: Arc<Mutex<Vec<Patient>>>,
    failing:  Arc<AtomicBool>,
}

impl MockPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// すべての操作がデータベースエラーを返すモック
    pub fn failing() -> Self {
        let repo = Self::default();
        repo.failing.store(true, Ordering::SeqCst);
        repo
    }

    pub fn add_patient(&self, patient: Patient) {
        self.patients.lock().unwrap().push(patient);
    }

    pub fn len(&self) -> usize {
        self.patients.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_failure(&self) -> Result<(), InfraError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        Ok(())
    }
}

#[async_trait]
impl PatientRepository for MockPatientRepository {
    async fn insert(&self, patient: &Patient) -> Result<(), InfraError> {
        self.check_failure()?;
        let mut patients = self.patients.lock().unwrap();
        if patients
            .iter()
            .any(|p| p.appointment_number() == patient.appointment_number())
        {
            return Err(InfraError::unexpected(format!(
                "予約番号が重複しています: {}",
                patient.appointment_number()
            )));
        }
        patients.push(patient.clone());
        Ok(())
    }

    async fn exists_by_appointment_number(
        &self,
        number: &AppointmentNumber,
    ) -> Result<bool, InfraError> {
        self.check_failure()?;
        Ok(self
            .patients
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.appointment_number() == number))
    }

    async fn find_all(&self) -> Result<Vec<Patient>, InfraError> {
        self.check_failure()?;
        Ok(self.patients.lock().unwrap().clone())
    }
}
