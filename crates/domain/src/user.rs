//! # 保護者・患者アカウント（User）
//!
//! 保護者（parent）と患者（patient）の組を表すアカウント。
//! ログインは「保護者名 + 患者名 + メールアドレス + パスワード」で行う。
//!
//! ## 不変条件
//!
//! - 携帯番号は ASCII 数字ちょうど 10 桁
//! - メールアドレスは `local@domain` の形式
//! - パスワードはハッシュとしてのみ保持する（平文は保持しない）
//!
//! メールアドレス・携帯番号の一意性は保証しない。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use clinic_domain::{
//!     password::PasswordHash,
//!     user::{Email, MobileNumber, NewUser, User, UserId},
//! };
//!
//! let user = User::new(NewUser {
//!     id:            UserId::new(),
//!     parent_name:   "山田花子".to_string(),
//!     patient_name:  "山田太郎".to_string(),
//!     mobile:        MobileNumber::new("0901234567")?,
//!     email:         Email::new("hanako@example.com")?,
//!     password_hash: PasswordHash::new("$argon2id$v=19$..."),
//!     now:           chrono::Utc::now(),
//! });
//!
//! assert_eq!(user.patient_name(), "山田太郎");
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};

use crate::{DomainError, password::PasswordHash};

define_uuid_id! {
    /// ユーザー ID（UUID v7）
    pub struct UserId;
}

/// メールアドレス（値オブジェクト）
///
/// 書式の詳細な検証はリクエストスキーマで行い、ここでは構造のみを保証する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `@` の前後が空でない
    /// - 最大 255 文字
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        };

        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        }

        if value.len() > 255 {
            return Err(DomainError::Validation(
                "メールアドレスは255文字以内である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 携帯番号（値オブジェクト）
///
/// ASCII 数字ちょうど 10 桁。ハイフンや国番号は受け付けない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobileNumber(String);

impl MobileNumber {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.len() != 10 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::Validation(
                "携帯番号は 10 桁の数字である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ログイン時の照合キー
///
/// 保護者名・患者名・メールアドレスの完全一致で User を特定する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginIdentity {
    pub parent_name:  String,
    pub patient_name: String,
    pub email:        Email,
}

/// User 作成パラメータ
pub struct NewUser {
    pub id:            UserId,
    pub parent_name:   String,
    pub patient_name:  String,
    pub mobile:        MobileNumber,
    pub email:         Email,
    pub password_hash: PasswordHash,
    pub now:           DateTime<Utc>,
}

/// 保護者・患者アカウント（エンティティ）
#[derive(Debug, Clone)]
pub struct User {
    id:            UserId,
    parent_name:   String,
    patient_name:  String,
    mobile:        MobileNumber,
    email:         Email,
    password_hash: PasswordHash,
    created_at:    DateTime<Utc>,
}

impl User {
    /// 新しいアカウントを作成する
    pub fn new(params: NewUser) -> Self {
        Self {
            id:            params.id,
            parent_name:   params.parent_name,
            patient_name:  params.patient_name,
            mobile:        params.mobile,
            email:         params.email,
            password_hash: params.password_hash,
            created_at:    params.now,
        }
    }

    /// データベースから復元する
    #[allow(clippy::too_many_arguments)]
    pub fn from_db(
        id: UserId,
        parent_name: String,
        patient_name: String,
        mobile: MobileNumber,
        email: Email,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            parent_name,
            patient_name,
            mobile,
            email,
            password_hash,
            created_at,
        }
    }

    /// 照合キーに完全一致するかどうか
    pub fn matches_identity(&self, identity: &LoginIdentity) -> bool {
        self.parent_name == identity.parent_name
            && self.patient_name == identity.patient_name
            && self.email == identity.email
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn parent_name(&self) -> &str {
        &self.parent_name
    }

    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    pub fn mobile(&self) -> &MobileNumber {
        &self.mobile
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
