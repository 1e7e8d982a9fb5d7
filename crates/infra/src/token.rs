//! # セッショントークン発行
//!
//! HS256 署名の JWT を発行・検証する。
//!
//! ## ペイロード
//!
//! ```json
//! { "user": { "id": "0190..." }, "iat": 1700000000 }
//! { "doctor": { "id": "d-001" }, "iat": 1700000000 }
//! ```
//!
//! `exp` クレームは付与しない（トークンに有効期限の概念はない）。

use std::collections::HashSet;

use chrono::Utc;
use clinic_domain::{
    doctor::DoctorId,
    session::{AccountKind, AuthToken, SessionSubject},
    user::UserId,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::InfraError;

/// トークン発行を担当するトレイト
pub trait TokenIssuer: Send + Sync {
    /// 主体を埋め込んだ署名済みトークンを発行する
    fn issue(&self, subject: &SessionSubject) -> Result<AuthToken, InfraError>;

    /// トークンの署名を検証し、主体を取り出す
    fn verify(&self, token: &AuthToken) -> Result<SessionSubject, InfraError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct SubjectClaim {
    id: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user:   Option<SubjectClaim>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    doctor: Option<SubjectClaim>,
    iat:    i64,
}

impl Claims {
    fn new(subject: &SessionSubject, iat: i64) -> Self {
        let claim = Some(SubjectClaim {
            id: subject.id_string(),
        });
        match subject.kind() {
            AccountKind::User => Self {
                user: claim,
                doctor: None,
                iat,
            },
            AccountKind::Doctor => Self {
                user: None,
                doctor: claim,
                iat,
            },
        }
    }

    fn into_subject(self) -> Result<SessionSubject, InfraError> {
        match (self.user, self.doctor) {
            (Some(user), None) => {
                let uuid = user
                    .id
                    .parse()
                    .map_err(|e| InfraError::unexpected(format!("不正なユーザー ID: {e}")))?;
                Ok(SessionSubject::User(UserId::from_uuid(uuid)))
            }
            (None, Some(doctor)) => Ok(SessionSubject::Doctor(DoctorId::new(doctor.id))),
            _ => Err(InfraError::unexpected(
                "トークンの主体は user と doctor のどちらか一方である必要があります",
            )),
        }
    }
}

/// HS256 による JWT 実装
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation:   Validation,
}

impl JwtTokenIssuer {
    /// 署名鍵（共有シークレット）からインスタンスを作成する
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, subject: &SessionSubject) -> Result<AuthToken, InfraError> {
        let claims = Claims::new(subject, Utc::now().timestamp());
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(AuthToken::new(token))
    }

    fn verify(&self, token: &AuthToken) -> Result<SessionSubject, InfraError> {
        let data = decode::<Claims>(token.as_str(), &self.decoding_key, &self.validation)?;
        data.claims.into_subject()
    }
}
