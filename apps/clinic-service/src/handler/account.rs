//! # アカウントハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /createuser` - アカウント作成
//! - `POST /loginuser` - 保護者・患者ログイン
//! - `POST /logindoctor` - 医師ログイン
//! - `GET /users` - アカウント一覧

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use clinic_domain::{
    password::PlainPassword,
    session::AuthToken,
    user::{Email, LoginIdentity, MobileNumber, User},
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
    error::{ApiError, FailureStyle, ServiceError},
    usecase::{AccountUseCase, CreateUserInput, LoginDoctorInput, LoginUserInput},
    validation::{
        MOBILE_PATTERN,
        ValidatedJson,
        lenient_optional_string,
        lenient_string,
        struct_level_error,
    },
};

/// アカウントハンドラの共有状態
pub struct AccountState {
    pub usecase: Arc<dyn AccountUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// アカウント作成リクエスト
///
/// 欠落した項目は空文字として扱い、検証エラーとして報告する。
#[derive(Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "check_password_confirmation", skip_on_field_errors = false))]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Parent name must be at least 1 character long"))]
    #[serde(deserialize_with = "lenient_string")]
    pub parent_name:      String,
    #[validate(length(min = 1, message = "Patient name must be at least 1 character long"))]
    #[serde(deserialize_with = "lenient_string")]
    pub patient_name:     String,
    #[validate(length(min = 5, message = "Password must be at least 5 characters long"))]
    #[serde(deserialize_with = "lenient_string")]
    pub password:         String,
    #[serde(deserialize_with = "lenient_optional_string")]
    pub confirm_password: Option<String>,
    #[validate(regex(path = *MOBILE_PATTERN, message = "Mobile number must be exactly 10 digits"))]
    #[serde(deserialize_with = "lenient_string")]
    pub mobile:           String,
    #[validate(email(message = "Enter a valid email address"))]
    #[serde(deserialize_with = "lenient_string")]
    pub email:            String,
}

/// 確認用パスワードは送信された場合のみ照合する
fn check_password_confirmation(req: &CreateUserRequest) -> Result<(), ValidationError> {
    match req.confirm_password.as_deref() {
        Some(confirm) if !confirm.is_empty() && confirm != req.password => Err(
            struct_level_error("confirmPassword", "Password confirmation does not match password"),
        ),
        _ => Ok(()),
    }
}

impl CreateUserRequest {
    fn into_input(self) -> Result<CreateUserInput, ServiceError> {
        Ok(CreateUserInput {
            parent_name:  self.parent_name,
            patient_name: self.patient_name,
            mobile:       MobileNumber::new(self.mobile)
                .map_err(|e| ServiceError::field("mobile", e.to_string()))?,
            email:        parse_email(self.email)?,
            password:     PlainPassword::new(self.password),
        })
    }
}

/// 保護者・患者ログインリクエスト
#[derive(Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginUserRequest {
    #[validate(length(min = 1, message = "Parent name must be at least 1 character long"))]
    #[serde(deserialize_with = "lenient_string")]
    pub parent_name:  String,
    #[validate(length(min = 1, message = "Patient name must be at least 1 character long"))]
    #[serde(deserialize_with = "lenient_string")]
    pub patient_name: String,
    #[validate(email(message = "Enter a valid email address"))]
    #[serde(deserialize_with = "lenient_string")]
    pub email:        String,
    #[validate(length(min = 5, message = "Password must be at least 5 characters long"))]
    #[serde(deserialize_with = "lenient_string")]
    pub password:     String,
}

impl LoginUserRequest {
    fn into_input(self) -> Result<LoginUserInput, ServiceError> {
        Ok(LoginUserInput {
            identity: LoginIdentity {
                parent_name:  self.parent_name,
                patient_name: self.patient_name,
                email:        parse_email(self.email)?,
            },
            password: PlainPassword::new(self.password),
        })
    }
}

/// 医師ログインリクエスト
#[derive(Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginDoctorRequest {
    #[validate(length(min = 1, message = "Name must be at least 1 character long"))]
    #[serde(deserialize_with = "lenient_string")]
    pub name:     String,
    #[validate(email(message = "Enter a valid email address"))]
    #[serde(deserialize_with = "lenient_string")]
    pub email:    String,
    #[validate(length(min = 5, message = "Password must be at least 5 characters long"))]
    #[serde(deserialize_with = "lenient_string")]
    pub password: String,
}

impl From<LoginDoctorRequest> for LoginDoctorInput {
    fn from(req: LoginDoctorRequest) -> Self {
        Self {
            name:     req.name,
            email:    req.email,
            password: PlainPassword::new(req.password),
        }
    }
}

fn parse_email(value: String) -> Result<Email, ServiceError> {
    Email::new(value).map_err(|e| ServiceError::field("email", e.to_string()))
}

/// トークン発行レスポンス
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenResponse {
    pub success:    bool,
    pub auth_token: String,
}

impl From<AuthToken> for AuthTokenResponse {
    fn from(token: AuthToken) -> Self {
        Self {
            success:    true,
            auth_token: token.into_string(),
        }
    }
}

/// アカウント一覧の要素（パスワードハッシュは含めない）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id:           String,
    pub parent_name:  String,
    pub patient_name: String,
    pub mobile:       String,
    pub email:        String,
    pub created_at:   DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id:           user.id().to_string(),
            parent_name:  user.parent_name().to_string(),
            patient_name: user.patient_name().to_string(),
            mobile:       user.mobile().as_str().to_string(),
            email:        user.email().as_str().to_string(),
            created_at:   user.created_at(),
        }
    }
}

// --- ハンドラ ---

/// POST /createuser
pub async fn create_user(
    State(state): State<Arc<AccountState>>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<Json<AuthTokenResponse>, ApiError> {
    let input = req
        .into_input()
        .map_err(|e| e.with_style(FailureStyle::Account))?;
    let token = state
        .usecase
        .create_user(input)
        .await
        .map_err(|e| e.with_style(FailureStyle::Account))?;

    Ok(Json(token.into()))
}

/// POST /loginuser
///
/// アカウントなし・パスワード不一致はどちらも
/// `400 {errors:"Invalid login credentials"}` を返す。
pub async fn login_user(
    State(state): State<Arc<AccountState>>,
    ValidatedJson(req): ValidatedJson<LoginUserRequest>,
) -> Result<Json<AuthTokenResponse>, ApiError> {
    let input = req
        .into_input()
        .map_err(|e| e.with_style(FailureStyle::Account))?;
    let token = state
        .usecase
        .login_user(input)
        .await
        .map_err(|e| e.with_style(FailureStyle::Account))?;

    Ok(Json(token.into()))
}

/// POST /logindoctor
pub async fn login_doctor(
    State(state): State<Arc<AccountState>>,
    ValidatedJson(req): ValidatedJson<LoginDoctorRequest>,
) -> Result<Json<AuthTokenResponse>, ApiError> {
    let token = state
        .usecase
        .login_doctor(req.into())
        .await
        .map_err(|e| e.with_style(FailureStyle::DoctorLogin))?;

    Ok(Json(token.into()))
}

/// GET /users
pub async fn list_users(
    State(state): State<Arc<AccountState>>,
) -> Result<Json<Vec<UserData>>, ApiError> {
    let users = state
        .usecase
        .list_users()
        .await
        .map_err(|e| e.with_style(FailureStyle::Listing))?;

    Ok(Json(users.iter().map(UserData::from).collect()))
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode},
        routing::{get, post},
    };
    use clinic_domain::{
        doctor::DoctorRoster,
        password::PasswordHash,
        user::{NewUser, UserId},
    };
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    // テスト用スタブ
    #[derive(Default)]
    struct StubAccountUseCase {
        login_fails: bool,
        broken:      bool,
        calls:       AtomicUsize,
    }

    impl StubAccountUseCase {
        fn success() -> Self {
            Self::default()
        }

        fn login_fails() -> Self {
            Self {
                login_fails: true,
                ..Self::default()
            }
        }

        fn broken() -> Self {
            Self {
                broken: true,
                ..Self::default()
            }
        }

        fn respond(&self) -> Result<AuthToken, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(ServiceError::Internal("connection refused".to_string()));
            }
            if self.login_fails {
                return Err(ServiceError::InvalidCredentials);
            }
            Ok(AuthToken::new("header.payload.signature"))
        }
    }

    #[async_trait]
    impl AccountUseCase for StubAccountUseCase {
        async fn create_user(&self, _input: CreateUserInput) -> Result<AuthToken, ServiceError> {
            self.respond()
        }

        async fn login_user(&self, _input: LoginUserInput) -> Result<AuthToken, ServiceError> {
            self.respond()
        }

        async fn login_doctor(
            &self,
            _input: LoginDoctorInput,
        ) -> Result<AuthToken, ServiceError> {
            self.respond()
        }

        async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
            if self.broken {
                return Err(ServiceError::Internal("connection refused".to_string()));
            }
            Ok(vec![User::new(NewUser {
                id:            UserId::new(),
                parent_name:   "山田花子".to_string(),
                patient_name:  "山田太郎".to_string(),
                mobile:        MobileNumber::new("0901234567").unwrap(),
                email:         Email::new("hanako@example.com").unwrap(),
                password_hash: PasswordHash::new("$argon2id$secret"),
                now:           DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            })])
        }

        fn roster(&self) -> Result<Arc<DoctorRoster>, ServiceError> {
            Err(ServiceError::RosterNotLoaded)
        }
    }

    fn create_test_app(usecase: Arc<StubAccountUseCase>) -> Router {
        let state = Arc::new(AccountState { usecase });

        Router::new()
            .route("/createuser", post(create_user))
            .route("/loginuser", post(login_user))
            .route("/logindoctor", post(login_doctor))
            .route("/users", get(list_users))
            .with_state(state)
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn valid_create_body() -> Value {
        json!({
            "parentName": "山田花子",
            "patientName": "山田太郎",
            "password": "secret1",
            "confirmPassword": "secret1",
            "mobile": "0901234567",
            "email": "hanako@example.com"
        })
    }

    #[tokio::test]
    async fn test_create_user_成功() {
        // Given
        let sut = create_test_app(Arc::new(StubAccountUseCase::success()));

        // When
        let response = sut
            .oneshot(post_json("/createuser", &valid_create_body()))
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({ "success": true, "authToken": "header.payload.signature" })
        );
    }

    #[tokio::test]
    async fn test_create_user_検証エラーはユースケースを呼ばない() {
        // Given
        let usecase = Arc::new(StubAccountUseCase::success());
        let sut = create_test_app(usecase.clone());
        let mut body = valid_create_body();
        body["password"] = json!("abc");
        body["confirmPassword"] = json!("abd");
        body["mobile"] = json!("12345");

        // When
        let response = sut.oneshot(post_json("/createuser", &body)).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            json!({ "errors": [
                { "path": "confirmPassword", "msg": "Password confirmation does not match password" },
                { "path": "mobile", "msg": "Mobile number must be exactly 10 digits" },
                { "path": "password", "msg": "Password must be at least 5 characters long" },
            ]})
        );
        assert_eq!(usecase.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_user_欠落した項目は検証エラーとして報告される() {
        let sut = create_test_app(Arc::new(StubAccountUseCase::success()));

        let response = sut
            .oneshot(post_json("/createuser", &json!({ "password": "secret1" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        let paths: Vec<&str> = json["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["path"].as_str().unwrap())
            .collect();
        assert_eq!(paths, vec!["email", "mobile", "parentName", "patientName"]);
    }

    #[tokio::test]
    async fn test_create_user_確認用パスワードが空なら照合しない() {
        let sut = create_test_app(Arc::new(StubAccountUseCase::success()));
        let mut body = valid_create_body();
        body["confirmPassword"] = json!("");

        let response = sut.oneshot(post_json("/createuser", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_user_内部エラーはsuccess_false() {
        let sut = create_test_app(Arc::new(StubAccountUseCase::broken()));

        let response = sut
            .oneshot(post_json("/createuser", &valid_create_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_json(response).await, json!({ "success": false }));
    }

    #[tokio::test]
    async fn test_create_user_jsonでないボディは400() {
        let sut = create_test_app(Arc::new(StubAccountUseCase::success()));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/createuser")
            .header("content-type", "application/json")
            .body(Body::from("not json"))
            .unwrap();

        let response = sut.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["errors"][0]["path"], "body");
    }

    #[tokio::test]
    async fn test_login_user_認証失敗() {
        // Given
        let sut = create_test_app(Arc::new(StubAccountUseCase::login_fails()));
        let body = json!({
            "parentName": "山田花子",
            "patientName": "山田太郎",
            "email": "hanako@example.com",
            "password": "wrong-password"
        });

        // When
        let response = sut.oneshot(post_json("/loginuser", &body)).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            json!({ "errors": "Invalid login credentials" })
        );
    }

    #[tokio::test]
    async fn test_login_user_短いパスワードは検証エラー() {
        let usecase = Arc::new(StubAccountUseCase::success());
        let sut = create_test_app(usecase.clone());
        let body = json!({
            "parentName": "山田花子",
            "patientName": "山田太郎",
            "email": "hanako@example.com",
            "password": "1234"
        });

        let response = sut.oneshot(post_json("/loginuser", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            json!({ "errors": [
                { "path": "password", "msg": "Password must be at least 5 characters long" }
            ]})
        );
        assert_eq!(usecase.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_login_doctor_内部エラーはserver_error() {
        let sut = create_test_app(Arc::new(StubAccountUseCase::broken()));
        let body = json!({
            "name": "佐藤一郎",
            "email": "sato@clinic.example.com",
            "password": "doctor1"
        });

        let response = sut.oneshot(post_json("/logindoctor", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            read_json(response).await,
            json!({ "success": false, "error": "Server error" })
        );
    }

    #[tokio::test]
    async fn test_login_doctor_名前が空なら検証エラー() {
        let sut = create_test_app(Arc::new(StubAccountUseCase::success()));
        let body = json!({
            "name": "",
            "email": "sato@clinic.example.com",
            "password": "doctor1"
        });

        let response = sut.oneshot(post_json("/logindoctor", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            read_json(response).await,
            json!({ "errors": [
                { "path": "name", "msg": "Name must be at least 1 character long" }
            ]})
        );
    }

    #[tokio::test]
    async fn test_list_users_パスワードハッシュを含まない() {
        let sut = create_test_app(Arc::new(StubAccountUseCase::success()));
        let request = Request::builder()
            .uri("/users")
            .body(Body::empty())
            .unwrap();

        let response = sut.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json[0]["parentName"], "山田花子");
        assert_eq!(json[0]["mobile"], "0901234567");
        assert!(json[0].get("passwordHash").is_none());
        assert!(!json.to_string().contains("$argon2id$"));
    }

    #[tokio::test]
    async fn test_list_users_失敗はerrorメッセージ() {
        let sut = create_test_app(Arc::new(StubAccountUseCase::broken()));
        let request = Request::builder()
            .uri("/users")
            .body(Body::empty())
            .unwrap();

        let response = sut.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            read_json(response).await,
            json!({ "error": "connection refused" })
        );
    }
}
