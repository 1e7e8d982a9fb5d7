//! UserRepository 統合テスト
//!
//! データベースを使用したテスト。sqlx::test マクロがテストごとに
//! データベースを作成し、マイグレーションを適用する。
//!
//! 実行方法:
//! ```bash
//! DATABASE_URL=postgres://... cargo test -p clinic-infra --test user_repository_test -- --ignored
//! ```

use chrono::{DateTime, Utc};
use clinic_domain::{
    password::PasswordHash,
    user::{Email, LoginIdentity, MobileNumber, NewUser, User, UserId},
};
use clinic_infra::repository::{PostgresUserRepository, UserRepository};
use pretty_assertions::assert_eq;
use sqlx::PgPool;

fn test_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn new_user(parent_name: &str, patient_name: &str, email: &str) -> User {
    User::new(NewUser {
        id:            UserId::new(),
        parent_name:   parent_name.to_string(),
        patient_name:  patient_name.to_string(),
        mobile:        MobileNumber::new("0901234567").unwrap(),
        email:         Email::new(email).unwrap(),
        password_hash: PasswordHash::new("$argon2id$v=19$m=65536,t=1,p=1$dGVzdA$dGVzdA"),
        now:           test_now(),
    })
}

fn identity(parent_name: &str, patient_name: &str, email: &str) -> LoginIdentity {
    LoginIdentity {
        parent_name:  parent_name.to_string(),
        patient_name: patient_name.to_string(),
        email:        Email::new(email).unwrap(),
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "PostgreSQL が必要"]
async fn test_作成したユーザーを照合キーで取得できる(pool: PgPool) {
    let sut = PostgresUserRepository::new(pool);
    let user = new_user("山田花子", "山田太郎", "hanako@example.com");
    sut.insert(&user).await.unwrap();

    let found = sut
        .find_by_login_identity(&identity("山田花子", "山田太郎", "hanako@example.com"))
        .await
        .unwrap()
        .expect("ユーザーが見つかること");

    assert_eq!(found.id(), user.id());
    assert_eq!(found.mobile().as_str(), "0901234567");
    assert_eq!(found.password_hash(), user.password_hash());
    assert_eq!(found.created_at(), test_now());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "PostgreSQL が必要"]
async fn test_照合キーの一部が異なる場合は見つからない(pool: PgPool) {
    let sut = PostgresUserRepository::new(pool);
    sut.insert(&new_user("山田花子", "山田太郎", "hanako@example.com"))
        .await
        .unwrap();

    let found = sut
        .find_by_login_identity(&identity("山田花子", "山田次郎", "hanako@example.com"))
        .await
        .unwrap();

    assert!(found.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "PostgreSQL が必要"]
async fn test_同じメールアドレスで複数作成できる(pool: PgPool) {
    let sut = PostgresUserRepository::new(pool);
    sut.insert(&new_user("山田花子", "山田太郎", "family@example.com"))
        .await
        .unwrap();
    sut.insert(&new_user("山田花子", "山田次郎", "family@example.com"))
        .await
        .unwrap();

    let users = sut.find_all().await.unwrap();

    assert_eq!(users.len(), 2);
}
