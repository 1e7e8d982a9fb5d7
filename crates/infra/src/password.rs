//! # パスワードハッシュ
//!
//! Argon2id によるパスワードのハッシュ化と検証を提供する。
//! ハッシュはレコードごとにランダムなソルトを生成し、PHC 文字列として保持する。

use argon2::{
    Argon2,
    Params,
    PasswordHasher as _,
    PasswordVerifier as _,
    password_hash::{PasswordHash as Argon2PasswordHash, SaltString, rand_core::OsRng},
};
use clinic_domain::password::{PasswordHash, PasswordVerifyResult, PlainPassword};

use crate::InfraError;

/// 存在しないアカウントへのログイン時に検証するダミーハッシュ（有効な Argon2id 形式）
const DUMMY_HASH: &str = "$argon2id$v=19$m=65536,t=1,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// パスワードのハッシュ化と検証を担当するトレイト
pub trait PasswordChecker: Send + Sync {
    /// ランダムなソルトでパスワードをハッシュ化する
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError>;

    /// パスワードを検証する
    ///
    /// # Errors
    ///
    /// - 不正なハッシュ形式の場合
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError>;

    /// ダミーハッシュで検証を実行する
    ///
    /// アカウントが見つからない場合も実際の検証と同等の時間を消費させる。
    fn verify_dummy(&self, password: &PlainPassword) {
        let _ = self.verify(password, &PasswordHash::new(DUMMY_HASH));
    }
}

/// Argon2id 実装
///
/// OWASP 推奨パラメータ（RFC 9106）を使用:
/// - Memory: 64 MB
/// - Iterations: 1
/// - Parallelism: 1
pub struct Argon2PasswordChecker {
    argon2: Argon2<'static>,
}

impl Argon2PasswordChecker {
    pub fn new() -> Self {
        Self::with_params(
            Params::new(
                65536, // memory cost (KB)
                1,     // iterations
                1,     // parallelism
                None,  // output length (default: 32)
            )
            .expect("Argon2 パラメータが不正です"),
        )
    }

    /// テスト向けの軽量パラメータ（Memory: 8 MB）
    pub fn lightweight() -> Self {
        Self::with_params(Params::new(8192, 1, 1, None).expect("Argon2 パラメータが不正です"))
    }

    fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordChecker for Argon2PasswordChecker {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|e| InfraError::password_hash(e.to_string()))?;

        Ok(PasswordHash::new(hash.to_string()))
    }

    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError> {
        let parsed = Argon2PasswordHash::new(hash.as_str())
            .map_err(|e| InfraError::password_hash(format!("不正なハッシュ形式: {e}")))?;

        // パラメータはハッシュ文字列側に埋め込まれたものが使われる
        let matched = self
            .argon2
            .verify_password(password.as_str().as_bytes(), &parsed)
            .is_ok();

        Ok(PasswordVerifyResult::from(matched))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_ハッシュ化したパスワードを検証できる() {
        let checker = Argon2PasswordChecker::lightweight();
        let password = PlainPassword::new("secret");

        let hash = checker.hash(&password).unwrap();

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(checker.verify(&password, &hash).unwrap().is_match());
    }

    #[rstest]
    fn test_異なるパスワードは不一致になる() {
        let checker = Argon2PasswordChecker::lightweight();
        let hash = checker.hash(&PlainPassword::new("secret")).unwrap();

        let result = checker
            .verify(&PlainPassword::new("secret2"), &hash)
            .unwrap();

        assert!(result.is_mismatch());
    }

    #[rstest]
    fn test_同じパスワードでもソルトが異なるためハッシュは一致しない() {
        let checker = Argon2PasswordChecker::lightweight();
        let password = PlainPassword::new("secret");

        let first = checker.hash(&password).unwrap();
        let second = checker.hash(&password).unwrap();

        assert_ne!(first, second);
    }

    #[rstest]
    fn test_不正なハッシュ形式はエラー() {
        let checker = Argon2PasswordChecker::lightweight();

        let result = checker.verify(
            &PlainPassword::new("secret"),
            &PasswordHash::new("not-a-valid-hash"),
        );

        assert!(result.is_err());
    }

    #[rstest]
    fn test_本番パラメータはハッシュ文字列に埋め込まれる() {
        let checker = Argon2PasswordChecker::new();

        let hash = checker.hash(&PlainPassword::new("secret")).unwrap();

        assert!(hash.as_str().starts_with("$argon2id$v=19$m=65536,t=1,p=1$"));
    }

    #[rstest]
    fn test_軽量パラメータはハッシュ文字列に埋め込まれる() {
        let checker = Argon2PasswordChecker::lightweight();

        let hash = checker.hash(&PlainPassword::new("secret")).unwrap();

        assert!(hash.as_str().starts_with("$argon2id$v=19$m=8192,t=1,p=1$"));
    }

    #[rstest]
    fn test_ダミー検証はパニックしない() {
        let checker = Argon2PasswordChecker::lightweight();
        checker.verify_dummy(&PlainPassword::new("secret"));
    }
}
