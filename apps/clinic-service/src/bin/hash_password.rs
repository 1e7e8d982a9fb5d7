//! # 医師名簿用パスワードハッシュ生成ツール
//!
//! 標準入力から 1 行ずつパスワードを読み、Argon2id の PHC 文字列を出力する。
//! 出力は医師名簿 JSON の `passwordHash` にそのまま使える。
//!
//! ## 使い方
//!
//! ```bash
//! echo 'doctor-password' | cargo run --bin hash-password -p clinic-service
//! ```

use std::io::{self, BufRead as _, Write as _};

use clinic_domain::password::PlainPassword;
use clinic_infra::{Argon2PasswordChecker, PasswordChecker as _};

fn main() -> anyhow::Result<()> {
    let checker = Argon2PasswordChecker::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in io::stdin().lock().lines() {
        let line = line?;
        let password = line.trim_end_matches('\r');
        if password.is_empty() {
            continue;
        }
        let hash = checker.hash(&PlainPassword::new(password))?;
        writeln!(out, "{}", hash.as_str())?;
    }

    Ok(())
}
