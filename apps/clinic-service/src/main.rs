//! # クリニックサービス サーバー
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `CLINIC_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `CLINIC_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `JWT_SECRET` | **Yes** | セッショントークンの署名鍵 |
//! | `DOCTOR_ROSTER_PATH` | No | 医師名簿 JSON のパス（未設定・読み込み失敗時は名簿なしで起動） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! CLINIC_PORT=5000 DATABASE_URL=postgres://... JWT_SECRET=... cargo run -p clinic-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use axum::{Router, routing::get};
use clinic_domain::{
    clock::{Clock, SystemClock},
    doctor::DoctorRoster,
};
use clinic_infra::{
    Argon2PasswordChecker,
    JwtTokenIssuer,
    db,
    repository::{PostgresPatientRepository, PostgresUserRepository},
    roster,
};
use clinic_service::{
    app_builder::{build_router, with_middleware},
    config::ClinicConfig,
    handler::{ReadinessState, readiness_check},
    usecase::{AccountUseCaseImpl, PatientUseCaseImpl, RandomAppointmentNumberGenerator},
};
use clinic_shared::observability::{self, TracingConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("clinic-service");
    observability::init_tracing(&tracing_config);
    let _tracing_guard =
        tracing::info_span!("app", service = %tracing_config.service_name).entered();

    let config = ClinicConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "クリニックサービスを起動します: {}:{}",
        config.host,
        config.port
    );

    let pool = db::create_pool(&config.database_url)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    db::run_migrations(&pool)
        .await
        .context("マイグレーションの実行に失敗しました")?;
    tracing::info!("マイグレーションを適用しました");

    let doctor_roster = load_doctor_roster(&config).await;

    // Readiness Check 用 State（pool が move される前に clone）
    let readiness_state = Arc::new(ReadinessState {
        pool:          pool.clone(),
        roster_loaded: doctor_roster.is_some(),
    });

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let account_usecase = AccountUseCaseImpl::new(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(Argon2PasswordChecker::new()),
        Arc::new(JwtTokenIssuer::new(&config.jwt_secret)),
        doctor_roster,
        clock.clone(),
    );
    let patient_usecase = PatientUseCaseImpl::new(
        Arc::new(PostgresPatientRepository::new(pool)),
        Arc::new(RandomAppointmentNumberGenerator),
        clock,
    );

    let app = with_middleware(
        build_router(Arc::new(account_usecase), Arc::new(patient_usecase)).merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        ),
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("クリニックサービスが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// 医師名簿を読み込む
///
/// 失敗しても起動は続行し、医師関連のエンドポイントはサーバーエラーを返す。
async fn load_doctor_roster(config: &ClinicConfig) -> Option<Arc<DoctorRoster>> {
    let Some(path) = &config.doctor_roster_path else {
        tracing::warn!("DOCTOR_ROSTER_PATH が未設定のため、医師名簿なしで起動します");
        return None;
    };

    match roster::load_roster(path).await {
        Ok(roster) => Some(Arc::new(roster)),
        Err(e) => {
            tracing::warn!(error = %e, "医師名簿を読み込めなかったため、医師名簿なしで起動します");
            None
        }
    }
}
