//! # アプリケーション構築
//!
//! ルーター構築とミドルウェアの適用を担当する。
//! `main.rs` はインフラ初期化（設定・DB・名簿）とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use clinic_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{
        AccountState,
        PatientState,
        create_patient,
        create_user,
        get_doctor_data,
        health_check,
        list_doctors,
        list_patients,
        list_users,
        login_doctor,
        login_user,
        post_doctor_data,
    },
    usecase::{AccountUseCase, PatientUseCase},
};

/// API ルーターを構築する
///
/// `/health/ready` はデータベース接続を必要とするため含めない（`main.rs` で merge する）。
pub fn build_router(
    account_usecase: Arc<dyn AccountUseCase>,
    patient_usecase: Arc<dyn PatientUseCase>,
) -> Router {
    let account_state = Arc::new(AccountState {
        usecase: account_usecase,
    });
    let patient_state = Arc::new(PatientState {
        usecase: patient_usecase,
    });

    Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/createuser", post(create_user))
                .route("/loginuser", post(login_user))
                .route("/logindoctor", post(login_doctor))
                .route("/users", get(list_users))
                .route("/doctors", get(list_doctors))
                .route("/doctordata", get(get_doctor_data).post(post_doctor_data))
                .with_state(account_state),
        )
        .merge(
            Router::new()
                .route("/patients", post(create_patient).get(list_patients))
                .with_state(patient_state),
        )
}

/// 共通ミドルウェアを適用する（下に書いたものが外側）
///
/// 1. `CorsLayer`（最外）: ブラウザのフロントエンドは別オリジンから呼び出す
/// 2. `SetRequestIdLayer`: UUID v7 の `X-Request-Id` を付与（クライアント提供値を優先）
/// 3. `TraceLayer`: request_id を含むスパンを作成
/// 4. `PropagateRequestIdLayer`: レスポンスヘッダーに `X-Request-Id` をコピー
/// 5. `CanonicalLogLineLayer`: リクエスト完了サマリを出力
pub fn with_middleware(router: Router) -> Router {
    router
        .layer(CanonicalLogLineLayer)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(CorsLayer::permissive())
}
