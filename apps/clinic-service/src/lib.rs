//! # クリニックサービス
//!
//! 保護者・患者アカウント、医師ログイン、患者レコードを扱う HTTP サービス。
//!
//! ## モジュール構成
//!
//! - `app_builder`: ルーター構築とミドルウェア
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラー型とエンドポイントごとのレスポンス変換
//! - `handler`: HTTP ハンドラ
//! - `usecase`: ビジネスロジック
//! - `validation`: リクエストボディの宣言的検証

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
pub mod validation;
