//! assistant 共通ライブラリ
//!
//! `assistant` コマンドの中核部分（エラー分類・リトライ付き API 呼び出し・
//! 設定・会話履歴・構造化ログ）を提供します。

/// エラーハンドリング
pub mod error;

/// 設定ファイルの読み込みと保存
pub mod config;

/// 会話履歴（JSONL）の追記・読み込み・エクスポート
pub mod history;

/// LLM トランスポートとレスポンス分類
pub mod llm;

/// 構造化ログ（JSONL）
pub mod log;

/// ホームディレクトリ解決とチルダ展開
pub mod paths;
