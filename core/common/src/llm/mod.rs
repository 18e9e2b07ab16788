//! LLM トランスポートとレスポンス分類

/// Gemini API クライアント（reqwest blocking）
pub mod gemini;

/// 生成リクエストとペイロード生成
pub mod request;

/// 型付きレスポンスと分類（テキスト / 安全性ブロック / 空応答）
pub mod response;

/// バックオフ付きリトライ
pub mod retry;

/// トランスポートのトレイト定義
pub mod transport;

pub use gemini::{build_client, GeminiClient};
pub use request::GenerateRequest;
pub use response::{classify, parse_response, GenerateResponse};
pub use retry::generate_with_retry;
pub use transport::{LlmTransport, ModelInfo};
