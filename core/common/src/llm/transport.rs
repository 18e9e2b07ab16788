//! トランスポートのトレイト定義
//!
//! リトライと分類をネットワークから切り離すための継ぎ目。
//! テストではモック実装を使う。

use crate::error::Error;
use serde::Deserialize;
use serde_json::Value;

/// 生成エンドポイントへの 1 回の呼び出し
pub trait LlmTransport {
    /// `generateContent` を 1 回呼び、生のレスポンス JSON を返す。
    /// ネットワーク/API の失敗は `Error::Http`（transient）として返す。
    fn generate(&self, model: &str, payload: &Value) -> Result<Value, Error>;
}

/// `models` エンドポイントが返す 1 モデル分の情報
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
}

impl Default for ModelInfo {
    fn default() -> Self {
        Self {
            name: "Unknown".to_string(),
            display_name: String::new(),
            description: "No description available".to_string(),
        }
    }
}

impl ModelInfo {
    /// 表示名（displayName が無い場合は name を使う）
    pub fn display_name_or_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_info_parses_camel_case() {
        let info: ModelInfo = serde_json::from_str(
            r#"{"name": "models/gemini-2.5-flash", "displayName": "Gemini 2.5 Flash", "description": "Fast model"}"#,
        )
        .unwrap();
        assert_eq!(info.name, "models/gemini-2.5-flash");
        assert_eq!(info.display_name_or_name(), "Gemini 2.5 Flash");
    }

    #[test]
    fn test_model_info_defaults_when_fields_missing() {
        let info: ModelInfo = serde_json::from_str(r#"{"name": "models/x"}"#).unwrap();
        assert_eq!(info.display_name_or_name(), "models/x");
        assert_eq!(info.description, "No description available");
    }
}
