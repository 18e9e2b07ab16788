//! 生成リクエストとペイロード生成

use serde_json::{json, Value};

/// `generateContent` への 1 回分のリクエスト
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// システム指示（未指定なら systemInstruction を送らない）
    pub system_instruction: Option<String>,
    /// 温度の上書き（未指定なら generationConfig に含めない）
    pub temperature: Option<f64>,
    /// 応答の最大トークン数
    pub max_output_tokens: Option<u32>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system_instruction: None,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Gemini API のリクエスト JSON を生成する
    pub fn payload(&self) -> Value {
        let mut payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": self.prompt}]
            }]
        });

        if let Some(ref system) = self.system_instruction {
            payload["systemInstruction"] = json!({
                "parts": [{"text": system}]
            });
        }

        let mut generation_config = serde_json::Map::new();
        if let Some(t) = self.temperature {
            generation_config.insert("temperature".to_string(), json!(t));
        }
        if let Some(m) = self.max_output_tokens {
            generation_config.insert("maxOutputTokens".to_string(), json!(m));
        }
        if !generation_config.is_empty() {
            payload["generationConfig"] = Value::Object(generation_config);
        }

        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_simple() {
        let req = GenerateRequest::new("gemini-2.5-flash", "Hello");
        let payload = req.payload();
        assert_eq!(
            payload["contents"][0]["parts"][0]["text"].as_str().unwrap(),
            "Hello"
        );
        assert!(payload.get("systemInstruction").is_none());
        assert!(payload.get("generationConfig").is_none());
    }

    #[test]
    fn test_payload_with_system_instruction() {
        let mut req = GenerateRequest::new("gemini-2.5-flash", "Hello");
        req.system_instruction = Some("You are a helpful assistant".to_string());
        let payload = req.payload();
        assert_eq!(
            payload["systemInstruction"]["parts"][0]["text"]
                .as_str()
                .unwrap(),
            "You are a helpful assistant"
        );
    }

    #[test]
    fn test_payload_with_generation_config() {
        let mut req = GenerateRequest::new("gemini-2.5-flash", "Hello");
        req.temperature = Some(0.1);
        req.max_output_tokens = Some(2048);
        let payload = req.payload();
        assert_eq!(payload["generationConfig"]["temperature"].as_f64().unwrap(), 0.1);
        assert_eq!(
            payload["generationConfig"]["maxOutputTokens"].as_u64().unwrap(),
            2048
        );
    }
}
