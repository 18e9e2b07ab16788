//! Gemini API クライアント（reqwest blocking）
//!
//! 認証は環境変数の API キーのみ。GEMINI_API_KEY を優先し、
//! 無ければ GOOGLE_API_KEY を使う。

use crate::error::Error;
use crate::llm::transport::{LlmTransport, ModelInfo};
use serde_json::Value;
use std::env;
use std::io::{BufRead, BufReader};

/// API のベース URL
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// 優先して読む API キーの環境変数名
pub const PRIMARY_KEY_ENV: &str = "GEMINI_API_KEY";
/// フォールバックの環境変数名
pub const FALLBACK_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Gemini API クライアント
pub struct GeminiClient {
    api_key: String,
    http: reqwest::blocking::Client,
}

/// 環境変数から API キーを読んでクライアントを構築する。
/// どちらのキーも無ければ `MissingCredential`、構築失敗は `Init`。
/// 構築の失敗は transient ではないのでリトライしない。
pub fn build_client() -> Result<GeminiClient, Error> {
    let api_key = resolve_api_key(
        env::var(PRIMARY_KEY_ENV).ok(),
        env::var(FALLBACK_KEY_ENV).ok(),
    )
    .ok_or(Error::MissingCredential)?;
    GeminiClient::new(api_key)
}

/// 2 つの候補から API キーを選ぶ。先に指定された方（GEMINI_API_KEY）が優先。
fn resolve_api_key(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary
        .filter(|k| !k.is_empty())
        .or_else(|| fallback.filter(|k| !k.is_empty()))
}

impl GeminiClient {
    /// API キーを指定してクライアントを構築する
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        let http = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| Error::init(e.to_string()))?;
        Ok(Self {
            api_key: api_key.into(),
            http,
        })
    }

    /// POST して本文を返す。非 2xx はエラーメッセージを抽出して `Http` にする。
    fn post(&self, url: &str, payload: &Value) -> Result<String, Error> {
        let response = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::http(format!(
                "Gemini API error: {}",
                api_error_message(status.as_u16(), &body)
            )));
        }
        Ok(body)
    }

    /// `streamGenerateContent` を呼び、テキスト断片ごとにコールバックを呼ぶ。
    pub fn stream_generate(
        &self,
        model: &str,
        payload: &Value,
        callback: &mut dyn FnMut(&str) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let url = format!(
            "{}/models/{}:streamGenerateContent?key={}",
            API_BASE_URL, model, self.api_key
        );
        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;
            return Err(Error::http(format!(
                "Gemini API error: {}",
                api_error_message(status.as_u16(), &body)
            )));
        }

        // レスポンスは JSON 配列形式: [ {JSON1} , {JSON2} , ... ]
        // ブレースカウントで完全なオブジェクトを切り出して 1 つずつ処理する。
        let reader = BufReader::new(response);
        let mut json_buffer = String::new();
        let mut brace_count = 0;
        let mut in_object = false;

        for line_result in reader.lines() {
            let line =
                line_result.map_err(|e| Error::http(format!("Failed to read stream line: {}", e)))?;
            for c in line.chars() {
                match c {
                    '{' => {
                        if !in_object {
                            in_object = true;
                            json_buffer.clear();
                        }
                        brace_count += 1;
                        json_buffer.push(c);
                    }
                    '}' => {
                        if in_object {
                            brace_count -= 1;
                            json_buffer.push(c);
                            if brace_count == 0 {
                                handle_json_chunk(&json_buffer, callback)?;
                                json_buffer.clear();
                                in_object = false;
                            }
                        }
                    }
                    _ => {
                        if in_object {
                            json_buffer.push(c);
                        }
                    }
                }
            }
            if in_object {
                json_buffer.push('\n');
            }
        }
        Ok(())
    }

    /// 利用可能なモデルの一覧を取得する
    pub fn list_models(&self) -> Result<Vec<ModelInfo>, Error> {
        let url = format!("{}/models?key={}", API_BASE_URL, self.api_key);
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;
        if !status.is_success() {
            return Err(Error::http(format!(
                "Gemini API error: {}",
                api_error_message(status.as_u16(), &body)
            )));
        }

        let v: Value = serde_json::from_str(&body)
            .map_err(|e| Error::json(format!("Failed to parse models response: {}", e)))?;
        let models = v["models"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|m| serde_json::from_value::<ModelInfo>(m.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();
        Ok(models)
    }
}

impl LlmTransport for GeminiClient {
    fn generate(&self, model: &str, payload: &Value) -> Result<Value, Error> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            API_BASE_URL, model, self.api_key
        );
        let body = self.post(&url, payload)?;
        serde_json::from_str(&body)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))
    }
}

/// エラーレスポンスの本文から `error.message` を抽出する。
/// JSON でない場合はステータスと本文をそのまま返す。
fn api_error_message(status: u16, body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = v["error"]["message"].as_str() {
            return msg.to_string();
        }
    }
    format!("HTTP {}: {}", status, body)
}

/// ストリームの JSON チャンク 1 つからテキストを取り出してコールバックに渡す。
/// パースできないチャンクは無視する（不完全な JSON の可能性）。
fn handle_json_chunk(
    json_str: &str,
    callback: &mut dyn FnMut(&str) -> Result<(), Error>,
) -> Result<(), Error> {
    let v: Value = match serde_json::from_str(json_str) {
        Ok(v) => v,
        Err(_) => return Ok(()),
    };
    if let Some(parts) = v["candidates"][0]["content"]["parts"].as_array() {
        for part in parts {
            if let Some(text) = part["text"].as_str() {
                if !text.is_empty() {
                    callback(text)?;
                }
            }
        }
    }
    Ok(())
}
