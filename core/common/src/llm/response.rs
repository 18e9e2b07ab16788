//! 型付きレスポンスと分類
//!
//! 外部レスポンスの形はネットワーク境界で 1 回だけ型にパースし、
//! 以後は `classify` がバリアントに落とす。
//! テキストが存在する場合は安全性フィードバックより常に優先する。

use crate::error::Error;
use serde::Deserialize;
use serde_json::Value;

/// `generateContent` のレスポンス（参照するフィールドのみ）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateResponse {
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
    pub safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Part {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafetyRating {
    pub category: Option<String>,
    pub probability: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
    pub safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageMetadata {
    pub total_token_count: Option<u64>,
}

impl GenerateResponse {
    /// 先頭候補のテキスト part を結合して返す。text part が 1 つも無ければ None。
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let texts: Vec<&str> = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }

    /// 使用トークン数（usageMetadata が返された場合のみ）
    pub fn tokens_used(&self) -> Option<u64> {
        self.usage_metadata.as_ref()?.total_token_count
    }
}

/// 生のレスポンス JSON を型にパースする
pub fn parse_response(raw: &Value) -> Result<GenerateResponse, Error> {
    serde_json::from_value(raw.clone())
        .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))
}

/// レスポンスを分類する。
///
/// - 空でないテキストがあればそれを trim して返す（安全性フィードバックの有無は見ない）
/// - テキストが無く安全性シグナルがあれば `SafetyBlocked`（プロンプト側 → 候補の順で列挙、
///   候補は 1 始まりのラベル）
/// - どちらも無ければ `EmptyResponse`
pub fn classify(response: &GenerateResponse) -> Result<String, Error> {
    if let Some(text) = response.text() {
        if !text.is_empty() {
            return Ok(text.trim().to_string());
        }
    }

    let mut safety_details: Vec<String> = Vec::new();

    if let Some(ref feedback) = response.prompt_feedback {
        if let Some(ref reason) = feedback.block_reason {
            if reason.to_uppercase().contains("SAFETY") {
                for rating in &feedback.safety_ratings {
                    safety_details.push(format!(
                        "Prompt blocked: {} ({})",
                        rating.category.as_deref().unwrap_or("Unknown category"),
                        rating
                            .probability
                            .as_deref()
                            .unwrap_or("unknown probability"),
                    ));
                }
            }
        }
    }

    for (index, candidate) in response.candidates.iter().enumerate() {
        let blocked = candidate
            .finish_reason
            .as_deref()
            .map(|r| r.to_uppercase().contains("SAFETY"))
            .unwrap_or(false);
        if !blocked {
            continue;
        }
        if candidate.safety_ratings.is_empty() {
            safety_details.push(format!(
                "Candidate {} blocked for safety (no ratings provided).",
                index + 1
            ));
        } else {
            for rating in &candidate.safety_ratings {
                safety_details.push(format!(
                    "Candidate {} blocked: {} ({})",
                    index + 1,
                    rating.category.as_deref().unwrap_or("Unknown category"),
                    rating
                        .probability
                        .as_deref()
                        .unwrap_or("unknown probability"),
                ));
            }
        }
    }

    if safety_details.is_empty() {
        Err(Error::EmptyResponse)
    } else {
        Err(Error::SafetyBlocked(safety_details.join("\n")))
    }
}
