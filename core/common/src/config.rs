//! 設定ファイルの読み込みと保存
//!
//! `.aiassistant.json` をカレントディレクトリ → ホームディレクトリの順に探す。
//! ファイルが無い・壊れている場合は黙ってデフォルトに戻す（起動を妨げない）。
//! 読み込んだ設定はプロセス内でキャッシュせず、必要な処理に明示的に渡す。

use crate::error::Error;
use crate::paths::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 設定ファイル名（ローカル→ホームの順で探索）
pub const CONFIG_FILE_NAME: &str = ".aiassistant.json";

/// assistant の設定スナップショット
///
/// 1 回の起動につき 1 回だけ読み込み、以後は変更しない
/// （例外は -v フラグによる verbose の上書きのみ）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// 未指定時に使うモデル名
    pub default_model: String,
    /// 温度（0.0〜2.0）
    pub temperature: f64,
    /// 応答の最大トークン数
    pub max_tokens: Option<u32>,
    /// 会話履歴をファイルに記録するか
    pub enable_history: bool,
    /// 履歴ファイルのパス（`~/` はホームに展開）
    pub history_file: String,
    /// デバッグ用の冗長出力
    pub verbose: bool,
    /// デフォルトでストリーミング表示するか
    pub stream_by_default: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            default_model: "gemini-2.5-flash".to_string(),
            temperature: 0.7,
            max_tokens: Some(2048),
            enable_history: true,
            history_file: "~/.ai_assistant_history.jsonl".to_string(),
            verbose: false,
            stream_by_default: false,
        }
    }
}

impl AssistantConfig {
    /// JSON 文字列から設定を読む。
    /// パースに失敗した場合や温度が範囲外の場合はデフォルトを返す。
    pub fn from_json_str(json: &str) -> Self {
        match serde_json::from_str::<AssistantConfig>(json) {
            Ok(cfg) if (0.0..=2.0).contains(&cfg.temperature) => cfg,
            _ => AssistantConfig::default(),
        }
    }
}

/// 設定ファイルのパスを返す。
/// カレントディレクトリに存在すればそれを、無ければホーム側のパスを返す
/// （ホーム側は存在しない場合もある）。
pub fn config_path() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    match home_dir() {
        Some(home) => home.join(CONFIG_FILE_NAME),
        None => local,
    }
}

/// 設定を読み込む。ファイルが無い・読めない・壊れている場合はデフォルト。
pub fn load() -> AssistantConfig {
    load_from_path(&config_path())
}

/// 指定パスから設定を読み込む（テスト用に分離）
pub fn load_from_path(path: &Path) -> AssistantConfig {
    match fs::read_to_string(path) {
        Ok(json) => AssistantConfig::from_json_str(&json),
        Err(_) => AssistantConfig::default(),
    }
}

/// デフォルト設定をファイルに書き出す（既存ファイルは上書き。確認は呼び出し側の責務）。
/// 書き込んだパスを返す。
pub fn save_defaults(path: Option<&Path>) -> Result<PathBuf, Error> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => home_dir()
            .map(|h| h.join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::io_msg("HOME is not set; pass an explicit config path"))?,
    };
    let json = serde_json::to_string_pretty(&AssistantConfig::default())
        .map_err(|e| Error::json(e.to_string()))?;
    fs::write(&path, json + "\n").map_err(|e| Error::io_msg(e.to_string()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AssistantConfig::default();
        assert_eq!(cfg.default_model, "gemini-2.5-flash");
        assert_eq!(cfg.temperature, 0.7);
        assert_eq!(cfg.max_tokens, Some(2048));
        assert!(cfg.enable_history);
        assert_eq!(cfg.history_file, "~/.ai_assistant_history.jsonl");
        assert!(!cfg.verbose);
        assert!(!cfg.stream_by_default);
    }

    #[test]
    fn test_partial_file_falls_back_per_field() {
        // temperature のみ指定 → 他のフィールドはデフォルト
        let cfg = AssistantConfig::from_json_str(r#"{"temperature": 0.1}"#);
        assert_eq!(cfg.temperature, 0.1);
        assert_eq!(cfg.default_model, "gemini-2.5-flash");
        assert!(cfg.enable_history);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let cfg = AssistantConfig::from_json_str(
            r#"{"default_model": "gemini-2.5-pro", "favorite_color": "green"}"#,
        );
        assert_eq!(cfg.default_model, "gemini-2.5-pro");
    }

    #[test]
    fn test_invalid_json_falls_back_to_defaults() {
        let cfg = AssistantConfig::from_json_str("not json at all {");
        assert_eq!(cfg, AssistantConfig::default());
    }

    #[test]
    fn test_out_of_range_temperature_falls_back_to_defaults() {
        let cfg = AssistantConfig::from_json_str(r#"{"temperature": 3.5}"#);
        assert_eq!(cfg, AssistantConfig::default());
    }

    #[test]
    fn test_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_from_path(&dir.path().join("nope.json"));
        assert_eq!(cfg, AssistantConfig::default());
    }

    #[test]
    fn test_save_defaults_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let written = save_defaults(Some(&path)).unwrap();
        assert_eq!(written, path);
        let cfg = load_from_path(&path);
        assert_eq!(cfg, AssistantConfig::default());
    }
}
