//! 会話履歴（JSONL）の追記・読み込み・エクスポート
//!
//! 履歴ファイルは 1 行 1 レコードの追記専用 JSONL。追記は常に 1 行単位で、
//! 既存の行を書き換えない。壊れた行は読み込み時に黙ってスキップする。

use crate::error::Error;
use crate::paths::expand_tilde;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 会話 1 往復分のレコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// ISO8601 形式のタイムスタンプ
    pub timestamp: String,
    pub model: String,
    pub prompt: String,
    pub response: String,
    /// 使用トークン数（upstream が usageMetadata を返した場合のみ）
    #[serde(default)]
    pub tokens_used: Option<u64>,
}

impl ConversationEntry {
    /// 現在時刻のタイムスタンプ付きでレコードを作る
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        response: impl Into<String>,
        tokens_used: Option<u64>,
    ) -> Self {
        Self {
            timestamp: crate::log::now_iso8601(),
            model: model.into(),
            prompt: prompt.into(),
            response: response.into(),
            tokens_used,
        }
    }
}

/// エクスポート形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json,
}

/// 履歴ストア（1 ファイル = 1 ストア）
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// 設定値のパス文字列からストアを作る（`~/` はホームに展開）
    pub fn new(path: &str) -> Self {
        Self {
            path: expand_tilde(path),
        }
    }

    /// 展開済みパスからストアを作る
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 1 レコードを 1 行として追記する。親ディレクトリが無ければ作成する。
    pub fn append(&self, entry: &ConversationEntry) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::io_msg(e.to_string()))?;
            }
        }
        let line = serde_json::to_string(entry).map_err(|e| Error::json(e.to_string()))?;
        let mut w = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::io_msg(e.to_string()))?;
        // 書き込みは 1 行まとめて 1 回（失敗しても既存の行を壊さない）
        w.write_all(format!("{}\n", line).as_bytes())
            .map_err(|e| Error::io_msg(e.to_string()))?;
        Ok(())
    }

    /// 全レコードを読み込む。パースできない行はスキップする。
    /// `limit` が指定された場合は末尾 `limit` 件を元の順序で返す。
    pub fn load(&self, limit: Option<usize>) -> Result<Vec<ConversationEntry>, Error> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| Error::io_msg(e.to_string()))?;
        let mut entries: Vec<ConversationEntry> = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<ConversationEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(_) => continue,
            }
        }
        if let Some(n) = limit {
            let start = entries.len().saturating_sub(n);
            entries.drain(..start);
        }
        Ok(entries)
    }

    /// 履歴ファイルを削除する。存在しなければ何もしない。
    pub fn clear(&self) -> Result<(), Error> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| Error::io_msg(e.to_string()))?;
        }
        Ok(())
    }

    /// 全レコードを指定形式で書き出す（ファイル全体を上書き）
    pub fn export(&self, dest: &Path, format: ExportFormat) -> Result<(), Error> {
        let entries = self.load(None)?;
        let content = match format {
            ExportFormat::Markdown => render_markdown(&entries),
            ExportFormat::Json => {
                serde_json::to_string_pretty(&entries).map_err(|e| Error::json(e.to_string()))?
            }
        };
        fs::write(dest, content).map_err(|e| Error::io_msg(e.to_string()))?;
        Ok(())
    }
}

/// 履歴を Markdown に整形する（ファイル内の順序のまま 1 レコード 1 セクション）
fn render_markdown(entries: &[ConversationEntry]) -> String {
    let mut content = String::from("# AI Assistant Conversation History\n\n");
    for entry in entries {
        content.push_str(&format!("## {}\n", entry.timestamp));
        content.push_str(&format!("**Model:** {}\n\n", entry.model));
        content.push_str(&format!("**Prompt:**\n{}\n\n", entry.prompt));
        content.push_str(&format!("**Response:**\n{}\n\n", entry.response));
        content.push_str("---\n\n");
    }
    content
}
