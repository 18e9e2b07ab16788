//! history / clear-history: 履歴の表示・エクスポート・全消去

use crate::ui;
use common::config::AssistantConfig;
use common::error::Error;
use common::history::{ExportFormat, HistoryStore};
use std::path::PathBuf;

pub fn run(cfg: &AssistantConfig, limit: usize, export: Option<PathBuf>) -> Result<i32, Error> {
    let store = HistoryStore::new(&cfg.history_file);

    if let Some(dest) = export {
        let format = if dest.extension().and_then(|e| e.to_str()) == Some("json") {
            ExportFormat::Json
        } else {
            ExportFormat::Markdown
        };
        store.export(&dest, format)?;
        println!("History exported to {}", dest.display());
        return Ok(0);
    }

    let entries = store.load(Some(limit))?;
    if entries.is_empty() {
        println!("No history found.");
        return Ok(0);
    }

    for entry in entries {
        println!("--- {} | {} ---", entry.timestamp, entry.model);
        println!("Prompt: {}", entry.prompt);
        println!();
        println!("Response: {}", entry.response);
        println!();
    }
    Ok(0)
}

/// 履歴の全消去。確認で y/yes 以外を入れた場合は何もしない。
pub fn clear(cfg: &AssistantConfig) -> Result<i32, Error> {
    if ui::confirm("Are you sure you want to clear all history?") {
        let store = HistoryStore::new(&cfg.history_file);
        store.clear()?;
        println!("History cleared.");
    } else {
        println!("Cancelled.");
    }
    Ok(0)
}
