//! サブコマンドの実装

pub mod ask;
pub mod chat;
pub mod config_cmd;
pub mod history_cmd;
pub mod models;
pub mod stream;

use common::error::Error;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

/// プロンプト本文を解決する: ファイル → -p フラグ → パイプ入力 → エラー
pub(crate) fn resolve_prompt(
    prompt: Option<String>,
    file: Option<PathBuf>,
) -> Result<String, Error> {
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .map_err(|e| Error::io_msg(format!("File not found: {}: {}", path.display(), e)));
    }
    if let Some(p) = prompt {
        return Ok(p);
    }
    if !std::io::stdin().is_terminal() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| Error::io_msg(e.to_string()))?;
        if !buf.trim().is_empty() {
            return Ok(buf);
        }
    }
    Err(Error::invalid_argument(
        "No prompt provided. Use -p, -f, or pipe input.",
    ))
}
