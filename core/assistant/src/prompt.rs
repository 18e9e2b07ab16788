//! システムプロンプトの解決
//!
//! -S/--system で明示された指示を優先し、無ければホームの
//! プロンプトファイルを読む。どちらも無ければ指示なしで呼び出す。

use common::paths::home_dir;
use std::fs;

/// ホームディレクトリのシステムプロンプトファイル名
pub const SYSTEM_PROMPT_FILE: &str = ".aiassistant_prompt.txt";

/// システムプロンプトを解決する
pub fn resolve_system_prompt(explicit: Option<String>) -> Option<String> {
    if let Some(s) = explicit {
        let s = s.trim().to_string();
        if !s.is_empty() {
            return Some(s);
        }
    }
    let path = home_dir()?.join(SYSTEM_PROMPT_FILE);
    let content = fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
