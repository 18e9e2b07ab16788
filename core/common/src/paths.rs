//! ホームディレクトリ解決とチルダ展開

use std::env;
use std::path::PathBuf;

/// ホームディレクトリを環境変数 HOME から取得
pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// 先頭の `~/` をホームディレクトリに展開する。
/// HOME が未設定の場合や `~/` で始まらない場合はそのまま返す。
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde_with_home() {
        let home = home_dir().expect("HOME should be set in tests");
        let expanded = expand_tilde("~/.ai_assistant_history.jsonl");
        assert_eq!(expanded, home.join(".ai_assistant_history.jsonl"));
    }

    #[test]
    fn test_expand_tilde_absolute_path_unchanged() {
        let expanded = expand_tilde("/tmp/history.jsonl");
        assert_eq!(expanded, PathBuf::from("/tmp/history.jsonl"));
    }

    #[test]
    fn test_expand_tilde_relative_path_unchanged() {
        let expanded = expand_tilde("history.jsonl");
        assert_eq!(expanded, PathBuf::from("history.jsonl"));
    }
}
