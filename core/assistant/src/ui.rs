//! コンソール表示のヘルパー

use std::io::{self, BufRead, Write};

/// タイトル付きのエラーを stderr に表示する
pub fn print_error(title: &str, message: &str) {
    eprintln!("[{}] {}", title, message);
}

/// 応答テキストをモデル名付きで表示する
pub fn print_response(model: &str, text: &str) {
    println!("--- Model: {} ---", model);
    println!("{}", text);
}

/// y/N の確認プロンプト。y / yes のみ true。
/// 読み取りに失敗した場合は false（破壊的操作は実行しない）。
pub fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}
