//! chat: 対話ループ
//!
//! 各ターンの失敗（安全性ブロック・一時的な API エラー）はセッションを
//! 終了させずに表示して続行する。終了は exit/quit/q、EOF、Ctrl+C のみ。

use crate::prompt::resolve_system_prompt;
use crate::ui;
use common::config::AssistantConfig;
use common::error::Error;
use common::history::{ConversationEntry, HistoryStore};
use common::llm::{build_client, classify, generate_with_retry, GeminiClient, GenerateRequest};
use std::io::{self, BufRead, Write};

pub fn run(
    cfg: &AssistantConfig,
    model: Option<String>,
    temperature: Option<f64>,
    system: Option<String>,
) -> Result<i32, Error> {
    let client = build_client()?;
    let system_prompt = resolve_system_prompt(system);

    let model_name = model.unwrap_or_else(|| cfg.default_model.clone());
    let temp = temperature.unwrap_or(cfg.temperature);

    println!("Chat mode activated!");
    println!("Model: {}", model_name);
    println!("Type 'exit', 'quit', or press Ctrl+C to exit.");

    // Ctrl+C は別れの挨拶を出して終了コード 0 で抜ける
    let _ = ctrlc::set_handler(|| {
        println!("\nGoodbye!");
        std::process::exit(0);
    });

    // ターンごとの発言の蓄積。送信時に "role: content" を改行で連結する。
    let mut transcript: Vec<(&'static str, String)> = Vec::new();
    let stdin = io::stdin();

    loop {
        print!("\nYou: ");
        io::stdout()
            .flush()
            .map_err(|e| Error::io_msg(e.to_string()))?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => return Err(Error::io_msg(e.to_string())),
        }

        let input = line.trim().to_string();
        if matches!(input.to_lowercase().as_str(), "exit" | "quit" | "q") {
            println!("Goodbye!");
            break;
        }
        if input.is_empty() {
            continue;
        }

        transcript.push(("user", input.clone()));
        let full_prompt = transcript
            .iter()
            .map(|(role, content)| format!("{}: {}", role, content))
            .collect::<Vec<_>>()
            .join("\n");

        println!("Thinking...");
        match run_turn(&client, cfg, &model_name, temp, system_prompt.clone(), &full_prompt) {
            Ok((text, tokens_used)) => {
                transcript.push(("assistant", text.clone()));
                println!("\nAssistant: {}", text);
                if cfg.enable_history {
                    let store = HistoryStore::new(&cfg.history_file);
                    let entry = ConversationEntry::new(&model_name, &input, &text, tokens_used);
                    if let Err(e) = store.append(&entry) {
                        ui::print_error(e.title(), &e.to_string());
                    }
                }
            }
            Err(e) => {
                ui::print_error(e.title(), &e.to_string());
            }
        }
    }
    Ok(0)
}

/// 1 ターン分の呼び出し: リトライ付き生成 → 分類
fn run_turn(
    client: &GeminiClient,
    cfg: &AssistantConfig,
    model_name: &str,
    temperature: f64,
    system_prompt: Option<String>,
    full_prompt: &str,
) -> Result<(String, Option<u64>), Error> {
    let mut request = GenerateRequest::new(model_name, full_prompt);
    request.system_instruction = system_prompt;
    request.temperature = Some(temperature);
    request.max_output_tokens = cfg.max_tokens;

    let response = generate_with_retry(client, &request)?;
    let tokens_used = response.tokens_used();
    let text = classify(&response)?;
    Ok((text, tokens_used))
}
