//! ask: 一回きりの質問を送って応答を表示する

use crate::commands::resolve_prompt;
use crate::prompt::resolve_system_prompt;
use crate::ui;
use common::config::AssistantConfig;
use common::error::Error;
use common::history::{ConversationEntry, HistoryStore};
use common::llm::{build_client, classify, generate_with_retry, GenerateRequest};
use std::path::PathBuf;

#[allow(clippy::too_many_arguments)]
pub fn run(
    cfg: &AssistantConfig,
    prompt: Option<String>,
    file: Option<PathBuf>,
    model: Option<String>,
    temperature: Option<f64>,
    no_history: bool,
    system: Option<String>,
) -> Result<i32, Error> {
    let prompt_text = resolve_prompt(prompt, file)?;
    let client = build_client()?;
    let system_prompt = resolve_system_prompt(system);

    let model_name = model.unwrap_or_else(|| cfg.default_model.clone());
    let temp = temperature.unwrap_or(cfg.temperature);

    if cfg.verbose {
        eprintln!("Model: {}", model_name);
        eprintln!("Temperature: {}", temp);
        if system_prompt.is_some() {
            eprintln!("System prompt loaded");
        }
    }

    let mut request = GenerateRequest::new(model_name.clone(), prompt_text.clone());
    request.system_instruction = system_prompt;
    request.temperature = Some(temp);
    request.max_output_tokens = cfg.max_tokens;

    let response = generate_with_retry(&client, &request)?;
    let text = classify(&response)?;

    ui::print_response(&model_name, &text);

    if cfg.enable_history && !no_history {
        let store = HistoryStore::new(&cfg.history_file);
        store.append(&ConversationEntry::new(
            &model_name,
            &prompt_text,
            &text,
            response.tokens_used(),
        ))?;
    }

    Ok(0)
}
