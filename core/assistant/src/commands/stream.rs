//! stream: 応答を受信しながら逐次表示する
//!
//! ストリーミングはリトライしない（途中まで表示した応答を二重に
//! 流さないため。単発呼び出しのみがリトライ対象）。

use crate::commands::resolve_prompt;
use crate::prompt::resolve_system_prompt;
use common::config::AssistantConfig;
use common::error::Error;
use common::history::{ConversationEntry, HistoryStore};
use common::llm::{build_client, GenerateRequest};
use std::io::{self, Write};
use std::path::PathBuf;

pub fn run(
    cfg: &AssistantConfig,
    prompt: Option<String>,
    file: Option<PathBuf>,
    model: Option<String>,
    system: Option<String>,
) -> Result<i32, Error> {
    let prompt_text = resolve_prompt(prompt, file)?;
    let client = build_client()?;
    let system_prompt = resolve_system_prompt(system);

    let model_name = model.unwrap_or_else(|| cfg.default_model.clone());

    println!("Streaming from {}...", model_name);
    println!();

    let mut request = GenerateRequest::new(model_name.clone(), prompt_text.clone());
    request.system_instruction = system_prompt;
    let payload = request.payload();

    let mut full_response = String::new();
    client.stream_generate(&model_name, &payload, &mut |chunk| {
        print!("{}", chunk);
        io::stdout()
            .flush()
            .map_err(|e| Error::io_msg(e.to_string()))?;
        full_response.push_str(chunk);
        Ok(())
    })?;
    println!();

    if cfg.enable_history {
        let store = HistoryStore::new(&cfg.history_file);
        store.append(&ConversationEntry::new(
            &model_name,
            &prompt_text,
            &full_response,
            None,
        ))?;
    }

    Ok(0)
}
