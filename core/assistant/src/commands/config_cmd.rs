//! config: 設定の表示と初期化

use crate::ui;
use common::config::{self, AssistantConfig, CONFIG_FILE_NAME};
use common::error::Error;
use common::paths::home_dir;
use std::path::PathBuf;

pub fn run(cfg: &AssistantConfig, init: bool, path: Option<PathBuf>) -> Result<i32, Error> {
    if init {
        let target = match path {
            Some(p) => p,
            None => home_dir()
                .map(|h| h.join(CONFIG_FILE_NAME))
                .ok_or_else(|| Error::io_msg("HOME is not set; pass --path"))?,
        };
        if target.exists() {
            let question = format!(
                "Config file already exists at {}. Overwrite?",
                target.display()
            );
            if !ui::confirm(&question) {
                println!("Cancelled.");
                return Ok(0);
            }
        }
        let saved = config::save_defaults(Some(&target))?;
        println!("Configuration file created at {}", saved.display());
        return Ok(0);
    }

    println!("Config file: {}", config::config_path().display());
    println!("Default model: {}", cfg.default_model);
    println!("Temperature: {}", cfg.temperature);
    match cfg.max_tokens {
        Some(n) => println!("Max tokens: {}", n),
        None => println!("Max tokens: (unset)"),
    }
    println!("History enabled: {}", cfg.enable_history);
    println!("History file: {}", cfg.history_file);
    println!("Verbose: {}", cfg.verbose);
    println!("Stream by default: {}", cfg.stream_by_default);
    Ok(0)
}
