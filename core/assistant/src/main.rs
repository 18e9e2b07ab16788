//! assistant コマンドのエントリポイント
//!
//! 引数解析 → 設定読み込み → サブコマンド実行の順に進め、
//! 失敗はタイトル付きで stderr に表示して終了コード 1 で終わる。

mod cli;
mod commands;
mod prompt;
mod ui;

use std::collections::BTreeMap;
use std::process;

use cli::{parse_args, print_completion, AssistantCommand, ParseOutcome};
use common::config::{self, AssistantConfig};
use common::error::Error;
use common::log::{default_log_path, now_iso8601, FileJsonLog, Log, LogLevel, LogRecord, NoopLog};

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            ui::print_error(e.title(), &e.to_string());
            1
        }
    };
    process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let (command, verbose) = match parse_args()? {
        ParseOutcome::Run { command, verbose } => (command, verbose),
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
        ParseOutcome::Handled => return Ok(0),
    };

    // 設定は起動ごとに 1 回だけ読み、以後は参照渡しする。
    // -v フラグのみ読み込み後の上書きを許す。
    let mut cfg = config::load();
    if verbose {
        cfg.verbose = true;
    }

    let logger: Box<dyn Log> = match default_log_path() {
        Some(path) => Box::new(FileJsonLog::new(path)),
        None => Box::new(NoopLog),
    };
    let command_name = command_name(&command);
    let _ = logger.log(&LogRecord {
        ts: now_iso8601(),
        level: LogLevel::Info,
        message: "command started".to_string(),
        kind: Some("lifecycle".to_string()),
        fields: {
            let mut m = BTreeMap::new();
            m.insert("command".to_string(), serde_json::json!(command_name));
            Some(m)
        },
    });

    let result = dispatch(command, &cfg);

    let code = result.as_ref().copied().unwrap_or(1);
    let _ = logger.log(&LogRecord {
        ts: now_iso8601(),
        level: LogLevel::Info,
        message: "command finished".to_string(),
        kind: Some("lifecycle".to_string()),
        fields: {
            let mut m = BTreeMap::new();
            m.insert("command".to_string(), serde_json::json!(command_name));
            m.insert("exit_code".to_string(), serde_json::json!(code));
            Some(m)
        },
    });
    if let Err(ref e) = result {
        let _ = logger.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Error,
            message: e.to_string(),
            kind: Some("error".to_string()),
            fields: None,
        });
    }
    result
}

fn dispatch(command: AssistantCommand, cfg: &AssistantConfig) -> Result<i32, Error> {
    match command {
        AssistantCommand::Ask {
            prompt,
            file,
            model,
            temperature,
            no_history,
            system,
        } => commands::ask::run(cfg, prompt, file, model, temperature, no_history, system),
        AssistantCommand::Chat {
            model,
            temperature,
            system,
        } => commands::chat::run(cfg, model, temperature, system),
        AssistantCommand::Stream {
            prompt,
            file,
            model,
            system,
        } => commands::stream::run(cfg, prompt, file, model, system),
        AssistantCommand::History { limit, export } => {
            commands::history_cmd::run(cfg, limit, export)
        }
        AssistantCommand::ClearHistory => commands::history_cmd::clear(cfg),
        AssistantCommand::Config { init, path } => commands::config_cmd::run(cfg, init, path),
        AssistantCommand::Models => commands::models::run(),
        AssistantCommand::Version => {
            println!("assistant v{}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
    }
}

fn command_name(command: &AssistantCommand) -> &'static str {
    match command {
        AssistantCommand::Ask { .. } => "ask",
        AssistantCommand::Chat { .. } => "chat",
        AssistantCommand::Stream { .. } => "stream",
        AssistantCommand::History { .. } => "history",
        AssistantCommand::ClearHistory => "clear-history",
        AssistantCommand::Config { .. } => "config",
        AssistantCommand::Models => "models",
        AssistantCommand::Version => "version",
    }
}
