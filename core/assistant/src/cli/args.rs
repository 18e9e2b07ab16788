//! clap によるサブコマンド定義と解析

use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;
use std::io;
use std::path::PathBuf;

/// 解析済みのサブコマンド
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantCommand {
    /// 一回きりの質問
    Ask {
        prompt: Option<String>,
        file: Option<PathBuf>,
        model: Option<String>,
        temperature: Option<f64>,
        no_history: bool,
        system: Option<String>,
    },
    /// 対話ループ
    Chat {
        model: Option<String>,
        temperature: Option<f64>,
        system: Option<String>,
    },
    /// ストリーミング表示
    Stream {
        prompt: Option<String>,
        file: Option<PathBuf>,
        model: Option<String>,
        system: Option<String>,
    },
    /// 履歴の表示・エクスポート
    History {
        limit: usize,
        export: Option<PathBuf>,
    },
    /// 履歴の全消去（確認あり）
    ClearHistory,
    /// 設定の表示・初期化
    Config { init: bool, path: Option<PathBuf> },
    /// 利用可能なモデルの一覧
    Models,
    /// バージョン表示
    Version,
}

/// 解析結果: 通常のコマンド / 補完スクリプト生成 / clap が表示済み（help 等）
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Run {
        command: AssistantCommand,
        verbose: bool,
    },
    GenerateCompletion(Shell),
    Handled,
}

/// 温度は 0.0〜2.0 のみ受け付ける
fn parse_temperature(s: &str) -> Result<f64, String> {
    let t: f64 = s
        .parse()
        .map_err(|_| format!("invalid temperature: {}", s))?;
    if (0.0..=2.0).contains(&t) {
        Ok(t)
    } else {
        Err(format!("temperature must be between 0.0 and 2.0, got {}", t))
    }
}

fn model_arg() -> clap::Arg {
    clap::Arg::new("model")
        .short('m')
        .long("model")
        .value_name("model")
        .help("Model name to use for generation")
        .num_args(1)
}

fn temperature_arg() -> clap::Arg {
    clap::Arg::new("temperature")
        .short('t')
        .long("temperature")
        .value_name("temperature")
        .help("Controls randomness (0.0-2.0)")
        .value_parser(parse_temperature)
        .num_args(1)
}

fn system_arg() -> clap::Arg {
    clap::Arg::new("system")
        .short('S')
        .long("system")
        .value_name("instruction")
        .help("Set system instruction for this query")
        .num_args(1)
}

fn prompt_args() -> [clap::Arg; 2] {
    [
        clap::Arg::new("prompt")
            .short('p')
            .long("prompt")
            .value_name("prompt")
            .help("The question or instruction to send to the model")
            .num_args(1),
        clap::Arg::new("file")
            .short('f')
            .long("file")
            .value_name("path")
            .help("Read prompt from a file")
            .value_parser(value_parser!(PathBuf))
            .num_args(1),
    ]
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("assistant")
        .about("Terminal assistant powered by the Gemini API")
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .help("Enable verbose output for debugging")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .subcommand(
            clap::Command::new("ask")
                .about("Send a prompt and print the response text")
                .args(prompt_args())
                .arg(model_arg())
                .arg(temperature_arg())
                .arg(system_arg())
                .arg(
                    clap::Arg::new("no-history")
                        .long("no-history")
                        .help("Don't save this conversation to history")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            clap::Command::new("chat")
                .about("Start an interactive chat session")
                .arg(model_arg())
                .arg(temperature_arg())
                .arg(system_arg()),
        )
        .subcommand(
            clap::Command::new("stream")
                .about("Stream the response incrementally")
                .args(prompt_args())
                .arg(model_arg())
                .arg(system_arg()),
        )
        .subcommand(
            clap::Command::new("history")
                .about("Show conversation history")
                .arg(
                    clap::Arg::new("limit")
                        .short('n')
                        .long("limit")
                        .value_name("count")
                        .help("Number of recent entries to show")
                        .value_parser(value_parser!(usize))
                        .default_value("10")
                        .num_args(1),
                )
                .arg(
                    clap::Arg::new("export")
                        .short('e')
                        .long("export")
                        .value_name("path")
                        .help("Export history to a file (markdown or json by extension)")
                        .value_parser(value_parser!(PathBuf))
                        .num_args(1),
                ),
        )
        .subcommand(
            clap::Command::new("clear-history").about("Clear conversation history (asks first)"),
        )
        .subcommand(
            clap::Command::new("config")
                .about("Show or initialize configuration")
                .arg(
                    clap::Arg::new("init")
                        .long("init")
                        .help("Create a default configuration file")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    clap::Arg::new("path")
                        .long("path")
                        .value_name("path")
                        .help("Custom path for the config file")
                        .value_parser(value_parser!(PathBuf))
                        .num_args(1),
                ),
        )
        .subcommand(clap::Command::new("models").about("List available upstream models"))
        .subcommand(clap::Command::new("version").about("Show version information"))
}

fn matches_to_command(matches: &clap::ArgMatches) -> Result<AssistantCommand, Error> {
    let command = match matches.subcommand() {
        Some(("ask", sub)) => AssistantCommand::Ask {
            prompt: sub.get_one::<String>("prompt").cloned(),
            file: sub.get_one::<PathBuf>("file").cloned(),
            model: sub.get_one::<String>("model").cloned(),
            temperature: sub.get_one::<f64>("temperature").copied(),
            no_history: sub.get_flag("no-history"),
            system: sub.get_one::<String>("system").cloned(),
        },
        Some(("chat", sub)) => AssistantCommand::Chat {
            model: sub.get_one::<String>("model").cloned(),
            temperature: sub.get_one::<f64>("temperature").copied(),
            system: sub.get_one::<String>("system").cloned(),
        },
        Some(("stream", sub)) => AssistantCommand::Stream {
            prompt: sub.get_one::<String>("prompt").cloned(),
            file: sub.get_one::<PathBuf>("file").cloned(),
            model: sub.get_one::<String>("model").cloned(),
            system: sub.get_one::<String>("system").cloned(),
        },
        Some(("history", sub)) => AssistantCommand::History {
            limit: *sub.get_one::<usize>("limit").unwrap_or(&10),
            export: sub.get_one::<PathBuf>("export").cloned(),
        },
        Some(("clear-history", _)) => AssistantCommand::ClearHistory,
        Some(("config", sub)) => AssistantCommand::Config {
            init: sub.get_flag("init"),
            path: sub.get_one::<PathBuf>("path").cloned(),
        },
        Some(("models", _)) => AssistantCommand::Models,
        Some(("version", _)) => AssistantCommand::Version,
        _ => {
            return Err(Error::invalid_argument(
                "No command provided. See 'assistant --help'.",
            ))
        }
    };
    Ok(command)
}

/// コマンドラインを解析する。help / version は clap が表示するので Handled を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    parse_from(std::env::args())
}

fn parse_from<I, T>(args: I) -> Result<ParseOutcome, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = match build_clap_command().try_get_matches_from(args) {
        Ok(m) => m,
        Err(e) => {
            use clap::error::ErrorKind;
            return match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    let _ = e.print();
                    Ok(ParseOutcome::Handled)
                }
                _ => Err(Error::invalid_argument(e.to_string())),
            };
        }
    };

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Run {
        verbose: matches.get_flag("verbose"),
        command: matches_to_command(&matches)?,
    })
}

/// シェル補完スクリプトを stdout に出力する
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "assistant", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ParseOutcome, Error> {
        parse_from(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_ask_with_flags() {
        let outcome = parse(&[
            "assistant",
            "ask",
            "-p",
            "hello",
            "-m",
            "gemini-2.5-pro",
            "-t",
            "0.2",
            "--no-history",
        ])
        .unwrap();
        match outcome {
            ParseOutcome::Run { command, verbose } => {
                assert!(!verbose);
                assert_eq!(
                    command,
                    AssistantCommand::Ask {
                        prompt: Some("hello".to_string()),
                        file: None,
                        model: Some("gemini-2.5-pro".to_string()),
                        temperature: Some(0.2),
                        no_history: true,
                        system: None,
                    }
                );
            }
            other => panic!("expected Run, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range_temperature() {
        let err = parse(&["assistant", "ask", "-p", "hi", "-t", "3.0"]).unwrap_err();
        assert!(err.to_string().contains("between 0.0 and 2.0"));
    }

    #[test]
    fn test_parse_history_defaults_limit() {
        let outcome = parse(&["assistant", "history"]).unwrap();
        match outcome {
            ParseOutcome::Run { command, .. } => {
                assert_eq!(
                    command,
                    AssistantCommand::History {
                        limit: 10,
                        export: None
                    }
                );
            }
            other => panic!("expected Run, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_verbose_after_subcommand() {
        let outcome = parse(&["assistant", "models", "-v"]).unwrap();
        match outcome {
            ParseOutcome::Run { command, verbose } => {
                assert!(verbose);
                assert_eq!(command, AssistantCommand::Models);
            }
            other => panic!("expected Run, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_clear_history_and_version() {
        assert!(matches!(
            parse(&["assistant", "clear-history"]).unwrap(),
            ParseOutcome::Run {
                command: AssistantCommand::ClearHistory,
                ..
            }
        ));
        assert!(matches!(
            parse(&["assistant", "version"]).unwrap(),
            ParseOutcome::Run {
                command: AssistantCommand::Version,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_generate_completion() {
        let outcome = parse(&["assistant", "--generate", "bash"]).unwrap();
        assert_eq!(outcome, ParseOutcome::GenerateCompletion(Shell::Bash));
    }

    #[test]
    fn test_parse_unknown_subcommand_is_invalid_argument() {
        let err = parse(&["assistant", "frobnicate"]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
