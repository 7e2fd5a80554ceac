use crate::domain::AgentCommand;
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub help: bool,
    /// -j / --json: Response 全体を JSON で出力する
    pub json: bool,
    /// -m / --memory: メモリファイル（AGENT_MEMORY_FILE より優先）
    pub memory_path: Option<PathBuf>,
    /// -C / --context key=value（複数可）
    pub context: Vec<String>,
    /// --no-search: Web 検索を無効にする
    pub no_search: bool,
    pub message_args: Vec<String>,
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

pub fn build_clap_command() -> clap::Command {
    clap::Command::new("agent")
        .about("Rule-based conversational assistant with persistent reminders, notes and tasks")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("json")
                .short('j')
                .long("json")
                .help("Print the full response (text, intent, confidence, metadata) as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("memory")
                .short('m')
                .long("memory")
                .value_name("path")
                .help("Memory file (overrides AGENT_MEMORY_FILE)")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("context")
                .short('C')
                .long("context")
                .value_name("key=value")
                .help("Context entry passed with every message (repeatable)")
                .action(ArgAction::Append)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("no-search")
                .long("no-search")
                .help("Disable network search")
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
        .arg(
            clap::Arg::new("message")
                .index(1)
                .help("Message words (omit to read messages from stdin)")
                .num_args(0..)
                .trailing_var_arg(true),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    Config {
        help: matches.get_flag("help"),
        json: matches.get_flag("json"),
        memory_path: matches.get_one::<PathBuf>("memory").cloned(),
        context: matches
            .get_many::<String>("context")
            .map(|i| i.cloned().collect())
            .unwrap_or_default(),
        no_search: matches.get_flag("no-search"),
        message_args: matches
            .get_many::<String>("message")
            .map(|i| i.cloned().collect())
            .unwrap_or_default(),
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }
    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
pub fn parse_args_from(args: &[String]) -> Result<Config, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "agent", &mut std::io::stdout());
}

/// Config を AgentCommand に変換する
pub fn config_to_command(config: &Config) -> AgentCommand {
    if config.help {
        return AgentCommand::Help;
    }
    let text = config.message_args.join(" ");
    if text.trim().is_empty() {
        AgentCommand::Interactive
    } else {
        AgentCommand::Message { text }
    }
}
