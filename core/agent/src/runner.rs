//! Command を実行する Runner（UseCaseRunner の実装）
//!
//! 入出力は BufRead / Write で受け取り、main では stdin / stdout を渡す。

use std::io::{self, BufRead, IsTerminal, Write};

use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};

use crate::cli::{config_to_command, Config};
use crate::domain::{parse_context_pairs, AgentCommand, Context, Response};
use crate::ports::inbound::{Dispatch, UseCaseRunner};
use crate::wiring::App;

pub const USAGE: &str = "Usage: agent [options] [message...]";

const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

pub struct Runner {
    pub app: App,
}

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let stdin = io::stdin();
        let prompt = stdin.is_terminal();
        let mut input = stdin.lock();
        let mut output = io::stdout().lock();
        self.run_with_io(config, &mut input, &mut output, prompt)
    }
}

impl Runner {
    pub fn new(app: App) -> Self {
        Self { app }
    }

    /// 入出力を差し替えて実行する（対話モードのテストにも使う）
    pub fn run_with_io(
        &self,
        config: Config,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        prompt: bool,
    ) -> Result<i32, Error> {
        let cmd = config_to_command(&config);
        let command_name = cmd_name_for_log(&cmd);
        self.log(
            LogRecord::new(LogLevel::Info, "command started")
                .kind("lifecycle")
                .field("command", command_name)
                .field("memory_path", self.app.memory_path.display().to_string()),
        );

        let result = self.execute(cmd, &config, input, output, prompt);

        let code = result.as_ref().copied().unwrap_or(0);
        self.log(
            LogRecord::new(LogLevel::Info, "command finished")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        if let Err(ref e) = result {
            self.log(LogRecord::new(LogLevel::Error, e.to_string()).kind("error"));
        }
        result
    }

    fn execute(
        &self,
        cmd: AgentCommand,
        config: &Config,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        prompt: bool,
    ) -> Result<i32, Error> {
        match cmd {
            AgentCommand::Help => {
                write_help(output)?;
                Ok(0)
            }
            AgentCommand::Message { text } => {
                let context = parse_context(config)?;
                let response = self.app.dispatcher.process(&text, Some(&context));
                write_response(output, &response, config.json)?;
                Ok(0)
            }
            AgentCommand::Interactive => {
                let context = parse_context(config)?;
                self.repl(&context, config.json, input, output, prompt)?;
                Ok(0)
            }
        }
    }

    /// 1 行 1 メッセージ。空行は読み飛ばし、exit / quit / EOF で終了する。
    fn repl(
        &self,
        context: &Context,
        json: bool,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
        prompt: bool,
    ) -> Result<(), Error> {
        let mut line = String::new();
        loop {
            if prompt {
                write!(output, "> ")?;
                output.flush()?;
            }
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(());
            }
            let message = line.trim();
            if message.is_empty() {
                continue;
            }
            if EXIT_WORDS.iter().any(|w| message.eq_ignore_ascii_case(w)) {
                return Ok(());
            }
            let response = self.app.dispatcher.process(message, Some(context));
            write_response(output, &response, json)?;
        }
    }

    fn log(&self, record: LogRecord) {
        let _ = self.app.logger.log(&record.layer("cli"));
    }
}

fn parse_context(config: &Config) -> Result<Context, Error> {
    parse_context_pairs(&config.context).map_err(Error::invalid_argument)
}

fn write_response(output: &mut dyn Write, response: &Response, json: bool) -> Result<(), Error> {
    if json {
        writeln!(output, "{}", serde_json::to_string(response)?)?;
    } else {
        writeln!(output, "{}", response.text)?;
    }
    output.flush()?;
    Ok(())
}

fn cmd_name_for_log(cmd: &AgentCommand) -> &'static str {
    match cmd {
        AgentCommand::Help => "help",
        AgentCommand::Message { .. } => "message",
        AgentCommand::Interactive => "interactive",
    }
}

fn write_help(output: &mut dyn Write) -> Result<(), Error> {
    writeln!(output, "{}", USAGE)?;
    writeln!(output, "Options:")?;
    writeln!(output, "  -h, --help              Show this help message")?;
    writeln!(output, "  -j, --json              Print the full response as JSON")?;
    writeln!(output, "  -m, --memory <path>     Memory file (overrides AGENT_MEMORY_FILE)")?;
    writeln!(output, "  -C, --context <k=v>     Context entry passed with every message (repeatable)")?;
    writeln!(output, "      --no-search         Disable network search")?;
    writeln!(output, "      --generate <shell>  Print shell completion script (bash, zsh, fish, elvish, powershell)")?;
    writeln!(output)?;
    writeln!(output, "Without a message, reads one message per line from stdin until EOF, 'exit' or 'quit'.")?;
    writeln!(output)?;
    writeln!(output, "Environment:")?;
    writeln!(output, "  AGENT_HOME                 Root for config/data/state (default: XDG directories)")?;
    writeln!(output, "  AGENT_MEMORY_FILE          Memory file (default: <data_dir>/memory.json)")?;
    writeln!(output, "  AGENT_SEARCH_ENDPOINT      Instant answer endpoint (default: DuckDuckGo)")?;
    writeln!(output, "  AGENT_SEARCH_TIMEOUT_SECS  Search timeout in seconds (default: 10)")?;
    Ok(())
}
