//! CLI 層: 引数解析と Config

pub mod args;

pub use args::{
    build_clap_command, config_to_command, parse_args, parse_args_from, print_completion, Config,
    ParseOutcome,
};
