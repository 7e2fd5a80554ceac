use std::process;

use agent::cli::{parse_args, print_completion, ParseOutcome};
use agent::ports::inbound::UseCaseRunner;
use agent::runner::{Runner, USAGE};
use agent::wiring::wire_agent;
use common::error::Error;

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                eprintln!("{}", USAGE);
            }
            eprintln!("agent: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    let app = wire_agent(&config)?;
    Runner::new(app).run(config)
}
