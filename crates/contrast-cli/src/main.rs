#![forbid(unsafe_code)]

use std::process::ExitCode;

use contrast_cli::cli::Opts;
use contrast_cli::config::Config;

fn main() -> ExitCode {
    let parsed = Config::from_env_with_diagnostics();
    contrast_cli::logging::init(&parsed.config);
    for error in &parsed.errors {
        tracing::warn!(field = error.field, value = %error.value, "ignoring invalid setting: {}", error.message);
    }

    let opts = Opts::parse(&parsed.config);
    match contrast_cli::run(&opts) {
        Ok(outcome) => {
            println!("{}", outcome.output);
            if outcome.passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(2)
        }
    }
}
