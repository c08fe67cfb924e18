//! Keel command-line entry point
//!
//! ```bash
//! keel agent                      # run until Ctrl-C / SIGTERM
//! keel snapshot inspect backup.snap
//! keel exec -- tail -f /var/log/syslog
//! keel --help
//! ```
//!
//! Set RUST_LOG=debug for verbose logging, KEEL_CONFIG to point at a config
//! file other than the default.

use colored::Colorize;
use keel_cli::{App, app, logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match app::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            return exit_code(e.exit_code());
        }
    };

    logging::init(&config.logging);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = match App::bootstrap(config) {
        Ok(app) => app.run(args).await,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            e.exit_code()
        }
    };
    exit_code(code)
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
