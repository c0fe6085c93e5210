// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! livepad binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use livepad::cli::Cli;
use livepad::commands::App;
use livepad::env;
use livepad::output::print_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let app = match App::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_error(e);
            std::process::exit(1);
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = app.execute(&cli.command, &mut stdout, std::io::stdin()).await {
        print_error(e);
        std::process::exit(1);
    }
}

/// Log to stderr. `LIVEPAD_LOG` wins over `-v`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "livepad=debug,warn" } else { "warn" };
    let filter = env::log_filter()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
