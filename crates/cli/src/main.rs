//! Gran storefront CLI

use std::{error::Error, io, process};

use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

mod cli;
mod render;

pub fn main() {
    let cli = Cli::load().unwrap_or_else(|error| error.exit());

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_err| EnvFilter::new(cli.log_level())),
        )
        .init();

    let stdout = io::stdout();

    if let Err(error) = cli.run(&mut stdout.lock()) {
        #[expect(
            clippy::print_stderr,
            reason = "command failures are reported to the terminal, not the log"
        )]
        {
            eprintln!("{}", describe(&error));
        }

        process::exit(1);
    }
}

/// Renders an error followed by its chain of causes.
fn describe(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
