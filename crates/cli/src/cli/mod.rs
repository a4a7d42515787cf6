use std::{io, path::PathBuf};

use clap::{Parser, Subcommand};
use gran::{
    cart::{CartError, CartStore, RecordingObserver},
    checkout::CheckoutError,
    config::{ConfigError, StorefrontConfig},
    items::LineItemError,
    orders::OrderLogError,
    storage::{FileStorage, StorageError},
};
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

mod cart;
mod checkout;
mod cookies;

/// Gran storefront CLI
#[derive(Debug, Parser)]
#[command(name = "gran", about = "Gran storefront CLI", long_about = None)]
pub(crate) struct Cli {
    /// JSON document holding the cart, orders and consent flag
    #[arg(
        long,
        env = "GRAN_STORAGE",
        default_value = "gran-storage.json",
        global = true
    )]
    storage: PathBuf,

    /// Storefront configuration (YAML)
    #[arg(long, env = "GRAN_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add a product to the cart, merging with an existing line
    Add(cart::AddArgs),

    /// Remove a line from the cart
    Remove(cart::RemoveArgs),

    /// Empty the cart
    Clear,

    /// Show the cart contents
    Show,

    /// Place an order for the current cart
    Checkout(checkout::CheckoutArgs),

    /// List placed orders
    Orders,

    /// Record cookie consent
    AcceptCookies,
}

/// Failures surfaced by a command.
#[derive(Debug, Error)]
pub(crate) enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid item")]
    Item(#[from] LineItemError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Orders(#[from] OrderLogError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to write output")]
    Output(#[from] io::Error),
}

/// Resolved collaborators shared by every command.
#[derive(Debug)]
pub(crate) struct Context {
    storage: FileStorage,
    currency: &'static Currency,
}

impl Context {
    fn new(storage: FileStorage, config: &StorefrontConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            storage,
            currency: config.currency()?,
        })
    }

    fn cart(&self) -> CartStore<FileStorage, RecordingObserver> {
        CartStore::with_observer(self.storage.clone(), RecordingObserver::default())
    }
}

impl Cli {
    /// Loads `.env` and parses arguments.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) fn log_level(&self) -> &str {
        &self.log_level
    }

    pub(crate) fn run(self, out: &mut impl io::Write) -> Result<(), CommandError> {
        let config = match &self.config {
            Some(path) => StorefrontConfig::from_path(path)?,
            None => StorefrontConfig::default(),
        };

        debug!(
            storage = %self.storage.display(),
            currency = %config.currency,
            "running command"
        );

        let ctx = Context::new(FileStorage::new(self.storage), &config)?;

        match self.command {
            Commands::Add(args) => cart::add(&ctx, args, out),
            Commands::Remove(args) => cart::remove(&ctx, &args, out),
            Commands::Clear => cart::clear(&ctx, out),
            Commands::Show => cart::show(&ctx, out),
            Commands::Checkout(args) => checkout::place(&ctx, args, out),
            Commands::Orders => checkout::list(&ctx, out),
            Commands::AcceptCookies => cookies::accept(&ctx, out),
        }
    }
}

/// Writes the messages raised by the last cart operation.
fn report(
    cart: &CartStore<FileStorage, RecordingObserver>,
    out: &mut impl io::Write,
) -> io::Result<()> {
    for message in &cart.observer().messages {
        writeln!(out, "{message}")?;
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    use clap::Parser;

    use super::{Cli, CommandError};

    /// Parses `args` with `--storage` pointing at `storage`.
    pub(crate) fn cli(storage: &Path, args: &[&str]) -> Result<Cli, clap::Error> {
        let storage = storage.to_string_lossy().into_owned();

        Cli::try_parse_from(
            ["gran", "--storage", storage.as_str()]
                .into_iter()
                .chain(args.iter().copied()),
        )
    }

    /// Runs a parsed command and returns what it printed.
    pub(crate) fn output(cli: Cli) -> Result<String, CommandError> {
        let mut out = Vec::new();

        cli.run(&mut out)?;

        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
