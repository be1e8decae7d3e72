//! otpkeep - local TOTP credential manager
//!
//! Stores named TOTP secrets in a JSON file and prints their current codes.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use otpkeep::config;
use otpkeep::error::{Error, StoreError};
use otpkeep::init_logging;
use otpkeep::store::Store;

mod cli;

#[derive(Parser)]
#[command(name = "otpkeep")]
#[command(about = "Local TOTP authenticator with a JSON credential store")]
struct Cli {
    /// Credential store file [default: ~/.otpkeep/accounts.json]
    #[arg(long, global = true, env = "OTPKEEP_STORE")]
    store: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every credential with its current code
    List,
    /// Keep the list on screen, refreshing every second
    Watch {
        /// Stop after this many refreshes
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Print the current code of one credential
    Code {
        /// Id, id prefix, account or issuer:account
        query: String,
    },
    /// Add a credential from a URI, a raw secret, a QR image or the clipboard
    Add(cli::add::AddArgs),
    /// Delete a credential
    Delete {
        /// Id, id prefix, account or issuer:account
        query: String,
    },
    /// Change the digit count or period of a credential
    Redefine {
        /// Id, id prefix, account or issuer:account
        query: String,
        #[arg(long)]
        digits: Option<u32>,
        #[arg(long)]
        period: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let path = config::resolve_store_path(cli.store.as_deref(), config::home_dir().as_deref());
    tracing::debug!(path = %path.display(), "using credential store");
    let store = Store::new(path);

    let result = match cli.command {
        Commands::List => cli::list::run_list(&store),
        Commands::Watch { ticks } => cli::list::run_watch(&store, ticks),
        Commands::Code { query } => cli::list::run_code(&store, &query),
        Commands::Add(args) => cli::add::run_add(&store, &args),
        Commands::Delete { query } => cli::manage::run_delete(&store, &query),
        Commands::Redefine {
            query,
            digits,
            period,
        } => cli::manage::run_redefine(&store, &query, digits, period),
    };

    if let Err(e) = result {
        let exit_code = match e {
            // Bad input or unusable credentials
            Error::Otp(_) | Error::Uri(_) | Error::Qr(_) | Error::Input(_) => 2,
            Error::Store(StoreError::NotFound(_)) | Error::Store(StoreError::Ambiguous { .. }) => 2,
            // Runtime failures reading or writing the store or clipboard
            Error::Store(_) | Error::Clipboard(_) => 1,
        };

        eprintln!("{}", e);
        std::process::exit(exit_code);
    }
}
