use std::path::PathBuf;
use std::process::ExitCode;

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use kdbx_keys::{CipherPolicy, CipherRegistry, Result};

mod cli;

#[derive(Parser)]
#[command(name = "kdbx-keyfile")]
#[command(author = "Oleg")]
#[command(version)]
#[command(about = "Create, inspect and use KeePass-compatible key files", long_about = None)]
struct Cli {
    /// Never use the accelerated AES backend
    #[arg(
        long,
        global = true,
        env = "KDBX_KEYS_PORTABLE",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    portable: bool,

    /// More log output (-v debug, -vv trace); RUST_LOG applies otherwise
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new XML key file
    Create {
        path: PathBuf,

        /// Derive the key from this text instead of the OS random source
        #[arg(long)]
        entropy: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the format and fingerprint of a key file
    Inspect {
        path: PathBuf,

        /// Print a JSON object instead of text
        #[arg(long)]
        json: bool,
    },

    /// Resize a password (or a key file's key) and print it as hex
    Derive {
        /// Output length in bytes
        #[arg(long, default_value_t = 32, value_parser = clap::value_parser!(u32).range(1..=1024))]
        length: u32,

        /// Use the key from this key file instead of prompting for a password
        #[arg(long)]
        key_file: Option<PathBuf>,
    },

    /// Show which AES backend is in use
    Cipher,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let policy = if cli.portable {
        CipherPolicy::PortableOnly
    } else {
        CipherPolicy::Auto
    };
    let registry = CipherRegistry::new(policy);

    match cli.command {
        Commands::Create {
            path,
            entropy,
            force,
        } => cli::create::run(&path, entropy, force),
        Commands::Inspect { path, json } => cli::inspect::run(&path, json),
        Commands::Derive { length, key_file } => {
            cli::derive::run(length as usize, key_file.as_deref())
        }
        Commands::Cipher => cli::cipher::run(&registry),
    }
}
