use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;

use ssh_keypair::cli::{self, generate::GenerateOptions};
use ssh_keypair::error::Result;
use ssh_keypair::logging;

#[derive(Parser)]
#[command(name = "ssh-keypair")]
#[command(version)]
#[command(about = "Generate OpenSSH key pairs (Ed25519, falling back to RSA-4096)", long_about = None)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new key pair
    Generate {
        /// Comment embedded in both keys (e.g. user@host)
        #[arg(short = 'C', long, default_value = "")]
        comment: String,

        /// Generate RSA-4096 even if Ed25519 is available
        #[arg(long)]
        rsa: bool,

        /// Directory to write the key files to [default: ~/.ssh]
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Overwrite existing key files without asking
        #[arg(short, long)]
        force: bool,

        /// Print the keys to stdout instead of writing files
        #[arg(long)]
        print: bool,

        /// With --print, emit JSON
        #[arg(long, requires = "print")]
        json: bool,

        /// Also add the public key to authorized_keys (with --print, no key files are written)
        #[arg(long)]
        authorize: bool,

        /// SSH directory holding authorized_keys [default: ~/.ssh]
        #[arg(long, requires = "authorize")]
        ssh_dir: Option<PathBuf>,
    },

    /// Check whether Ed25519 keys can be generated
    Probe,

    /// Show the SHA256 fingerprint of a public key file
    Fingerprint {
        /// Public key file (e.g. ~/.ssh/id_ed25519.pub)
        file: PathBuf,
    },

    /// Show the structure of an unencrypted OpenSSH private key
    Inspect {
        /// Private key file (e.g. ~/.ssh/id_ed25519)
        file: PathBuf,
    },

    /// Add a public key to authorized_keys with restricted options
    Authorize {
        /// Public key file to add
        file: PathBuf,

        /// SSH directory holding authorized_keys [default: ~/.ssh]
        #[arg(long)]
        ssh_dir: Option<PathBuf>,
    },

    /// List keys added by this tool to authorized_keys
    List {
        /// SSH directory holding authorized_keys [default: ~/.ssh]
        #[arg(long)]
        ssh_dir: Option<PathBuf>,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Generate {
            comment,
            rsa,
            out,
            force,
            print,
            json,
            authorize,
            ssh_dir,
        } => cli::generate::run(GenerateOptions {
            comment,
            rsa,
            out_dir: out,
            force,
            print,
            json,
            authorize,
            ssh_dir,
        }),
        Commands::Probe => cli::probe::run(),
        Commands::Fingerprint { file } => cli::fingerprint::run(&file),
        Commands::Inspect { file } => cli::inspect::run(&file),
        Commands::Authorize { file, ssh_dir } => cli::authorize::run(&file, ssh_dir),
        Commands::List { ssh_dir, json } => cli::list::run(ssh_dir, json),
    }
}
