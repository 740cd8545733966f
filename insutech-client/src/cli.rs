use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "insutech")]
#[command(about = "Headless client for the Insutech policy and user services")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
    /// Path to a TOML config file (falls back to INSUTECH_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// What to list (policies if omitted)
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every policy
    Policies {
        /// Column to sort by, e.g. premiumAmount or lastName
        #[arg(long, value_name = "FIELD")]
        sort: Option<String>,
    },
    /// List users, optionally narrowed by a search term
    Users {
        /// Matches username, email or role
        term: Option<String>,
    },
}

impl Cli {
    /// The requested listing, defaulting to all policies.
    pub fn listing(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Policies { sort: None })
    }
}
