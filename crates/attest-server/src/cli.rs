//! Command-line interface for the `attest` binary.

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "attest", version, about = "Attest - acceptance test review service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (overrides `database.path`)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Manage situations
    Situation {
        #[command(subcommand)]
        action: SituationCommands,
    },
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address (overrides `server.bind`)
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum UserCommands {
    /// Register a user
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        organization: Option<String>,
        #[arg(long)]
        admin: bool,
    },
    /// Show a user
    Get { id: String },
}

#[derive(Debug, Subcommand)]
pub enum SituationCommands {
    /// Create a draft situation from a JSON payload
    Add {
        /// Owning user id
        #[arg(long)]
        owner: Option<String>,
        /// JSON object, e.g. '{"af": 131.16}'
        #[arg(long, default_value = "{}")]
        payload: String,
    },
    /// Show a situation
    Get { id: String },
}
