// CLI interface
pub mod commands;

use crate::error::Result;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Default)]
#[command(name = "sso-status")]
#[command(about = "Menu bar status for cached AWS SSO sessions", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remember which profile the menu bar should monitor
    SelectProfile {
        /// Profile name, stored as given
        #[arg(allow_hyphen_values = true)]
        name: Option<String>,

        /// Extra arguments from the host, ignored
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        rest: Vec<String>,
    },

    /// Print the session status
    Status {
        /// Output in JSON format for scripting
        #[arg(long)]
        json: bool,
    },
}

pub fn execute(args: Cli) -> Result<()> {
    match args.command {
        Some(Commands::SelectProfile { name, .. }) => commands::select_profile::execute(name),
        Some(Commands::Status { json }) => commands::status::execute(json),
        // No command: the plugin poll
        None => commands::status::execute(false),
    }
}
