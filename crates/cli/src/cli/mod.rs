// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use args::EntryArgs;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "prodq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first production entry client")]
#[command(
    long_about = "Capture production entries from the shop floor.\n\n    Entries are submitted directly when the API is reachable and queued locally     otherwise. Queued entries are submitted by 'prodq sync' or automatically by     'prodq watch' when connectivity returns."
)]
pub struct Cli {
    /// State directory holding config, queue, and logs
    #[arg(long, global = true, value_name = "path")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default config file to the state directory
    Init {
        /// API base URL to store in the config
        #[arg(long, value_name = "url")]
        api_url: Option<String>,
    },

    /// Log in and store the access token for later submissions
    #[command(after_help = "The password is taken from --password, then PRODQ_PASSWORD, then the
first line of stdin.

Examples:
  prodq login -u operator1
  echo \"$PASS\" | prodq login -u operator1")]
    Login {
        /// Account name
        #[arg(long, short = 'u', value_name = "name")]
        username: String,

        /// Password; visible to other local users, prefer PRODQ_PASSWORD
        #[arg(long, value_name = "password")]
        password: Option<String>,
    },

    /// Submit a production entry, queuing it if the API is unreachable
    #[command(after_help = "Examples:
  prodq submit -m M-001 -p \"Widget A\" -q 50 -s morning
  prodq submit -m M-002 -p Bolt -q 120 -s night --date 2024-06-24 --remarks \"late start\"")]
    Submit {
        #[command(flatten)]
        entry: EntryArgs,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Inspect or edit the offline queue
    #[command(subcommand)]
    Queue(QueueCommand),

    /// Submit queued entries now, if the API is reachable
    Sync {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Watch connectivity and sync whenever it returns (until Ctrl-C)
    Watch,

    /// Show connectivity and pending entry count
    Status {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

#[derive(Subcommand, Debug)]
pub enum QueueCommand {
    /// List queued entries, oldest first
    List {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show one queued entry
    Show {
        /// Local id of the entry
        id: String,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Remove entries from the queue without submitting them
    #[command(arg_required_else_help = true)]
    Discard {
        /// Local ids of the entries
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

impl Command {
    /// Whether this command runs until interrupted.
    pub fn is_long_running(&self) -> bool {
        matches!(self, Command::Watch)
    }
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
