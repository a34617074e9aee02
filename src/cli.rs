//! Command-line arguments

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "anylist")]
#[command(version, about = "Manage AnyList shopping lists from the terminal")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable coloured output (also honours NO_COLOR)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log debug information to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Without a command an interactive menu starts (terminal only)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Log in and store credentials
    Auth {
        /// Account email (prompted for when omitted)
        #[arg(long)]
        email: Option<String>,

        /// Account password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Remove stored credentials
    Logout,

    /// Show the account in use
    Whoami,

    /// Show all lists
    Lists,

    /// Show the items of a list
    Items {
        /// List name (case-insensitive)
        list: String,

        /// Hide checked items
        #[arg(long)]
        unchecked: bool,
    },

    /// Add an item to a list, or bring back an existing one
    Add {
        /// List name (case-insensitive)
        list: String,

        /// Item name
        item: String,

        /// Quantity, free text ("2", "1 lb")
        #[arg(long, short)]
        quantity: Option<String>,

        /// Category name, see `anylist categories`
        #[arg(long, short)]
        category: Option<String>,

        /// Notes shown under the item
        #[arg(long, short)]
        notes: Option<String>,
    },

    /// Mark an item as checked
    Check {
        list: String,
        item: String,
    },

    /// Mark an item as not checked
    Uncheck {
        list: String,
        item: String,
    },

    /// Delete an item from a list
    Remove {
        list: String,
        item: String,
    },

    /// Delete every checked item from a list
    Clear {
        list: String,
    },

    /// Show the available categories
    Categories,
}
