//! # Contact Book CLI (`contacts`)
//!
//! ## Usage
//!
//! ```bash
//! contacts --config ./config/contacts.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `contacts init` | Create the SQLite database and schema |
//! | `contacts serve` | Start the HTTP API server |
//! | `contacts list` | List contacts, optionally filtered and sorted |
//! | `contacts get <id>` | Print one contact |
//! | `contacts delete <id>` | Delete one contact |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use contact_book::validation::{parse_filters, ListParams};
use contact_book::{commands, config, logging, migrate, server};

/// Contact Book CLI: a personal contact book with a JSON HTTP API.
#[derive(Parser)]
#[command(
    name = "contacts",
    about = "Contact Book: a personal contact book with a JSON HTTP API",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/contacts.toml")]
    config: PathBuf,

    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the `contacts` table.
    /// Running it multiple times is safe.
    Init,

    /// Start the HTTP API server on `[server].bind`.
    Serve,

    /// List contacts.
    List {
        /// Only contacts in this group (family, colleagues, friends, doctors, others).
        #[arg(long)]
        group: Option<String>,

        /// Case-insensitive text matched against name, phone, email and position.
        #[arg(long)]
        search: Option<String>,

        /// Sort field: `lastName` or `firstName`.
        #[arg(long)]
        sort_by: Option<String>,

        /// Sort descending.
        #[arg(long, requires = "sort_by")]
        desc: bool,
    },

    /// Print one contact.
    Get {
        /// Contact id.
        id: i64,
    },

    /// Delete one contact.
    Delete {
        /// Contact id.
        id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::List {
            group,
            search,
            sort_by,
            desc,
        } => {
            let params = ListParams {
                group,
                search_term: search,
                sort_by,
                sort_direction: desc.then(|| "desc".to_string()),
            };
            let filters = parse_filters(&params)?;
            commands::run_list(&cfg, &filters).await?;
        }
        Commands::Get { id } => {
            commands::run_get(&cfg, id).await?;
        }
        Commands::Delete { id } => {
            commands::run_delete(&cfg, id).await?;
        }
    }

    Ok(())
}
