//! # Contact Manager CLI (`contacts`)
//!
//! The `contacts` binary initializes the contact collection, runs the HTTP
//! server, and exposes every contact operation from the command line.
//!
//! ## Usage
//!
//! ```bash
//! contacts [--config ./contacts.toml] <command>
//! ```
//!
//! Settings are read from the environment (`DB_URI`, `DB_NAME`,
//! `COLLECTION_NAME`, `BIND_ADDR`, `STRICT_STATUS`), a `.env` file in the
//! working directory, and the optional `--config` TOML file.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `contacts init` | Create the database and collection |
//! | `contacts serve` | Start the HTTP server |
//! | `contacts list` | Print all contacts |
//! | `contacts get <id>` | Print one contact |
//! | `contacts add --name .. --email .. --phone .. --address ..` | Create a contact |
//! | `contacts update <id> --name .. --email .. --phone .. --address ..` | Replace a contact |
//! | `contacts delete <id>` | Delete a contact |
//! | `contacts search <query>` | Case-insensitive substring search |

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use contact_manager::{commands, config, migrate, server};
use contact_manager_core::models::ContactFields;

/// Contact Manager CLI: CRUD and search over a contact collection.
#[derive(Parser)]
#[command(
    name = "contacts",
    about = "Contact Manager: CRUD and search over a contact collection",
    version
)]
struct Cli {
    /// Optional TOML configuration file. Environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Create the database file and contact collection.
    ///
    /// Idempotent: running it multiple times is safe.
    Init,

    /// Start the HTTP server.
    ///
    /// Binds to `BIND_ADDR` (default `127.0.0.1:8000`) and serves until
    /// Ctrl-C or SIGTERM.
    Serve,

    /// Print all contacts as JSON.
    List,

    /// Print one contact by id.
    Get {
        /// Contact id (UUID).
        id: String,
    },

    /// Create a contact.
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Replace all fields of a contact.
    Update {
        /// Contact id (UUID).
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a contact by id.
    Delete {
        /// Contact id (UUID).
        id: String,
    },

    /// Print contacts containing the query (case-insensitive) in any field.
    Search {
        /// Substring to look for in name, email, phone, and address.
        query: String,
    },
}

/// The four contact fields, all required.
#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
}

impl From<FieldArgs> for ContactFields {
    fn from(args: FieldArgs) -> Self {
        ContactFields {
            name: args.name,
            email: args.email,
            phone: args.phone,
            address: args.address,
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::List => {
            commands::run_list(&cfg).await?;
        }
        Commands::Get { id } => {
            commands::run_get(&cfg, &id).await?;
        }
        Commands::Add { fields } => {
            commands::run_add(&cfg, fields.into()).await?;
        }
        Commands::Update { id, fields } => {
            commands::run_update(&cfg, &id, fields.into()).await?;
        }
        Commands::Delete { id } => {
            commands::run_delete(&cfg, &id).await?;
        }
        Commands::Search { query } => {
            commands::run_search(&cfg, &query).await?;
        }
    }

    Ok(())
}
