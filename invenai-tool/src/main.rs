mod commands;
mod config;
mod error;
mod logging;
mod store;

#[cfg(feature = "tui")]
mod dashboard;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use invenai_core::{ItemId, ManualForm};

use crate::commands::{ItemEdit, Remote};
use crate::config::{Overrides, Settings};
use crate::store::StoreType;

#[derive(Parser)]
#[command(name = "inv")]
#[command(about = "AI-assisted inventory management", long_about = None)]
struct Cli {
    /// Server URL for client commands
    #[arg(long, global = true)]
    server: Option<String>,

    /// Store type for `serve`: fjall or rocks
    #[arg(long, global = true)]
    store_type: Option<StoreType>,

    /// Path to the item store for `serve`
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the inventory server
    Serve {
        /// Address to listen on
        #[arg(long)]
        bind: Option<String>,
    },

    /// List all items
    List,

    /// Add an item manually
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Coerced to a non-negative integer; defaults to 1
        #[arg(long)]
        quantity: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },

    /// Suggest item names for a query
    Suggest {
        query: String,

        /// Add the Nth suggestion (1-based)
        #[arg(long)]
        pick: Option<usize>,

        /// Look up a description for the picked suggestion
        #[arg(long, requires = "pick")]
        describe: bool,
    },

    /// Describe and categorize an item by name
    Describe { name: String },

    /// Recognize the item in an image file and add it
    Recognize {
        image: PathBuf,

        /// Print the recognized item without adding it
        #[arg(long)]
        dry_run: bool,
    },

    /// Replace fields of an existing item
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        quantity: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },

    /// Delete an item on the server
    Delete { id: String },

    /// Show aggregate statistics
    Stats,

    #[cfg(feature = "tui")]
    /// Open the interactive dashboard
    Dashboard,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let bind = match &cli.command {
        Command::Serve { bind } => bind.clone(),
        _ => None,
    };
    let settings = Settings::load(Overrides {
        server: cli.server,
        store_type: cli.store_type,
        store_path: cli.store,
        bind,
    });

    #[cfg(feature = "tui")]
    let interactive = matches!(cli.command, Command::Dashboard);
    #[cfg(not(feature = "tui"))]
    let interactive = false;
    if !interactive {
        logging::init_tracing(settings.log_json);
    }

    let remote = Remote::connect(&settings.server);

    match cli.command {
        Command::Serve { .. } => commands::serve(&settings).await?,
        Command::List => commands::list(&remote).await?,
        Command::Add {
            name,
            description,
            quantity,
            category,
        } => {
            let form = ManualForm {
                name,
                description: description.unwrap_or_default(),
                quantity: quantity.unwrap_or_default(),
                category: category.unwrap_or_default(),
            };
            commands::add(&remote, form).await?
        }
        Command::Suggest {
            query,
            pick,
            describe,
        } => commands::suggest(&remote, &query, pick, describe).await?,
        Command::Describe { name } => commands::describe(&remote, &name).await?,
        Command::Recognize { image, dry_run } => {
            commands::recognize(&remote, &image, dry_run).await?
        }
        Command::Update {
            id,
            name,
            description,
            quantity,
            category,
        } => {
            let edit = ItemEdit {
                name,
                description,
                quantity,
                category,
            };
            commands::update(&remote, ItemId::new(id), edit).await?
        }
        Command::Delete { id } => commands::delete(&remote, ItemId::new(id)).await?,
        Command::Stats => commands::stats(&remote).await?,
        #[cfg(feature = "tui")]
        Command::Dashboard => dashboard::run(remote).await?,
    }

    Ok(())
}
