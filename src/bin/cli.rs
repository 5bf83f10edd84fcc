//! kvsql CLI
//!
//! Command-line interface over a single kvsql table. Keys are text, values
//! are JSON.

use clap::{Parser, Subcommand};
use kvsql::{Config, Store};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// kvsql CLI
#[derive(Parser, Debug)]
#[command(name = "kvsql-cli")]
#[command(about = "CLI for the kvsql key-value store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./kvsql_data")]
    data_dir: String,

    /// Database name
    #[arg(long, default_value = "kvsql")]
    db: String,

    /// Table name
    #[arg(short, long, default_value = "kv")]
    table: String,

    /// Log store activity to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Put {
        /// The key to set
        key: String,

        /// The value to set (JSON; anything else is stored as a string)
        value: String,
    },

    /// Remove a key
    Remove {
        /// The key to remove
        key: String,
    },

    /// Check whether a key exists
    Contains {
        /// The key to look up
        key: String,
    },

    /// Count rows
    Size,

    /// Check whether the table is empty
    IsEmpty,

    /// Delete every row
    Clear,

    /// List all keys
    Keys,

    /// List all values
    Values,

    /// Print all entries as a JSON object
    Entries,

    /// Drop the table
    DropTable,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "info,kvsql=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("kvsql CLI v{}", kvsql::VERSION);

    if let Err(e) = run(args).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> kvsql::Result<()> {
    let config = Config::builder().data_dir(&args.data_dir).build();

    let mut store: Store<String, Value> = Store::with_config(config, args.db, args.table)?;

    // Dropping a table must not recreate it first
    match args.command {
        Commands::DropTable => store.connect()?,
        _ => store.initialize().await?,
    }

    match args.command {
        Commands::Get { key } => match store.get(&key).await? {
            Some(value) => println!("{}", value),
            None => {
                println!("(not found)");
            }
        },
        Commands::Put { key, value } => {
            let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            store.put(&key, &value).await?;
            println!("OK");
        }
        Commands::Remove { key } => {
            store.remove(&key).await?;
            println!("OK");
        }
        Commands::Contains { key } => println!("{}", store.contains_key(&key).await?),
        Commands::Size => println!("{}", store.size().await?),
        Commands::IsEmpty => println!("{}", store.is_empty().await?),
        Commands::Clear => {
            store.clear().await?;
            println!("OK");
        }
        Commands::Keys => {
            for key in store.keys().await? {
                println!("{}", key);
            }
        }
        Commands::Values => {
            for value in store.values().await? {
                println!("{}", value);
            }
        }
        Commands::Entries => {
            let entries: serde_json::Map<String, Value> = store.entries().await?.into_iter().collect();
            println!("{}", Value::Object(entries));
        }
        Commands::DropTable => {
            store.remove_table().await?;
            println!("OK");
        }
    }

    store.close();
    Ok(())
}
