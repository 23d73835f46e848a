//! Social OutCast CLI - the storefront cart from a terminal.
//!
//! Every invocation is one page load against a file-backed origin directory:
//! it reads the persisted cart, applies one command and writes it back.
//! `watch` stays open like a second tab and redraws whenever another
//! invocation changes the cart.
//!
//! # Usage
//!
//! ```bash
//! # Add a product (size defaults to M)
//! outcast add "Outcast Tee" --price "GHS 120.00" --size L --image img/tee.jpg
//!
//! # Change a quantity by row position or by name
//! outcast qty 0 -1
//! outcast qty "Outcast Tee" 2 --size L
//!
//! # Show the cart
//! outcast show
//! outcast show --html
//!
//! # Follow changes made by other invocations
//! outcast watch
//! ```
//!
//! # Commands
//!
//! - `add` - Add one unit of a product
//! - `qty` - Change a line's quantity by a signed delta
//! - `remove` - Remove a line
//! - `clear` - Empty the cart
//! - `show` - Print the cart as a table, HTML fragments or slot JSON
//! - `count` - Print the cart counter badge value
//! - `checkout` - Run the simulated checkout
//! - `watch` - Redraw the cart whenever another context changes it

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use outcast_storefront::StorefrontConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "outcast")]
#[command(author, version, about = "Social OutCast storefront cart")]
struct Cli {
    /// Origin directory holding the persisted cart (overrides `OUTCAST_STORAGE_DIR`)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product
    Add {
        /// Product name
        name: String,

        /// Price as displayed, e.g. "GHS 25.00" (unreadable text counts as 0)
        #[arg(short, long)]
        price: String,

        /// Size label (defaults to M)
        #[arg(short, long)]
        size: Option<String>,

        /// Image reference shown in the cart and toast
        #[arg(short, long, default_value = "")]
        image: String,
    },
    /// Change a line's quantity; the line is removed at zero
    Qty {
        /// Row position from `show`, or product name (a number is read as a
        /// position while that row exists)
        item: String,

        /// Signed change, e.g. 1 or -1
        #[arg(allow_hyphen_values = true)]
        delta: i64,

        /// Size of the line when addressing it by name
        #[arg(short, long)]
        size: Option<String>,
    },
    /// Remove a line regardless of quantity
    Remove {
        /// Row position from `show`, or product name (a number is read as a
        /// position while that row exists)
        item: String,

        /// Size of the line when addressing it by name
        #[arg(short, long)]
        size: Option<String>,
    },
    /// Empty the cart
    Clear,
    /// Print the cart
    Show {
        /// Print the cart item, summary and badge HTML fragments
        #[arg(long, conflicts_with = "json")]
        html: bool,

        /// Print the persisted slot JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the total quantity shown on the cart badge
    Count,
    /// Run the simulated checkout
    Checkout,
    /// Redraw the cart whenever another context changes it
    Watch,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays clean for command output.
///
/// `RUST_LOG` overrides the default filter; `OUTCAST_LOG_FORMAT=json` switches
/// to JSON lines.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "outcast_storefront=info,outcast_cli=info".into());

    let json = std::env::var("OUTCAST_LOG_FORMAT").is_ok_and(|format| format == "json");

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(dir) = cli.dir {
        config.storage_dir = dir;
    }

    let page = commands::Page::open(config)?;

    match cli.command {
        Commands::Add {
            name,
            price,
            size,
            image,
        } => commands::cart::add(&page, &name, &price, size, image),
        Commands::Qty { item, delta, size } => {
            commands::cart::change_quantity(&page, &item, size.as_deref(), delta)?;
        }
        Commands::Remove { item, size } => {
            commands::cart::remove(&page, &item, size.as_deref())?;
        }
        Commands::Clear => commands::cart::clear(&page),
        Commands::Show { html, json } => {
            let format = if html {
                commands::cart::Format::Html
            } else if json {
                commands::cart::Format::Json
            } else {
                commands::cart::Format::Table
            };
            commands::cart::show(&page, format)?;
        }
        Commands::Count => commands::cart::count(&page),
        Commands::Checkout => commands::checkout::run(&page).await?,
        Commands::Watch => commands::watch::run(&page).await,
    }
    Ok(())
}
