//! PlayRent CLI - storefront and admin client for the PlayRent game store.
//!
//! Commands:
//! - `playrent products` - Browse the catalog and manage products
//! - `playrent cart` - View and change the cart
//! - `playrent wishlist` - Star products
//! - `playrent orders` - List orders and move them through their statuses
//! - `playrent dashboard` - Sales figures
//! - `playrent session` - Local sign-in state
//! - `playrent config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    CartArgs, ConfigArgs, DashboardArgs, OrdersArgs, ProductsArgs, SessionArgs, WishlistArgs,
};

/// PlayRent CLI - Buy, rent and manage board games
#[derive(Parser)]
#[command(name = "playrent")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Environment from the config file's [environments] table
    #[arg(short, long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog and manage products
    Products(ProductsArgs),

    /// View and change the cart
    Cart(CartArgs),

    /// Star and unstar products
    Wishlist(WishlistArgs),

    /// List orders and change their status
    Orders(OrdersArgs),

    /// Show sales figures
    Dashboard(DashboardArgs),

    /// Sign in or out locally
    Session(SessionArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(cli.config.as_deref(), cli.env.as_deref(), output.clone())
    {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(&ctx.config.logging, cli.verbose) {
        ctx.output.warn(&format!("{:#}", e));
    }

    let result = match cli.command {
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Wishlist(args) => commands::wishlist::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Dashboard(args) => commands::dashboard::run(args, &ctx).await,
        Commands::Session(args) => commands::session::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    ctx.flush_notifications();
    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
