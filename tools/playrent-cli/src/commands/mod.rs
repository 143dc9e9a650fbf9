//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod session;
pub mod wishlist;

use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// Browse the catalog.
    List {
        /// Search name and description.
        #[arg(short, long)]
        search: Option<String>,

        /// Category sent to the server.
        #[arg(long)]
        category: Option<String>,

        /// Page number (1-indexed).
        #[arg(short, long, default_value = "1")]
        page: i64,

        /// Products per page (default: storefront.page_size).
        #[arg(short, long)]
        limit: Option<i64>,

        /// Sort order: newest, price-asc, price-desc, name-asc, name-desc, discount.
        #[arg(long, default_value = "newest")]
        sort: String,

        /// Only products that can be bought or rented this way (sale, rent).
        #[arg(short = 't', long = "type")]
        transaction: Option<String>,

        /// Game type tag.
        #[arg(long)]
        game_type: Option<String>,

        /// Age restriction tag.
        #[arg(long)]
        age: Option<String>,

        /// Only discounted products.
        #[arg(long)]
        discounted: bool,
    },

    /// Show one product.
    Show {
        /// Product ID.
        id: String,
    },

    /// Create a product with the step-by-step form.
    Create {
        /// Start over instead of resuming the saved draft.
        #[arg(long)]
        fresh: bool,
    },

    /// Edit an existing product.
    Update {
        /// Product ID.
        id: String,

        /// Field assignments (e.g. `productName=Azul`, `pricing.salePrice=39.99`).
        #[arg(value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },

    /// Delete a product.
    Delete {
        /// Product ID.
        id: String,

        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart with its price breakdown.
    Show,

    /// Add a product.
    Add {
        /// Product ID.
        product_id: String,

        /// Rent instead of buy.
        #[arg(long)]
        rent: bool,

        /// Quantity.
        #[arg(short, long, default_value = "1")]
        quantity: i64,

        /// Rental start (YYYY-MM-DD or RFC 3339).
        #[arg(long)]
        start: Option<String>,

        /// Rental end (YYYY-MM-DD or RFC 3339).
        #[arg(long)]
        end: Option<String>,
    },

    /// Change a cart line.
    Update {
        /// Cart item ID.
        item_id: String,

        /// New quantity.
        #[arg(short, long)]
        quantity: Option<i64>,

        /// New rental start.
        #[arg(long)]
        start: Option<String>,

        /// New rental end.
        #[arg(long)]
        end: Option<String>,
    },

    /// Remove a cart line.
    Remove {
        /// Cart item ID.
        item_id: String,
    },
}

/// Arguments for the wishlist command.
#[derive(Args)]
pub struct WishlistArgs {
    #[command(subcommand)]
    pub command: WishlistCommand,
}

#[derive(Subcommand)]
pub enum WishlistCommand {
    /// List starred products.
    List,

    /// Star or unstar a product.
    Toggle {
        /// Product ID.
        product_id: String,
    },
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List orders, newest first.
    List {
        /// Only orders in this status.
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Move an order to a new status.
    SetStatus {
        /// Order ID.
        id: String,

        /// Pending, Processing, Paid, Delivered or Cancelled.
        status: String,
    },
}

/// Arguments for the dashboard command.
#[derive(Args)]
pub struct DashboardArgs {
    /// Number of best sellers to show.
    #[arg(long, default_value_t = playrent_storefront::admin::DEFAULT_TOP_PRODUCTS)]
    pub top: usize,
}

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Remember who is signed in.
    Login {
        /// User ID.
        #[arg(long)]
        id: String,

        /// Display name.
        #[arg(long)]
        name: String,

        /// Email address.
        #[arg(long)]
        email: String,

        /// Sign in with the admin role.
        #[arg(long)]
        admin: bool,
    },

    /// Show the signed-in user.
    Show,

    /// Forget the user and every cached response.
    Logout,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,

    /// Get a configuration value.
    Get {
        /// Configuration key (e.g., api.base_url).
        key: String,
    },

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,

        /// Value to set.
        value: String,
    },

    /// Initialize a new config file.
    Init {
        /// Tenant ID to write into the file.
        #[arg(short, long, default_value = "default")]
        tenant: String,

        /// Overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },

    /// Validate configuration.
    Validate,
}

/// Parse a date as `YYYY-MM-DD` (midnight UTC) or RFC 3339.
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    match DateTime::parse_from_rfc3339(input) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => bail!("Invalid date '{}': expected YYYY-MM-DD or RFC 3339", input),
    }
}

pub fn parse_optional_date(input: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    input.map(parse_date).transpose()
}
