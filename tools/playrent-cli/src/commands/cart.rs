//! Cart commands.

use anyhow::{bail, Result};
use playrent_commerce::cart::Cart;
use playrent_commerce::catalog::TransactionType;
use playrent_commerce::ids::{CartItemId, ProductId};
use playrent_storefront::{CartItemUpdate, CartStore, CatalogBrowser, SyncOutcome};

use super::{parse_date, parse_optional_date, CartArgs, CartCommand};
use crate::context::Context;
use crate::output::price_tag;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let store = CartStore::new(ctx.connect()?);

    match args.command {
        CartCommand::Show => {
            let cart = store.load().await?;
            show_cart(&cart, &store, ctx)
        }
        CartCommand::Add {
            product_id,
            rent,
            quantity,
            start,
            end,
        } => {
            let transaction = if rent {
                TransactionType::Rent
            } else {
                TransactionType::Sale
            };
            let start = parse_optional_date(start.as_deref())?;
            let end = parse_optional_date(end.as_deref())?;

            let product = CatalogBrowser::new(ctx.connect()?)
                .product(&ProductId::new(product_id))
                .await?;
            store.load().await?;
            let outcome = store
                .add_to_cart(product, transaction, quantity, start, end)
                .await;
            settle(outcome, &store, ctx)
        }
        CartCommand::Update {
            item_id,
            quantity,
            start,
            end,
        } => {
            let update = CartItemUpdate {
                quantity,
                rental_start: start.as_deref().map(parse_date).transpose()?,
                rental_end: end.as_deref().map(parse_date).transpose()?,
            };
            if update.is_empty() {
                bail!("Nothing to update. Pass --quantity, --start or --end");
            }
            store.load().await?;
            let outcome = store
                .update_cart_item(&CartItemId::new(item_id), update)
                .await;
            settle(outcome, &store, ctx)
        }
        CartCommand::Remove { item_id } => {
            store.load().await?;
            let outcome = store.remove_from_cart(&CartItemId::new(item_id)).await;
            settle(outcome, &store, ctx)
        }
    }
}

/// Report how a mutation ended and show the resulting cart.
fn settle(outcome: SyncOutcome, store: &CartStore, ctx: &Context) -> Result<()> {
    ctx.flush_notifications();
    match outcome {
        SyncOutcome::Applied => show_cart(&store.cart(), store, ctx),
        SyncOutcome::Rejected(_) => bail!("Cart unchanged"),
        SyncOutcome::RolledBack(class) => bail!("Cart change undone ({})", class.as_str()),
        SyncOutcome::Superseded(class) => {
            bail!("Cart change failed after a newer change ({})", class.as_str())
        }
    }
}

fn show_cart(cart: &Cart, store: &CartStore, ctx: &Context) -> Result<()> {
    let pricing = store.pricing()?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "cart": cart, "pricing": pricing }));
        return Ok(());
    }

    ctx.output.header("Cart");
    if cart.items.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    let widths = [14, 24, 5, 4, 8, 20];
    ctx.output
        .table_row(&["ITEM", "PRODUCT", "TYPE", "QTY", "DAYS", "TOTAL"], &widths);
    for (item, line) in cart.items.iter().zip(pricing.line_items.iter()) {
        let days = line
            .rental_days
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let total = price_tag(Some(line.gross), line.total);
        ctx.output.table_row(
            &[
                item.id.as_str(),
                &item.product.name,
                item.transaction_type.as_str(),
                &item.quantity.to_string(),
                &days,
                &total,
            ],
            &widths,
        );
    }

    ctx.output.kv("subtotal", &pricing.gross_subtotal.display());
    if pricing.has_discounts() {
        ctx.output.kv(
            "discounts",
            &format!(
                "-{} ({:.0}%)",
                pricing.discount_total.display(),
                pricing.discount_percentage()
            ),
        );
    }
    ctx.output.kv("total", &pricing.grand_total.display());
    Ok(())
}
