//! Wishlist commands.

use anyhow::Result;
use playrent_commerce::ids::ProductId;
use playrent_storefront::{CatalogBrowser, WishlistService};

use super::{WishlistArgs, WishlistCommand};
use crate::context::Context;

/// Run the wishlist command.
pub async fn run(args: WishlistArgs, ctx: &Context) -> Result<()> {
    let state = ctx.connect()?;
    let wishlist = WishlistService::new(state.clone());

    match args.command {
        WishlistCommand::List => {
            let list = wishlist.list().await?;
            if ctx.output.is_json() {
                ctx.output.json(&list);
                return Ok(());
            }

            ctx.output.header(&format!("Wishlist ({})", list.len()));
            let catalog = CatalogBrowser::new(state);
            for id in &list.product_ids {
                match catalog.product(id).await {
                    Ok(product) => ctx.output.list_item(&format!("{} ({})", product.name, id)),
                    Err(e) => {
                        ctx.output.debug(&format!("{}: {}", id, e));
                        ctx.output.list_item(id.as_str());
                    }
                }
            }
            Ok(())
        }
        WishlistCommand::Toggle { product_id } => {
            let id = ProductId::new(product_id);
            let result = wishlist.toggle(&id).await;
            ctx.flush_notifications();
            let in_wishlist = result?;
            if ctx.output.is_json() {
                ctx.output
                    .json(&serde_json::json!({ "productId": id, "inWishlist": in_wishlist }));
            }
            Ok(())
        }
    }
}
