//! Order administration commands.

use anyhow::{Context as _, Result};
use playrent_commerce::ids::OrderId;
use playrent_commerce::orders::OrderStatus;
use playrent_storefront::AdminService;

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::status_badge;

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    let admin = AdminService::new(ctx.connect()?);

    match args.command {
        OrdersCommand::List { status } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let mut orders = admin.orders().await?;
            if let Some(status) = status {
                orders.retain(|o| o.status == status);
            }

            if ctx.output.is_json() {
                ctx.output.json(&orders);
                return Ok(());
            }

            ctx.output.header(&format!("Orders ({})", orders.len()));
            let widths = [14, 17, 6, 14, 10];
            ctx.output
                .table_row(&["ID", "CREATED", "ITEMS", "TOTAL", "STATUS"], &widths);
            for order in &orders {
                ctx.output.table_row(
                    &[
                        order.id.as_str(),
                        &order.created_at.format("%Y-%m-%d %H:%M").to_string(),
                        &order.item_count().to_string(),
                        &order.total_price.display(),
                        &status_badge(order.status.display_name()),
                    ],
                    &widths,
                );
            }
            Ok(())
        }
        OrdersCommand::SetStatus { id, status } => {
            let status = parse_status(&status)?;
            let result = admin.set_order_status(&OrderId::new(id), status).await;
            ctx.flush_notifications();
            let order = result?;

            if ctx.output.is_json() {
                ctx.output.json(&order);
            } else {
                ctx.output.kv(order.id.as_str(), &status_badge(order.status.display_name()));
            }
            Ok(())
        }
    }
}

fn parse_status(input: &str) -> Result<OrderStatus> {
    OrderStatus::from_str(input).with_context(|| {
        format!(
            "Unknown status '{}': use Pending, Processing, Paid, Delivered or Cancelled",
            input
        )
    })
}
