//! Admin dashboard.

use anyhow::Result;
use playrent_storefront::AdminService;

use super::DashboardArgs;
use crate::context::Context;
use crate::output::status_badge;

/// Run the dashboard command.
pub async fn run(args: DashboardArgs, ctx: &Context) -> Result<()> {
    let admin = AdminService::new(ctx.connect()?);

    let spinner = ctx.output.spinner("Loading orders and products...");
    let summary = admin.dashboard(args.top).await;
    spinner.finish_and_clear();
    let summary = summary?;

    if ctx.output.is_json() {
        ctx.output.json(&summary);
        return Ok(());
    }

    ctx.output.header("Dashboard");
    ctx.output.kv("revenue", &summary.revenue.display());
    ctx.output.kv("orders", &summary.order_count.to_string());
    ctx.output
        .kv("average order", &summary.average_order_value.display());
    ctx.output
        .kv("discounted products", &summary.discounted_products.to_string());

    ctx.output.header("Orders by status");
    for (status, count) in &summary.orders_by_status {
        ctx.output.kv(&status_badge(status.display_name()), &count.to_string());
    }

    ctx.output.header("Products by type");
    for (mode, count) in &summary.products_by_mode {
        ctx.output.kv(mode.as_str(), &count.to_string());
    }

    if !summary.top_products.is_empty() {
        ctx.output.header("Best sellers");
        for (rank, sales) in summary.top_products.iter().enumerate() {
            ctx.output.list_item(&format!(
                "{}. {} ({} units)",
                rank + 1,
                sales.product_name,
                sales.units
            ));
        }
    }
    Ok(())
}
