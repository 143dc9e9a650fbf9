//! Catalog browsing and product administration.

use anyhow::{bail, Context as _, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use playrent_commerce::catalog::{Product, TransactionType};
use playrent_commerce::form::{Field, FormStep};
use playrent_commerce::ids::ProductId;
use playrent_commerce::search::{CatalogQuery, Filter, SortOption};
use playrent_storefront::editor::is_validation;
use playrent_storefront::{AdminService, CatalogBrowser, ProductEditor, StorefrontError};

use super::{ProductsArgs, ProductsCommand};
use crate::context::Context;
use crate::output::price_tag;

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ProductsCommand::List {
            search,
            category,
            page,
            limit,
            sort,
            transaction,
            game_type,
            age,
            discounted,
        } => {
            let limit = limit.unwrap_or(ctx.config.storefront.page_size);
            let mut query = CatalogQuery::new()
                .with_pagination(page, limit)
                .with_sort(parse_sort(&sort)?);
            if let Some(search) = search {
                query = query.with_search(search);
            }
            if let Some(category) = category {
                query = query.with_category(category);
            }
            if let Some(transaction) = transaction {
                query = query.with_filter(Filter::Transaction(parse_transaction(&transaction)?));
            }
            if let Some(tag) = game_type {
                query = query.with_filter(Filter::game_type(tag));
            }
            if let Some(tag) = age {
                query = query.with_filter(Filter::age_restriction(tag));
            }
            if discounted {
                query = query.with_filter(Filter::Discounted);
            }
            list_products(&query, ctx).await
        }
        ProductsCommand::Show { id } => show_product(&ProductId::new(id), ctx).await,
        ProductsCommand::Create { fresh } => create_product(fresh, ctx).await,
        ProductsCommand::Update { id, set } => update_product(&ProductId::new(id), &set, ctx).await,
        ProductsCommand::Delete { id, yes } => delete_product(&ProductId::new(id), yes, ctx).await,
    }
}

async fn list_products(query: &CatalogQuery, ctx: &Context) -> Result<()> {
    let browser = CatalogBrowser::new(ctx.connect()?);

    let spinner = ctx.output.spinner("Loading products...");
    let results = browser.browse(query).await;
    spinner.finish_and_clear();
    let results = results?;

    if ctx.output.is_json() {
        ctx.output.json(&results);
        return Ok(());
    }

    ctx.output.header(&format!(
        "Products (page {} of {}, {} total)",
        results.pagination.page,
        results.pagination.total_pages.max(1),
        results.pagination.total
    ));

    if results.items.is_empty() {
        ctx.output.info("No products match");
        return Ok(());
    }

    let widths = [14, 28, 6, 24];
    ctx.output.table_row(&["ID", "NAME", "TYPE", "PRICE"], &widths);
    for product in &results.items {
        let price = product
            .display_price()
            .map(|p| p.display())
            .unwrap_or_else(|| "-".to_string());
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &product.name,
                product.transaction_mode.as_str(),
                &price,
            ],
            &widths,
        );
    }

    if results.pagination.has_next {
        ctx.output.info(&format!(
            "More results: --page {}",
            results.pagination.page + 1
        ));
    }
    Ok(())
}

async fn show_product(id: &ProductId, ctx: &Context) -> Result<()> {
    let product = CatalogBrowser::new(ctx.connect()?).product(id).await?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    print_product(&product, ctx);
    Ok(())
}

fn print_product(product: &Product, ctx: &Context) {
    ctx.output.header(&product.name);
    ctx.output.kv("id", product.id.as_str());
    ctx.output.kv("type", product.transaction_mode.as_str());
    if !product.game_type.is_empty() {
        ctx.output.kv("game type", &product.game_type);
    }
    if !product.age_restriction.is_empty() {
        ctx.output.kv("age", &product.age_restriction);
    }
    if product.is_discounted() {
        ctx.output
            .kv("discount", &format!("{}%", product.discount_percentage));
    }
    for transaction in [TransactionType::Sale, TransactionType::Rent] {
        if !product.supports(transaction) {
            continue;
        }
        if let Ok(price) = product.effective_price(transaction) {
            let tag = price_tag(product.list_price(transaction), price);
            match transaction {
                TransactionType::Sale => ctx.output.kv("sale price", &tag),
                TransactionType::Rent => {
                    let (min, max) = product.rental_limits();
                    ctx.output.kv(
                        "rental",
                        &format!("{} per day, {}-{} days", tag, min, max),
                    );
                }
            }
        }
    }
    if !product.description.is_empty() {
        ctx.output.info(&product.description);
    }
}

async fn create_product(fresh: bool, ctx: &Context) -> Result<()> {
    let state = ctx.connect()?;
    let mut editor = ProductEditor::create(state)?;
    if fresh {
        editor.discard()?;
    } else if !editor.form().draft().value(Field::ProductName).is_empty() {
        ctx.output.info(&format!(
            "Resuming saved draft at the {} step",
            editor.step().display_name()
        ));
    }

    let theme = ColorfulTheme::default();
    loop {
        let step = editor.step();
        ctx.output.step(step.index() + 1, FormStep::ALL.len(), step.display_name());

        if step != FormStep::Review {
            prompt_fields(&mut editor, &theme, ctx)?;
            match editor.next_step() {
                Ok(_) => {}
                Err(e) if is_validation(&e) => report_errors(&editor, ctx),
                Err(e) => return Err(e.into()),
            }
            ctx.flush_notifications();
            continue;
        }

        print_review(&editor, ctx);
        let actions = ["Submit", "Back", "Save draft and quit", "Discard"];
        let choice = Select::with_theme(&theme)
            .with_prompt("What next?")
            .items(&actions)
            .default(0)
            .interact()?;

        match choice {
            0 => match editor.submit().await {
                Ok(product) => {
                    ctx.flush_notifications();
                    ctx.output.kv("id", product.id.as_str());
                    return Ok(());
                }
                Err(e) if is_validation(&e) => {
                    report_errors(&editor, ctx);
                    if let Some(field) = editor.form().focus() {
                        editor.jump_to(field.step())?;
                    }
                }
                Err(e) => {
                    ctx.flush_notifications();
                    ctx.output.debug(&format!("{:#}", e));
                    let retry = Confirm::with_theme(&theme)
                        .with_prompt("Try again?")
                        .default(true)
                        .interact()?;
                    if !retry {
                        ctx.output.info("Draft saved");
                        return Ok(());
                    }
                }
            },
            1 => {
                editor.prev_step()?;
            }
            2 => {
                ctx.output.info("Draft saved");
                return Ok(());
            }
            _ => {
                editor.discard()?;
                ctx.output.info("Draft discarded");
                return Ok(());
            }
        }
    }
}

/// Ask for every field on the current step, keeping the current value as
/// the default.
fn prompt_fields(editor: &mut ProductEditor, theme: &ColorfulTheme, ctx: &Context) -> Result<()> {
    for field in editor.form().current_fields() {
        loop {
            let current = editor.form().draft().value(field);
            let input: String = Input::with_theme(theme)
                .with_prompt(prompt_label(field))
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()?;

            match editor.set_field(field, &input) {
                Ok(()) => break,
                Err(e) if is_validation(&e) => report_errors(editor, ctx),
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}

fn prompt_label(field: Field) -> String {
    match field {
        Field::ProductType => format!("{} (SALE, RENT, BOTH)", field.label()),
        _ => field.label().to_string(),
    }
}

fn report_errors(editor: &ProductEditor, ctx: &Context) {
    for error in editor.form().errors().iter() {
        ctx.output
            .warn(&format!("{}: {}", error.field.label(), error.message));
    }
}

fn print_review(editor: &ProductEditor, ctx: &Context) {
    let form = editor.form();
    let mode = form.draft().product_type;
    ctx.output.header("Review");
    for field in Field::ALL {
        if !field.applies_to(mode) {
            continue;
        }
        let value = form.draft().value(field);
        if !value.is_empty() {
            ctx.output.kv(field.label(), &value);
        }
    }
}

async fn update_product(id: &ProductId, assignments: &[String], ctx: &Context) -> Result<()> {
    if assignments.is_empty() {
        bail!("Nothing to update. Pass FIELD=VALUE pairs, e.g. pricing.salePrice=39.99");
    }

    let state = ctx.connect()?;
    let mut editor = ProductEditor::edit(state, id).await?;
    for assignment in assignments {
        let (path, value) = parse_assignment(assignment)?;
        let field = Field::from_path(path)
            .with_context(|| format!("Unknown field: {}", path))?;
        editor.set_field(field, value).map_err(|e| field_error(e, &editor))?;
    }

    editor.jump_to(FormStep::Review)?;
    let product = editor
        .submit()
        .await
        .map_err(|e| field_error(e, &editor));
    ctx.flush_notifications();
    let product = product?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
    } else {
        print_product(&product, ctx);
    }
    Ok(())
}

fn parse_assignment(assignment: &str) -> Result<(&str, &str)> {
    match assignment.split_once('=') {
        Some((path, value)) if !path.trim().is_empty() => Ok((path.trim(), value)),
        _ => bail!("Expected FIELD=VALUE, got '{}'", assignment),
    }
}

/// Spell out every failing field when the error is a validation failure.
fn field_error(error: StorefrontError, editor: &ProductEditor) -> anyhow::Error {
    if !is_validation(&error) {
        return error.into();
    }
    let details: Vec<String> = editor
        .form()
        .errors()
        .iter()
        .map(|e| format!("{}: {}", e.field.path(), e.message))
        .collect();
    anyhow::anyhow!("Invalid product: {}", details.join("; "))
}

async fn delete_product(id: &ProductId, yes: bool, ctx: &Context) -> Result<()> {
    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete product {}?", id))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    let result = AdminService::new(ctx.connect()?).delete_product(id).await;
    ctx.flush_notifications();
    result?;
    Ok(())
}

fn parse_sort(input: &str) -> Result<SortOption> {
    SortOption::from_str(input).with_context(|| {
        format!(
            "Unknown sort '{}': use newest, price-asc, price-desc, name-asc, name-desc or discount",
            input
        )
    })
}

fn parse_transaction(input: &str) -> Result<TransactionType> {
    TransactionType::from_str(input)
        .with_context(|| format!("Unknown transaction type '{}': use sale or rent", input))
}
