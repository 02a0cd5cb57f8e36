use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use client::collection::FilterState;
use client::domain::a005_product::ProductCatalog;
use client::domain::http_controller;
use client::gateway::{HttpGateway, ListQuery};
use client::shared::config::{load_config, Config};
use client::system::auth::{do_login, do_logout, restore_session};
use client::system::logging;
use contracts::domain::common::EntityId;
use contracts::domain::{a003_homepage_section, a005_product, schema_by_kind};

#[derive(Parser)]
#[command(name = "catalog-admin")]
#[command(about = "Pet catalog admin: collections, homepage sections and Shopify sync")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and save the session token
    Login { email: String, password: String },
    /// Forget the saved token
    Logout,
    /// Print a collection
    List {
        /// subcategory, page, homepage_section, offer_section or product
        kind: String,
        search: Option<String>,
    },
    /// Re-sync the product catalog from Shopify
    SyncProducts,
    /// Move a homepage section onto another
    ReorderSections { moved: String, target: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize()?;
    let config = load_config()?;

    match cli.command {
        Commands::Login { email, password } => {
            do_login(&config, email, password).await?;
            println!("Logged in");
        }
        Commands::Logout => {
            do_logout(&config)?;
            println!("Logged out");
        }
        Commands::List { kind, search } => list(&config, &kind, search.as_deref()).await?,
        Commands::SyncProducts => sync_products(&config).await?,
        Commands::ReorderSections { moved, target } => {
            reorder_sections(&config, &moved, &target).await?
        }
    }

    Ok(())
}

async fn list(config: &Config, kind: &str, search: Option<&str>) -> anyhow::Result<()> {
    let schema = schema_by_kind(kind).with_context(|| format!("Unknown collection `{}`", kind))?;
    let session = Arc::new(restore_session(config)?);

    if schema.kind == a005_product::SCHEMA.kind {
        let catalog = ProductCatalog::new(Arc::new(HttpGateway::new(session, schema)));
        catalog.search(search.unwrap_or_default()).await?;
        for row in catalog.rows() {
            println!(
                "{}\t{}\t{}\t{}\t{}",
                row.id,
                row.title,
                row.sku.unwrap_or_default(),
                row.price.unwrap_or_default(),
                row.inventory_quantity
                    .map(|q| q.to_string())
                    .unwrap_or_default()
            );
        }
        return Ok(());
    }

    let controller = http_controller(session, schema);
    match (schema.search_param, search) {
        (Some(_), Some(term)) => controller.set_scope(ListQuery::default().with_search(term)),
        (None, Some(term)) => controller.set_filter(FilterState::default().with_search(term)),
        (_, None) => {}
    }
    controller.initialize().await?;

    for entity in controller.filtered() {
        let title = entity.text(schema.display_field).unwrap_or_default();
        let category = schema
            .category_field
            .and_then(|name| entity.field(name))
            .and_then(|value| value.as_key())
            .unwrap_or_default();
        println!("{}\t{}\t{}", entity.id, title, category);
    }
    Ok(())
}

async fn sync_products(config: &Config) -> anyhow::Result<()> {
    let session = Arc::new(restore_session(config)?);
    let catalog = ProductCatalog::new(Arc::new(HttpGateway::new(session, &a005_product::SCHEMA)));

    let response = catalog.sync_with_shopify().await?;
    println!(
        "{} ({} products in catalog)",
        response.message.as_deref().unwrap_or("Products synced"),
        catalog.controller().items().len()
    );
    Ok(())
}

async fn reorder_sections(config: &Config, moved: &str, target: &str) -> anyhow::Result<()> {
    let session = Arc::new(restore_session(config)?);
    let controller = http_controller(session, &a003_homepage_section::SCHEMA);
    controller.initialize().await?;

    let changed = controller
        .reorder(&EntityId::from(moved), &EntityId::from(target))
        .await?;
    if !changed {
        println!("Nothing to move");
    }

    for entity in controller.items() {
        println!(
            "{}\t{}",
            entity.id,
            entity.text(a003_homepage_section::SCHEMA.display_field).unwrap_or_default()
        );
    }
    Ok(())
}
