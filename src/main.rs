use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use storefront_lib::commands::{self, CartUpdate, CartView, ProductView};
use storefront_lib::AppController;

#[derive(Debug, Parser)]
#[command(name = "storefront", version, about = "Browse the catalog and manage your cart")]
struct Cli {
    /// Directory holding config.toml, the cart storage file and logs
    #[arg(long, env = "STOREFRONT_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List products, optionally priced in another currency
    Products {
        #[arg(long)]
        currency: Option<String>,
    },
    /// List currencies the catalog can price in
    Currencies,
    /// Show the cart and its subtotal
    Cart,
    /// Add a catalog product to the cart
    Add {
        id: String,
        #[arg(long)]
        currency: Option<String>,
    },
    /// Remove a product from the cart
    Remove { id: String },
    /// Increase a line item's quantity
    Increment { id: String },
    /// Decrease a line item's quantity, removing it at zero
    Decrement { id: String },
    /// Show where config, cart storage and logs live
    Paths,
    /// Apply a raw cart action, e.g. '{"type":"removeFromCart","payload":"3"}'
    Action { json: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let controller = AppController::new(cli.data_dir.as_deref())?;

    match cli.command {
        Command::Products { currency } => {
            let products = match currency {
                Some(code) => commands::select_currency(&controller, code).await,
                None => commands::list_products(&controller).await,
            }
            .map_err(|e| anyhow!(e))?;
            emit(cli.json, &products, print_products)
        }
        Command::Currencies => {
            let currencies = commands::list_currencies(&controller)
                .await
                .map_err(|e| anyhow!(e))?;
            emit(cli.json, &currencies, |list| println!("{}", list.join("\n")))
        }
        Command::Paths => {
            let paths = commands::get_paths(&controller)
                .ok_or_else(|| anyhow!("no data directory in use"))?;
            emit(cli.json, &paths, |p| {
                println!("config  {}", p.config_path);
                println!("data    {}", p.data_dir);
                println!("logs    {}", p.logs_dir);
            })
        }
        Command::Cart => emit(cli.json, &commands::get_cart(&controller), print_cart),
        Command::Add { id, currency } => {
            // Line items copy the catalog entry, so fetch it in the wanted currency first
            let _catalog = match currency {
                Some(code) => commands::select_currency(&controller, code).await,
                None => commands::list_products(&controller).await,
            }
            .map_err(|e| anyhow!(e))?;
            let update = commands::add_product_by_id(&controller, id).map_err(|e| anyhow!(e))?;
            emit(cli.json, &update, print_update)
        }
        Command::Remove { id } => {
            let update = commands::remove_from_cart(&controller, id).map_err(|e| anyhow!(e))?;
            emit(cli.json, &update, print_update)
        }
        Command::Increment { id } => {
            let update = commands::increment_quantity(&controller, id).map_err(|e| anyhow!(e))?;
            emit(cli.json, &update, print_update)
        }
        Command::Decrement { id } => {
            let update = commands::decrement_quantity(&controller, id).map_err(|e| anyhow!(e))?;
            emit(cli.json, &update, print_update)
        }
        Command::Action { json } => {
            let update = commands::dispatch_action(&controller, json).map_err(|e| anyhow!(e))?;
            emit(cli.json, &update, print_update)
        }
    }
}

fn emit<T: Serialize>(json: bool, value: &T, human: impl Fn(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human(value);
    }
    Ok(())
}

fn print_products(products: &Vec<ProductView>) {
    if products.is_empty() {
        println!("No products at this time");
        return;
    }
    for product in products {
        let marker = if product.requires_personalization { " *" } else { "" };
        println!("{:>6}  {:<40} {}{}", product.id, product.title, product.formatted_price, marker);
    }
}

fn print_cart(cart: &CartView) {
    if cart.is_empty() {
        println!("There are no items in your cart.");
        return;
    }
    for item in &cart.items {
        println!("{:>6}  {:<40} x{:<3} {:.2}", item.id, item.title, item.quantity, item.line_total);
        if let Some(summary) = &item.option_summary {
            println!("        {}", summary);
        }
    }
    println!("Subtotal  {}", cart.formatted_subtotal);
}

fn print_update(update: &CartUpdate) {
    println!("{:?}", update.change);
    print_cart(&update.cart);
}
