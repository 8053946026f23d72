//! UI-facing command layer. Every function returns plain serializable data
//! or a `String` error, so the UI never sees domain error types.

use serde::Serialize;

use crate::app::AppController;
use crate::domain::{format_price, CartChange, CartCommand, CartState, LineItem, Product};

/// One cart row as the UI renders it.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
    /// First option group and its first value, e.g. "Skin type | Normal".
    pub option_summary: Option<String>,
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        let option_summary = item.product_options.first().map(|option| match option.first_value() {
            Some(value) => format!("{} | {}", option.title, value),
            None => option.title.clone(),
        });

        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            image_url: item.image_url.clone(),
            quantity: item.quantity,
            unit_price: item.price,
            line_total: item.line_total(),
            option_summary,
        }
    }
}

/// The cart drawer contents.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub subtotal: f64,
    pub formatted_subtotal: String,
    pub currency: String,
}

impl CartView {
    pub fn new(state: &CartState, currency: &str) -> Self {
        let subtotal = state.subtotal();
        Self {
            items: state.items().iter().map(CartItemView::from).collect(),
            item_count: state.item_count(),
            subtotal,
            formatted_subtotal: format_price(subtotal, currency),
            currency: currency.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One tile of the product grid.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub formatted_price: String,
    pub requires_personalization: bool,
    pub option_titles: Vec<String>,
}

impl ProductView {
    pub fn new(product: &Product, currency: &str) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            image_url: product.image_url.clone(),
            price: product.price,
            formatted_price: format_price(product.price, currency),
            requires_personalization: product.requires_personalization(),
            option_titles: product.product_options.iter().map(|o| o.title.clone()).collect(),
        }
    }
}

/// Result of a cart mutation: what changed and the cart afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct CartUpdate {
    pub change: CartChange,
    pub cart: CartView,
}

fn cart_update(controller: &AppController, (change, state): (CartChange, CartState)) -> CartUpdate {
    CartUpdate {
        change,
        cart: CartView::new(&state, &controller.selected_currency()),
    }
}

// ==================== Path Commands ====================

/// Application paths information.
#[derive(Debug, Serialize)]
pub struct AppPaths {
    pub data_dir: String,
    pub logs_dir: String,
    pub config_path: String,
}

/// Get application paths, if the controller is backed by a data directory.
pub fn get_paths(controller: &AppController) -> Option<AppPaths> {
    controller.paths().map(|paths| AppPaths {
        data_dir: paths.data_dir.to_string_lossy().to_string(),
        logs_dir: paths.logs_dir.to_string_lossy().to_string(),
        config_path: paths.config_path().to_string_lossy().to_string(),
    })
}

// ==================== Catalog Commands ====================

/// Fetch the product grid in the selected currency.
pub async fn list_products(controller: &AppController) -> Result<Vec<ProductView>, String> {
    let products = controller.load_products().await.map_err(|e| e.to_string())?;
    let currency = controller.selected_currency();
    Ok(products.iter().map(|p| ProductView::new(p, &currency)).collect())
}

/// List the currencies the catalog can price in.
pub async fn list_currencies(controller: &AppController) -> Result<Vec<String>, String> {
    controller.currencies().await.map_err(|e| e.to_string())
}

/// Change the display currency and return the re-priced product grid.
pub async fn select_currency(
    controller: &AppController,
    currency: String,
) -> Result<Vec<ProductView>, String> {
    let products = controller
        .select_currency(&currency)
        .await
        .map_err(|e| e.to_string())?;
    let currency = controller.selected_currency();
    Ok(products.iter().map(|p| ProductView::new(p, &currency)).collect())
}

// ==================== Cart Commands ====================

/// Get the cart contents and subtotal.
pub fn get_cart(controller: &AppController) -> CartView {
    CartView::new(&controller.cart(), &controller.selected_currency())
}

/// Add a product to the cart.
pub fn add_to_cart(controller: &AppController, product: Product) -> Result<CartUpdate, String> {
    let outcome = controller.add_to_cart(product).map_err(|e| e.to_string())?;
    Ok(cart_update(controller, outcome))
}

/// Add a product from the last fetched catalog by id.
pub fn add_product_by_id(controller: &AppController, id: String) -> Result<CartUpdate, String> {
    let product = controller.find_product(&id).map_err(|e| e.to_string())?;
    add_to_cart(controller, product)
}

/// Remove a product from the cart.
pub fn remove_from_cart(controller: &AppController, id: String) -> Result<CartUpdate, String> {
    let outcome = controller.remove_from_cart(&id).map_err(|e| e.to_string())?;
    Ok(cart_update(controller, outcome))
}

/// Increase a line item's quantity by one.
pub fn increment_quantity(controller: &AppController, id: String) -> Result<CartUpdate, String> {
    let outcome = controller.increment_quantity(&id).map_err(|e| e.to_string())?;
    Ok(cart_update(controller, outcome))
}

/// Decrease a line item's quantity by one, removing it at zero.
pub fn decrement_quantity(controller: &AppController, id: String) -> Result<CartUpdate, String> {
    let outcome = controller.decrement_quantity(&id).map_err(|e| e.to_string())?;
    Ok(cart_update(controller, outcome))
}

/// Apply a raw UI action such as `{"type":"removeFromCart","payload":"3"}`.
pub fn dispatch_action(controller: &AppController, action: String) -> Result<CartUpdate, String> {
    let command = CartCommand::from_json(&action).map_err(|e| e.to_string())?;
    let outcome = controller.dispatch(command).map_err(|e| e.to_string())?;
    Ok(cart_update(controller, outcome))
}
