use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::product::{Product, ProductOption};

/// A product in the cart: a point-in-time copy of the catalog entry plus a
/// quantity that is always at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    #[serde(default)]
    pub product_options: Vec<ProductOption>,
    pub quantity: u32,
}

impl LineItem {
    /// Copy a catalog product into a new line item with quantity 1.
    pub fn from_product(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            product_options: product.product_options,
            quantity: 1,
        }
    }

    /// `price * quantity`.
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Commands accepted by the cart.
///
/// The JSON form mirrors the storefront UI actions:
/// `{"type": "incrementQuantity", "payload": "3"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum CartCommand {
    AddToCart(Product),
    RemoveFromCart(String),
    IncrementQuantity(String),
    DecrementQuantity(String),
}

impl CartCommand {
    /// Parse a UI action. Unknown kinds and malformed payloads are rejected.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        serde_json::from_str(json).map_err(|e| DomainError::InvalidCommand(e.to_string()))
    }

    /// Command name as used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            CartCommand::AddToCart(_) => "addToCart",
            CartCommand::RemoveFromCart(_) => "removeFromCart",
            CartCommand::IncrementQuantity(_) => "incrementQuantity",
            CartCommand::DecrementQuantity(_) => "decrementQuantity",
        }
    }

    /// Id of the product the command targets.
    pub fn product_id(&self) -> &str {
        match self {
            CartCommand::AddToCart(product) => &product.id,
            CartCommand::RemoveFromCart(id)
            | CartCommand::IncrementQuantity(id)
            | CartCommand::DecrementQuantity(id) => id,
        }
    }
}

/// What a command did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartChange {
    /// A new line item was appended.
    Added,
    /// An existing line item's quantity changed to the given value.
    QuantityChanged(u32),
    /// A line item was removed.
    Removed,
    /// The target id was not in the cart.
    Unchanged,
}

/// Ordered cart contents, at most one line item per product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    #[serde(default)]
    pub products: Vec<LineItem>,
}

impl CartState {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.products
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Look up a line item by product id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.products.iter().find(|item| item.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|item| item.id == id)
    }

    /// Total number of units across all line items.
    pub fn item_count(&self) -> u64 {
        self.products.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity` over all line items. No currency conversion.
    pub fn subtotal(&self) -> f64 {
        self.products.iter().map(LineItem::line_total).sum()
    }

    /// Apply a command in place.
    ///
    /// Commands targeting an id that is not in the cart are no-ops.
    /// Decrementing an item with quantity 1 removes it.
    pub fn apply(&mut self, command: CartCommand) -> CartChange {
        match command {
            CartCommand::AddToCart(product) => match self.position(&product.id) {
                Some(index) => {
                    let item = &mut self.products[index];
                    item.quantity = item.quantity.saturating_add(1);
                    CartChange::QuantityChanged(item.quantity)
                }
                None => {
                    self.products.push(LineItem::from_product(product));
                    CartChange::Added
                }
            },
            CartCommand::RemoveFromCart(id) => match self.position(&id) {
                Some(index) => {
                    self.products.remove(index);
                    CartChange::Removed
                }
                None => CartChange::Unchanged,
            },
            CartCommand::IncrementQuantity(id) => match self.position(&id) {
                Some(index) => {
                    let item = &mut self.products[index];
                    item.quantity = item.quantity.saturating_add(1);
                    CartChange::QuantityChanged(item.quantity)
                }
                None => CartChange::Unchanged,
            },
            CartCommand::DecrementQuantity(id) => match self.position(&id) {
                Some(index) if self.products[index].quantity <= 1 => {
                    self.products.remove(index);
                    CartChange::Removed
                }
                Some(index) => {
                    let item = &mut self.products[index];
                    item.quantity -= 1;
                    CartChange::QuantityChanged(item.quantity)
                }
                None => CartChange::Unchanged,
            },
        }
    }

    /// Pure form of [`CartState::apply`]: returns the next state.
    #[must_use]
    pub fn reduce(mut self, command: CartCommand) -> Self {
        self.apply(command);
        self
    }

    /// Check the invariants a persisted cart must satisfy: unique ids and
    /// quantities of at least 1.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (index, item) in self.products.iter().enumerate() {
            if item.quantity == 0 {
                return Err(DomainError::Storage(format!(
                    "line item '{}' has zero quantity",
                    item.id
                )));
            }
            if self.products[..index].iter().any(|other| other.id == item.id) {
                return Err(DomainError::Storage(format!(
                    "duplicate line item '{}'",
                    item.id
                )));
            }
        }
        Ok(())
    }
}
