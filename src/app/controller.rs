use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::{GraphQlCatalog, HttpGateway, JsonFileStore, TomlConfigStore};
use crate::app::cart_store::CartStore;
use crate::domain::{
    AppConfig, CartChange, CartCommand, CartState, DataPaths, DomainError, Product,
};
use crate::infrastructure::init_logging;
use crate::ports::{Catalog, ConfigStore, KeyValueStore};

/// Application controller that wires configuration, logging, the catalog and
/// the cart together and serializes access to the cart.
pub struct AppController {
    config: AppConfig,
    paths: Option<DataPaths>,
    cart: Mutex<CartStore<dyn KeyValueStore>>,
    catalog: Arc<dyn Catalog>,
    currency: RwLock<String>,
    products: RwLock<Vec<Product>>,
    _log_guard: Option<WorkerGuard>,
}

impl AppController {
    /// Initialize from the OS data directory, or from `data_dir` when given.
    pub fn new(data_dir: Option<&Path>) -> Result<Self, DomainError> {
        // Step 1: Initialize config store
        let config_store = match data_dir {
            Some(dir) => TomlConfigStore::at(dir)?,
            None => TomlConfigStore::new()?,
        };

        // Step 2: Load configuration
        let config = config_store.load()?;
        let paths = config_store.paths().clone();

        // Step 3: Initialize logging
        let log_guard = init_logging(&paths.logs_dir, &config.logging)?;

        info!(data_dir = ?paths.data_dir, "Storefront starting up");

        // Step 4: Cart storage and catalog
        let storage = JsonFileStore::open(paths.storage_path(&config.storage))?;
        let gateway = HttpGateway::from_config(&config.catalog)?;
        let catalog = GraphQlCatalog::new(gateway, config.catalog.endpoint.clone());

        let mut controller = Self::from_parts(config, Box::new(storage), Arc::new(catalog))?;
        controller.paths = Some(paths);
        controller._log_guard = log_guard;
        Ok(controller)
    }

    /// Assemble a controller from already-built parts. No logging is set up.
    pub fn from_parts(
        config: AppConfig,
        storage: Box<dyn KeyValueStore>,
        catalog: Arc<dyn Catalog>,
    ) -> Result<Self, DomainError> {
        let cart = CartStore::load(storage, config.storage.cart_key.clone())?;
        let currency = config.catalog.default_currency.clone();

        info!(
            currency = %currency,
            cart_items = cart.state().len(),
            "AppController initialized"
        );

        Ok(Self {
            config,
            paths: None,
            cart: Mutex::new(cart),
            catalog,
            currency: RwLock::new(currency),
            products: RwLock::new(Vec::new()),
            _log_guard: None,
        })
    }

    /// Configuration the controller was built with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// On-disk locations, when the controller was built from a data directory.
    pub fn paths(&self) -> Option<&DataPaths> {
        self.paths.as_ref()
    }

    // ==================== Catalog ====================

    /// Currency prices are currently fetched in.
    pub fn selected_currency(&self) -> String {
        self.currency.read().clone()
    }

    /// Fetch the catalog in the selected currency and remember it.
    pub async fn load_products(&self) -> Result<Vec<Product>, DomainError> {
        let currency = self.selected_currency();
        let products = self.catalog.products(&currency).await?;
        *self.products.write() = products.clone();
        Ok(products)
    }

    /// Switch currency and re-fetch the catalog. Items already in the cart
    /// keep the prices they were added with. On failure the previous
    /// currency stays selected.
    pub async fn select_currency(&self, currency: &str) -> Result<Vec<Product>, DomainError> {
        let currency = currency.trim().to_uppercase();
        if currency.is_empty() {
            return Err(DomainError::Catalog("Currency code must not be empty".to_string()));
        }

        let products = self.catalog.products(&currency).await?;
        *self.currency.write() = currency.clone();
        *self.products.write() = products.clone();

        info!(currency = %currency, "Display currency changed");
        Ok(products)
    }

    /// Currency codes offered by the catalog.
    pub async fn currencies(&self) -> Result<Vec<String>, DomainError> {
        self.catalog.currencies().await
    }

    /// Look up a product in the most recently fetched catalog.
    pub fn find_product(&self, id: &str) -> Result<Product, DomainError> {
        self.products
            .read()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| DomainError::ProductNotFound(id.to_string()))
    }

    // ==================== Cart ====================

    /// Apply a cart command and persist the result. Returns the change and
    /// the cart it produced, taken under the same lock.
    pub fn dispatch(&self, command: CartCommand) -> Result<(CartChange, CartState), DomainError> {
        let mut cart = self.cart.lock();
        match cart.dispatch(command) {
            Ok(change) => Ok((change, cart.state().clone())),
            Err(e) => {
                warn!(error = %e, "Cart command failed to persist");
                Err(e)
            }
        }
    }

    pub fn add_to_cart(&self, product: Product) -> Result<(CartChange, CartState), DomainError> {
        self.dispatch(CartCommand::AddToCart(product))
    }

    pub fn remove_from_cart(&self, id: &str) -> Result<(CartChange, CartState), DomainError> {
        self.dispatch(CartCommand::RemoveFromCart(id.to_string()))
    }

    pub fn increment_quantity(&self, id: &str) -> Result<(CartChange, CartState), DomainError> {
        self.dispatch(CartCommand::IncrementQuantity(id.to_string()))
    }

    pub fn decrement_quantity(&self, id: &str) -> Result<(CartChange, CartState), DomainError> {
        self.dispatch(CartCommand::DecrementQuantity(id.to_string()))
    }

    /// Snapshot of the cart.
    pub fn cart(&self) -> CartState {
        self.cart.lock().state().clone()
    }

    pub fn subtotal(&self) -> f64 {
        self.cart.lock().subtotal()
    }
}
