use std::sync::Arc;

use async_trait::async_trait;
use storefront_lib::adapters::{InMemoryStore, JsonFileStore};
use storefront_lib::commands;
use storefront_lib::domain::{AppConfig, CartChange, DomainError, Product};
use storefront_lib::ports::{Catalog, KeyValueStore};
use storefront_lib::AppController;

/// Catalog with fixed USD prices; EUR is 0.5x, anything else is unknown.
struct FixedCatalog;

fn product(id: &str, price: f64, option_groups: usize) -> Product {
    let product_options = (0..option_groups)
        .map(|i| storefront_lib::domain::ProductOption {
            title: format!("Option {}", i),
            prefix: None,
            suffix: None,
            options: Vec::new(),
        })
        .collect();

    Product {
        id: id.to_string(),
        title: format!("Product {}", id),
        image_url: format!("https://cdn.example.com/{}.png", id),
        price,
        product_options,
    }
}

#[async_trait]
impl Catalog for FixedCatalog {
    async fn products(&self, currency: &str) -> Result<Vec<Product>, DomainError> {
        let rate = match currency {
            "USD" => 1.0,
            "EUR" => 0.5,
            other => return Err(DomainError::Catalog(format!("Unknown currency {}", other))),
        };
        Ok(vec![
            product("3", 29.0 * rate, 2),
            product("4", 16.0 * rate, 0),
            product("5", 10.0 * rate, 1),
        ])
    }

    async fn currencies(&self) -> Result<Vec<String>, DomainError> {
        Ok(vec!["USD".to_string(), "EUR".to_string()])
    }
}

fn controller_with(storage: Box<dyn KeyValueStore>) -> AppController {
    AppController::from_parts(AppConfig::default(), storage, Arc::new(FixedCatalog)).unwrap()
}

#[tokio::test]
async fn test_scenario_through_controller() {
    let controller = controller_with(Box::new(InMemoryStore::new()));
    controller.load_products().await.unwrap();

    let first = controller.find_product("3").unwrap();
    assert_eq!(controller.add_to_cart(first.clone()).unwrap().0, CartChange::Added);
    assert_eq!(
        controller.add_to_cart(first).unwrap().0,
        CartChange::QuantityChanged(2)
    );
    assert_eq!(controller.cart().len(), 1);
    assert_eq!(controller.subtotal(), 58.0);

    let (change, state) = controller.decrement_quantity("3").unwrap();
    assert_eq!(change, CartChange::QuantityChanged(1));
    assert_eq!(state.get("3").unwrap().quantity, 1);
    assert_eq!(controller.subtotal(), 29.0);

    assert_eq!(controller.decrement_quantity("3").unwrap().0, CartChange::Removed);
    assert!(controller.cart().is_empty());
    assert_eq!(controller.subtotal(), 0.0);
}

#[tokio::test]
async fn test_subtotal_of_mixed_cart() {
    let controller = controller_with(Box::new(InMemoryStore::new()));
    controller.load_products().await.unwrap();

    commands::add_product_by_id(&controller, "3".to_string()).unwrap();
    commands::add_product_by_id(&controller, "4".to_string()).unwrap();
    commands::increment_quantity(&controller, "4".to_string()).unwrap();
    let update = commands::add_product_by_id(&controller, "5".to_string()).unwrap();

    assert_eq!(update.cart.subtotal, 71.0);
    assert_eq!(update.cart.formatted_subtotal, "USD 71.00");
    assert_eq!(update.cart.item_count, 4);
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let before = {
        let controller = controller_with(Box::new(JsonFileStore::open(&path).unwrap()));
        controller.load_products().await.unwrap();
        commands::add_product_by_id(&controller, "3".to_string()).unwrap();
        commands::add_product_by_id(&controller, "4".to_string()).unwrap();
        commands::increment_quantity(&controller, "3".to_string()).unwrap();
        controller.cart()
    };

    let controller = controller_with(Box::new(JsonFileStore::open(&path).unwrap()));
    assert_eq!(controller.cart(), before);
    assert_eq!(controller.cart().get("3").unwrap().quantity, 2);
}

#[tokio::test]
async fn test_currency_switch_keeps_cart_prices() {
    let controller = controller_with(Box::new(InMemoryStore::new()));
    controller.load_products().await.unwrap();
    commands::add_product_by_id(&controller, "4".to_string()).unwrap();

    let products = commands::select_currency(&controller, "eur".to_string())
        .await
        .unwrap();
    assert_eq!(controller.selected_currency(), "EUR");
    assert_eq!(products[1].price, 8.0);
    assert_eq!(products[1].formatted_price, "EUR 8.00");
    assert!(products[0].requires_personalization);

    // the line item keeps its USD price until re-added
    assert_eq!(controller.subtotal(), 16.0);
    commands::add_product_by_id(&controller, "4".to_string()).unwrap();
    assert_eq!(controller.subtotal(), 32.0);
}

#[tokio::test]
async fn test_failed_currency_switch_keeps_selection() {
    let controller = controller_with(Box::new(InMemoryStore::new()));
    assert!(commands::select_currency(&controller, "XYZ".to_string())
        .await
        .is_err());
    assert_eq!(controller.selected_currency(), "USD");
    assert_eq!(
        commands::list_currencies(&controller).await.unwrap(),
        ["USD", "EUR"]
    );
}

#[tokio::test]
async fn test_raw_actions() {
    let store = Arc::new(InMemoryStore::new());
    let controller = controller_with(Box::new(Arc::clone(&store)));

    let add = r#"{"type":"addToCart","payload":{"id":"9","title":"Mask","imageUrl":"","price":5,"productOptions":[]}}"#;
    let update = commands::dispatch_action(&controller, add.to_string()).unwrap();
    assert_eq!(update.change, CartChange::Added);
    assert_eq!(store.write_count(), 1);

    let err = commands::dispatch_action(&controller, r#"{"type":"clearCart"}"#.to_string())
        .unwrap_err();
    assert!(err.starts_with("Invalid cart command"));
    assert_eq!(controller.cart().len(), 1);
    assert_eq!(store.write_count(), 1);

    let update = commands::dispatch_action(
        &controller,
        r#"{"type":"removeFromCart","payload":"9"}"#.to_string(),
    )
    .unwrap();
    assert_eq!(update.change, CartChange::Removed);
    assert!(update.cart.is_empty());
    assert_eq!(store.write_count(), 2);
}

/// Storage that accepts reads but refuses every write.
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn read(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &str) -> Result<(), DomainError> {
        Err(DomainError::Io("read-only file system".to_string()))
    }
}

#[tokio::test]
async fn test_failed_persist_surfaces_storage_error() {
    let controller = controller_with(Box::new(ReadOnlyStore));
    controller.load_products().await.unwrap();
    let product = controller.find_product("4").unwrap();

    let result = controller.add_to_cart(product);
    assert!(matches!(result, Err(DomainError::Storage(_))));
    assert_eq!(controller.cart().get("4").unwrap().quantity, 1);

    let err = commands::increment_quantity(&controller, "4".to_string()).unwrap_err();
    assert!(err.contains("read-only file system"));
    assert_eq!(controller.subtotal(), 32.0);
}

#[test]
fn test_unknown_product_id() {
    let controller = controller_with(Box::new(InMemoryStore::new()));
    let err = commands::add_product_by_id(&controller, "3".to_string()).unwrap_err();
    assert_eq!(err, "Product not found: 3");

    let update = commands::remove_from_cart(&controller, "3".to_string()).unwrap();
    assert_eq!(update.change, CartChange::Unchanged);
}

#[test]
fn test_corrupt_persisted_cart_starts_empty() {
    let config = AppConfig::default();
    let storage = InMemoryStore::with_entry(&config.storage.cart_key, "not json at all");
    let controller = controller_with(Box::new(storage));
    assert!(commands::get_cart(&controller).is_empty());
}

#[test]
fn test_controller_from_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[catalog]\noffline = true\n\n[logging]\nfile_logging = false\n",
    )
    .unwrap();

    let controller = AppController::new(Some(dir.path())).unwrap();
    let paths = commands::get_paths(&controller).unwrap();
    assert!(paths.config_path.ends_with("config.toml"));
    assert!(controller.config().catalog.offline);

    controller.increment_quantity("absent").unwrap();
    assert!(dir.path().join("storage.json").exists());
}
