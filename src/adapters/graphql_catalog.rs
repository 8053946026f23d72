use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::domain::{DomainError, OptionValue, Product, ProductOption};
use crate::ports::{Catalog, HttpClient};

const PRODUCTS_QUERY: &str = "query GetProducts($currency: Currency!) {
    products {
        id
        title
        image_url
        price(currency: $currency)
        product_options {
            title
            prefix
            suffix
            options {
                id
                value
            }
        }
    }
}";

const CURRENCIES_QUERY: &str = "query GetCurrencies {
    currency
}";

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ProductsData {
    #[serde(default)]
    products: Option<Vec<WireProduct>>,
}

#[derive(Debug, Deserialize)]
struct CurrenciesData {
    #[serde(default)]
    currency: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct WireProduct {
    id: Value,
    title: String,
    #[serde(default)]
    image_url: String,
    price: f64,
    #[serde(default)]
    product_options: Option<Vec<WireProductOption>>,
}

#[derive(Debug, Deserialize)]
struct WireProductOption {
    title: String,
    prefix: Option<String>,
    suffix: Option<String>,
    #[serde(default)]
    options: Vec<WireOptionValue>,
}

#[derive(Debug, Deserialize)]
struct WireOptionValue {
    id: Value,
    value: String,
}

/// Ids arrive as strings or numbers depending on the field; both become
/// opaque strings.
fn id_to_string(id: Value) -> String {
    match id {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl From<WireProduct> for Product {
    fn from(wire: WireProduct) -> Self {
        Product {
            id: id_to_string(wire.id),
            title: wire.title,
            image_url: wire.image_url,
            price: wire.price,
            product_options: wire
                .product_options
                .unwrap_or_default()
                .into_iter()
                .map(|option| ProductOption {
                    title: option.title,
                    prefix: option.prefix,
                    suffix: option.suffix,
                    options: option
                        .options
                        .into_iter()
                        .map(|v| OptionValue {
                            id: id_to_string(v.id),
                            value: v.value,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Catalog backed by a GraphQL endpoint.
pub struct GraphQlCatalog<H: HttpClient> {
    http: H,
    endpoint: String,
}

impl<H: HttpClient> GraphQlCatalog<H> {
    pub fn new(http: H, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    async fn query<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<Option<T>, DomainError> {
        debug!(operation = operation, endpoint = %self.endpoint, "Sending GraphQL query");

        let request = GraphQlRequest { query, variables };
        let response: GraphQlResponse<T> = self.http.post_json(&self.endpoint, &request).await?;

        if let Some(error) = response.errors.into_iter().next() {
            return Err(DomainError::Catalog(format!("{}: {}", operation, error.message)));
        }

        Ok(response.data)
    }
}

#[async_trait]
impl<H: HttpClient> Catalog for GraphQlCatalog<H> {
    async fn products(&self, currency: &str) -> Result<Vec<Product>, DomainError> {
        let data: Option<ProductsData> = self
            .query("GetProducts", PRODUCTS_QUERY, json!({ "currency": currency }))
            .await?;

        let products: Vec<Product> = data
            .and_then(|d| d.products)
            .unwrap_or_default()
            .into_iter()
            .map(Product::from)
            .collect();

        info!(currency = currency, count = products.len(), "Catalog fetched");
        Ok(products)
    }

    async fn currencies(&self) -> Result<Vec<String>, DomainError> {
        let data: Option<CurrenciesData> = self
            .query("GetCurrencies", CURRENCIES_QUERY, json!({}))
            .await?;

        Ok(data.and_then(|d| d.currency).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Replays a canned JSON response and records the request bodies.
    struct CannedHttp {
        response: Value,
        requests: Mutex<Vec<Value>>,
    }

    impl CannedHttp {
        fn new(response: Value) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpClient for CannedHttp {
        async fn post_json<T: Serialize + Send + Sync, R: DeserializeOwned>(
            &self,
            _url: &str,
            body: &T,
        ) -> Result<R, DomainError> {
            self.requests.lock().push(serde_json::to_value(body)?);
            Ok(serde_json::from_value(self.response.clone())?)
        }
    }

    #[tokio::test]
    async fn test_products_mapping() {
        let http = CannedHttp::new(json!({
            "data": {
                "products": [
                    {
                        "id": 3,
                        "title": "Age Management Set",
                        "image_url": "https://cdn.example.com/set.png",
                        "price": 29.0,
                        "product_options": [
                            {
                                "title": "Age",
                                "prefix": "I'm",
                                "suffix": null,
                                "options": [{ "id": 1, "value": "20-29" }]
                            },
                            { "title": "Skin", "prefix": null, "suffix": null, "options": [] }
                        ]
                    },
                    {
                        "id": "4",
                        "title": "Cleanser",
                        "image_url": "https://cdn.example.com/cleanser.png",
                        "price": 16.0,
                        "product_options": null
                    }
                ]
            }
        }));
        let catalog = GraphQlCatalog::new(http, "https://catalog.example.com/graphql");

        let products = catalog.products("EUR").await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "3");
        assert_eq!(products[0].image_url, "https://cdn.example.com/set.png");
        assert_eq!(products[0].product_options[0].prefix.as_deref(), Some("I'm"));
        assert_eq!(products[0].product_options[0].options[0].id, "1");
        assert!(products[0].requires_personalization());
        assert!(products[1].product_options.is_empty());

        let requests = catalog.http.requests.lock();
        assert_eq!(requests[0]["variables"]["currency"], "EUR");
        assert!(requests[0]["query"].as_str().unwrap().contains("GetProducts"));
    }

    #[tokio::test]
    async fn test_missing_products_is_empty() {
        let catalog = GraphQlCatalog::new(
            CannedHttp::new(json!({ "data": { "products": null } })),
            "https://catalog.example.com/graphql",
        );
        assert!(catalog.products("USD").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_currencies() {
        let catalog = GraphQlCatalog::new(
            CannedHttp::new(json!({ "data": { "currency": ["USD", "EUR", "GBP"] } })),
            "https://catalog.example.com/graphql",
        );
        assert_eq!(catalog.currencies().await.unwrap(), ["USD", "EUR", "GBP"]);
    }

    #[tokio::test]
    async fn test_graphql_errors_are_reported() {
        let catalog = GraphQlCatalog::new(
            CannedHttp::new(json!({
                "data": null,
                "errors": [{ "message": "Unknown currency XYZ" }]
            })),
            "https://catalog.example.com/graphql",
        );
        let err = catalog.products("XYZ").await.unwrap_err();
        assert!(matches!(err, DomainError::Catalog(ref m) if m.contains("Unknown currency XYZ")));
    }
}
