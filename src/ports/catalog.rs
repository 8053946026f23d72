use async_trait::async_trait;

use crate::domain::{DomainError, Product};

/// Port for the product catalog.
///
/// Prices are returned already denominated in the requested currency;
/// nothing downstream converts them.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch all products priced in `currency`.
    async fn products(&self, currency: &str) -> Result<Vec<Product>, DomainError>;

    /// Fetch the currency codes the catalog can price in.
    async fn currencies(&self) -> Result<Vec<String>, DomainError>;
}
