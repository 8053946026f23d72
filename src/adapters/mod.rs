pub mod config_store;
pub mod file_store;
pub mod graphql_catalog;
pub mod http_gateway;
pub mod memory_store;

pub use config_store::TomlConfigStore;
pub use file_store::JsonFileStore;
pub use graphql_catalog::GraphQlCatalog;
pub use http_gateway::HttpGateway;
pub use memory_store::InMemoryStore;
