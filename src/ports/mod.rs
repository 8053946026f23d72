pub mod catalog;
pub mod http;
pub mod storage;

pub use catalog::Catalog;
pub use http::HttpClient;
pub use storage::{ConfigStore, KeyValueStore};
