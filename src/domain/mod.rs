pub mod cart;
pub mod config;
pub mod error;
pub mod product;

pub use cart::{CartChange, CartCommand, CartState, LineItem};
pub use config::{AppConfig, DataPaths};
pub use error::DomainError;
pub use product::{format_price, OptionValue, Product, ProductOption};
