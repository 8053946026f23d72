pub mod cart_store;
pub mod controller;

pub use cart_store::CartStore;
pub use controller::AppController;
