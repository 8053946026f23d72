use tracing::{debug, info, warn};

use crate::domain::{CartChange, CartCommand, CartState, DomainError};
use crate::ports::KeyValueStore;

/// Owns the cart and keeps its persisted slot in sync.
///
/// Every command is applied to the in-memory state and then the whole state
/// is written to the slot, one synchronous write per command.
pub struct CartStore<S: KeyValueStore + ?Sized> {
    state: CartState,
    storage: Box<S>,
    key: String,
}

impl<S: KeyValueStore + ?Sized> CartStore<S> {
    /// Rehydrate from `storage[key]`.
    ///
    /// An empty slot yields an empty cart. So does a slot holding malformed
    /// JSON or a cart with duplicate ids or zero quantities; the bad value
    /// stays in place until the next command overwrites it.
    pub fn load(storage: Box<S>, key: impl Into<String>) -> Result<Self, DomainError> {
        let key = key.into();
        let state = match storage.read(&key)? {
            None => {
                debug!(key = %key, "No persisted cart, starting empty");
                CartState::new()
            }
            Some(raw) => match Self::decode(&raw) {
                Ok(state) => {
                    info!(key = %key, items = state.len(), "Cart restored");
                    state
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Persisted cart is unusable, starting empty");
                    CartState::new()
                }
            },
        };

        Ok(Self {
            state,
            storage,
            key,
        })
    }

    fn decode(raw: &str) -> Result<CartState, DomainError> {
        let state: CartState = serde_json::from_str(raw)?;
        state.validate()?;
        Ok(state)
    }

    /// Apply a command and persist the resulting state.
    ///
    /// If the write fails the in-memory state has still moved on; the error
    /// is returned so the caller can surface it.
    pub fn dispatch(&mut self, command: CartCommand) -> Result<CartChange, DomainError> {
        let kind = command.kind();
        let product_id = command.product_id().to_string();

        let change = self.state.apply(command);
        debug!(command = kind, product_id = %product_id, change = ?change, "Cart command applied");

        self.persist()?;
        Ok(change)
    }

    fn persist(&self) -> Result<(), DomainError> {
        let raw = serde_json::to_string(&self.state)?;
        self.storage
            .write(&self.key, &raw)
            .map_err(|e| DomainError::Storage(format!("failed to persist cart: {}", e)))
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn subtotal(&self) -> f64 {
        self.state.subtotal()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
