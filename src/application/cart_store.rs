use crate::domain::cart::Cart;
use crate::domain::Product;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// Session-keyed cart store. Each cart is owned by exactly one cashier
/// session; the lock only serializes access to the map itself, sessions
/// do not contend on each other's carts in practice.
#[derive(Debug, Default)]
pub struct CartStore {
    carts: RwLock<HashMap<String, Cart>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A point-in-time copy of the session's cart. Missing sessions
    /// read as an empty cart.
    pub fn snapshot(&self, session: &str) -> Cart {
        self.carts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session)
            .cloned()
            .unwrap_or_default()
    }

    /// Adds a product snapshot to the session's cart, creating the cart
    /// on first use.
    pub fn add_item(&self, session: &str, product: &Product) {
        let mut carts = self.carts.write().unwrap_or_else(PoisonError::into_inner);
        carts.entry(session.to_string()).or_default().add(
            product.id,
            product.name.clone(),
            product.price,
            product.image_url.clone(),
        );
    }

    pub fn update_quantity(&self, session: &str, product_id: Uuid, quantity: i32) {
        let mut carts = self.carts.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(cart) = carts.get_mut(session) {
            cart.update_quantity(product_id, quantity);
        }
    }

    pub fn remove_item(&self, session: &str, product_id: Uuid) {
        let mut carts = self.carts.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(cart) = carts.get_mut(session) {
            cart.remove(product_id);
        }
    }

    pub fn clear(&self, session: &str) {
        let mut carts = self.carts.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(cart) = carts.get_mut(session) {
            cart.clear();
        }
    }
}
