use crate::domain::value_objects::Money;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One cart line. Carries a display snapshot of the product so the
/// presentation layer does not re-fetch the catalog on every render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: Uuid,
    pub name: String,
    pub price: Money,
    pub image_url: Option<String>,
    pub quantity: i32,
}

/// The pre-order staging list for one cashier session.
///
/// Invariant: at most one line per product id. Totals are derived on
/// read, never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds a product to the cart. An already-present product gets its
    /// quantity bumped by 1 instead of a duplicate line.
    pub fn add(&mut self, product_id: Uuid, name: String, price: Money, image_url: Option<String>) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity += 1;
            return;
        }

        self.items.push(CartItem {
            product_id,
            name,
            price,
            image_url,
            quantity: 1,
        });
    }

    /// Sets the quantity of a line, clamped to at least 1. No-op for an
    /// absent product.
    pub fn update_quantity(&mut self, product_id: Uuid, quantity: i32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity.max(1);
        }
    }

    /// Removes the line for a product, if present.
    pub fn remove(&mut self, product_id: Uuid) {
        self.items.retain(|i| i.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn sub_total(&self) -> Money {
        let total = self
            .items
            .iter()
            .map(|i| i.price.as_rupiah().saturating_mul(i64::from(i.quantity)))
            .sum();
        Money::from_rupiah(total)
    }

    pub fn tax(&self) -> Money {
        self.sub_total().tax_10_percent()
    }

    pub fn grand_total(&self) -> Money {
        Money::from_rupiah(self.sub_total().as_rupiah() + self.tax().as_rupiah())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_product(cart: &mut Cart, id: Uuid, price: i64) {
        cart.add(id, "Kopi Susu".to_string(), Money::from_rupiah(price), None);
    }

    #[test]
    fn test_adding_same_product_increments_quantity() {
        let mut cart = Cart::new();
        let product_id = Uuid::new_v4();

        add_product(&mut cart, product_id, 10000);
        add_product(&mut cart, product_id, 10000);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        let product_id = Uuid::new_v4();
        add_product(&mut cart, product_id, 10000);

        cart.update_quantity(product_id, 0);
        assert_eq!(cart.items()[0].quantity, 1);

        cart.update_quantity(product_id, 5);
        assert_eq!(cart.items()[0].quantity, 5);

        // Absent products are left alone.
        cart.update_quantity(Uuid::new_v4(), 3);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        add_product(&mut cart, a, 10000);
        add_product(&mut cart, b, 15000);

        cart.remove(a);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].product_id, b);

        cart.remove(Uuid::new_v4());
        assert_eq!(cart.items().len(), 1);

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_derived_totals() {
        let mut cart = Cart::new();
        let product_id = Uuid::new_v4();
        add_product(&mut cart, product_id, 10000);
        add_product(&mut cart, product_id, 10000);

        assert_eq!(cart.sub_total(), Money::from_rupiah(20000));
        assert_eq!(cart.tax(), Money::from_rupiah(2000));
        assert_eq!(cart.grand_total(), Money::from_rupiah(22000));
    }
}
