//! Session-scoped shopping cart.
//!
//! The cart is a plain value type owned by the caller's session and
//! persisted through an explicit serde boundary, not a global store. Line
//! items snapshot name/size/price at add time; the live product record is
//! never consulted again after that.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One cart line. Identity is the product id — a product has exactly one
/// size, so product id and (product, size) identity coincide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: i64,
    pub name: String,
    pub size: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl CartItem {
    /// Price × quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of a product. An existing line for the same product is
    /// incremented; otherwise a new line is appended with quantity 1.
    /// Stock is not checked at add time.
    pub fn add_item(&mut self, product_id: i64, name: &str, size: &str, price: Decimal) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity += 1;
            return;
        }
        self.items.push(CartItem {
            product_id,
            name: name.to_owned(),
            size: size.to_owned(),
            price,
            quantity: 1,
        });
    }

    /// Set a line's quantity. A quantity of zero or less removes the line.
    /// Unknown ids are ignored.
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity;
        }
    }

    /// Remove a line unconditionally. No-op if the id is not in the cart.
    pub fn remove_item(&mut self, product_id: i64) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Plain subtotal: Σ price × quantity. No tax and no discount code is
    /// applied here.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(units: i64) -> Decimal {
        Decimal::from(units)
    }

    #[test]
    fn add_item_appends_then_increments() {
        let mut cart = Cart::new();
        cart.add_item(1, "Royal Oud Intense", "50ml", price(4999));
        cart.add_item(1, "Royal Oud Intense", "50ml", price(4999));
        cart.add_item(2, "Mystic Rose Attar", "12ml", price(2499));

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[1].quantity, 1);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn totals_track_every_mutation() {
        let mut cart = Cart::new();
        cart.add_item(1, "A", "50ml", price(1000));
        cart.add_item(2, "B", "75ml", price(2500));
        cart.update_quantity(1, 3);

        assert_eq!(cart.total_items(), 4);
        assert_eq!(cart.total_price(), price(5500));

        cart.remove_item(2);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), price(3000));
    }

    #[test]
    fn zero_and_negative_quantities_remove_the_line() {
        let mut cart = Cart::new();
        cart.add_item(1, "A", "50ml", price(1000));
        cart.update_quantity(1, 0);
        assert!(cart.is_empty());

        cart.add_item(1, "A", "50ml", price(1000));
        cart.update_quantity(1, -4);
        assert!(cart.is_empty());
    }

    #[test]
    fn removing_an_absent_item_is_a_no_op() {
        let mut cart = Cart::new();
        cart.add_item(1, "A", "50ml", price(1000));
        cart.remove_item(99);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_price(), price(1000));
    }

    #[test]
    fn updating_an_absent_item_is_a_no_op() {
        let mut cart = Cart::new();
        cart.update_quantity(7, 5);
        assert!(cart.is_empty());
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::new();
        cart.add_item(1, "A", "50ml", price(1000));
        cart.add_item(2, "B", "75ml", price(2500));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn cart_survives_the_serde_boundary() {
        let mut cart = Cart::new();
        cart.add_item(1, "Royal Oud Intense", "50ml", price(4999));
        cart.add_item(2, "Floral Dreams", "75ml", price(3499));
        cart.update_quantity(2, 2);

        let json = serde_json::to_string(&cart).expect("serialize cart");
        let restored: Cart = serde_json::from_str(&json).expect("deserialize cart");

        assert_eq!(restored, cart);
        assert_eq!(restored.total_items(), 3);
        assert_eq!(restored.total_price(), price(11_997));
    }
}
