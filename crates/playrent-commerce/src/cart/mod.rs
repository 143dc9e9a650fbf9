//! Shopping cart module.
//!
//! Contains the cart mirror, rental windows and the pricing engine.

mod cart;
mod pricing;
mod rental;

pub use cart::{validate_quantity, Cart, CartItem, MAX_QUANTITY_PER_ITEM};
pub use pricing::{
    cart_subtotal, line_total, price_cart, price_line, unit_price, CartPricing, LineItemPricing,
};
pub use rental::{days_between, RentalPeriod, DAY_MS};
