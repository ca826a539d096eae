//! Domain models for the storefront.
//!
//! These are validated domain objects shared between the storage layer,
//! the service layer, and the JSON API. Serde uses camelCase field names
//! to match the public wire format; money and ratings are decimals
//! serialized as strings.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem, CartItemWithProduct, NewCartItem};
pub use catalog::{NewProduct, PaymentMethod, Product, ShippingOption};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderWithItems};
pub use session::{CurrentUser, keys as session_keys};
pub use user::{NewUser, User};
