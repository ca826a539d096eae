//! Service layer.
//!
//! Each service wraps the storage seam with the storefront's business rules.
//! Services are cheap to clone (they hold an `Arc<dyn Storage>`) and are
//! constructed once in [`AppState`](crate::state::AppState).

pub mod auth;
pub mod cart;
pub mod order;
pub mod payment;
pub mod product;
pub mod recommendation;
pub mod shipping;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService};
pub use order::{OrderError, OrderService};
pub use payment::{PaymentError, PaymentService};
pub use product::ProductService;
pub use recommendation::RecommendationService;
pub use shipping::ShippingService;
