//! In-memory storage backend.
//!
//! Keeps every table in a `HashMap` behind a single `RwLock`, with plain
//! id counters. This is the backend the server falls back to when no
//! database is configured, and the one the test suite runs against.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use vitrine_core::{
    CartId, CartItemId, OrderId, OrderItemId, OrderStatus, PaymentMethodId, ProductId,
    ShippingOptionId, UserId,
};

use crate::models::{
    Cart, CartItem, CartItemWithProduct, NewCartItem, NewOrder, NewOrderItem, NewProduct, NewUser,
    Order, OrderItem, OrderWithItems, PaymentMethod, Product, ShippingOption, User,
};

use super::{Result, Storage, StorageError, seed};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    products: HashMap<ProductId, Product>,
    carts: HashMap<CartId, Cart>,
    cart_items: HashMap<CartItemId, CartItem>,
    orders: HashMap<OrderId, Order>,
    order_items: HashMap<OrderItemId, OrderItem>,
    shipping_options: HashMap<ShippingOptionId, ShippingOption>,
    payment_methods: HashMap<PaymentMethodId, PaymentMethod>,

    next_user_id: i32,
    next_product_id: i32,
    next_cart_id: i32,
    next_cart_item_id: i32,
    next_order_id: i32,
    next_order_item_id: i32,
    next_shipping_option_id: i32,
    next_payment_method_id: i32,
}

impl Tables {
    fn new() -> Self {
        Self {
            next_user_id: 1,
            next_product_id: 1,
            next_cart_id: 1,
            next_cart_item_id: 1,
            next_order_id: 1,
            next_order_item_id: 1,
            next_shipping_option_id: 1,
            next_payment_method_id: 1,
            ..Self::default()
        }
    }

    fn insert_product(&mut self, product: NewProduct) -> Product {
        let id = ProductId::new(self.next_product_id);
        self.next_product_id += 1;
        let product = Product {
            id,
            name: product.name,
            description: product.description,
            price: product.price,
            image_url: product.image_url,
            category: product.category,
            stock: product.stock,
            rating: product.rating,
        };
        self.products.insert(id, product.clone());
        product
    }

    fn insert_shipping_option(
        &mut self,
        name: &str,
        description: &str,
        price: Decimal,
        estimated_days: &str,
    ) -> ShippingOption {
        let id = ShippingOptionId::new(self.next_shipping_option_id);
        self.next_shipping_option_id += 1;
        let option = ShippingOption {
            id,
            name: name.to_owned(),
            description: description.to_owned(),
            price,
            estimated_days: estimated_days.to_owned(),
        };
        self.shipping_options.insert(id, option.clone());
        option
    }

    fn insert_payment_method(&mut self, name: &str, code: &str) -> PaymentMethod {
        let id = PaymentMethodId::new(self.next_payment_method_id);
        self.next_payment_method_id += 1;
        let method = PaymentMethod {
            id,
            name: name.to_owned(),
            code: code.to_owned(),
            is_active: true,
        };
        self.payment_methods.insert(id, method.clone());
        method
    }
}

/// In-memory [`Storage`] implementation.
pub struct MemStorage {
    tables: RwLock<Tables>,
}

impl MemStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
        }
    }

    /// Create a store pre-populated with the sample catalog, shipping
    /// options, and payment methods from [`seed`].
    #[must_use]
    pub fn with_sample_data() -> Self {
        let mut tables = Tables::new();
        for product in seed::sample_products() {
            tables.insert_product(product);
        }
        for option in seed::shipping_options() {
            tables.insert_shipping_option(
                option.name,
                option.description,
                option.price,
                option.estimated_days,
            );
        }
        for method in seed::payment_methods() {
            tables.insert_payment_method(method.name, method.code);
        }
        Self {
            tables: RwLock::new(tables),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StorageError::Conflict("username already exists".to_owned()));
        }
        if tables
            .users
            .values()
            .any(|u| u.email.as_str() == user.email.as_str())
        {
            return Err(StorageError::Conflict("email already exists".to_owned()));
        }

        let id = UserId::new(tables.next_user_id);
        tables.next_user_id += 1;
        let user = User {
            id,
            username: user.username,
            password: user.password,
            email: user.email,
            name: user.name,
            address: user.address,
            city: user.city,
            state: user.state,
            zipcode: user.zipcode,
            created_at: Utc::now(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn get_all_products(&self) -> Result<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut products: Vec<_> = tables.products.values().cloned().collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn get_products_by_category(&self, category: &str) -> Result<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut products: Vec<_> = tables
            .products
            .values()
            .filter(|p| p.category == category)
            .cloned()
            .collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>> {
        let query = query.to_lowercase();
        let tables = self.tables.read().await;
        let mut products: Vec<_> = tables
            .products
            .values()
            .filter(|p| {
                p.name.to_lowercase().contains(&query)
                    || p.description.to_lowercase().contains(&query)
            })
            .cloned()
            .collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        let mut tables = self.tables.write().await;
        Ok(tables.insert_product(product))
    }

    async fn get_cart(&self, id: CartId) -> Result<Option<Cart>> {
        Ok(self.tables.read().await.carts.get(&id).cloned())
    }

    async fn get_cart_by_user(&self, user_id: UserId) -> Result<Option<Cart>> {
        let tables = self.tables.read().await;
        Ok(tables
            .carts
            .values()
            .find(|c| c.user_id == Some(user_id))
            .cloned())
    }

    async fn create_cart(&self, user_id: Option<UserId>) -> Result<Cart> {
        let mut tables = self.tables.write().await;
        let id = CartId::new(tables.next_cart_id);
        tables.next_cart_id += 1;
        let now = Utc::now();
        let cart = Cart {
            id,
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.carts.insert(id, cart.clone());
        Ok(cart)
    }

    async fn delete_cart(&self, id: CartId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        tables.cart_items.retain(|_, item| item.cart_id != id);
        Ok(tables.carts.remove(&id).is_some())
    }

    async fn get_cart_items(&self, cart_id: CartId) -> Result<Vec<CartItemWithProduct>> {
        let tables = self.tables.read().await;
        let mut items: Vec<_> = tables
            .cart_items
            .values()
            .filter(|item| item.cart_id == cart_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.id);

        items
            .into_iter()
            .map(|item| {
                let product = tables.products.get(&item.product_id).cloned().ok_or_else(|| {
                    StorageError::DataCorruption(format!(
                        "cart item {} references missing product {}",
                        item.id, item.product_id
                    ))
                })?;
                Ok(CartItemWithProduct { item, product })
            })
            .collect()
    }

    async fn add_cart_item(&self, item: NewCartItem) -> Result<CartItem> {
        let mut tables = self.tables.write().await;

        if !tables.products.contains_key(&item.product_id) {
            return Err(StorageError::NotFound);
        }

        // Same product already in the cart: bump quantity on the existing row
        if let Some(existing) = tables
            .cart_items
            .values()
            .find(|i| i.cart_id == item.cart_id && i.product_id == item.product_id)
            .map(|i| i.id)
        {
            let row = tables
                .cart_items
                .get_mut(&existing)
                .ok_or(StorageError::NotFound)?;
            row.quantity += item.quantity;
            return Ok(row.clone());
        }

        let id = CartItemId::new(tables.next_cart_item_id);
        tables.next_cart_item_id += 1;
        let row = CartItem {
            id,
            cart_id: item.cart_id,
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
        };
        tables.cart_items.insert(id, row.clone());
        Ok(row)
    }

    async fn update_cart_item_quantity(
        &self,
        id: CartItemId,
        quantity: i32,
    ) -> Result<Option<CartItem>> {
        let mut tables = self.tables.write().await;
        Ok(tables.cart_items.get_mut(&id).map(|item| {
            item.quantity = quantity;
            item.clone()
        }))
    }

    async fn remove_cart_item(&self, id: CartItemId) -> Result<bool> {
        Ok(self.tables.write().await.cart_items.remove(&id).is_some())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn get_user_orders(&self, user_id: UserId) -> Result<Vec<Order>> {
        let tables = self.tables.read().await;
        let mut orders: Vec<_> = tables
            .orders
            .values()
            .filter(|o| o.user_id == Some(user_id))
            .cloned()
            .collect();
        // Newest first; id breaks ties between orders created within the
        // same timestamp tick
        orders.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(orders)
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order> {
        let mut tables = self.tables.write().await;
        let id = OrderId::new(tables.next_order_id);
        tables.next_order_id += 1;
        let order = Order {
            id,
            user_id: order.user_id,
            status: order.status,
            shipping_address: order.shipping_address,
            shipping_city: order.shipping_city,
            shipping_state: order.shipping_state,
            shipping_zipcode: order.shipping_zipcode,
            shipping_method: order.shipping_method,
            shipping_cost: order.shipping_cost,
            payment_method: order.payment_method,
            subtotal: order.subtotal,
            total: order.total,
            created_at: Utc::now(),
        };
        tables.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>> {
        let mut tables = self.tables.write().await;
        Ok(tables.orders.get_mut(&id).map(|order| {
            order.status = status;
            order.clone()
        }))
    }

    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>> {
        let tables = self.tables.read().await;
        let mut items: Vec<_> = tables
            .order_items
            .values()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.id);
        Ok(items)
    }

    async fn add_order_item(&self, item: NewOrderItem) -> Result<OrderItem> {
        let mut tables = self.tables.write().await;
        let id = OrderItemId::new(tables.next_order_item_id);
        tables.next_order_item_id += 1;
        let row = OrderItem {
            id,
            order_id: item.order_id,
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            price: item.price,
        };
        tables.order_items.insert(id, row.clone());
        Ok(row)
    }

    async fn get_order_with_items(&self, order_id: OrderId) -> Result<Option<OrderWithItems>> {
        let Some(order) = self.get_order(order_id).await? else {
            return Ok(None);
        };
        let items = self.get_order_items(order_id).await?;
        Ok(Some(OrderWithItems { order, items }))
    }

    async fn get_shipping_options(&self) -> Result<Vec<ShippingOption>> {
        let tables = self.tables.read().await;
        let mut options: Vec<_> = tables.shipping_options.values().cloned().collect();
        options.sort_by_key(|o| o.id);
        Ok(options)
    }

    async fn get_shipping_option(&self, id: ShippingOptionId) -> Result<Option<ShippingOption>> {
        Ok(self.tables.read().await.shipping_options.get(&id).cloned())
    }

    async fn create_shipping_option(
        &self,
        name: &str,
        description: &str,
        price: Decimal,
        estimated_days: &str,
    ) -> Result<ShippingOption> {
        let mut tables = self.tables.write().await;
        Ok(tables.insert_shipping_option(name, description, price, estimated_days))
    }

    async fn get_payment_methods(&self) -> Result<Vec<PaymentMethod>> {
        let tables = self.tables.read().await;
        let mut methods: Vec<_> = tables
            .payment_methods
            .values()
            .filter(|m| m.is_active)
            .cloned()
            .collect();
        methods.sort_by_key(|m| m.id);
        Ok(methods)
    }

    async fn get_payment_method(&self, id: PaymentMethodId) -> Result<Option<PaymentMethod>> {
        Ok(self.tables.read().await.payment_methods.get(&id).cloned())
    }

    async fn get_payment_method_by_code(&self, code: &str) -> Result<Option<PaymentMethod>> {
        let tables = self.tables.read().await;
        Ok(tables
            .payment_methods
            .values()
            .find(|m| m.code == code)
            .cloned())
    }

    async fn create_payment_method(&self, name: &str, code: &str) -> Result<PaymentMethod> {
        let mut tables = self.tables.write().await;
        if tables.payment_methods.values().any(|m| m.code == code) {
            return Err(StorageError::Conflict("payment code already exists".to_owned()));
        }
        Ok(tables.insert_payment_method(name, code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(cart_id: CartId, product_id: ProductId, quantity: i32) -> NewCartItem {
        NewCartItem {
            cart_id,
            product_id,
            quantity,
            price: Decimal::new(10_00, 2),
        }
    }

    #[tokio::test]
    async fn test_sample_data_seeded() {
        let store = MemStorage::with_sample_data();
        assert_eq!(store.get_all_products().await.expect("products").len(), 8);
        assert_eq!(
            store.get_shipping_options().await.expect("options").len(),
            3
        );
        assert_eq!(store.get_payment_methods().await.expect("methods").len(), 3);
    }

    #[tokio::test]
    async fn test_add_existing_product_increments_quantity() {
        let store = MemStorage::with_sample_data();
        let cart = store.create_cart(None).await.expect("cart");
        let product_id = ProductId::new(1);

        store
            .add_cart_item(new_item(cart.id, product_id, 2))
            .await
            .expect("add");
        let item = store
            .add_cart_item(new_item(cart.id, product_id, 3))
            .await
            .expect("add again");

        assert_eq!(item.quantity, 5);
        let items = store.get_cart_items(cart.id).await.expect("items");
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_add_cart_item_unknown_product() {
        let store = MemStorage::new();
        let cart = store.create_cart(None).await.expect("cart");
        let err = store
            .add_cart_item(new_item(cart.id, ProductId::new(99), 1))
            .await
            .expect_err("should fail");
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_cart_removes_items() {
        let store = MemStorage::with_sample_data();
        let cart = store.create_cart(None).await.expect("cart");
        store
            .add_cart_item(new_item(cart.id, ProductId::new(1), 1))
            .await
            .expect("add");

        assert!(store.delete_cart(cart.id).await.expect("delete"));
        assert!(store.get_cart(cart.id).await.expect("get").is_none());
        assert!(store.get_cart_items(cart.id).await.expect("items").is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemStorage::new();
        let user = |username: &str, email: &str| NewUser {
            username: username.to_owned(),
            password: "hash".to_owned(),
            email: vitrine_core::Email::parse(email).expect("email"),
            name: "Test".to_owned(),
            address: None,
            city: None,
            state: None,
            zipcode: None,
        };

        store.create_user(user("alice", "alice@example.com")).await.expect("create");
        let err = store
            .create_user(user("alice", "other@example.com"))
            .await
            .expect_err("duplicate username");
        assert!(matches!(err, StorageError::Conflict(_)));
    }
}
