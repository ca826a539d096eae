//! `PostgreSQL` storage backend.
//!
//! Runtime-checked sqlx queries over the schema in `crates/server/migrations`.
//! Row structs keep raw column types; conversion into domain models happens
//! at the edge so invalid data at rest surfaces as
//! [`StorageError::DataCorruption`] instead of leaking outward.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use vitrine_core::{
    CartId, CartItemId, Email, OrderId, OrderStatus, PaymentMethodId, ProductId, ShippingOptionId,
    UserId,
};

use crate::models::{
    Cart, CartItem, CartItemWithProduct, NewCartItem, NewOrder, NewOrderItem, NewProduct, NewUser,
    Order, OrderItem, OrderWithItems, PaymentMethod, Product, ShippingOption, User,
};

use super::{Result, Storage, StorageError};

/// `PostgreSQL`-backed [`Storage`] implementation.
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool (used by the session store).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// =============================================================================
// Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    password: String,
    email: String,
    name: String,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zipcode: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StorageError;

    fn try_from(row: UserRow) -> Result<Self> {
        let email = Email::parse(&row.email).map_err(|e| {
            StorageError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        Ok(Self {
            id: UserId::new(row.id),
            username: row.username,
            password: row.password,
            email,
            name: row.name,
            address: row.address,
            city: row.city,
            state: row.state,
            zipcode: row.zipcode,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    image_url: String,
    category: String,
    stock: i32,
    rating: Decimal,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            image_url: row.image_url,
            category: row.category,
            stock: row.stock,
            rating: row.rating,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartRow {
    id: i32,
    user_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: CartId::new(row.id),
            user_id: row.user_id.map(UserId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: i32,
    cart_id: i32,
    product_id: i32,
    quantity: i32,
    price: Decimal,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            cart_id: CartId::new(row.cart_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            price: row.price,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: Option<i32>,
    status: String,
    shipping_address: String,
    shipping_city: String,
    shipping_state: String,
    shipping_zipcode: String,
    shipping_method: String,
    shipping_cost: Decimal,
    payment_method: String,
    subtotal: Decimal,
    total: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StorageError;

    fn try_from(row: OrderRow) -> Result<Self> {
        let status: OrderStatus = row.status.parse().map_err(|e| {
            StorageError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;
        Ok(Self {
            id: OrderId::new(row.id),
            user_id: row.user_id.map(UserId::new),
            status,
            shipping_address: row.shipping_address,
            shipping_city: row.shipping_city,
            shipping_state: row.shipping_state,
            shipping_zipcode: row.shipping_zipcode,
            shipping_method: row.shipping_method,
            shipping_cost: row.shipping_cost,
            payment_method: row.payment_method,
            subtotal: row.subtotal,
            total: row.total,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: Option<i32>,
    product_name: String,
    quantity: i32,
    price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: vitrine_core::OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: row.product_id.map(ProductId::new),
            product_name: row.product_name,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ShippingOptionRow {
    id: i32,
    name: String,
    description: String,
    price: Decimal,
    estimated_days: String,
}

impl From<ShippingOptionRow> for ShippingOption {
    fn from(row: ShippingOptionRow) -> Self {
        Self {
            id: ShippingOptionId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            estimated_days: row.estimated_days,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PaymentMethodRow {
    id: i32,
    name: String,
    code: String,
    is_active: bool,
}

impl From<PaymentMethodRow> for PaymentMethod {
    fn from(row: PaymentMethodRow) -> Self {
        Self {
            id: PaymentMethodId::new(row.id),
            name: row.name,
            code: row.code,
            is_active: row.is_active,
        }
    }
}

/// Map a unique-constraint violation to [`StorageError::Conflict`].
fn conflict_on_unique(err: sqlx::Error, message: &str) -> StorageError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return StorageError::Conflict(message.to_owned());
    }
    StorageError::Database(err)
}

const USER_COLUMNS: &str =
    "id, username, password, email, name, address, city, state, zipcode, created_at";
const PRODUCT_COLUMNS: &str = "id, name, description, price, image_url, category, stock, rating";
const ORDER_COLUMNS: &str = "id, user_id, status, shipping_address, shipping_city, \
     shipping_state, shipping_zipcode, shipping_method, shipping_cost, payment_method, \
     subtotal, total, created_at";

#[async_trait]
impl Storage for PgStorage {
    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, password, email, name, address, city, state, zipcode)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.username)
        .bind(&user.password)
        .bind(user.email.as_str())
        .bind(&user.name)
        .bind(&user.address)
        .bind(&user.city)
        .bind(&user.state)
        .bind(&user.zipcode)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "username or email already exists"))?;
        User::try_from(row)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Product::from))
    }

    async fn get_all_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get_products_by_category(&self, category: &str) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY id"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>> {
        // Escape LIKE metacharacters so user input stays a literal match
        let escaped = query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
        let pattern = format!("%{escaped}%");
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE name ILIKE $1 OR description ILIKE $1
             ORDER BY id"
        ))
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (name, description, price, image_url, category, stock, rating)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(&product.category)
        .bind(product.stock)
        .bind(product.rating)
        .fetch_one(&self.pool)
        .await?;
        Ok(Product::from(row))
    }

    async fn get_cart(&self, id: CartId) -> Result<Option<Cart>> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT id, user_id, created_at, updated_at FROM carts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Cart::from))
    }

    async fn get_cart_by_user(&self, user_id: UserId) -> Result<Option<Cart>> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT id, user_id, created_at, updated_at FROM carts
             WHERE user_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Cart::from))
    }

    async fn create_cart(&self, user_id: Option<UserId>) -> Result<Cart> {
        let row = sqlx::query_as::<_, CartRow>(
            "INSERT INTO carts (user_id) VALUES ($1)
             RETURNING id, user_id, created_at, updated_at",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(Cart::from(row))
    }

    async fn delete_cart(&self, id: CartId) -> Result<bool> {
        // cart_items go with the cart via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_cart_items(&self, cart_id: CartId) -> Result<Vec<CartItemWithProduct>> {
        #[derive(sqlx::FromRow)]
        struct JoinedRow {
            #[sqlx(flatten)]
            item: CartItemRow,
            #[sqlx(flatten)]
            product: ProductJoinRow,
        }

        #[derive(sqlx::FromRow)]
        struct ProductJoinRow {
            p_id: i32,
            p_name: String,
            p_description: String,
            p_price: Decimal,
            p_image_url: String,
            p_category: String,
            p_stock: i32,
            p_rating: Decimal,
        }

        let rows = sqlx::query_as::<_, JoinedRow>(
            "SELECT ci.id, ci.cart_id, ci.product_id, ci.quantity, ci.price,
                    p.id AS p_id, p.name AS p_name, p.description AS p_description,
                    p.price AS p_price, p.image_url AS p_image_url,
                    p.category AS p_category, p.stock AS p_stock, p.rating AS p_rating
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.cart_id = $1
             ORDER BY ci.id",
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CartItemWithProduct {
                item: CartItem::from(row.item),
                product: Product {
                    id: ProductId::new(row.product.p_id),
                    name: row.product.p_name,
                    description: row.product.p_description,
                    price: row.product.p_price,
                    image_url: row.product.p_image_url,
                    category: row.product.p_category,
                    stock: row.product.p_stock,
                    rating: row.product.p_rating,
                },
            })
            .collect())
    }

    async fn add_cart_item(&self, item: NewCartItem) -> Result<CartItem> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, CartItemRow>(
            "SELECT id, cart_id, product_id, quantity, price FROM cart_items
             WHERE cart_id = $1 AND product_id = $2
             FOR UPDATE",
        )
        .bind(item.cart_id)
        .bind(item.product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let row = if let Some(existing) = existing {
            sqlx::query_as::<_, CartItemRow>(
                "UPDATE cart_items SET quantity = quantity + $1
                 WHERE id = $2
                 RETURNING id, cart_id, product_id, quantity, price",
            )
            .bind(item.quantity)
            .bind(existing.id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query_as::<_, CartItemRow>(
                "INSERT INTO cart_items (cart_id, product_id, quantity, price)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, cart_id, product_id, quantity, price",
            )
            .bind(item.cart_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .fetch_one(&mut *tx)
            .await?
        };

        tx.commit().await?;
        Ok(CartItem::from(row))
    }

    async fn update_cart_item_quantity(
        &self,
        id: CartItemId,
        quantity: i32,
    ) -> Result<Option<CartItem>> {
        let row = sqlx::query_as::<_, CartItemRow>(
            "UPDATE cart_items SET quantity = $1 WHERE id = $2
             RETURNING id, cart_id, product_id, quantity, price",
        )
        .bind(quantity)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(CartItem::from))
    }

    async fn remove_cart_item(&self, id: CartItemId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Order::try_from).transpose()
    }

    async fn get_user_orders(&self, user_id: UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders (user_id, status, shipping_address, shipping_city,
                                 shipping_state, shipping_zipcode, shipping_method,
                                 shipping_cost, payment_method, subtotal, total)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order.user_id)
        .bind(order.status.as_str())
        .bind(&order.shipping_address)
        .bind(&order.shipping_city)
        .bind(&order.shipping_state)
        .bind(&order.shipping_zipcode)
        .bind(&order.shipping_method)
        .bind(order.shipping_cost)
        .bind(&order.payment_method)
        .bind(order.subtotal)
        .bind(order.total)
        .fetch_one(&self.pool)
        .await?;
        Order::try_from(row)
    }

    async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET status = $1 WHERE id = $2
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Order::try_from).transpose()
    }

    async fn get_order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, product_id, product_name, quantity, price
             FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    async fn add_order_item(&self, item: NewOrderItem) -> Result<OrderItem> {
        let row = sqlx::query_as::<_, OrderItemRow>(
            "INSERT INTO order_items (order_id, product_id, product_name, quantity, price)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, order_id, product_id, product_name, quantity, price",
        )
        .bind(item.order_id)
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.price)
        .fetch_one(&self.pool)
        .await?;
        Ok(OrderItem::from(row))
    }

    async fn get_order_with_items(&self, order_id: OrderId) -> Result<Option<OrderWithItems>> {
        let Some(order) = self.get_order(order_id).await? else {
            return Ok(None);
        };
        let items = self.get_order_items(order_id).await?;
        Ok(Some(OrderWithItems { order, items }))
    }

    async fn get_shipping_options(&self) -> Result<Vec<ShippingOption>> {
        let rows = sqlx::query_as::<_, ShippingOptionRow>(
            "SELECT id, name, description, price, estimated_days
             FROM shipping_options ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ShippingOption::from).collect())
    }

    async fn get_shipping_option(&self, id: ShippingOptionId) -> Result<Option<ShippingOption>> {
        let row = sqlx::query_as::<_, ShippingOptionRow>(
            "SELECT id, name, description, price, estimated_days
             FROM shipping_options WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ShippingOption::from))
    }

    async fn create_shipping_option(
        &self,
        name: &str,
        description: &str,
        price: Decimal,
        estimated_days: &str,
    ) -> Result<ShippingOption> {
        let row = sqlx::query_as::<_, ShippingOptionRow>(
            "INSERT INTO shipping_options (name, description, price, estimated_days)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, description, price, estimated_days",
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(estimated_days)
        .fetch_one(&self.pool)
        .await?;
        Ok(ShippingOption::from(row))
    }

    async fn get_payment_methods(&self) -> Result<Vec<PaymentMethod>> {
        let rows = sqlx::query_as::<_, PaymentMethodRow>(
            "SELECT id, name, code, is_active FROM payment_methods
             WHERE is_active ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(PaymentMethod::from).collect())
    }

    async fn get_payment_method(&self, id: PaymentMethodId) -> Result<Option<PaymentMethod>> {
        let row = sqlx::query_as::<_, PaymentMethodRow>(
            "SELECT id, name, code, is_active FROM payment_methods WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(PaymentMethod::from))
    }

    async fn get_payment_method_by_code(&self, code: &str) -> Result<Option<PaymentMethod>> {
        let row = sqlx::query_as::<_, PaymentMethodRow>(
            "SELECT id, name, code, is_active FROM payment_methods WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(PaymentMethod::from))
    }

    async fn create_payment_method(&self, name: &str, code: &str) -> Result<PaymentMethod> {
        let row = sqlx::query_as::<_, PaymentMethodRow>(
            "INSERT INTO payment_methods (name, code) VALUES ($1, $2)
             RETURNING id, name, code, is_active",
        )
        .bind(name)
        .bind(code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "payment code already exists"))?;
        Ok(PaymentMethod::from(row))
    }
}
