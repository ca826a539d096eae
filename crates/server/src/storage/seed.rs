//! Sample data for development and seeding.
//!
//! Used by [`MemStorage`](super::MemStorage) when the server runs without a
//! database, and by `vitrine-cli seed` to populate a fresh `PostgreSQL`
//! instance.

use rust_decimal::Decimal;

use crate::models::NewProduct;

/// A shipping option seed row.
pub struct ShippingOptionSeed {
    pub name: &'static str,
    pub description: &'static str,
    pub price: Decimal,
    pub estimated_days: &'static str,
}

/// A payment method seed row.
pub struct PaymentMethodSeed {
    pub name: &'static str,
    pub code: &'static str,
}

/// Build a catalog entry. Prices are in cents, ratings in tenths.
fn product(
    name: &str,
    description: &str,
    price_cents: i64,
    image_url: &str,
    category: &str,
    stock: i32,
    rating_tenths: i64,
) -> NewProduct {
    NewProduct {
        name: name.to_owned(),
        description: description.to_owned(),
        price: Decimal::new(price_cents, 2),
        image_url: image_url.to_owned(),
        category: category.to_owned(),
        stock,
        rating: Decimal::new(rating_tenths, 1),
    }
}

/// Sample catalog, mirroring the store's launch inventory.
#[must_use]
pub fn sample_products() -> Vec<NewProduct> {
    vec![
        product(
            "Premium Smartphone",
            "Flagship smartphone with a high-resolution camera and a fast processor.",
            2_499_99,
            "https://images.unsplash.com/photo-1598327105666-5b89351aff97?w=500",
            "Electronics",
            15,
            48,
        ),
        product(
            "Ultrathin Notebook",
            "Light, thin notebook with outstanding performance for work and play.",
            4_299_99,
            "https://images.unsplash.com/photo-1496181133206-80ce9b88a853?w=500",
            "Electronics",
            8,
            45,
        ),
        product(
            "Bluetooth Headphones",
            "Wireless noise-cancelling headphones for an immersive experience.",
            299_99,
            "https://images.unsplash.com/photo-1613040809024-b4ef7ba99bc3?w=500",
            "Electronics",
            25,
            42,
        ),
        product(
            "Basic T-Shirt",
            "High-quality 100% cotton t-shirt, available in several colors.",
            89_99,
            "https://images.unsplash.com/photo-1581655353564-df123a1eb820?w=500",
            "Apparel",
            50,
            40,
        ),
        product(
            "Running Shoes",
            "Comfortable shoes for running and walking with cushioning technology.",
            329_99,
            "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=500",
            "Sports",
            12,
            47,
        ),
        product(
            "The Power of Habit",
            "Best-seller on how to transform habits and change behavior.",
            49_99,
            "https://images.unsplash.com/photo-1544947950-fa07a98d237f?w=500",
            "Books",
            30,
            49,
        ),
        product(
            "Non-Stick Cookware Set",
            "High-quality cookware set with non-stick coating.",
            399_99,
            "https://images.unsplash.com/photo-1585837575652-267c041d77d4?w=500",
            "Home & Garden",
            18,
            43,
        ),
        product(
            "Smart Watch",
            "Smartwatch with health tracking, GPS, and water resistance.",
            999_99,
            "https://images.unsplash.com/photo-1579586337278-3befd40fd17a?w=500",
            "Electronics",
            10,
            46,
        ),
    ]
}

/// Shipping options offered at checkout.
#[must_use]
pub fn shipping_options() -> Vec<ShippingOptionSeed> {
    vec![
        ShippingOptionSeed {
            name: "Standard Delivery",
            description: "Delivery within 3-5 business days",
            price: Decimal::new(19_90, 2),
            estimated_days: "3-5 days",
        },
        ShippingOptionSeed {
            name: "Express Delivery",
            description: "Delivery within 1-2 business days",
            price: Decimal::new(39_90, 2),
            estimated_days: "1-2 days",
        },
        ShippingOptionSeed {
            name: "Store Pickup",
            description: "Pick up your order at one of our stores",
            price: Decimal::new(0, 2),
            estimated_days: "1 day",
        },
    ]
}

/// Payment methods offered at checkout.
#[must_use]
pub fn payment_methods() -> Vec<PaymentMethodSeed> {
    vec![
        PaymentMethodSeed {
            name: "Credit Card",
            code: "credit",
        },
        PaymentMethodSeed {
            name: "Boleto",
            code: "boleto",
        },
        PaymentMethodSeed {
            name: "Pix",
            code: "pix",
        },
    ]
}
