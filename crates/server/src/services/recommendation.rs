//! Recommendation service.
//!
//! A category-frequency heuristic over the in-memory product list, not a
//! learned model. Past purchases drive the ranking for a user; the product
//! page gets same-category neighbors; everything else falls back to the
//! globally best-rated products.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use vitrine_core::{ProductId, UserId};

use crate::models::Product;
use crate::storage::{Storage, StorageError};

/// Maximum recommendations for a user (and the popularity fallback).
const USER_LIMIT: usize = 8;
/// Products taken per preferred category before backfilling.
const PER_CATEGORY: usize = 3;
/// Maximum recommendations on a product page.
const PRODUCT_LIMIT: usize = 4;

/// A recommended product with the reason it was picked.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(flatten)]
    pub product: Product,
    pub reason_code: &'static str,
    pub reason_text: String,
}

/// Recommendation queries.
#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<dyn Storage>,
}

impl RecommendationService {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// Recommendations for a user based on their purchase history.
    ///
    /// Categories the user bought from most often rank first; within a
    /// category, candidates are ordered by rating. Products the user has
    /// already purchased are never recommended. Users without orders get
    /// the popularity fallback.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a lookup fails.
    #[tracing::instrument(skip(self))]
    pub async fn for_user(&self, user_id: UserId) -> Result<Vec<Recommendation>, StorageError> {
        let orders = self.store.get_user_orders(user_id).await?;
        if orders.is_empty() {
            return self.popular().await;
        }

        let mut purchased_ids: HashSet<ProductId> = HashSet::new();
        for order in &orders {
            for item in self.store.get_order_items(order.id).await? {
                if let Some(product_id) = item.product_id {
                    purchased_ids.insert(product_id);
                }
            }
        }

        // Category frequency over the purchased products
        let mut category_counts: HashMap<String, usize> = HashMap::new();
        for product_id in &purchased_ids {
            if let Some(product) = self.store.get_product(*product_id).await? {
                *category_counts.entry(product.category).or_insert(0) += 1;
            }
        }

        let mut preferred_categories: Vec<(String, usize)> = category_counts.into_iter().collect();
        preferred_categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let preferred_categories: Vec<String> =
            preferred_categories.into_iter().map(|(c, _)| c).collect();

        let all_products = self.store.get_all_products().await?;
        let candidates: Vec<Product> = all_products
            .iter()
            .filter(|p| !purchased_ids.contains(&p.id))
            .cloned()
            .collect();

        let mut recommendations = Vec::new();
        for category in &preferred_categories {
            let mut in_category: Vec<&Product> = candidates
                .iter()
                .filter(|p| &p.category == category)
                .collect();
            in_category.sort_by(|a, b| b.rating.cmp(&a.rating));

            recommendations.extend(in_category.into_iter().take(PER_CATEGORY).map(|p| {
                Recommendation {
                    product: p.clone(),
                    reason_code: "category",
                    reason_text: format!("Because you bought {category} products"),
                }
            }));
        }

        // Not enough from known interests: surface one top-rated product
        // from each category the user has not explored yet
        if recommendations.len() < USER_LIMIT {
            let mut unexplored: Vec<String> = all_products
                .iter()
                .filter(|p| !preferred_categories.contains(&p.category))
                .map(|p| p.category.clone())
                .collect::<HashSet<_>>()
                .into_iter()
                .collect();
            unexplored.sort();

            for category in unexplored {
                if recommendations.len() >= USER_LIMIT {
                    break;
                }

                let mut in_category: Vec<&Product> = candidates
                    .iter()
                    .filter(|p| p.category == category)
                    .collect();
                in_category.sort_by(|a, b| b.rating.cmp(&a.rating));

                if let Some(product) = in_category.first() {
                    recommendations.push(Recommendation {
                        product: (*product).clone(),
                        reason_code: "explore",
                        reason_text: format!("Discover {category} products"),
                    });
                }
            }
        }

        recommendations.truncate(USER_LIMIT);
        Ok(recommendations)
    }

    /// Similar products for a product page: same category, best-rated
    /// first, excluding the product itself. Unknown products get the
    /// popularity fallback.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a lookup fails.
    #[tracing::instrument(skip(self))]
    pub async fn for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Recommendation>, StorageError> {
        let Some(product) = self.store.get_product(product_id).await? else {
            return self.popular().await;
        };

        let mut same_category: Vec<Product> = self
            .store
            .get_products_by_category(&product.category)
            .await?
            .into_iter()
            .filter(|p| p.id != product_id)
            .collect();
        same_category.sort_by(|a, b| b.rating.cmp(&a.rating));
        same_category.truncate(PRODUCT_LIMIT);

        Ok(same_category
            .into_iter()
            .map(|p| Recommendation {
                product: p,
                reason_code: "similar",
                reason_text: format!("Similar to {}", product.name),
            })
            .collect())
    }

    /// Popularity fallback: the best-rated products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    pub async fn popular(&self) -> Result<Vec<Recommendation>, StorageError> {
        let mut products = self.store.get_all_products().await?;
        products.sort_by(|a, b| b.rating.cmp(&a.rating));
        products.truncate(USER_LIMIT);

        Ok(products
            .into_iter()
            .map(|p| Recommendation {
                product: p,
                reason_code: "popular",
                reason_text: "Highly rated products".to_owned(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewOrder, NewOrderItem};
    use crate::storage::MemStorage;
    use rust_decimal::Decimal;
    use vitrine_core::OrderStatus;

    /// Record a purchase of the given products for user 1.
    async fn record_purchase(store: &MemStorage, product_ids: &[i32]) {
        let order = store
            .create_order(NewOrder {
                user_id: Some(UserId::new(1)),
                status: OrderStatus::Paid,
                shipping_address: "1 Main St".to_owned(),
                shipping_city: "Springfield".to_owned(),
                shipping_state: "SP".to_owned(),
                shipping_zipcode: "01000-000".to_owned(),
                shipping_method: "Standard Delivery".to_owned(),
                shipping_cost: Decimal::new(19_90, 2),
                payment_method: "pix".to_owned(),
                subtotal: Decimal::new(100_00, 2),
                total: Decimal::new(119_90, 2),
            })
            .await
            .expect("order");

        for id in product_ids {
            let product = store
                .get_product(ProductId::new(*id))
                .await
                .expect("get")
                .expect("product");
            store
                .add_order_item(NewOrderItem {
                    order_id: order.id,
                    product_id: Some(product.id),
                    product_name: product.name,
                    quantity: 1,
                    price: product.price,
                })
                .await
                .expect("order item");
        }
    }

    #[tokio::test]
    async fn test_user_without_orders_gets_popular() {
        let store = Arc::new(MemStorage::with_sample_data());
        let service = RecommendationService::new(store);

        let recs = service.for_user(UserId::new(1)).await.expect("recs");
        assert_eq!(recs.len(), 8);
        assert!(recs.iter().all(|r| r.reason_code == "popular"));
        // Best-rated first: The Power of Habit (4.9) tops the sample catalog
        assert_eq!(
            recs.first().map(|r| r.product.name.as_str()),
            Some("The Power of Habit")
        );
    }

    #[tokio::test]
    async fn test_purchased_products_never_recommended() {
        let store = Arc::new(MemStorage::with_sample_data());
        // Electronics purchases: Premium Smartphone, Bluetooth Headphones
        record_purchase(&store, &[1, 3]).await;
        let service = RecommendationService::new(Arc::clone(&store) as Arc<dyn Storage>);

        let recs = service.for_user(UserId::new(1)).await.expect("recs");
        assert!(!recs.is_empty());
        assert!(recs
            .iter()
            .all(|r| r.product.id != ProductId::new(1) && r.product.id != ProductId::new(3)));
    }

    #[tokio::test]
    async fn test_preferred_category_ranks_first() {
        let store = Arc::new(MemStorage::with_sample_data());
        record_purchase(&store, &[1, 3]).await;
        let service = RecommendationService::new(Arc::clone(&store) as Arc<dyn Storage>);

        let recs = service.for_user(UserId::new(1)).await.expect("recs");
        // The first suggestions come from the purchased category
        let first = recs.first().expect("at least one recommendation");
        assert_eq!(first.product.category, "Electronics");
        assert_eq!(first.reason_code, "category");
    }

    #[tokio::test]
    async fn test_backfills_with_unexplored_categories() {
        let store = Arc::new(MemStorage::with_sample_data());
        record_purchase(&store, &[4]).await; // Apparel; no other apparel exists
        let service = RecommendationService::new(Arc::clone(&store) as Arc<dyn Storage>);

        let recs = service.for_user(UserId::new(1)).await.expect("recs");
        assert!(recs.iter().any(|r| r.reason_code == "explore"));
        // One product per unexplored category
        let explore_categories: Vec<_> = recs
            .iter()
            .filter(|r| r.reason_code == "explore")
            .map(|r| r.product.category.clone())
            .collect();
        let mut deduped = explore_categories.clone();
        deduped.dedup();
        assert_eq!(explore_categories, deduped);
    }

    #[tokio::test]
    async fn test_user_recommendations_capped_at_eight() {
        let store = Arc::new(MemStorage::with_sample_data());
        record_purchase(&store, &[4]).await;
        let service = RecommendationService::new(Arc::clone(&store) as Arc<dyn Storage>);

        let recs = service.for_user(UserId::new(1)).await.expect("recs");
        assert!(recs.len() <= 8);
    }

    #[tokio::test]
    async fn test_product_page_same_category_excluding_self() {
        let store = Arc::new(MemStorage::with_sample_data());
        let service = RecommendationService::new(store);

        let recs = service
            .for_product(ProductId::new(1))
            .await
            .expect("recs");
        assert!(recs.len() <= 4);
        assert!(recs.iter().all(|r| r.product.category == "Electronics"));
        assert!(recs.iter().all(|r| r.product.id != ProductId::new(1)));
        assert!(recs.iter().all(|r| r.reason_code == "similar"));
        // Sorted by rating descending
        let ratings: Vec<_> = recs.iter().map(|r| r.product.rating).collect();
        let mut sorted = ratings.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(ratings, sorted);
    }

    #[tokio::test]
    async fn test_unknown_product_falls_back_to_popular() {
        let store = Arc::new(MemStorage::with_sample_data());
        let service = RecommendationService::new(store);

        let recs = service
            .for_product(ProductId::new(999))
            .await
            .expect("recs");
        assert!(recs.iter().all(|r| r.reason_code == "popular"));
    }
}
