//! Payment service.
//!
//! A simulated gateway: no external calls are made. Each supported payment
//! code fabricates a transaction ID and method-specific details; a
//! successful "charge" moves the order to `paid`. A failed one leaves the
//! order untouched.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use vitrine_core::{OrderId, OrderStatus, PaymentMethodId};

use crate::models::PaymentMethod;
use crate::storage::{Storage, StorageError};

/// Errors from payment operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The order to charge does not exist.
    #[error("order not found")]
    OrderNotFound,

    /// The payment method code is not registered.
    #[error("payment method not found")]
    MethodNotFound,

    /// Storage operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Outcome of a simulated payment attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl PaymentOutcome {
    fn declined(message: &str) -> Self {
        Self {
            success: false,
            transaction_id: None,
            message: message.to_owned(),
            details: None,
        }
    }
}

/// Fabricate a transaction ID: prefix, millisecond timestamp, random suffix.
fn transaction_id(prefix: &str) -> String {
    let suffix: u32 = rand::rng().random_range(0..1000);
    format!("{prefix}-{}-{suffix}", Utc::now().timestamp_millis())
}

/// Payment method queries and the simulated gateway.
#[derive(Clone)]
pub struct PaymentService {
    store: Arc<dyn Storage>,
}

impl PaymentService {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// All active payment methods.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Storage` if the lookup fails.
    pub async fn get_all_methods(&self) -> Result<Vec<PaymentMethod>, PaymentError> {
        Ok(self.store.get_payment_methods().await?)
    }

    /// Get a payment method by ID.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Storage` if the lookup fails.
    pub async fn get_method(
        &self,
        id: PaymentMethodId,
    ) -> Result<Option<PaymentMethod>, PaymentError> {
        Ok(self.store.get_payment_method(id).await?)
    }

    /// Get a payment method by code.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Storage` if the lookup fails.
    pub async fn get_method_by_code(
        &self,
        code: &str,
    ) -> Result<Option<PaymentMethod>, PaymentError> {
        Ok(self.store.get_payment_method_by_code(code).await?)
    }

    /// Simulate processing a payment for an order.
    ///
    /// On a successful outcome the order status is updated to
    /// [`OrderStatus::Paid`]. A declined outcome (missing card details,
    /// unsupported code) is reported in the returned [`PaymentOutcome`];
    /// the order stays `pending` and no compensation runs.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::OrderNotFound` / `PaymentError::MethodNotFound`
    /// when the order or method does not exist, `PaymentError::Storage` for
    /// storage failures.
    #[tracing::instrument(skip(self, details))]
    pub async fn process(
        &self,
        order_id: OrderId,
        method_code: &str,
        details: Option<&Value>,
    ) -> Result<PaymentOutcome, PaymentError> {
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or(PaymentError::OrderNotFound)?;

        self.store
            .get_payment_method_by_code(method_code)
            .await?
            .ok_or(PaymentError::MethodNotFound)?;

        let outcome = match method_code {
            "credit" => Self::process_credit(details),
            "boleto" => Self::process_boleto(order.id),
            "pix" => Self::process_pix(order.id),
            _ => PaymentOutcome::declined("Unsupported payment method"),
        };

        if outcome.success {
            self.store
                .update_order_status(order.id, OrderStatus::Paid)
                .await?;
            tracing::info!(order_id = %order.id, method = method_code, "payment accepted");
        } else {
            tracing::warn!(order_id = %order.id, method = method_code, "payment declined");
        }

        Ok(outcome)
    }

    fn process_credit(details: Option<&Value>) -> PaymentOutcome {
        let Some(card_number) = details
            .and_then(|d| d.get("cardNumber"))
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
        else {
            return PaymentOutcome::declined("Credit card details not provided");
        };

        let last4 = card_number
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<String>();

        PaymentOutcome {
            success: true,
            transaction_id: Some(transaction_id("CC")),
            message: "Credit card payment processed successfully".to_owned(),
            details: Some(json!({
                "last4": last4,
                "cardType": "Visa",
            })),
        }
    }

    fn process_boleto(order_id: OrderId) -> PaymentOutcome {
        let document_number: u32 = rand::rng().random_range(0..10_000);
        PaymentOutcome {
            success: true,
            transaction_id: Some(transaction_id("BOL")),
            message: "Boleto generated successfully".to_owned(),
            details: Some(json!({
                "boletoUrl": format!("https://example.com/boleto/{order_id}"),
                "boletoNumber": format!("34191.79001 01043.510047 91020.150008 9 {document_number}"),
                "expirationDate": (Utc::now() + Duration::days(3)).to_rfc3339(),
            })),
        }
    }

    fn process_pix(order_id: OrderId) -> PaymentOutcome {
        let key_suffix: u32 = rand::rng().random_range(0..1_000_000);
        PaymentOutcome {
            success: true,
            transaction_id: Some(transaction_id("PIX")),
            message: "PIX charge generated successfully".to_owned(),
            details: Some(json!({
                "pixKey": format!("{order_id}{key_suffix}"),
                "pixQrCodeUrl": format!("https://example.com/pix-qrcode/{order_id}"),
                "expirationDate": (Utc::now() + Duration::minutes(30)).to_rfc3339(),
            })),
        }
    }
}
