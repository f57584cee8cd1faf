//! Capability interface for the external, UI-driving payment flow.
//!
//! The production shell backs this with the gateway vendor's embedded
//! checkout; tests substitute doubles. The orchestrator only ever sees the
//! trait.

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::errors::ClientError;
use crate::models::{PaymentOrder, PaymentProof};

/// Everything the gateway's checkout UI needs to present a payment for one
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Merchant public key
    pub key: String,
    pub order_id: String,
    /// Amount in whole currency units
    pub amount: i64,
    pub currency: String,
    pub merchant_name: String,
    pub description: String,
    pub theme_color: String,
}

impl CheckoutRequest {
    pub fn for_order(config: &AppConfig, order: &PaymentOrder) -> Self {
        Self {
            key: config.gateway_key_id.clone(),
            order_id: order.id.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            merchant_name: config.merchant_name.clone(),
            description: config.merchant_tagline.clone(),
            theme_color: config.checkout_theme_color.clone(),
        }
    }
}

/// An external payment flow that drives its own UI and reports back
/// asynchronously.
///
/// `open_checkout` resolves when the user completes or abandons the flow;
/// there is no bound on how long that takes. Dismissal surfaces as
/// [`ClientError::CheckoutAbandoned`]. Dropping the future cancels the
/// attempt, which is how the view's unmount tears the flow down.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn open_checkout(&self, request: CheckoutRequest) -> Result<PaymentProof, ClientError>;
}

/// Gateway stand-in for environments without an embedded checkout UI, such
/// as the developer CLI. Every attempt resolves as abandoned.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessGateway;

#[async_trait]
impl PaymentGateway for HeadlessGateway {
    async fn open_checkout(&self, _request: CheckoutRequest) -> Result<PaymentProof, ClientError> {
        Err(ClientError::CheckoutAbandoned)
    }
}
