#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::mpsc;

use learnhub_client::auth::InMemoryCredentialStore;
use learnhub_client::config::AppConfig;
use learnhub_client::errors::ClientError;
use learnhub_client::events::{ui_channel, UiEvent, DEFAULT_EVENT_CAPACITY};
use learnhub_client::gateway::{CheckoutRequest, PaymentGateway};
use learnhub_client::models::PaymentProof;
use learnhub_client::Portal;

pub const COURSE_ID: &str = "course-1";
pub const USER_ID: &str = "user-1";
pub const PAYMENT_ID: &str = "pay_123";
pub const SIGNATURE: &str = "sig_abc";

pub fn test_config(base_url: &str) -> AppConfig {
    AppConfig::new(base_url, "rzp_test_key")
}

/// Builds a portal against `config` with a seeded credential, returning the
/// UI event receiver alongside it.
pub fn portal_with_gateway(
    config: AppConfig,
    gateway: Arc<dyn PaymentGateway>,
) -> (Portal, mpsc::Receiver<UiEvent>) {
    let credentials = InMemoryCredentialStore::new();
    credentials.insert(config.auth_cookie_name.clone(), USER_ID);

    let (events, receiver) = ui_channel(DEFAULT_EVENT_CAPACITY);
    let portal = Portal::new(config, Arc::new(credentials), gateway, events)
        .expect("portal construction");
    (portal, receiver)
}

/// Collects every event emitted so far without blocking.
pub fn drain(receiver: &mut mpsc::Receiver<UiEvent>) -> Vec<UiEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

pub fn course_detail_body(price: i64) -> serde_json::Value {
    json!({
        "coursedetail": {
            "_id": COURSE_ID,
            "title": "Mains Answer Writing",
            "description": "&lt;p&gt;PYQ &amp; strategy&lt;/p&gt;",
            "language": "Hindi",
            "thumbnail": "https://cdn.learnhub.example/thumbs/mains.png",
            "price": price,
            "createdAt": "2024-06-01T09:30:00.000Z",
            "modules": []
        }
    })
}

pub fn purchase_record_json(id: usize, title: &str) -> serde_json::Value {
    json!({
        "_id": format!("purchase-{id}"),
        "course_id": {
            "_id": format!("course-{id}"),
            "title": title,
            "description": "",
            "language": "English",
            "thumbnail": "",
            "price": 500,
            "createdAt": "2024-03-15T00:00:00.000Z"
        }
    })
}

/// Gateway double that signs off on every checkout with a fixed proof.
#[derive(Default)]
pub struct ApprovingGateway {
    calls: AtomicUsize,
}

impl ApprovingGateway {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for ApprovingGateway {
    async fn open_checkout(&self, request: CheckoutRequest) -> Result<PaymentProof, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PaymentProof {
            order_id: request.order_id,
            payment_id: PAYMENT_ID.into(),
            signature: SIGNATURE.into(),
        })
    }
}

/// Gateway double for a user who dismisses the checkout UI.
pub struct AbandoningGateway;

#[async_trait]
impl PaymentGateway for AbandoningGateway {
    async fn open_checkout(&self, _request: CheckoutRequest) -> Result<PaymentProof, ClientError> {
        Err(ClientError::CheckoutAbandoned)
    }
}
