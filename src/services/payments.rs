use std::sync::Arc;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::auth::UserId;
use crate::errors::ClientError;
use crate::models::{PaymentOrder, PaymentProof};

/// Response message the verification service sends on success.
const PAYMENT_SUCCESSFUL: &str = "Payment Successful";

#[derive(Clone)]
pub struct PaymentService {
    api: Arc<ApiClient>,
}

impl PaymentService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Creates a payment order for an amount/user/course triple.
    ///
    /// A conflict response means the user already owns the course; other
    /// failures surface as [`ClientError::Api`].
    #[instrument(skip(self, user_id))]
    pub async fn create_order(
        &self,
        amount: i64,
        user_id: &UserId,
        course_id: &str,
    ) -> Result<PaymentOrder, ClientError> {
        let url = self.api.endpoint("learnhub/api/payment/order")?;
        info!(amount, course_id, "creating payment order");

        let response = self
            .api
            .post(
                url,
                &CreateOrderRequest {
                    amount,
                    user_id: user_id.as_str(),
                    course_id,
                },
            )
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(ClientError::AlreadyPurchased);
        }

        let body: CreateOrderResponse = ApiClient::decode_or_error(response).await?;
        Ok(body.data)
    }

    /// Submits a signed gateway result for verification. Returns the
    /// redirect target the service hands back on success.
    #[instrument(skip(self, proof, user_id))]
    pub async fn verify(
        &self,
        proof: &PaymentProof,
        user_id: &UserId,
        course_id: &str,
    ) -> Result<String, ClientError> {
        let url = self.api.endpoint("learnhub/api/payment/verify")?;

        let response = self
            .api
            .post(
                url,
                &VerifyPaymentRequest {
                    proof,
                    user_id: user_id.as_str(),
                    course_id,
                },
            )
            .await?;

        let body: VerifyPaymentResponse = ApiClient::decode_or_error(response).await?;
        if body.message == PAYMENT_SUCCESSFUL {
            info!(course_id, "payment verified");
            Ok(body.url)
        } else {
            Err(ClientError::VerificationFailed(body.message))
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    amount: i64,
    user_id: &'a str,
    course_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    data: PaymentOrder,
}

#[derive(Debug, Serialize)]
struct VerifyPaymentRequest<'a> {
    #[serde(flatten)]
    proof: &'a PaymentProof,
    user_id: &'a str,
    course_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct VerifyPaymentResponse {
    message: String,
    #[serde(rename = "Url", default)]
    url: String,
}
