use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::api::ApiClient;
use crate::errors::ClientError;
use crate::models::Discount;

#[derive(Clone)]
pub struct CouponService {
    api: Arc<ApiClient>,
}

impl CouponService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Exchanges a coupon code for a discounted price.
    ///
    /// Every call re-invokes the remote service; results are never cached
    /// and re-applying the same code is not guaranteed to succeed twice.
    #[instrument(skip(self))]
    pub async fn apply(&self, code: &str, course_price: i64) -> Result<Discount, ClientError> {
        let url = self.api.coupon_endpoint("learnhub/api/coupon/applyCoupon")?;
        debug!(code, course_price, "applying coupon");

        let response = self
            .api
            .post(url, &ApplyCouponRequest { code, course_price })
            .await?;

        if !response.status().is_success() {
            return Err(match ApiClient::error_from_response(response).await {
                ClientError::Api { message, .. } => ClientError::CouponRejected(message),
                other => other,
            });
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Serialize)]
struct ApplyCouponRequest<'a> {
    code: &'a str,
    #[serde(rename = "coursePrice")]
    course_price: i64,
}
