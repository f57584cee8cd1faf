use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::ClientError;

/// Shared HTTP plumbing for the platform's REST endpoints.
///
/// Holds one connection pool for the whole client; the coupon service lives
/// on its own base URL in some deployments, so two bases are kept.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    coupon_base_url: Url,
}

impl ApiClient {
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            http,
            base_url: parse_base(&config.api_base_url)?,
            coupon_base_url: parse_base(config.coupon_api_base_url())?,
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        join(&self.base_url, path)
    }

    pub(crate) fn coupon_endpoint(&self, path: &str) -> Result<Url, ClientError> {
        join(&self.coupon_base_url, path)
    }

    pub(crate) async fn get(&self, url: Url) -> Result<Response, ClientError> {
        debug!(%url, "GET");
        Ok(self.http.get(url).send().await?)
    }

    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<Response, ClientError> {
        debug!(%url, "POST");
        Ok(self.http.post(url).json(body).send().await?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let response = self.get(url).await?;
        Self::decode_or_error(response).await
    }

    /// Decodes a 2xx response body, or turns anything else into
    /// [`ClientError::Api`] carrying the service's `message` when one is
    /// present.
    pub(crate) async fn decode_or_error<T: DeserializeOwned>(
        response: Response,
    ) -> Result<T, ClientError> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    pub(crate) async fn error_from_response(response: Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.message)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Error bodies carry a human-readable `message` across all services.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn parse_base(raw: &str) -> Result<Url, ClientError> {
    // A trailing slash keeps Url::join from eating the last path segment.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized).map_err(|e| ClientError::Config(format!("invalid base URL {raw:?}: {e}")))
}

fn join(base: &Url, path: &str) -> Result<Url, ClientError> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| ClientError::Config(format!("invalid endpoint path {path:?}: {e}")))
}
