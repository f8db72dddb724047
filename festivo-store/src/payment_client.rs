//! HTTP client for the payments resource of the Festivo backend.

use async_trait::async_trait;
use festivo_core::payment::{PaymentAck, PaymentCollaborator, PaymentError, PaymentRequest};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::app_config::PaymentsConfig;
use crate::records::{PaymentListResponse, PaymentRecord};

/// Talks to `/public/addPayment` and friends
#[derive(Debug, Clone)]
pub struct HttpPaymentCollaborator {
    client: reqwest::Client,
    base_url: String,
    add_path: String,
    list_path: String,
    by_id_path: String,
}

impl HttpPaymentCollaborator {
    pub fn new(config: &PaymentsConfig) -> Result<Self, PaymentError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| PaymentError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            add_path: config.add_path.clone(),
            list_path: config.list_path.clone(),
            by_id_path: config.by_id_path.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// JSON content type plus a bearer header when a token is present
    fn headers(token: Option<&str>) -> Result<HeaderMap, PaymentError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| PaymentError::Request("Invalid access token format".to_string()))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    /// Body of a 2xx response, or the classified failure
    async fn read_body(response: reqwest::Response) -> Result<String, PaymentError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NoResponse(e.to_string()))?;
        debug!("Payments API response ({})", status);

        if !status.is_success() {
            let err = PaymentError::from_response(
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
                &body,
            );
            error!("Payments API returned {}: {}", status, err);
            return Err(err);
        }

        Ok(body)
    }

    pub async fn list_payments(&self, token: Option<&str>) -> Result<Vec<PaymentRecord>, PaymentError> {
        let response = self
            .client
            .get(self.url(&self.list_path))
            .headers(Self::headers(token)?)
            .send()
            .await
            .map_err(send_error)?;

        let body = Self::read_body(response).await?;
        let parsed: PaymentListResponse = serde_json::from_str(&body)
            .map_err(|e| PaymentError::Other(format!("Failed to parse payment list: {}", e)))?;
        Ok(parsed.into_records())
    }

    pub async fn get_payment(&self, id: &str, token: Option<&str>) -> Result<PaymentRecord, PaymentError> {
        let url = format!("{}/{}", self.url(&self.by_id_path), id);
        let response = self
            .client
            .get(url)
            .headers(Self::headers(token)?)
            .send()
            .await
            .map_err(send_error)?;

        let body = Self::read_body(response).await?;
        serde_json::from_str(&body)
            .map_err(|e| PaymentError::Other(format!("Failed to parse payment {}: {}", id, e)))
    }
}

/// Builder problems never left the client; everything else got no answer
fn send_error(e: reqwest::Error) -> PaymentError {
    if e.is_builder() {
        PaymentError::Request(e.to_string())
    } else {
        PaymentError::NoResponse(e.to_string())
    }
}

#[async_trait]
impl PaymentCollaborator for HttpPaymentCollaborator {
    async fn submit_payment(
        &self,
        request: &PaymentRequest,
        token: Option<&str>,
    ) -> Result<PaymentAck, PaymentError> {
        let url = self.url(&self.add_path);
        info!("Posting payment of {} minor units to {}", request.amount, url);

        let response = self
            .client
            .post(&url)
            .headers(Self::headers(token)?)
            .json(request)
            .send()
            .await
            .map_err(send_error)?;

        let body = Self::read_body(response).await?;
        if body.trim().is_empty() {
            return Err(PaymentError::EmptyBody);
        }

        // A non-JSON body is still an answer, it just carries no transaction id
        let value = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
        PaymentAck::from_body(value)
    }
}
