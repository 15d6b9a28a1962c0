//! HTTP client for Copart's public lot-detail data endpoint.

mod normalize;

use std::time::Duration;

use lotlookup_core::{LotIdentifier, NormalizedRecord};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::CopartError;
use crate::source::LotSource;

pub use normalize::normalize_lot;

pub const DEFAULT_BASE_URL: &str = "https://www.copart.com";

/// Client for `GET {base}/public/data/lotdetails/lotDetails/{id}/USA`.
///
/// Makes exactly one request per lookup. Non-2xx statuses and payloads without
/// a top-level `data` envelope are typed errors; a `data` envelope that is
/// `null` or empty means Copart has no such lot.
#[derive(Debug, Clone)]
pub struct CopartClient {
    client: Client,
    base_url: Url,
}

impl CopartClient {
    /// Creates a client for `base_url` with the given timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// - [`CopartError::Http`] if the underlying `reqwest::Client` cannot be built.
    /// - [`CopartError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, CopartError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| CopartError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Fetches and normalizes one lot.
    ///
    /// # Errors
    ///
    /// - [`CopartError::Http`] on network or TLS failure.
    /// - [`CopartError::UnexpectedStatus`] on any non-2xx status, including 404.
    /// - [`CopartError::Deserialize`] if the body is not JSON.
    /// - [`CopartError::MalformedPayload`] if the `data` envelope is missing or not an object.
    /// - [`CopartError::LotNotFound`] if `data` is `null` or an empty object.
    pub async fn fetch_lot(&self, lot: &LotIdentifier) -> Result<NormalizedRecord, CopartError> {
        let url = self.lot_details_url(lot)?;
        tracing::debug!(lot = %lot, url = %url, "fetching copart lot details");

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CopartError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let payload = serde_json::from_str::<Value>(&body).map_err(|e| CopartError::Deserialize {
            context: format!("lot details for {}", lot.id()),
            source: e,
        })?;

        let data = extract_envelope(&payload, lot, url.as_str())?;
        Ok(normalize_lot(lot, data))
    }

    fn lot_details_url(&self, lot: &LotIdentifier) -> Result<Url, CopartError> {
        self.base_url
            .join(&format!(
                "public/data/lotdetails/lotDetails/{}/USA",
                lot.id()
            ))
            .map_err(|e| CopartError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}

impl LotSource for CopartClient {
    type Error = CopartError;

    async fn fetch(&self, lot: &LotIdentifier) -> Result<NormalizedRecord, CopartError> {
        self.fetch_lot(lot).await
    }
}

/// Returns the `data` object, distinguishing a malformed payload from an
/// explicit "no such lot" answer.
fn extract_envelope<'a>(
    payload: &'a Value,
    lot: &LotIdentifier,
    url: &str,
) -> Result<&'a Value, CopartError> {
    let Some(data) = payload.get("data") else {
        return Err(CopartError::MalformedPayload {
            url: url.to_owned(),
            reason: "missing top-level \"data\" envelope".to_owned(),
        });
    };

    match data {
        Value::Null => Err(CopartError::LotNotFound {
            lot: lot.id().to_owned(),
        }),
        Value::Object(map) if map.is_empty() => Err(CopartError::LotNotFound {
            lot: lot.id().to_owned(),
        }),
        Value::Object(_) => Ok(data),
        _ => Err(CopartError::MalformedPayload {
            url: url.to_owned(),
            reason: "\"data\" envelope is not an object".to_owned(),
        }),
    }
}
