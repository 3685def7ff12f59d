// API client module: a small blocking HTTP client for the menu API.
// Two read-only endpoints are consumed, `/restaurants` and `/menu`. Every
// response body is decoded into typed records here, so nothing past this
// module ever sees raw JSON.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// Fixed message for a non-success `/restaurants` response.
pub const RESTAURANTS_FAILED: &str = "Failed to fetch restaurants";
/// Fixed message for a non-success `/menu` response.
pub const MENU_FAILED: &str = "Failed to fetch menu";

/// A dining establishment as returned by `GET /restaurants`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Restaurant {
    #[serde(rename = "r_ID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
}

/// One menu entry for one restaurant on one date. The field names on the
/// wire are the backend's column names.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dish {
    #[serde(rename = "s_ID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Preis")]
    pub price: f64,
    #[serde(rename = "Datum")]
    pub date: NaiveDate,
    #[serde(rename = "r_ID")]
    pub restaurant_id: i64,
    /// Denormalized restaurant name, only sent by some backends.
    #[serde(rename = "Restaurant", default, skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
}

/// A response body that did not match the expected record shape.
#[derive(Debug, Error)]
#[error("unexpected response shape from {endpoint}: {source}")]
pub struct DecodeError {
    pub endpoint: &'static str,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Request { message: &'static str, status: u16 },

    /// The request never produced a response, or the body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// The read side of the menu API the view controller depends on. Tests
/// substitute an in-memory implementation.
pub trait MenuApi {
    fn fetch_restaurants(&self) -> Result<Vec<Restaurant>, ApiError>;
    fn fetch_menu(&self, date: Option<NaiveDate>) -> Result<Vec<Dish>, ApiError>;
}

/// Blocking client holding a reqwest client and the API base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl ApiClient {
    /// Create a client for `base_url` whose requests never time out. A
    /// trailing slash is ignored.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, None)
    }

    /// Like [`ApiClient::new`], but requests fail after `timeout` when set.
    /// reqwest's blocking client would otherwise apply its own 30 s default.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder().timeout(timeout).build()?;
        Ok(ApiClient {
            client,
            base_url,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::with_timeout(
            config.api_url.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one GET and decode the body as `Vec<T>`.
    fn get_list<T>(
        &self,
        endpoint: &'static str,
        query: &[(&str, String)],
        failure: &'static str,
    ) -> Result<Vec<T>, ApiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, ?query, "GET");
        let res = self.client.get(&url).query(query).send()?;
        if !res.status().is_success() {
            return Err(ApiError::Request {
                message: failure,
                status: res.status().as_u16(),
            });
        }
        let body = res.text()?;
        decode_list(endpoint, &body)
    }
}

/// Decode a JSON array body, mapping shape mismatches to [`DecodeError`].
pub fn decode_list<T>(endpoint: &'static str, body: &str) -> Result<Vec<T>, ApiError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_str(body).map_err(|source| DecodeError { endpoint, source }.into())
}

impl MenuApi for ApiClient {
    fn fetch_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        self.get_list("/restaurants", &[], RESTAURANTS_FAILED)
    }

    /// Fetch every dish served on `date` (or on the server's "today" when
    /// no date is given). Restaurant filtering happens client side.
    fn fetch_menu(&self, date: Option<NaiveDate>) -> Result<Vec<Dish>, ApiError> {
        let query: Vec<(&str, String)> = date
            .map(|d| vec![("date_str", d.format("%Y-%m-%d").to_string())])
            .unwrap_or_default();
        self.get_list("/menu", &query, MENU_FAILED)
    }
}
