#![doc = "steamcommunity.com implementation of the core `SteamApi` trait."]
//
//! # Steam Community client
//!
//! Wires [`gemgrind_core::contract::SteamApi`] to the three community
//! endpoints using the cookie-bearing client of a [`SteamSession`]:
//!
//! - `GET  /inventory/{steamid64}/{app}/{context}?count={n}`
//! - `GET  /{profile}/ajaxgetgoovalue?contextid=&assetid=&sessionid=&appid=`
//! - `POST /{profile}/ajaxgrindintogoo/`
//!
//! The conversion POST imitates the browser's XHR (user agent, referer,
//! origin). Its status is returned as-is; deciding what counts as success is
//! left to the caller's response policy.

use async_trait::async_trait;
use gemgrind_core::contract::{
    ConversionRequest, ConversionResponse, GooValueQuery, SteamApi, TransportError,
};
use gemgrind_core::error::{FetchError, LookupError};
use gemgrind_core::inventory::InventorySnapshot;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, CONTENT_TYPE, HOST, ORIGIN, REFERER,
    USER_AGENT,
};
use reqwest::StatusCode;

use crate::session::SteamSession;

pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:106.0) Gecko/20100101 Firefox/106.0";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

pub struct SteamCommunityClient {
    session: SteamSession,
    base: String,
    profile_path: String,
}

impl SteamCommunityClient {
    /// `profile` is a vanity name; without one the numeric profile path is used.
    pub fn new(session: SteamSession, profile: Option<&str>) -> Self {
        let base = session.base_url.as_str().trim_end_matches('/').to_string();
        let profile_path = match profile {
            Some(name) => format!("id/{name}"),
            None => format!("profiles/{}", session.steam_id),
        };
        tracing::info!(
            base = %base,
            profile_path = %profile_path,
            "Initialized Steam Community client"
        );
        Self {
            session,
            base,
            profile_path,
        }
    }

    pub fn profile_path(&self) -> &str {
        &self.profile_path
    }

    pub fn inventory_url(&self, app_id: u32, context_id: u32, count: u32) -> String {
        format!(
            "{}/inventory/{}/{}/{}?count={}",
            self.base, self.session.steam_id, app_id, context_id, count
        )
    }

    pub fn goo_value_url(&self) -> String {
        format!("{}/{}/ajaxgetgoovalue", self.base, self.profile_path)
    }

    pub fn grind_url(&self) -> String {
        format!("{}/{}/ajaxgrindintogoo/", self.base, self.profile_path)
    }

    /// Headers of the browser's own conversion XHR.
    pub fn conversion_headers(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("XMLHttpRequest"),
        );
        headers.insert(
            REFERER,
            HeaderValue::from_str(&format!("{}/{}/inventory/", self.base, self.profile_path))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        headers.insert(ORIGIN, HeaderValue::from_str(&self.base)?);
        if let Some(host) = self.session.base_url.host_str() {
            let host = match self.session.base_url.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            };
            headers.insert(HOST, HeaderValue::from_str(&host)?);
        }
        Ok(headers)
    }
}

/// Steam answers `{"success":1,"goo_value":"40",...}`; the value may also be numeric.
pub fn parse_goo_value(body: &serde_json::Value) -> Result<u64, LookupError> {
    let value = body
        .get("goo_value")
        .ok_or_else(|| LookupError::MissingValue(body.to_string()))?;
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<u64>().ok()))
        .ok_or_else(|| LookupError::MissingValue(body.to_string()))
}

#[async_trait]
impl SteamApi for SteamCommunityClient {
    fn session_id(&self) -> String {
        self.session.session_id.clone()
    }

    async fn fetch_inventory(
        &self,
        app_id: u32,
        context_id: u32,
        count: u32,
    ) -> Result<InventorySnapshot, FetchError> {
        let url = self.inventory_url(app_id, context_id, count);
        tracing::info!(url = %url, "Fetching inventory");
        let response = self
            .session
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if response.status() != StatusCode::OK {
            tracing::error!(status = %response.status(), "Inventory request was not successful");
            return Err(FetchError::Status(response.status().as_u16()));
        }

        response
            .json::<InventorySnapshot>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn goo_value(&self, query: &GooValueQuery) -> Result<u64, LookupError> {
        let response = self
            .session
            .client
            .get(self.goo_value_url())
            .query(query)
            .send()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;
        let value = parse_goo_value(&body)?;
        tracing::debug!(assetid = %query.assetid, goo_value = value, "Looked up gem value");
        Ok(value)
    }

    async fn grind_into_goo(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResponse, TransportError> {
        let response = self
            .session
            .client
            .post(self.grind_url())
            .headers(self.conversion_headers()?)
            .form(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(assetid = %request.assetid, status, "Conversion response received");
        Ok(ConversionResponse { status, body })
    }
}
