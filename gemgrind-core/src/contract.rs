#![allow(unused)]

//! # contract: the transport seam between the pipeline and Steam
//!
//! [`SteamApi`] is the only way the core talks to steamcommunity.com. The
//! binary crate implements it with an authenticated `reqwest` client; tests
//! use the `mockall`-generated `MockSteamApi`.
//!
//! Request types are plain data and serialize to exactly the form/query
//! fields the endpoints expect.

use async_trait::async_trait;
use mockall::{automock, predicate::*};
use serde::Serialize;

use crate::error::{FetchError, LookupError};
use crate::inventory::InventorySnapshot;

/// Query of `ajaxgetgoovalue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GooValueQuery {
    pub contextid: String,
    pub assetid: String,
    pub sessionid: String,
    pub appid: String,
}

/// Form body of `ajaxgrindintogoo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionRequest {
    pub contextid: String,
    pub assetid: String,
    pub sessionid: String,
    pub appid: String,
    pub goo_value_expected: String,
}

impl ConversionRequest {
    pub fn new(query: GooValueQuery, goo_value_expected: u64) -> Self {
        Self {
            contextid: query.contextid,
            assetid: query.assetid,
            sessionid: query.sessionid,
            appid: query.appid,
            goo_value_expected: goo_value_expected.to_string(),
        }
    }
}

/// Raw answer to a conversion POST; judged by a `ResponsePolicy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResponse {
    pub status: u16,
    pub body: String,
}

/// Error type for a conversion POST that never produced a response.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Authenticated access to the three community endpoints.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait SteamApi: Send + Sync {
    /// The session token echoed in every form.
    fn session_id(&self) -> String;

    /// One page of `/inventory/{steamid}/{app_id}/{context_id}?count={count}`.
    async fn fetch_inventory(
        &self,
        app_id: u32,
        context_id: u32,
        count: u32,
    ) -> Result<InventorySnapshot, FetchError>;

    /// The gem value Steam expects for the asset.
    async fn goo_value(&self, query: &GooValueQuery) -> Result<u64, LookupError>;

    /// Issues the conversion. Any HTTP status is returned as `Ok`.
    async fn grind_into_goo(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResponse, TransportError>;
}
