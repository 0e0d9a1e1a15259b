//! Session acquisition from an existing browser login.
//!
//! Steam's community endpoints authenticate with the `steamLoginSecure`
//! cookie, whose value is `<steamid64>||<token>` (URL-encoded as
//! `%7C%7C`). Form posts additionally carry a `sessionid` that must equal
//! the `sessionid` cookie; any 24 hex digit token works, so one is
//! generated when none is configured.

use reqwest::cookie::Jar;
use reqwest::{Client, Url};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::load_config::SteamSettings;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("malformed steamLoginSecure cookie: {0}")]
    MalformedLoginSecure(String),
    #[error("invalid base url {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Client(String),
}

/// Secrets taken from the environment, never from the config file.
#[derive(Clone)]
pub struct SteamCredentials {
    pub login_secure: String,
    pub session_id: Option<String>,
}

impl fmt::Debug for SteamCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SteamCredentials")
            .field("login_secure", &"<redacted>")
            .field("session_id", &self.session_id.as_ref().map(|_| "<set>"))
            .finish()
    }
}

/// An authenticated, cookie-bearing client plus the identifiers every request needs.
#[derive(Debug, Clone)]
pub struct SteamSession {
    pub client: Client,
    pub steam_id: u64,
    pub session_id: String,
    pub base_url: Url,
}

impl SteamSession {
    pub fn acquire(
        credentials: &SteamCredentials,
        settings: &SteamSettings,
    ) -> Result<Self, SessionError> {
        let (steam_id, cookie_value) = parse_login_secure(&credentials.login_secure)?;
        let base_url = Url::parse(&settings.base_url).map_err(|e| SessionError::BaseUrl {
            url: settings.base_url.clone(),
            reason: e.to_string(),
        })?;
        let session_id = credentials
            .session_id
            .clone()
            .unwrap_or_else(generate_session_id);

        let jar = Jar::default();
        jar.add_cookie_str(&format!("steamLoginSecure={cookie_value}; Path=/"), &base_url);
        jar.add_cookie_str(&format!("sessionid={session_id}; Path=/"), &base_url);

        let client = Client::builder()
            .cookie_provider(Arc::new(jar))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()
            .map_err(|e| SessionError::Client(e.to_string()))?;

        tracing::info!(
            steam_id,
            base_url = %base_url,
            session_id_generated = credentials.session_id.is_none(),
            "Acquired Steam session"
        );

        Ok(Self {
            client,
            steam_id,
            session_id,
            base_url,
        })
    }
}

/// Returns the SteamID64 and the cookie value in its URL-encoded wire form.
pub fn parse_login_secure(raw: &str) -> Result<(u64, String), SessionError> {
    let raw = raw.trim();
    let decoded = urlencoding::decode(raw)
        .map_err(|e| SessionError::MalformedLoginSecure(e.to_string()))?;
    let (id, token) = decoded.split_once("||").ok_or_else(|| {
        SessionError::MalformedLoginSecure("expected <steamid64>||<token>".to_string())
    })?;
    if token.is_empty() {
        return Err(SessionError::MalformedLoginSecure("empty token".to_string()));
    }
    let steam_id = id.parse::<u64>().map_err(|e| {
        SessionError::MalformedLoginSecure(format!("steamid {id:?} is not a number: {e}"))
    })?;
    Ok((steam_id, format!("{steam_id}%7C%7C{token}")))
}

pub fn generate_session_id() -> String {
    let mut token = uuid::Uuid::new_v4().simple().to_string();
    token.truncate(24);
    token
}
