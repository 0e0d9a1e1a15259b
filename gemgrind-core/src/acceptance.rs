//! Which conversion responses count as success.
//!
//! Steam answers the conversion POST inconsistently (a 400 for items that
//! were already ground, occasional 500s that still convert), so the accepted
//! set is supplied by the caller instead of being fixed here.

use serde::{Deserialize, Serialize};

/// The message Steam returns with HTTP 400 when the item is already gone.
pub const EXPIRED_MESSAGE: &str = "The item you selected has expired or no longer exists.";

/// Decides whether a conversion response is acceptable.
pub trait ResponsePolicy {
    fn is_acceptable(&self, status: u16, body: &str) -> bool;
}

impl<F> ResponsePolicy for F
where
    F: Fn(u16, &str) -> bool,
{
    fn is_acceptable(&self, status: u16, body: &str) -> bool {
        self(status, body)
    }
}

/// Matches a status, and optionally the exact `message` field of a JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptRule {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AcceptRule {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            message: None,
        }
    }

    pub fn status_with_message(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    pub fn matches(&self, status: u16, body: &str) -> bool {
        if self.status != status {
            return false;
        }
        match &self.message {
            None => true,
            Some(expected) => body_message(body).as_deref() == Some(expected.as_str()),
        }
    }
}

fn body_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(str::to_owned)
}

/// A response is acceptable when any rule matches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcceptancePolicy {
    pub rules: Vec<AcceptRule>,
}

impl AcceptancePolicy {
    pub fn new(rules: Vec<AcceptRule>) -> Self {
        Self { rules }
    }

    pub fn ok_only() -> Self {
        Self::new(vec![AcceptRule::status(200)])
    }

    /// 200, or 400 carrying [`EXPIRED_MESSAGE`].
    pub fn ok_or_expired() -> Self {
        Self::new(vec![
            AcceptRule::status(200),
            AcceptRule::status_with_message(400, EXPIRED_MESSAGE),
        ])
    }

    pub fn ok_or_server_error() -> Self {
        Self::new(vec![AcceptRule::status(200), AcceptRule::status(500)])
    }
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self::ok_or_expired()
    }
}

impl ResponsePolicy for AcceptancePolicy {
    fn is_acceptable(&self, status: u16, body: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(status, body))
    }
}
