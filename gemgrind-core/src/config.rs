use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::classify::{Filter, ProtectedClasses};

/// Steam Community items.
pub const STEAM_ITEMS_APP_ID: u32 = 753;
/// The community context within app 753.
pub const INVENTORY_CONTEXT_ID: u32 = 6;
/// Page size large enough for one page to hold the whole inventory.
pub const ITEMS_IN_INVENTORY_COUNT: u32 = 5_000;

/// Where the expected gem value of a candidate comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Ask `ajaxgetgoovalue`; a failed lookup skips the candidate.
    #[default]
    Lookup,
    /// Read a positional argument of the owner-action link; a malformed link aborts.
    Link,
}

/// Everything the grind pipeline needs besides the transport.
#[derive(Debug, Clone)]
pub struct GrindConfig {
    pub app_id: u32,
    pub context_id: u32,
    pub inventory_count: u32,
    pub filters: Vec<Filter>,
    pub protected: ProtectedClasses,
    pub value_source: ValueSource,
    /// Pause between conversion requests.
    pub delay: Duration,
    /// Resolve everything but issue no conversion requests.
    pub dry_run: bool,
}

impl Default for GrindConfig {
    fn default() -> Self {
        Self {
            app_id: STEAM_ITEMS_APP_ID,
            context_id: INVENTORY_CONTEXT_ID,
            inventory_count: ITEMS_IN_INVENTORY_COUNT,
            filters: Filter::defaults(),
            protected: ProtectedClasses::default(),
            value_source: ValueSource::default(),
            delay: Duration::ZERO,
            dry_run: false,
        }
    }
}

impl GrindConfig {
    pub fn trace_loaded(&self) {
        info!(
            app_id = self.app_id,
            context_id = self.context_id,
            inventory_count = self.inventory_count,
            filters = ?self.filters,
            value_source = ?self.value_source,
            delay_ms = self.delay.as_millis() as u64,
            dry_run = self.dry_run,
            "Loaded grind config"
        );
        debug!(?self, "Grind config (full debug)");
    }
}
