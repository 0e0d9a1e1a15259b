/// `load_config` module: loads the static YAML config and injects the Steam secrets from the environment.
///
/// The YAML file never holds credentials. `STEAM_LOGIN_SECURE` (required) and
/// `STEAM_SESSION_ID` (optional) are read from the environment, which the
/// binary populates from `.env` when present.
///
/// Every section and key of the file is optional; missing values fall back to
/// the defaults of [`GrindConfig`] and [`SteamSettings`].
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::Result;
use gemgrind_core::acceptance::AcceptancePolicy;
use gemgrind_core::classify::{Filter, ProtectedClasses, ITEM_CLASS_CARD, ITEM_CLASS_EMOTICON};
use gemgrind_core::config::{
    GrindConfig, ValueSource, INVENTORY_CONTEXT_ID, ITEMS_IN_INVENTORY_COUNT, STEAM_ITEMS_APP_ID,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

use crate::session::SteamCredentials;

pub const LOGIN_SECURE_ENV: &str = "STEAM_LOGIN_SECURE";
pub const SESSION_ID_ENV: &str = "STEAM_SESSION_ID";

pub const DEFAULT_BASE_URL: &str = "https://steamcommunity.com";

/// Where and how to reach Steam.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SteamSettings {
    pub base_url: String,
    /// Vanity profile name (`/id/<profile>`); `/profiles/<steamid64>` when absent.
    pub profile: Option<String>,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for SteamSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: None,
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct InventorySection {
    app_id: u32,
    context_id: u32,
    count: u32,
}

impl Default for InventorySection {
    fn default() -> Self {
        Self {
            app_id: STEAM_ITEMS_APP_ID,
            context_id: INVENTORY_CONTEXT_ID,
            count: ITEMS_IN_INVENTORY_COUNT,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ClassifySection {
    filters: Vec<Filter>,
    protected_classes: Vec<String>,
}

impl Default for ClassifySection {
    fn default() -> Self {
        Self {
            filters: Filter::defaults(),
            protected_classes: vec![ITEM_CLASS_CARD.to_string(), ITEM_CLASS_EMOTICON.to_string()],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConvertSection {
    value_source: ValueSource,
    delay_ms: u64,
    accept: AcceptancePolicy,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    steam: SteamSettings,
    inventory: InventorySection,
    classify: ClassifySection,
    convert: ConvertSection,
}

/// Fully merged configuration for one CLI run.
#[derive(Debug)]
pub struct CliConfig {
    pub steam: SteamSettings,
    pub grind: GrindConfig,
    pub accept: AcceptancePolicy,
    pub credentials: SteamCredentials,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let login_secure = match std::env::var(LOGIN_SECURE_ENV) {
        Ok(value) if !value.trim().is_empty() => {
            info!("{LOGIN_SECURE_ENV} found in env");
            value
        }
        Ok(_) => {
            error!("{LOGIN_SECURE_ENV} is empty");
            anyhow::bail!("{LOGIN_SECURE_ENV} environment variable is empty");
        }
        Err(e) => {
            error!(error = ?e, "{LOGIN_SECURE_ENV} environment variable not set");
            return Err(anyhow::anyhow!(
                "{LOGIN_SECURE_ENV} environment variable not set: {e}"
            ));
        }
    };
    let session_id = std::env::var(SESSION_ID_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty());

    if raw.convert.accept.rules.is_empty() {
        error!("convert.accept has no rules");
        anyhow::bail!("convert.accept must list at least one accepted response");
    }

    let grind = GrindConfig {
        app_id: raw.inventory.app_id,
        context_id: raw.inventory.context_id,
        inventory_count: raw.inventory.count,
        filters: raw.classify.filters,
        protected: ProtectedClasses::new(raw.classify.protected_classes),
        value_source: raw.convert.value_source,
        delay: Duration::from_millis(raw.convert.delay_ms),
        dry_run: false,
    };

    info!(
        base_url = %raw.steam.base_url,
        profile = raw.steam.profile.as_deref().unwrap_or("<steamid64>"),
        filters = grind.filters.len(),
        accept_rules = raw.convert.accept.rules.len(),
        "Config loaded and merged successfully"
    );

    Ok(CliConfig {
        steam: raw.steam,
        grind,
        accept: raw.convert.accept,
        credentials: SteamCredentials {
            login_secure,
            session_id,
        },
    })
}
