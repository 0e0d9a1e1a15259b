//! Inventory snapshot as returned by `/inventory/{steamid}/{app}/{context}`,
//! plus the run-scoped description cache.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// One page of a Steam inventory. Rebuilt every run, never mutated after fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub descriptions: Vec<ItemDescription>,
    #[serde(default)]
    pub total_inventory_count: Option<u64>,
    /// Steam sets this to `1` when the inventory did not fit the requested page.
    #[serde(default, deserialize_with = "truthy")]
    pub more_items: bool,
}

impl InventorySnapshot {
    pub fn trace_loaded(&self) {
        tracing::info!(
            assets = self.assets.len(),
            descriptions = self.descriptions.len(),
            total_inventory_count = ?self.total_inventory_count,
            "Loaded inventory snapshot"
        );
        if self.more_items {
            tracing::warn!(
                assets = self.assets.len(),
                "Inventory has more items than one page; only the first page is processed"
            );
        }
    }
}

/// A single owned item instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub assetid: String,
    pub classid: String,
    #[serde(default)]
    pub instanceid: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
}

impl Asset {
    pub fn new(assetid: impl Into<String>, classid: impl Into<String>) -> Self {
        Self {
            assetid: assetid.into(),
            classid: classid.into(),
            instanceid: None,
            amount: None,
        }
    }
}

/// Shared metadata for every asset of one class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDescription {
    pub classid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub market_hash_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub owner_actions: Option<Vec<OwnerAction>>,
    #[serde(default)]
    pub market_fee_app: Option<u32>,
}

impl ItemDescription {
    /// Name used in logs; falls back to the classid.
    pub fn display_name(&self) -> &str {
        self.market_hash_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.classid)
    }

    /// The `internal_name` of the first `item_class` tag, if any.
    pub fn item_class(&self) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.category == "item_class")
            .map(|tag| tag.internal_name.as_str())
    }

    /// The last owner action, which is where Steam puts "Turn into Gems...".
    pub fn last_owner_action(&self) -> Option<&OwnerAction> {
        self.owner_actions.as_ref().and_then(|actions| actions.last())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub internal_name: String,
    #[serde(default)]
    pub localized_tag_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerAction {
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub name: String,
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0) != 0,
        _ => false,
    })
}

/// Get-or-compute memo of `classid -> description` for one snapshot.
///
/// The first matching description wins. Misses are memoized as well, so an
/// absent description stays absent for the lifetime of the cache.
#[derive(Debug)]
pub struct DescriptionCache<'a> {
    snapshot: &'a InventorySnapshot,
    memo: HashMap<String, Option<&'a ItemDescription>>,
}

impl<'a> DescriptionCache<'a> {
    pub fn new(snapshot: &'a InventorySnapshot) -> Self {
        Self {
            snapshot,
            memo: HashMap::new(),
        }
    }

    pub fn get(&mut self, classid: &str) -> Option<&'a ItemDescription> {
        if let Some(hit) = self.memo.get(classid) {
            return *hit;
        }
        let found = self
            .snapshot
            .descriptions
            .iter()
            .find(|desc| desc.classid == classid);
        if found.is_none() {
            tracing::debug!(classid, "No description found for classid");
        }
        self.memo.insert(classid.to_owned(), found);
        found
    }

    pub fn snapshot(&self) -> &'a InventorySnapshot {
        self.snapshot
    }

    /// Number of classids looked up so far.
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description(classid: &str, name: &str) -> ItemDescription {
        ItemDescription {
            classid: classid.to_string(),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn parses_steam_inventory_payload() {
        let json = r#"{
            "assets": [
                {"appid": 753, "contextid": "6", "assetid": "1", "classid": "100", "instanceid": "0", "amount": "1"}
            ],
            "descriptions": [
                {
                    "appid": 753,
                    "classid": "100",
                    "instanceid": "0",
                    "name": "Gabe",
                    "market_fee_app": 570,
                    "owner_actions": [
                        {"link": "https://steamcommunity.com/my/gamecards/570/", "name": "View badge progress"},
                        {"link": "javascript:GetGooValue( '%contextid%', '%assetid%', 570, 2, 0 )", "name": "Turn into Gems..."}
                    ],
                    "tags": [
                        {"category": "item_class", "internal_name": "item_class_2", "localized_category_name": "Item Type", "localized_tag_name": "Trading Card"}
                    ]
                }
            ],
            "more_items": 1,
            "total_inventory_count": 1,
            "success": 1,
            "rwgrsn": -2
        }"#;

        let snapshot: InventorySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(
            snapshot.assets,
            vec![Asset {
                assetid: "1".into(),
                classid: "100".into(),
                instanceid: Some("0".into()),
                amount: Some("1".into()),
            }]
        );
        assert!(snapshot.more_items);
        let desc = &snapshot.descriptions[0];
        assert_eq!(desc.market_fee_app, Some(570));
        assert_eq!(desc.item_class(), Some("item_class_2"));
        assert_eq!(desc.last_owner_action().unwrap().name, "Turn into Gems...");
    }

    #[test]
    fn empty_inventory_has_no_arrays() {
        let snapshot: InventorySnapshot =
            serde_json::from_str(r#"{"total_inventory_count": 0, "success": 1}"#).unwrap();
        assert!(snapshot.assets.is_empty());
        assert!(snapshot.descriptions.is_empty());
        assert!(!snapshot.more_items);
    }

    #[test]
    fn cache_returns_first_match_and_same_reference() {
        let snapshot = InventorySnapshot {
            descriptions: vec![description("100", "first"), description("100", "second")],
            ..Default::default()
        };
        let mut cache = DescriptionCache::new(&snapshot);

        let a = cache.get("100").unwrap();
        let b = cache.get("100").unwrap();
        assert_eq!(a.name.as_deref(), Some("first"));
        assert!(std::ptr::eq(a, b));
        assert!(std::ptr::eq(a, &snapshot.descriptions[0]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_memoizes_absent_descriptions() {
        let snapshot = InventorySnapshot::default();
        let mut cache = DescriptionCache::new(&snapshot);
        assert!(cache.get("404").is_none());
        assert!(cache.get("404").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn item_class_ignores_other_categories() {
        let desc = ItemDescription {
            classid: "1".into(),
            tags: vec![
                Tag {
                    category: "Game".into(),
                    internal_name: "app_570".into(),
                    localized_tag_name: None,
                },
                Tag {
                    category: "item_class".into(),
                    internal_name: "item_class_4".into(),
                    localized_tag_name: None,
                },
            ],
            ..Default::default()
        };
        assert_eq!(desc.item_class(), Some("item_class_4"));
        assert_eq!(ItemDescription::default().item_class(), None);
    }
}
