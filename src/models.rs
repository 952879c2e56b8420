// Core data structures for the herald bot

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A discovered entity from a fetch source.
///
/// Identity is carried by `key`, which is derived from the item's rendered
/// name rather than a numeric id (ids may be absent or duplicated across
/// sources). Two items with the same rendered name collide deliberately:
/// the feeds deduplicate by title.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Item {
    /// Stable identity key, always non-empty
    pub key: String,
    /// Human-facing name used in rendered messages
    pub display_name: String,
    /// Informational fields (appid, image, download, size), never identity
    pub metadata: BTreeMap<String, String>,
}

impl Item {
    /// Create an item keyed by its display name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            display_name: name,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata field
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Get a metadata field, empty string if absent
    pub fn meta(&self, key: &str) -> &str {
        self.metadata.get(key).map(String::as_str).unwrap_or("")
    }
}

/// Fixed categories of monitored content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    NewGames,
    UpdatedGames,
    FixedGames,
    Status,
}

impl Feature {
    /// Get string representation (used in state-file keys and logs)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewGames => "new",
            Self::UpdatedGames => "update",
            Self::FixedGames => "fixed",
            Self::Status => "status",
        }
    }

    /// Human-facing label for command replies
    pub fn label(&self) -> &'static str {
        match self {
            Self::NewGames => "New Games",
            Self::UpdatedGames => "Updated Games",
            Self::FixedGames => "Fixed Games",
            Self::Status => "Status",
        }
    }

    /// Create from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "new" => Some(Self::NewGames),
            "update" | "updated" => Some(Self::UpdatedGames),
            "fixed" | "fix" => Some(Self::FixedGames),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    /// All game-domain features (the ones with per-feature seen sets)
    pub fn game_features() -> [Self; 3] {
        [Self::NewGames, Self::UpdatedGames, Self::FixedGames]
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Health classification of one status-page entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceHealth {
    Ok,
    Maintenance,
    Down,
    Unknown,
}

impl ServiceHealth {
    /// Classify raw status text by case-insensitive substring match
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("ok") {
            Self::Ok
        } else if lower.contains("maintenance") {
            Self::Maintenance
        } else if lower.contains("down") {
            Self::Down
        } else {
            Self::Unknown
        }
    }

    /// Fixed display glyph for rendered status lines
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Ok => "✅",
            Self::Maintenance => "⚠️",
            Self::Down => "❌",
            Self::Unknown => "ℹ️",
        }
    }
}

/// One fetch cycle's view of the status page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    /// (health, raw text) per status block, page order preserved
    pub entries: Vec<(ServiceHealth, String)>,
}

impl StatusReport {
    /// Render the report as display lines, one numbered server per entry
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return "ℹ️ Could not find status blocks".to_string();
        }
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, (health, text))| {
                format!("{} Server {}: {}", health.glyph(), idx + 1, text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any entry reports a non-Ok health
    pub fn has_problems(&self) -> bool {
        self.entries.iter().any(|(h, _)| *h != ServiceHealth::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_meta_access() {
        let item = Item::new("Alpha").with_meta("appid", "42");
        assert_eq!(item.key, "Alpha");
        assert_eq!(item.display_name, "Alpha");
        assert_eq!(item.meta("appid"), "42");
        assert_eq!(item.meta("missing"), "");
    }

    #[test]
    fn test_feature_roundtrip() {
        for feature in Feature::game_features() {
            assert_eq!(Feature::parse(feature.as_str()), Some(feature));
        }
        assert_eq!(Feature::parse("status"), Some(Feature::Status));
        assert_eq!(Feature::parse("invalid"), None);
    }

    #[test]
    fn test_health_classification() {
        assert_eq!(ServiceHealth::classify("OK"), ServiceHealth::Ok);
        assert_eq!(ServiceHealth::classify("Operational - ok"), ServiceHealth::Ok);
        assert_eq!(
            ServiceHealth::classify("Under Maintenance"),
            ServiceHealth::Maintenance
        );
        assert_eq!(ServiceHealth::classify("DOWN"), ServiceHealth::Down);
        assert_eq!(ServiceHealth::classify("degraded"), ServiceHealth::Unknown);
    }

    #[test]
    fn test_report_render() {
        let report = StatusReport {
            entries: vec![
                (ServiceHealth::Ok, "ok".to_string()),
                (ServiceHealth::Down, "down".to_string()),
            ],
        };
        let rendered = report.render();
        assert!(rendered.contains("✅ Server 1: ok"));
        assert!(rendered.contains("❌ Server 2: down"));
        assert!(report.has_problems());
    }

    #[test]
    fn test_empty_report_render() {
        let report = StatusReport::default();
        assert!(report.render().contains("Could not find status blocks"));
        assert!(!report.has_problems());
    }
}
