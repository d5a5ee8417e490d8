//! Core domain types exchanged with the remote platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// EntityRef
// ---------------------------------------------------------------------------

/// Opaque reference to a platform entity (feed, content, collection, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
}

impl EntityRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

// ---------------------------------------------------------------------------
// SchedulePolicy
// ---------------------------------------------------------------------------

/// Recurrence mode of a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrenceType {
    Repeat,
}

/// Repeating-schedule descriptor attached to a feed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePolicy {
    pub recurrence_type: RecurrenceType,
    /// ISO-8601 interval, e.g. `PT15M`.
    pub repeat_interval: String,
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Search strategy for content queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchType {
    Vector,
    Keyword,
    Hybrid,
}

impl SearchType {
    pub const NAMES: &'static [&'static str] = &["Vector", "Keyword", "Hybrid"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Vector" => Some(Self::Vector),
            "Keyword" => Some(Self::Keyword),
            "Hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }
}

/// Content types the platform distinguishes.
pub const CONTENT_TYPES: &[&str] = &[
    "Email", "Event", "File", "Issue", "Memory", "Message", "Page", "Post", "Text",
];

/// File types the platform distinguishes.
pub const FILE_TYPES: &[&str] = &[
    "Animation",
    "Audio",
    "Code",
    "Data",
    "Document",
    "Drawing",
    "Email",
    "Geometry",
    "Image",
    "Package",
    "PointCloud",
    "Shape",
    "Video",
];

/// Absolute creation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

/// Geo-radius constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFilter {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius in kilometres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// Query filter in the shape the platform expects. All fields optional;
/// an empty filter means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_type: Option<SearchType>,
    /// Validated recency window as received (`PT1H`, `P7D`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_in_last: Option<String>,
    /// Absolute cutoff derived from `created_in_last`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feeds: Vec<EntityRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Filter {
    /// True when no field restricts the result set.
    pub fn is_unrestricted(&self) -> bool {
        self.search.is_none()
            && self.created_in_last.is_none()
            && self.creation_date_range.is_none()
            && self.types.is_empty()
            && self.file_types.is_empty()
            && self.feeds.is_empty()
            && self.collections.is_empty()
            && self.location.is_none()
    }
}

// ---------------------------------------------------------------------------
// Usage
// ---------------------------------------------------------------------------

/// One billable usage entry, with empty fields stripped.
pub type UsageRecord = Map<String, Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_serializes_to_empty_object() {
        let filter = Filter::default();
        assert!(filter.is_unrestricted());
        assert_eq!(serde_json::to_string(&filter).unwrap(), "{}");
    }

    #[test]
    fn filter_uses_platform_field_names() {
        let filter = Filter {
            search_type: Some(SearchType::Hybrid),
            created_in_last: Some("P7D".into()),
            file_types: vec!["Document".into()],
            feeds: vec![EntityRef::new("feed-1")],
            ..Default::default()
        };
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["searchType"], "Hybrid");
        assert_eq!(json["createdInLast"], "P7D");
        assert_eq!(json["fileTypes"][0], "Document");
        assert_eq!(json["feeds"][0]["id"], "feed-1");
        assert!(json.get("collections").is_none());
    }

    #[test]
    fn schedule_policy_shape() {
        let policy = SchedulePolicy {
            recurrence_type: RecurrenceType::Repeat,
            repeat_interval: "PT15M".into(),
        };
        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(json["recurrenceType"], "Repeat");
        assert_eq!(json["repeatInterval"], "PT15M");
    }

    #[test]
    fn search_type_names_roundtrip() {
        for name in SearchType::NAMES {
            let parsed = SearchType::from_name(name).expect("known name");
            assert_eq!(serde_json::to_value(parsed).unwrap(), *name);
        }
        assert!(SearchType::from_name("Fuzzy").is_none());
    }
}
