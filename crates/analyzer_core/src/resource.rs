use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key used by the validation report: `resourceType/id`.
pub type ResourceKey = String;

/// One record produced by the remote extraction.
///
/// Only the fields the browser needs are typed; everything else is kept in
/// `extra` so a round trip through serde keeps the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<ResourceName>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceName {
    Text(String),
    Fragments(Vec<NameFragment>),
    /// Any other shape, kept verbatim.
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameFragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource {
    pub fn key(&self) -> ResourceKey {
        format!("{}/{}", self.resource_type, self.id)
    }

    /// Human readable label: plain name, joined name fragments, or the id.
    pub fn display_name(&self) -> String {
        let label = match &self.name {
            Some(ResourceName::Text(text)) => text.trim().to_string(),
            Some(ResourceName::Fragments(fragments)) => fragments
                .iter()
                .filter_map(|fragment| fragment.text.as_deref())
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            Some(ResourceName::Other(_)) | None => String::new(),
        };
        if label.is_empty() {
            self.id.clone()
        } else {
            label
        }
    }

    /// Compact JSON of the whole record, lowercased for case-insensitive search.
    pub fn search_text(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_default()
            .to_lowercase()
    }

    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Per-type resource counts plus the distinguished total.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceCounts {
    by_type: BTreeMap<String, u64>,
    total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CountsError {
    #[error("counts payload has no total entry")]
    MissingTotal,
    #[error("counts do not add up: types sum to {sum}, total is {total}")]
    Inconsistent { sum: u64, total: u64 },
    #[error("per-type counts overflow when summed")]
    Overflow,
}

impl ResourceCounts {
    /// Builds counts from the wire object (`type -> count` plus `total`).
    pub fn from_wire(mut raw: BTreeMap<String, u64>) -> Result<Self, CountsError> {
        let total = raw.remove(TOTAL_KEY).ok_or(CountsError::MissingTotal)?;
        let sum = raw
            .values()
            .try_fold(0u64, |acc, count| acc.checked_add(*count))
            .ok_or(CountsError::Overflow)?;
        if sum != total {
            return Err(CountsError::Inconsistent { sum, total });
        }
        Ok(Self {
            by_type: raw,
            total,
        })
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn get(&self, resource_type: &str) -> u64 {
        self.by_type.get(resource_type).copied().unwrap_or(0)
    }

    /// Types in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.by_type.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn types(&self) -> Vec<String> {
        self.by_type.keys().cloned().collect()
    }
}

const TOTAL_KEY: &str = "total";

/// Resource key to validity label, as returned by the URL validation.
pub type ValidationReport = BTreeMap<ResourceKey, String>;

/// Counts and resources that were read together.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub counts: ResourceCounts,
    pub resources: Vec<Resource>,
}

impl Dataset {
    pub fn new(counts: ResourceCounts, resources: Vec<Resource>) -> Self {
        Self { counts, resources }
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn find(&self, key: &str) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_unknown_fields() {
        let raw = json!({
            "resourceType": "Patient",
            "id": "p1",
            "birthDate": "1970-01-01",
            "identifier": [{"value": "123"}]
        });
        let resource: Resource = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(resource.resource_type, "Patient");
        assert!(resource.url.is_none());
        assert_eq!(resource.extra["birthDate"], json!("1970-01-01"));
        assert_eq!(serde_json::to_value(&resource).unwrap(), raw);
    }

    #[test]
    fn display_name_covers_every_shape() {
        let plain: Resource = serde_json::from_value(json!({
            "resourceType": "StructureDefinition", "id": "sd", "name": "MyProfile"
        }))
        .unwrap();
        assert_eq!(plain.display_name(), "MyProfile");

        let fragments: Resource = serde_json::from_value(json!({
            "resourceType": "Patient", "id": "p",
            "name": [{"text": "Ana Souza"}, {"family": "Souza"}, {"text": "Ana"}]
        }))
        .unwrap();
        assert_eq!(fragments.display_name(), "Ana Souza, Ana");

        let odd: Resource = serde_json::from_value(json!({
            "resourceType": "Basic", "id": "b", "name": {"unexpected": true}
        }))
        .unwrap();
        assert!(matches!(odd.name, Some(ResourceName::Other(_))));
        assert_eq!(odd.display_name(), "b");
    }

    #[test]
    fn counts_require_consistent_total() {
        let raw: BTreeMap<String, u64> =
            [("Patient".into(), 2), ("Observation".into(), 3), ("total".into(), 5)].into();
        let counts = ResourceCounts::from_wire(raw).unwrap();
        assert_eq!(counts.total(), 5);
        assert_eq!(counts.get("Observation"), 3);
        assert_eq!(counts.types(), vec!["Observation", "Patient"]);

        let bad: BTreeMap<String, u64> = [("Patient".into(), 2), ("total".into(), 3)].into();
        assert_eq!(
            ResourceCounts::from_wire(bad),
            Err(CountsError::Inconsistent { sum: 2, total: 3 })
        );

        let missing: BTreeMap<String, u64> = [("Patient".into(), 2)].into();
        assert_eq!(ResourceCounts::from_wire(missing), Err(CountsError::MissingTotal));
    }

    #[test]
    fn counts_that_overflow_are_rejected() {
        let raw: BTreeMap<String, u64> = [
            ("Patient".into(), u64::MAX),
            ("Observation".into(), 2),
            ("total".into(), 1),
        ]
        .into();
        assert_eq!(ResourceCounts::from_wire(raw), Err(CountsError::Overflow));
    }
}
