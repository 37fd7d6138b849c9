use crate::Resource;

/// Resource type selection; `All` is the "all" sentinel of the type picker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(String),
}

impl TypeFilter {
    /// Parses the picker value: `"all"` (any case) or an exact resource type.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(raw.to_string())
        }
    }

    pub fn matches(&self, resource: &Resource) -> bool {
        match self {
            Self::All => true,
            Self::Only(resource_type) => resource.resource_type == *resource_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub resource_type: TypeFilter,
    pub search: String,
}

impl FilterCriteria {
    pub fn new(resource_type: TypeFilter, search: impl Into<String>) -> Self {
        Self {
            resource_type,
            search: search.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resource_type == TypeFilter::All && self.search.is_empty()
    }
}

/// Visible subset of `resources`, in input order.
///
/// The text term is matched against the whole serialized record, so a hit in
/// any nested field surfaces the resource.
pub fn filter_resources<'a, I>(resources: I, criteria: &FilterCriteria) -> Vec<&'a Resource>
where
    I: IntoIterator<Item = &'a Resource>,
{
    let needle = criteria.search.to_lowercase();
    resources
        .into_iter()
        .filter(|resource| criteria.resource_type.matches(resource))
        .filter(|resource| needle.is_empty() || resource.search_text().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(value: serde_json::Value) -> Resource {
        serde_json::from_value(value).unwrap()
    }

    fn sample() -> Vec<Resource> {
        vec![
            resource(json!({"resourceType": "Patient", "id": "p1", "name": [{"text": "Maria"}]})),
            resource(json!({"resourceType": "Observation", "id": "o1",
                "code": {"coding": [{"system": "http://loinc.org", "code": "8867-4"}]}})),
            resource(json!({"resourceType": "Patient", "id": "p2",
                "identifier": [{"system": "urn:cpf", "value": "000.123.456-00"}]})),
            resource(json!({"resourceType": "ValueSet", "id": "vs1",
                "url": "http://example.org/ValueSet/Colors", "name": "Colors"})),
        ]
    }

    fn ids(found: &[&Resource]) -> Vec<String> {
        found.iter().map(|resource| resource.id.clone()).collect()
    }

    #[test]
    fn empty_criteria_is_identity() {
        let data = sample();
        let found = filter_resources(&data, &FilterCriteria::default());
        assert_eq!(ids(&found), vec!["p1", "o1", "p2", "vs1"]);
    }

    #[test]
    fn type_filter_is_exact() {
        let data = sample();
        let criteria = FilterCriteria::new(TypeFilter::Only("Patient".into()), "");
        assert_eq!(ids(&filter_resources(&data, &criteria)), vec!["p1", "p2"]);

        let criteria = FilterCriteria::new(TypeFilter::Only("patient".into()), "");
        assert!(filter_resources(&data, &criteria).is_empty());
    }

    #[test]
    fn search_hits_nested_fields_case_insensitively() {
        let data = sample();
        let criteria = FilterCriteria::new(TypeFilter::All, "123");
        assert_eq!(ids(&filter_resources(&data, &criteria)), vec!["p2"]);

        let criteria = FilterCriteria::new(TypeFilter::All, "LOINC");
        assert_eq!(ids(&filter_resources(&data, &criteria)), vec!["o1"]);

        let criteria = FilterCriteria::new(TypeFilter::All, "colors");
        assert_eq!(ids(&filter_resources(&data, &criteria)), vec!["vs1"]);
    }

    #[test]
    fn typed_result_is_subset_of_untyped_and_idempotent() {
        let data = sample();
        for term in ["", "p", "http", "zzz", "Patient"] {
            let all = filter_resources(&data, &FilterCriteria::new(TypeFilter::All, term));
            for resource_type in ["Patient", "Observation", "ValueSet", "Missing"] {
                let criteria = FilterCriteria::new(TypeFilter::Only(resource_type.into()), term);
                let once = filter_resources(&data, &criteria);
                assert!(once.iter().all(|hit| all.contains(hit)));

                let twice = filter_resources(once.iter().copied(), &criteria);
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn picker_value_parses_all_sentinel() {
        assert_eq!(TypeFilter::parse("all"), TypeFilter::All);
        assert_eq!(TypeFilter::parse(" ALL "), TypeFilter::All);
        assert_eq!(TypeFilter::parse(""), TypeFilter::All);
        assert_eq!(
            TypeFilter::parse("CodeSystem"),
            TypeFilter::Only("CodeSystem".into())
        );
    }
}
