//! Contribution input loading
//!
//! Reads the JSON document of contributions, classifies every property and
//! isolates records that cannot be read so the rest of the batch still runs.

use crate::classify::{PropertyClassifier, RawValue};
use crate::models::{Contribution, Property, SkippedContribution};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fatal input problems. Per-record problems become [`SkippedContribution`]s.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("input has no `contributions` array")]
    MissingContributions,
}

/// A loaded batch
#[derive(Debug, Clone, Default)]
pub struct InputBatch {
    /// The document's `metadata` object, if any
    pub metadata: Option<Value>,
    pub contributions: Vec<Contribution>,
    pub skipped: Vec<SkippedContribution>,
}

impl InputBatch {
    pub fn num_properties(&self) -> usize {
        self.contributions.iter().map(|c| c.properties.len()).sum()
    }
}

#[derive(Debug, Deserialize)]
struct RawContribution {
    #[serde(alias = "id")]
    contribution_id: Value,
    #[serde(default)]
    paper_id: Option<Value>,
    #[serde(default)]
    paper_title: Option<String>,
    #[serde(alias = "properties")]
    reproducibility_properties: Vec<RawProperty>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProperty {
    predicate_id: Option<Value>,
    predicate_label: Option<Value>,
    object_id: Option<Value>,
    object_class: Option<Value>,
    property_type: Option<Value>,
    is_resource: Option<Value>,
    value: Option<Value>,
}

impl RawProperty {
    fn is_resource(&self) -> bool {
        let says_resource = |field: &Option<Value>| {
            field
                .as_ref()
                .and_then(Value::as_str)
                .is_some_and(|s| s.eq_ignore_ascii_case("resource"))
        };
        self.is_resource.as_ref().and_then(Value::as_bool).unwrap_or(false)
            || says_resource(&self.object_class)
            || says_resource(&self.property_type)
    }
}

/// Optional scalar metadata field; `null` and composites read as empty
fn field_text(field: &Option<Value>) -> String {
    field.as_ref().and_then(scalar_to_string).unwrap_or_default()
}

/// Read and classify the contributions in `path`
pub fn load_input(path: &Path, classifier: &PropertyClassifier) -> Result<InputBatch, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let batch = parse_input(&text, classifier)?;
    info!(
        "Loaded {} contributions ({} properties, {} skipped) from {}",
        batch.contributions.len(),
        batch.num_properties(),
        batch.skipped.len(),
        path.display()
    );
    Ok(batch)
}

/// Parse an input document held in memory
pub fn parse_input(text: &str, classifier: &PropertyClassifier) -> Result<InputBatch, InputError> {
    let mut document: Value = serde_json::from_str(text)?;
    let metadata = document.get_mut("metadata").map(Value::take);
    let records = match document.get_mut("contributions").map(Value::take) {
        Some(Value::Array(records)) => records,
        _ => return Err(InputError::MissingContributions),
    };

    if let Some(distribution) = metadata.as_ref().and_then(|m| m.get("property_distribution")) {
        debug!("Declared property distribution: {}", distribution);
    }

    let mut batch = InputBatch {
        metadata,
        ..Default::default()
    };

    for (index, record) in records.into_iter().enumerate() {
        match convert_record(&record, classifier) {
            Ok(contribution) => batch.contributions.push(contribution),
            Err(reason) => {
                let contribution_id = record_id(&record);
                warn!(
                    "Skipping malformed contribution #{} ({}): {}",
                    index,
                    contribution_id.as_deref().unwrap_or("no id"),
                    reason
                );
                batch.skipped.push(SkippedContribution {
                    index,
                    contribution_id,
                    reason,
                });
            }
        }
    }

    Ok(batch)
}

fn convert_record(record: &Value, classifier: &PropertyClassifier) -> Result<Contribution, String> {
    let raw = RawContribution::deserialize(record).map_err(|e| e.to_string())?;
    let id = scalar_to_string(&raw.contribution_id)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| "contribution_id is empty or not a scalar".to_string())?;

    let properties = raw
        .reproducibility_properties
        .iter()
        .enumerate()
        .map(|(i, prop)| convert_property(i, prop, classifier))
        .collect();

    Ok(Contribution {
        id,
        paper_id: raw.paper_id.as_ref().and_then(scalar_to_string).unwrap_or_default(),
        paper_title: raw.paper_title.unwrap_or_default(),
        properties,
    })
}

fn convert_property(index: usize, raw: &RawProperty, classifier: &PropertyClassifier) -> Property {
    let value = raw.value.as_ref().and_then(value_to_string);
    let object_id = field_text(&raw.object_id);
    let id = if object_id.is_empty() {
        format!("#{}", index)
    } else {
        object_id.clone()
    };

    classifier.classify_property(
        id,
        field_text(&raw.predicate_id),
        field_text(&raw.predicate_label),
        RawValue {
            value: value.as_deref(),
            object_id: &object_id,
            is_resource: raw.is_resource(),
        },
    )
}

/// Text form of a property value; `null` has none, composites are kept as
/// compact JSON
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        scalar => scalar_to_string(scalar),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn record_id(record: &Value) -> Option<String> {
    record
        .get("contribution_id")
        .or_else(|| record.get("id"))
        .and_then(scalar_to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::models::PropertyType;
    use serde_json::json;

    fn parse(doc: Value) -> Result<InputBatch, InputError> {
        parse_input(&doc.to_string(), &PropertyClassifier::new(&ClassifierConfig::default()))
    }

    #[test]
    fn test_parses_contributions_and_classifies() {
        let batch = parse(json!({
            "metadata": {"total_contributions": 1},
            "contributions": [{
                "contribution_id": "R1",
                "paper_id": "P1",
                "paper_title": "Title",
                "reproducibility_properties": [
                    {"predicate_id": "P3", "predicate_label": "code", "object_id": "L1",
                     "object_class": "literal", "property_type": "url",
                     "value": "https://github.com/acme/tool"},
                    {"predicate_id": "P4", "object_id": "R9", "object_class": "resource",
                     "value": "Random forest"},
                    {"predicate_id": "P5", "object_id": "L2", "value": 42},
                    {"predicate_id": "P6", "value": null}
                ]
            }]
        }))
        .unwrap();

        assert!(batch.metadata.is_some());
        assert!(batch.skipped.is_empty());
        let c = &batch.contributions[0];
        assert_eq!((c.id.as_str(), c.paper_id.as_str()), ("R1", "P1"));
        let types: Vec<_> = c.properties.iter().map(|p| p.declared_type).collect();
        assert_eq!(
            types,
            vec![
                PropertyType::UrlRepo,
                PropertyType::ResourceInternal,
                PropertyType::Literal,
                PropertyType::Literal
            ]
        );
        assert_eq!(c.properties[2].value.as_deref(), Some("42"));
        assert_eq!(c.properties[3].value, None);
        assert_eq!(c.properties[3].id, "#3");
    }

    #[test]
    fn test_aliases_are_accepted() {
        let batch = parse(json!({
            "contributions": [{"id": 7, "properties": [{"value": "x", "is_resource": true}]}]
        }))
        .unwrap();
        let c = &batch.contributions[0];
        assert_eq!(c.id, "7");
        assert_eq!(c.properties[0].declared_type, PropertyType::ResourceInternal);
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let batch = parse(json!({
            "contributions": [
                {"contribution_id": "R1", "reproducibility_properties": []},
                {"contribution_id": "R2"},
                {"paper_id": "P3", "reproducibility_properties": []},
                "not an object",
                {"contribution_id": "R5", "reproducibility_properties": [{"value": "y"}]}
            ]
        }))
        .unwrap();

        let ids: Vec<_> = batch.contributions.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["R1", "R5"]);
        let skipped: Vec<_> = batch.skipped.iter().map(|s| s.index).collect();
        assert_eq!(skipped, vec![1, 2, 3]);
        assert_eq!(batch.skipped[0].contribution_id.as_deref(), Some("R2"));
        assert!(batch.skipped[0].reason.contains("reproducibility_properties"));
        assert_eq!(batch.skipped[1].contribution_id, None);
    }

    #[test]
    fn test_null_property_metadata_keeps_contribution() {
        let batch = parse(json!({
            "contributions": [{
                "contribution_id": "R1",
                "reproducibility_properties": [
                    {"predicate_id": null, "predicate_label": null, "object_id": 17,
                     "object_class": null, "is_resource": null, "value": "kept"},
                    {"predicate_id": "P2", "predicate_label": "code", "object_id": "L2",
                     "value": "https://example.org/data"}
                ]
            }]
        }))
        .unwrap();

        assert!(batch.skipped.is_empty());
        let c = &batch.contributions[0];
        assert_eq!(c.properties.len(), 2);
        assert_eq!(c.properties[0].id, "17");
        assert_eq!(c.properties[0].predicate_id, "");
        assert_eq!(c.properties[0].predicate_label, "");
        assert_eq!(c.properties[0].declared_type, PropertyType::Literal);
        assert_eq!(c.properties[1].predicate_label, "code");
        assert_eq!(c.properties[1].declared_type, PropertyType::UrlOther);
    }

    #[test]
    fn test_fatal_input_errors() {
        let classifier = PropertyClassifier::default();
        assert!(matches!(
            parse_input("{not json", &classifier),
            Err(InputError::Json(_))
        ));
        assert!(matches!(
            parse(json!({"papers": []})),
            Err(InputError::MissingContributions)
        ));
        assert!(matches!(
            parse(json!({"contributions": {}})),
            Err(InputError::MissingContributions)
        ));
    }

    #[test]
    fn test_load_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_input(&dir.path().join("absent.json"), &PropertyClassifier::default())
            .unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
    }
}
