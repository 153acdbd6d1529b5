//! Wire types for the extraction-service HTTP contract.
//!
//! The service speaks three shapes:
//!
//! 1. option lists — `GET /api/data_types` and `GET /api/formats`, each a
//!    list of `{ id, name }` pairs;
//! 2. the upload envelope — `POST /upload` answers
//!    `{ success, data?, download_url?, error?, detected_type? }`;
//! 3. the extraction payload itself — a union tagged by a `"type"` field.
//!
//! The tag on [`ExtractionResult`] determines *rendering only* (see
//! [`crate::render`]); the client never processes the payload further.
//! Unknown tags are therefore not an error: they deserialise into
//! [`ExtractionResult::Other`] and render as a raw structured dump.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One selectable option: a stable `id` sent back to the service and a
/// human-readable `name` shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub id: String,
    pub name: String,
}

/// Envelope of `GET /api/data_types`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataTypesResponse {
    #[serde(default)]
    pub data_types: Vec<OptionEntry>,
}

/// Envelope of `GET /api/formats`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatsResponse {
    #[serde(default)]
    pub formats: Vec<OptionEntry>,
}

/// The two option lists the client fetches at activation.
///
/// A fetch failure leaves the corresponding list empty rather than failing
/// the whole activation — the page stays usable without option lists.
#[derive(Debug, Clone, Default)]
pub struct OptionLists {
    pub data_types: Vec<OptionEntry>,
    pub formats: Vec<OptionEntry>,
}

/// User-chosen processing options, read once at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingOptions {
    /// Data-type id, e.g. `"auto"`, `"budget"`.
    pub data_type: String,
    /// Output-format id, e.g. `"csv"`, `"xlsx"`.
    pub output_format: String,
}

impl ProcessingOptions {
    pub fn new(data_type: impl Into<String>, output_format: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            output_format: output_format.into(),
        }
    }

    /// Both values must be present; empty strings mean the option controls
    /// were never populated.
    pub fn is_loaded(&self) -> bool {
        !self.data_type.is_empty() && !self.output_format.is_empty()
    }
}

impl Default for ProcessingOptions {
    /// Matches the service-side defaults (`data_type=auto`, `format=csv`).
    fn default() -> Self {
        Self::new("auto", "csv")
    }
}

/// Envelope of `POST /upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<ExtractionResult>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detected_type: Option<String>,
}

/// Envelope of `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Structured payload, dispatched on by [`crate::render`].
    pub result: ExtractionResult,
    /// Artifact URL as returned by the service (possibly relative).
    pub download_url: Option<String>,
    /// Top-level detected type reported by the service.
    pub detected_type: Option<String>,
}

// ── Extraction payload union ─────────────────────────────────────────────

/// The extraction payload, tagged by its `"type"` field.
///
/// Only `universal` and `budget` get dedicated rendering; every other tag
/// (and a missing tag) is kept verbatim as [`ExtractionResult::Other`].
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    Universal(UniversalResult),
    Budget(BudgetResult),
    Other(Value),
}

/// Free-text extraction with optional semantic sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniversalResult {
    #[serde(default)]
    pub detected_type: Option<String>,
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// A detected document section. Only the title matters for rendering;
/// the service sends more fields, which are ignored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub title: Option<String>,
}

/// Budget extraction: a total plus individual budget lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetResult {
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub lignes_budgetaires: Vec<BudgetLine>,
}

/// One budget line. Field names follow the service's wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub description: String,
    pub montant: f64,
}

impl ExtractionResult {
    /// Classify a raw JSON payload by its `"type"` tag.
    ///
    /// A recognised tag whose body then fails to match the expected shape
    /// falls back to [`ExtractionResult::Other`] — a malformed `budget`
    /// payload still renders (as a dump) instead of failing the submission.
    pub fn from_value(value: Value) -> Self {
        match value.get("type").and_then(Value::as_str) {
            Some("universal") => serde_json::from_value(value.clone())
                .map(ExtractionResult::Universal)
                .unwrap_or(ExtractionResult::Other(value)),
            Some("budget") => serde_json::from_value(value.clone())
                .map(ExtractionResult::Budget)
                .unwrap_or(ExtractionResult::Other(value)),
            _ => ExtractionResult::Other(value),
        }
    }

    /// The raw `"type"` tag, if any.
    pub fn type_tag(&self) -> Option<&str> {
        match self {
            ExtractionResult::Universal(_) => Some("universal"),
            ExtractionResult::Budget(_) => Some("budget"),
            ExtractionResult::Other(v) => v.get("type").and_then(Value::as_str),
        }
    }

    /// Re-assemble the wire form, including the `"type"` tag.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        Ok(match self {
            ExtractionResult::Universal(u) => {
                let mut v = serde_json::to_value(u)?;
                v["type"] = Value::from("universal");
                v
            }
            ExtractionResult::Budget(b) => {
                let mut v = serde_json::to_value(b)?;
                v["type"] = Value::from("budget");
                v
            }
            ExtractionResult::Other(v) => v.clone(),
        })
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::Error;
        self.to_value().map_err(S::Error::custom)?.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ExtractionResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(ExtractionResult::from_value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn universal_payload_deserialises() {
        let result: ExtractionResult = serde_json::from_value(json!({
            "type": "universal",
            "detected_type": "formation",
            "raw_text": "Bonjour",
            "sections": [{"title": "Intro", "content": "..."}, {"title": null}],
        }))
        .unwrap();

        match result {
            ExtractionResult::Universal(u) => {
                assert_eq!(u.detected_type.as_deref(), Some("formation"));
                assert_eq!(u.raw_text.as_deref(), Some("Bonjour"));
                assert_eq!(u.sections.len(), 2);
                assert_eq!(u.sections[0].title.as_deref(), Some("Intro"));
                assert_eq!(u.sections[1].title, None);
            }
            other => panic!("expected Universal, got {other:?}"),
        }
    }

    #[test]
    fn budget_payload_deserialises() {
        let result: ExtractionResult = serde_json::from_value(json!({
            "type": "budget",
            "total": 1500.5,
            "lignes_budgetaires": [
                {"description": "Rent", "montant": 1000},
                {"description": "Supplies", "montant": 500.5},
            ],
        }))
        .unwrap();

        match result {
            ExtractionResult::Budget(b) => {
                assert_eq!(b.total, 1500.5);
                assert_eq!(b.lignes_budgetaires.len(), 2);
                assert_eq!(b.lignes_budgetaires[0].description, "Rent");
                assert_eq!(b.lignes_budgetaires[0].montant, 1000.0);
            }
            other => panic!("expected Budget, got {other:?}"),
        }
    }

    #[test]
    fn unknown_tag_is_kept_raw() {
        let raw = json!({"type": "voirie", "routes": ["D12"]});
        let result = ExtractionResult::from_value(raw.clone());
        assert_eq!(result, ExtractionResult::Other(raw));
        assert_eq!(result.type_tag(), Some("voirie"));
    }

    #[test]
    fn missing_tag_is_kept_raw() {
        let raw = json!({"rows": [1, 2, 3]});
        let result = ExtractionResult::from_value(raw.clone());
        assert_eq!(result, ExtractionResult::Other(raw));
        assert_eq!(result.type_tag(), None);
    }

    #[test]
    fn malformed_budget_falls_back_to_raw() {
        // "budget" tag but lignes_budgetaires is not a list of lines.
        let raw = json!({"type": "budget", "lignes_budgetaires": "oops"});
        let result = ExtractionResult::from_value(raw.clone());
        assert_eq!(result, ExtractionResult::Other(raw));
    }

    #[test]
    fn upload_envelope_success() {
        let resp: UploadResponse = serde_json::from_value(json!({
            "success": true,
            "data": {"type": "universal", "raw_text": "x"},
            "download_url": "/download/out.csv",
            "detected_type": "universal",
        }))
        .unwrap();

        assert!(resp.success);
        assert!(resp.data.is_some());
        assert_eq!(resp.download_url.as_deref(), Some("/download/out.csv"));
        assert_eq!(resp.error, None);
    }

    #[test]
    fn upload_envelope_failure() {
        let resp: UploadResponse =
            serde_json::from_value(json!({"success": false, "error": "Erreur de traitement"}))
                .unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("Erreur de traitement"));
        assert!(resp.data.is_none());
    }

    #[test]
    fn option_lists_tolerate_missing_fields() {
        let d: DataTypesResponse = serde_json::from_value(json!({})).unwrap();
        assert!(d.data_types.is_empty());

        let f: FormatsResponse = serde_json::from_value(json!({
            "formats": [{"id": "csv", "name": "CSV"}]
        }))
        .unwrap();
        assert_eq!(f.formats[0].id, "csv");
    }

    #[test]
    fn to_value_restores_the_tag() {
        let result: ExtractionResult =
            serde_json::from_value(json!({"type": "budget", "total": 10.0})).unwrap();
        let v = result.to_value().unwrap();
        assert_eq!(v["type"], "budget");
        assert_eq!(v["total"], 10.0);
    }

    #[test]
    fn default_options_match_service_defaults() {
        let opts = ProcessingOptions::default();
        assert_eq!(opts.data_type, "auto");
        assert_eq!(opts.output_format, "csv");
        assert!(opts.is_loaded());
        assert!(!ProcessingOptions::new("", "csv").is_loaded());
    }
}
