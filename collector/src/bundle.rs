//! Normalising bundle exports.
//!
//! A model's bundle export is a YAML stream. Models consuming cross-model relations export a second
//! document describing the offers; only the bundle proper is archived.

use serde::Deserialize;

/// What an empty model's bundle is archived as.
pub const EMPTY_BUNDLE: &str = "{}";

/// Re-serialises every document of a YAML (or JSON) stream as compact JSON, in stream order.
///
/// Empty documents (including an empty export) come out as [`EMPTY_BUNDLE`].
pub fn parse_bundle(export: &str) -> Result<Vec<String>, serde_yml::Error> {
    serde_yml::Deserializer::from_str(export)
        .map(|document| {
            serde_json::Value::deserialize(document).map(|value| match value {
                serde_json::Value::Null => EMPTY_BUNDLE.to_string(),
                value => value.to_string(),
            })
        })
        .collect()
}

/// Cross-model relation fragments are recognised by an `offers` key (or value) anywhere in them.
pub fn is_offer_fragment(document: &str) -> bool {
    document.contains(r#""offers""#)
}
