use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Body posted to the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub brand_drug: String,
}

impl SearchRequest {
    pub fn new(brand_drug: impl Into<String>) -> Self {
        Self {
            brand_drug: brand_drug.into(),
        }
    }
}

/// Generic-drug lookup reply (brand name echoed back with generated and raw info)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericLookup {
    #[serde(deserialize_with = "display_string")]
    pub brand_drug: String,
    #[serde(deserialize_with = "display_string")]
    pub generic_info: String,
    #[serde(deserialize_with = "display_string")]
    pub raw_info: String,
}

/// Brand comparison reply with the retailers carrying the drug
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandComparison {
    #[serde(deserialize_with = "display_string")]
    pub brand_info: String,
    #[serde(deserialize_with = "display_string")]
    pub generic_summary: String,
    #[serde(deserialize_with = "display_strings")]
    pub retailer_info: Vec<String>,
}

/// Text shown for a reply field: strings as-is, `null` as nothing, anything else as its JSON
fn display_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn display_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(display_text)
}

fn display_strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values.into_iter().map(display_text).collect())
}

/// Any reply the search endpoint may send back.
///
/// The variant is decided by which fields are present; unknown extra fields
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DrugInfo {
    Comparison(BrandComparison),
    Lookup(GenericLookup),
}

impl DrugInfo {
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_lookup_shape() {
        let info =
            DrugInfo::from_json(r#"{"brand_drug":"X","generic_info":"Y","raw_info":"Z"}"#).unwrap();
        assert_eq!(
            info,
            DrugInfo::Lookup(GenericLookup {
                brand_drug: "X".to_string(),
                generic_info: "Y".to_string(),
                raw_info: "Z".to_string(),
            })
        );
    }

    #[test]
    fn test_comparison_shape_ignores_extra_fields() {
        let info = DrugInfo::from_json(
            r#"{"brand_info":"A","generic_summary":"B","retailer_info":["C","D"],"source":"x"}"#,
        )
        .unwrap();
        match info {
            DrugInfo::Comparison(comparison) => {
                assert_eq!(comparison.retailer_info, vec!["C", "D"]);
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_shape_is_parse_error() {
        let err = DrugInfo::from_json(r#"{"error":"No brand drug provided"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportOrParse);

        let err = DrugInfo::from_json("<html>oops</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportOrParse);
    }

    #[test]
    fn test_non_string_fields_are_displayed() {
        let info = DrugInfo::from_json(
            r#"{"brand_drug":"X","generic_info":42,"raw_info":["tablet","10mg"]}"#,
        )
        .unwrap();
        assert_eq!(
            info,
            DrugInfo::Lookup(GenericLookup {
                brand_drug: "X".to_string(),
                generic_info: "42".to_string(),
                raw_info: r#"["tablet","10mg"]"#.to_string(),
            })
        );

        let info = DrugInfo::from_json(
            r#"{"brand_info":"A","generic_summary":null,"retailer_info":["C",7]}"#,
        )
        .unwrap();
        match info {
            DrugInfo::Comparison(comparison) => {
                assert_eq!(comparison.generic_summary, "");
                assert_eq!(comparison.retailer_info, vec!["C", "7"]);
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(SearchRequest::new("Lipitor")).unwrap();
        assert_eq!(body, serde_json::json!({ "brand_drug": "Lipitor" }));

        let request: SearchRequest = serde_json::from_str("{}").unwrap();
        assert!(request.brand_drug.is_empty());
    }
}
