//! On-disk settings document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The JSON settings file. Unknown keys are preserved across writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_name() {
        let settings = StoredSettings {
            gemini_api_key: Some("abc".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"geminiApiKey":"abc"}"#);
    }

    #[test]
    fn test_unknown_keys_survive() {
        let settings: StoredSettings =
            serde_json::from_str(r#"{"geminiApiKey": "k", "theme": "dark"}"#).unwrap();
        assert_eq!(settings.gemini_api_key.as_deref(), Some("k"));
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["theme"], "dark");
    }

    #[test]
    fn test_missing_key_is_none() {
        let settings: StoredSettings = serde_json::from_str("{}").unwrap();
        assert!(settings.gemini_api_key.is_none());
        assert_eq!(serde_json::to_string(&settings).unwrap(), "{}");
    }
}
