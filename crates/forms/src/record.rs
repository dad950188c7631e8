//! The flat field map submitted by the frontend

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One form submission: field name to raw string value
///
/// Every value is the string the user typed (numeric inputs included).
/// Missing fields read as empty, so renderers never distinguish "absent"
/// from "left blank".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormRecord {
    fields: BTreeMap<String, String>,
}

impl FormRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a field, or "" when unset
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    /// True when the field is unset or whitespace-only
    pub fn is_blank(&self, field: &str) -> bool {
        self.get(field).trim().is_empty()
    }

    pub fn set(&mut self, field: &str, value: &str) {
        self.fields.insert(field.to_string(), value.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FormRecord {
    fn from(entries: [(&str, &str); N]) -> Self {
        let mut record = Self::new();
        for (field, value) in entries {
            record.set(field, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_field_reads_empty() {
        let record = FormRecord::new();
        assert_eq!(record.get("name"), "");
        assert!(record.is_blank("name"));
    }

    #[test]
    fn test_set_get() {
        let mut record = FormRecord::new();
        record.set("name", "Machado de Assis");
        assert_eq!(record.get("name"), "Machado de Assis");
        assert!(!record.is_blank("name"));
    }

    #[test]
    fn test_blank_whitespace() {
        let record = FormRecord::from([("city", "   ")]);
        assert!(record.is_blank("city"));
        assert_eq!(record.get("city"), "   ");
    }

    #[test]
    fn test_serde_roundtrip() {
        let record = FormRecord::from([("name", "Ana"), ("cpf", "123.456.789-10")]);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"cpf":"123.456.789-10","name":"Ana"}"#);

        let back: FormRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_deserialize_frontend_shape() {
        // The frontend submits a plain JSON object of strings
        let record: FormRecord =
            serde_json::from_str(r#"{"financing":"88.500,00","own_resources":""}"#).unwrap();
        assert_eq!(record.get("financing"), "88.500,00");
        assert_eq!(record.get("own_resources"), "");
    }
}
