//! Derived form values
//!
//! The frontend calls `recompute` after every field change and writes the
//! results into its read-only fields. The same derivation feeds the PDF
//! renderers, so what the user previews is what prints.

use crate::FormRecord;
use br_text::{format_currency, format_expedition_date, format_signature_date, parse_currency};
use serde::{Deserialize, Serialize};

/// All values computed from a record, never typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFields {
    /// Sum of financing and own resources, formatted; "" while both inputs
    /// are still empty
    pub total_value: String,
    /// `expedition_date` as DD/MM/YYYY
    pub expedition_date: String,
    /// `signature_date` as "<mês> de <ano>"
    pub signature_date: String,
    /// "street, number, neighborhood", mirrored on both ITBI faces
    pub address: String,
    /// Display label for the property register city
    pub register_city_label: String,
}

/// Recompute every derived field from a record
///
/// Pure and total: any record produces a result.
pub fn recompute(record: &FormRecord) -> DerivedFields {
    let financing = record.get("financing");
    let own_resources = record.get("own_resources");

    // Both inputs untouched keeps the total blank instead of "0,00"
    let total_value = if financing.is_empty() && own_resources.is_empty() {
        String::new()
    } else {
        format_currency(parse_currency(financing) + parse_currency(own_resources))
    };

    let address = format!(
        "{}, {}, {}",
        record.get("street_name"),
        record.get("house_number"),
        record.get("neighborhood"),
    );

    let register_city_label = match record.get("property_register_city") {
        "pedro_osorio" => "PEDRO OSÓRIO",
        "cerrito" => "Cerrito",
        _ => "",
    }
    .to_string();

    DerivedFields {
        total_value,
        expedition_date: format_expedition_date(record.get("expedition_date")),
        signature_date: format_signature_date(record.get("signature_month")),
        address,
        register_city_label,
    }
}

impl DerivedFields {
    /// Derived value by field name, for layout resolution
    pub fn get(&self, field: &str) -> Option<&str> {
        match field {
            "total_value" => Some(&self.total_value),
            "expedition_date" => Some(&self.expedition_date),
            "signature_date" => Some(&self.signature_date),
            "address" => Some(&self.address),
            "register_city_label" => Some(&self.register_city_label),
            _ => None,
        }
    }
}
