//! Form validation
//!
//! The rules the forms enforce before export, with the pt-BR messages shown
//! next to the inputs. Required checks cover every registered field, person
//! names carry a three-character minimum, the identity register a
//! ten-character minimum, and CPFs must match the masked shape.

use crate::FormRecord;
use br_text::cpf;
use serde::{Deserialize, Serialize};

/// One validation failure, addressed to a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

const CPF_MESSAGE: &str = "CPF inválido (formato: XXX.XXX.XXX-XX)";
const SHORT_NAME_MESSAGE: &str = "Nome muito curto";

/// Required fields of the ITBI form, with their messages
const ITBI_REQUIRED: &[(&str, &str)] = &[
    ("name", "Nome é obrigatório"),
    ("cpf", "CPF é obrigatório"),
    ("street_name", "Rua é obrigatória"),
    ("house_number", "Número da casa é obrigatório"),
    ("neighborhood", "Bairro é obrigatório"),
    (
        "property_register_city",
        "Cidade do Registro de Imóveis é obrigatória",
    ),
    ("front", "Frente do terreno é obrigatório"),
    ("funds", "Fundos do terreno é obrigatório"),
    ("right_side", "Lado direito do terreno é obrigatório"),
    ("left_side", "Lado esquerdo do terreno é obrigatório"),
    ("terrain_total_area", "Área total do terreno é obrigatória"),
    (
        "terrain_transmitted_area",
        "Área transmitida do terreno é obrigatória",
    ),
    ("house_total_area", "Área total da casa é obrigatória"),
    (
        "house_transmitted_area",
        "Área transmitida da casa é obrigatória",
    ),
    ("construction_year", "Ano da construção da casa é obrigatório"),
    ("construction_material", "Tipo da construção é obrigatório"),
    ("contributor_name", "Nome é obrigatório"),
    ("contributor_cpf", "CPF é obrigatório"),
    ("own_resources", "Recursos próprios é obrigatório"),
    ("financing", "Valor do financiamento é obrigatório"),
    ("total_value", "Valor total é obrigatório"),
];

/// Required fields of the buyer declaration, with their messages
const DECLARATION_REQUIRED: &[(&str, &str)] = &[
    ("name", "Nome é obrigatório"),
    ("nationality", "Nacionalidade é obrigatória"),
    ("marital_status", "Estado civil é obrigatório"),
    ("profession", "Profissão é obrigatória"),
    ("cpf", "CPF é obrigatório"),
    ("identity_register", "RG é obrigatório"),
    ("issuing_authority", "Órgão emissor é obrigatório"),
    ("expedition_date", "Data de emissão é obrigatória"),
    ("street_name", "Rua é obrigatória"),
    ("house_number", "Número da casa é obrigatório"),
    ("neighborhood", "Bairro é obrigatório"),
    ("city", "Cidade é obrigatória"),
    ("uf", "UF é obrigatória"),
    ("signature_day", "Dia de assinatura é obrigatório"),
    ("signature_month", "Mês e ano de assinatura são obrigatórios"),
];

/// Validate a record against the ITBI rules
///
/// An empty result means the record may be exported. `total_value` is
/// derived, so its required check fires only before the money inputs have
/// been touched.
pub fn validate_itbi(record: &FormRecord) -> Vec<FieldError> {
    let mut errors = required(record, ITBI_REQUIRED);
    check_min_length(record, "name", 3, SHORT_NAME_MESSAGE, &mut errors);
    check_min_length(record, "contributor_name", 3, SHORT_NAME_MESSAGE, &mut errors);
    check_cpf(record, "cpf", &mut errors);
    check_cpf(record, "contributor_cpf", &mut errors);
    errors
}

/// Validate a record against the buyer declaration rules
pub fn validate_declaration(record: &FormRecord) -> Vec<FieldError> {
    let mut errors = required(record, DECLARATION_REQUIRED);
    check_min_length(record, "name", 3, SHORT_NAME_MESSAGE, &mut errors);
    // The form flags a short register without a message of its own
    check_min_length(record, "identity_register", 10, "", &mut errors);
    check_cpf(record, "cpf", &mut errors);
    errors
}

fn required(record: &FormRecord, rules: &[(&str, &str)]) -> Vec<FieldError> {
    rules
        .iter()
        .filter(|(field, _)| record.is_blank(field))
        .map(|(field, message)| FieldError::new(field, message))
        .collect()
}

fn check_min_length(
    record: &FormRecord,
    field: &str,
    min: usize,
    message: &str,
    errors: &mut Vec<FieldError>,
) {
    let value = record.get(field).trim();
    if !value.is_empty() && value.chars().count() < min {
        errors.push(FieldError::new(field, message));
    }
}

fn check_cpf(record: &FormRecord, field: &str, errors: &mut Vec<FieldError>) {
    let value = record.get(field);
    if !value.is_empty() && !cpf::is_valid_format(value) {
        errors.push(FieldError::new(field, CPF_MESSAGE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_itbi_record() -> FormRecord {
        FormRecord::from([
            ("name", "Machado de Assis"),
            ("cpf", "123.456.789-10"),
            ("street_name", "Rua Quinze"),
            ("house_number", "123"),
            ("neighborhood", "Centro"),
            ("property_register_city", "pedro_osorio"),
            ("front", "10.5"),
            ("funds", "10.5"),
            ("right_side", "30"),
            ("left_side", "30"),
            ("terrain_total_area", "315"),
            ("terrain_transmitted_area", "315"),
            ("house_total_area", "80"),
            ("house_transmitted_area", "80"),
            ("construction_year", "1995"),
            ("construction_material", "normal_masonry"),
            ("contributor_name", "Clarice Lispector"),
            ("contributor_cpf", "987.654.321-00"),
            ("own_resources", "40.000,00"),
            ("financing", "88.500,00"),
            ("total_value", "128.500,00"),
        ])
    }

    fn valid_declaration_record() -> FormRecord {
        FormRecord::from([
            ("name", "Machado de Assis"),
            ("nationality", "brasileiro"),
            ("marital_status", "casado"),
            ("profession", "escritor"),
            ("cpf", "123.456.789-10"),
            ("identity_register", "1234567890"),
            ("issuing_authority", "SSP/RS"),
            ("expedition_date", "1999-05-06"),
            ("street_name", "Rua Quinze"),
            ("house_number", "123"),
            ("neighborhood", "Centro"),
            ("city", "Pedro Osório"),
            ("uf", "RS"),
            ("signature_day", "14"),
            ("signature_month", "2024-03"),
        ])
    }

    #[test]
    fn test_valid_itbi_passes() {
        assert!(validate_itbi(&valid_itbi_record()).is_empty());
    }

    #[test]
    fn test_empty_record_fails_everything() {
        let errors = validate_itbi(&FormRecord::new());
        assert_eq!(errors.len(), ITBI_REQUIRED.len());
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[0].message, "Nome é obrigatório");
    }

    #[test]
    fn test_money_fields_required() {
        let mut record = valid_itbi_record();
        record.set("own_resources", "");
        record.set("financing", "");
        record.set("total_value", "");
        let errors = validate_itbi(&record);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].field, "own_resources");
        assert_eq!(errors[0].message, "Recursos próprios é obrigatório");
        assert_eq!(errors[1].field, "financing");
        assert_eq!(errors[1].message, "Valor do financiamento é obrigatório");
        assert_eq!(errors[2].field, "total_value");
        assert_eq!(errors[2].message, "Valor total é obrigatório");
    }

    #[test]
    fn test_itbi_messages_verbatim() {
        let errors = validate_itbi(&FormRecord::new());
        let message = |field: &str| {
            errors
                .iter()
                .find(|e| e.field == field)
                .map(|e| e.message.as_str())
        };
        assert_eq!(message("house_number"), Some("Número da casa é obrigatório"));
        assert_eq!(message("front"), Some("Frente do terreno é obrigatório"));
        assert_eq!(
            message("property_register_city"),
            Some("Cidade do Registro de Imóveis é obrigatória")
        );
        assert_eq!(
            message("construction_year"),
            Some("Ano da construção da casa é obrigatório")
        );
        assert_eq!(
            message("construction_material"),
            Some("Tipo da construção é obrigatório")
        );
    }

    #[test]
    fn test_cpf_shape_checked() {
        let mut record = valid_itbi_record();
        record.set("cpf", "12345678910");
        let errors = validate_itbi(&record);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "cpf");
        assert_eq!(errors[0].message, "CPF inválido (formato: XXX.XXX.XXX-XX)");
    }

    #[test]
    fn test_short_name_rejected() {
        let mut record = valid_itbi_record();
        record.set("contributor_name", "Jo");
        let errors = validate_itbi(&record);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "contributor_name");
        assert_eq!(errors[0].message, "Nome muito curto");
    }

    #[test]
    fn test_whitespace_is_blank() {
        let mut record = valid_itbi_record();
        record.set("neighborhood", "   ");
        let errors = validate_itbi(&record);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "neighborhood");
    }

    #[test]
    fn test_valid_declaration_passes() {
        assert!(validate_declaration(&valid_declaration_record()).is_empty());
    }

    #[test]
    fn test_declaration_messages_verbatim() {
        let errors = validate_declaration(&FormRecord::new());
        let message = |field: &str| {
            errors
                .iter()
                .find(|e| e.field == field)
                .map(|e| e.message.as_str())
        };
        assert_eq!(message("identity_register"), Some("RG é obrigatório"));
        assert_eq!(message("issuing_authority"), Some("Órgão emissor é obrigatório"));
        assert_eq!(message("expedition_date"), Some("Data de emissão é obrigatória"));
        assert_eq!(message("neighborhood"), Some("Bairro é obrigatório"));
        assert_eq!(
            message("signature_month"),
            Some("Mês e ano de assinatura são obrigatórios")
        );
    }

    #[test]
    fn test_declaration_short_register_rejected() {
        let mut record = valid_declaration_record();
        record.set("identity_register", "123456789");
        let errors = validate_declaration(&record);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "identity_register");
        assert_eq!(errors[0].message, "");
    }

    #[test]
    fn test_declaration_missing_field() {
        let errors = validate_declaration(&FormRecord::from([("name", "Ana Maria")]));
        assert!(errors.iter().all(|e| e.field != "name"));
        assert!(errors.iter().any(|e| e.field == "uf"));
    }

    #[test]
    fn test_field_error_serializes() {
        let error = FieldError::new("cpf", CPF_MESSAGE);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"field\":\"cpf\""));
    }
}
