//! BR Text - Brazilian Portuguese text handling
//!
//! This crate provides:
//! - Date formatting (DD/MM/YYYY, "março de 2024")
//! - Currency parsing and formatting ("88.500,00")
//! - CPF format validation
//!
//! All formatting functions are total: malformed input yields an empty
//! string or zero, never a panic. Form fields arrive as free text and the
//! renderers must keep going with whatever they get.
//!
//! # Example
//!
//! ```
//! use br_text::{format_expedition_date, format_signature_date, parse_currency};
//!
//! assert_eq!(format_expedition_date("1999-05-06"), "06/05/1999");
//! assert_eq!(format_signature_date("2024-03"), "março de 2024");
//! assert_eq!(parse_currency("88.500,00"), 88500.0);
//! ```

pub mod cpf;
mod formatter;

pub use formatter::{
    decimal_comma, format_currency, format_expedition_date, format_signature_date, parse_currency,
    MONTHS_PT,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports() {
        assert_eq!(MONTHS_PT.len(), 12);
        assert_eq!(format_currency(0.0), "0,00");
        assert!(cpf::is_valid_format("123.456.789-10"));
    }
}
