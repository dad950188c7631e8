//! Brazilian date and currency formatting

use chrono::{Datelike, NaiveDate};

/// Portuguese month names, January first
pub const MONTHS_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Format an ISO date ("YYYY-MM-DD") as "DD/MM/YYYY"
///
/// Calendar arithmetic only, so the result never shifts with the local
/// timezone. Empty or unparsable input yields an empty string.
///
/// # Examples
/// ```
/// use br_text::format_expedition_date;
/// assert_eq!(format_expedition_date("1999-05-06"), "06/05/1999");
/// assert_eq!(format_expedition_date(""), "");
/// assert_eq!(format_expedition_date("not a date"), "");
/// ```
pub fn format_expedition_date(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        Ok(date) => format!(
            "{:02}/{:02}/{}",
            date.day(),
            date.month(),
            date.year()
        ),
        Err(_) => String::new(),
    }
}

/// Format a month input ("YYYY-MM") as "<mês> de <YYYY>"
///
/// # Examples
/// ```
/// use br_text::format_signature_date;
/// assert_eq!(format_signature_date("2024-03"), "março de 2024");
/// assert_eq!(format_signature_date("2024-13"), "");
/// assert_eq!(format_signature_date(""), "");
/// ```
pub fn format_signature_date(year_month: &str) -> String {
    let Some((year, month)) = year_month.split_once('-') else {
        return String::new();
    };

    let Ok(month_num) = month.parse::<usize>() else {
        return String::new();
    };
    if year.is_empty() || year.parse::<i32>().is_err() {
        return String::new();
    }
    if !(1..=12).contains(&month_num) {
        return String::new();
    }

    format!("{} de {}", MONTHS_PT[month_num - 1], year)
}

/// Parse a pt-BR currency string ("88.500,00") into a number
///
/// Thousands dots are stripped, the decimal comma becomes a point. Empty
/// or unparsable input yields 0.0.
///
/// # Examples
/// ```
/// use br_text::parse_currency;
/// assert_eq!(parse_currency("88.500,00"), 88500.0);
/// assert_eq!(parse_currency(""), 0.0);
/// assert_eq!(parse_currency("abc"), 0.0);
/// ```
pub fn parse_currency(text: &str) -> f64 {
    let normalized: String = text.replace('.', "").replace(',', ".");
    normalized.parse::<f64>().unwrap_or(0.0)
}

/// Format a number as a pt-BR currency string, no symbol
///
/// Two fraction digits, dot thousands separators, comma decimal.
///
/// # Examples
/// ```
/// use br_text::format_currency;
/// assert_eq!(format_currency(128500.0), "128.500,00");
/// assert_eq!(format_currency(0.5), "0,50");
/// assert_eq!(format_currency(1234567.891), "1.234.567,89");
/// ```
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = format!("{:.2}", value.abs());

    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, f),
        None => (rounded.as_str(), "00"),
    };

    // Insert a dot every three digits from the right
    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{frac_part}")
}

/// Replace the first decimal point with a comma
///
/// Numeric form inputs store "10.5"; the printed form reads "10,5".
///
/// # Examples
/// ```
/// use br_text::decimal_comma;
/// assert_eq!(decimal_comma("10.5"), "10,5");
/// assert_eq!(decimal_comma("360"), "360");
/// ```
pub fn decimal_comma(text: &str) -> String {
    text.replacen('.', ",", 1)
}
