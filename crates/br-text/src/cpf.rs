//! CPF format checking
//!
//! The forms require the masked shape `XXX.XXX.XXX-XX`. Check-digit
//! verification is out of scope: the notary validates the number itself,
//! the form only guards the shape.

/// True when `text` matches `\d{3}.\d{3}.\d{3}-\d{2}` exactly
///
/// # Examples
/// ```
/// use br_text::cpf::is_valid_format;
/// assert!(is_valid_format("123.456.789-10"));
/// assert!(!is_valid_format("12345678910"));
/// assert!(!is_valid_format("123.456.789-1"));
/// ```
pub fn is_valid_format(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() != 14 {
        return false;
    }

    bytes.iter().enumerate().all(|(i, &b)| match i {
        3 | 7 => b == b'.',
        11 => b == b'-',
        _ => b.is_ascii_digit(),
    })
}
