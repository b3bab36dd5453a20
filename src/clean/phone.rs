//! Phone number normalization.
//!
//! Only North American numbers are recognized: ten digits, or eleven digits
//! with a leading country code `1`. Anything else is unusable and comes
//! back as the empty string, so callers must check `is_empty()` before use.

/// Length of a normalized phone number.
pub const PHONE_LEN: usize = 10;

const COUNTRY_CODE: char = '1';

/// Strips every non-digit from `raw` and returns the ten-digit national
/// number, or `""` when no such number can be derived.
pub fn clean_phone_number(raw: &str) -> String {
    let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        PHONE_LEN => digits,
        len if len == PHONE_LEN + 1 && digits.starts_with(COUNTRY_CODE) => {
            digits.remove(0);
            digits
        }
        _ => String::new(),
    }
}
