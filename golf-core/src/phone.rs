pub const COUNTRY_CODE: &str = "91";

const NATIONAL_NUMBER_LEN: usize = 10;

/// Strips every non-digit, then drops a leading country code when the
/// remaining number is longer than a national number.
pub fn normalize_phone_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() > NATIONAL_NUMBER_LEN && digits.starts_with(COUNTRY_CODE) {
        digits[COUNTRY_CODE.len()..].to_string()
    } else {
        digits
    }
}
