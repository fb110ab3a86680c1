/// Converts a local phone number to international digits (no `+`).
///
/// Non-digits are dropped, as is a single leading trunk `0`; the country code
/// is prefixed unless the number already starts with it. Returns `None` when
/// no digits remain.
pub fn normalize(raw: &str, country_code: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let local = digits.strip_prefix('0').unwrap_or(&digits);

    if local.is_empty() {
        return None;
    }
    if local.starts_with(country_code) {
        Some(local.to_string())
    } else {
        Some(format!("{country_code}{local}"))
    }
}
