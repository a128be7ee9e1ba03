//! Phone number utility functions for the authentication service.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters stripped when cleaning a phone number for the user-data call
static NON_PHONE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9+]").unwrap());

/// Returns the phone number without a leading `+`
pub fn strip_plus(phone: &str) -> &str {
    phone.strip_prefix('+').unwrap_or(phone)
}

/// Toggles the `+` prefix convention
///
/// `+94771234567` becomes `94771234567` and vice versa. Used by the
/// two-attempt login policy that retries the opposite format.
pub fn toggle_plus_prefix(phone: &str) -> String {
    match phone.strip_prefix('+') {
        Some(rest) => rest.to_string(),
        None => format!("+{}", phone),
    }
}

/// Whether the number starts with the given country prefix
///
/// The leading `+` is ignored, so `+94771234567` and `94771234567` both
/// match prefix `94`.
pub fn has_country_prefix(phone: &str, prefix: &str) -> bool {
    strip_plus(phone).starts_with(prefix)
}

/// Reduces a phone number to digits and a leading `+`
pub fn clean_phone_number(phone: &str) -> String {
    NON_PHONE_CHARS.replace_all(phone, "").to_string()
}

/// Masks a phone number for logging
///
/// Shows only the last 4 digits.
pub fn mask_phone(phone: &str) -> String {
    if phone.len() <= 4 {
        return "*".repeat(phone.len());
    }

    let visible = &phone[phone.len() - 4..];
    if let Some(rest) = phone.strip_prefix('+') {
        format!("+{}{}", "*".repeat(rest.len() - 4), visible)
    } else {
        format!("{}{}", "*".repeat(phone.len() - 4), visible)
    }
}
