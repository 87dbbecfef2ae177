//! Local input validation.
//!
//! Checks run before any gateway call; rejected input never leaves the
//! kiosk.

use crate::session::PIN_LENGTH;

/// Minimal structural email check: non-empty local part, one `@`, and a
/// domain containing a dot. The backend performs the real validation; this
/// only stops obviously broken input from producing a round trip.
pub(crate) fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.contains(char::is_whitespace)
}

/// Exactly [`PIN_LENGTH`] ASCII digits.
pub(crate) fn is_valid_pin(pin: &str) -> bool {
    pin.len() == PIN_LENGTH && pin.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
    }

    #[test]
    fn rejects_structurally_broken_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("nobody"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example.com."));
        assert!(!is_valid_email("user name@example.com"));
    }

    #[test]
    fn pin_must_be_six_digits() {
        assert!(is_valid_pin("123456"));
        assert!(is_valid_pin("000000"));

        assert!(!is_valid_pin(""));
        assert!(!is_valid_pin("12345"));
        assert!(!is_valid_pin("1234567"));
        assert!(!is_valid_pin("12345a"));
        assert!(!is_valid_pin("12 456"));
    }
}
