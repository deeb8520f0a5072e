//! Field format rules shared by every step.

use std::sync::LazyLock;

use busdesk_core::{ContactEntry, ContactKind};
use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Cameroon mobile numbers: `6XXXXXXXX`, optionally prefixed by `237` or `+237`.
static CAMEROON_MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+?237)?6\d{8}$").expect("valid cameroon mobile regex"));

static PERMISSIVE_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{10,}$").expect("valid phone regex"));

/// Strip the separators people type inside phone numbers.
fn compact_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect()
}

#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

#[must_use]
pub fn is_valid_cameroon_mobile(value: &str) -> bool {
    CAMEROON_MOBILE_RE.is_match(&compact_phone(value.trim()))
}

/// Either ten or more digits, or a Cameroon mobile number.
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    let compact = compact_phone(value.trim());
    PERMISSIVE_PHONE_RE.is_match(&compact) || CAMEROON_MOBILE_RE.is_match(&compact)
}

/// Absolute URL check; relative references such as `example.com` fail.
#[must_use]
pub fn is_valid_url(value: &str) -> bool {
    reqwest::Url::parse(value.trim()).is_ok()
}

/// Check a non-blank contact value against its type's format.
///
/// # Errors
///
/// Returns the user-facing message for a malformed value.
pub fn check_contact(entry: &ContactEntry) -> Result<(), &'static str> {
    let value = entry.value.as_str();
    let ok = match entry.kind {
        ContactKind::Email => is_valid_email(value),
        ContactKind::Tel | ContactKind::Whatsapp => is_valid_phone(value),
        ContactKind::Url => is_valid_url(value),
        ContactKind::Momo | ContactKind::OrangeMoney => is_valid_cameroon_mobile(value),
    };
    if ok {
        return Ok(());
    }
    Err(match entry.kind {
        ContactKind::Email => "invalid email format",
        ContactKind::Tel | ContactKind::Whatsapp => "invalid phone number",
        ContactKind::Url => "invalid URL",
        ContactKind::Momo | ContactKind::OrangeMoney => {
            "invalid mobile money number (expected 6XXXXXXXX, 2376XXXXXXXX or +2376XXXXXXXX)"
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rule() {
        assert!(!is_valid_email("not-an-email"));
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("  ops@acme-voyages.cm "));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("a@b"));
    }

    #[test]
    fn cameroon_prefixes() {
        assert!(is_valid_cameroon_mobile("677123456"));
        assert!(is_valid_cameroon_mobile("237677123456"));
        assert!(is_valid_cameroon_mobile("+237 677 12 34 56"));
        assert!(!is_valid_cameroon_mobile("577123456"));
        assert!(!is_valid_cameroon_mobile("67712345"));
    }

    #[test]
    fn phone_accepts_long_numbers_or_cameroon_mobiles() {
        assert!(is_valid_phone("+33 1 23 45 67 89"));
        assert!(is_valid_phone("(222) 123-4567"));
        assert!(is_valid_phone("699000000"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("call me"));
    }

    #[test]
    fn url_requires_absolute_url() {
        assert!(is_valid_url("https://acme.cm"));
        assert!(!is_valid_url("acme.cm"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn check_contact_reports_type_specific_message() {
        let bad = ContactEntry::new(ContactKind::Email, "not-an-email");
        assert_eq!(check_contact(&bad), Err("invalid email format"));
        let good = ContactEntry::new(ContactKind::Email, "a@b.co");
        assert_eq!(check_contact(&good), Ok(()));
        let momo = ContactEntry::new(ContactKind::Momo, "+33123456789");
        assert!(check_contact(&momo).is_err());
    }
}
