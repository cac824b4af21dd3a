use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{StoreError, StoreResult};

// Dot-atom local part, then at least two domain labels. Labels are
// alphanumeric with inner hyphens only; dots only separate non-empty atoms.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
        r"@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+",
        r"[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?$",
    ))
    .expect("email pattern is a valid regex")
});

pub const MAX_CODE_LEN: usize = 50;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_DEPARTMENT_LEN: usize = 100;

/// Trims `value` and rejects it when empty or longer than `max_len` chars.
pub fn required_text(field: &'static str, value: &str, max_len: usize) -> StoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::validation(field, "must not be empty"));
    }
    bounded_text(field, trimmed, max_len)
}

pub fn bounded_text(field: &'static str, value: &str, max_len: usize) -> StoreResult<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max_len {
        return Err(StoreError::validation(
            field,
            format!("must be at most {max_len} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Normalizes an email to trimmed lower case and checks its syntax.
pub fn email(value: &str) -> StoreResult<String> {
    let normalized = required_text("email", value, MAX_EMAIL_LEN)?.to_lowercase();
    if !EMAIL_RE.is_match(&normalized) {
        return Err(StoreError::validation("email", "enter a valid email address"));
    }
    Ok(normalized)
}

/// Blank notes are treated as no notes.
pub fn optional_notes(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|notes| !notes.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("full_name", "  Ann Lee ", 100).unwrap(), "Ann Lee");
        let err = required_text("full_name", "   ", 100).unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "full_name", .. }));
    }

    #[test]
    fn required_text_enforces_length() {
        let long = "x".repeat(MAX_CODE_LEN + 1);
        assert!(required_text("employee_code", &long, MAX_CODE_LEN).is_err());
        assert!(required_text("employee_code", &long[..MAX_CODE_LEN], MAX_CODE_LEN).is_ok());
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(email(" Ann@X.com ").unwrap(), "ann@x.com");
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for bad in [
            "",
            "ann",
            "ann@",
            "@x.com",
            "ann@x",
            "ann lee@x.com",
            "a@@x.com",
            "ann@.x.com",
            "ann@x..com",
            ".ann@x.com",
            "ann.@x.com",
            "an..n@x.com",
            "a\"b@x.com",
            "ann@-x.com",
            "ann@x-.com",
            "ann@x.com.",
        ] {
            let err = email(bad).unwrap_err();
            assert!(
                matches!(err, StoreError::Validation { field: "email", .. }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn common_address_shapes_are_accepted() {
        for good in [
            "ann@x.com",
            "ann.lee@mail.x.co",
            "ann+hr@x-corp.com",
            "o'brien@x.io",
            "a_b@x1.org",
        ] {
            assert_eq!(email(good).unwrap(), good);
        }
    }

    #[test]
    fn blank_notes_become_none() {
        assert_eq!(optional_notes(Some("  ")), None);
        assert_eq!(optional_notes(None), None);
        assert_eq!(optional_notes(Some(" late ")), Some("late".to_string()));
    }
}
