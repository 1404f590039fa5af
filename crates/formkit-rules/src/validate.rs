//! # Field Validation
//!
//! Rule semantics, with `None` meaning "no value entered":
//!
//! | Rule        | Fails when                                                      |
//! |-------------|-----------------------------------------------------------------|
//! | `required`  | value absent, empty text, or empty set                          |
//! | `notEmpty`  | string form, trimmed, is empty (absent counts as empty)         |
//! | `minLength` | value present and string form shorter than `bound`              |
//! | `maxLength` | value present and string form longer than `bound`               |
//! | `email`     | value present and not `local@domain.tld`                        |
//! | `password`  | value present and shorter than 8 characters or without a digit  |
//!
//! "Present" excludes falsy values (empty text, `0`, `false`), so optional
//! fields left blank are not flagged by format rules. Lengths count Unicode
//! scalar values.

use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use formkit_core::{Field, FieldValue, RuleKind};

/// One `@`, no whitespace, at least one `.` in the part after `@`.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

const PASSWORD_MIN_CHARS: usize = 8;

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

/// Validate `value` against `field.rules` and return the message of the
/// first failing rule.
///
/// Returns `None` if every rule passes, including when there are no rules.
pub fn validate<'f>(field: &'f Field, value: Option<&FieldValue>) -> Option<&'f str> {
    let failed = field.rules.iter().find(|rule| !check_rule(&rule.kind, value))?;
    trace!(field = %field.id, rule = failed.kind.as_str(), "validation rule failed");
    Some(failed.message.as_str())
}

/// Whether `value` passes a single rule.
pub fn check_rule(kind: &RuleKind, value: Option<&FieldValue>) -> bool {
    match kind {
        RuleKind::Required => value.is_some_and(|v| !v.is_blank()),
        RuleKind::NotEmpty => value.is_some_and(|v| !v.as_text().trim().is_empty()),
        RuleKind::MinLength { bound } => match present(value) {
            Some(v) => char_len(v) >= *bound,
            None => true,
        },
        RuleKind::MaxLength { bound } => match present(value) {
            Some(v) => char_len(v) <= *bound,
            None => true,
        },
        RuleKind::Email => match present(value) {
            Some(v) => is_email(&v.as_text()),
            None => true,
        },
        RuleKind::Password => match present(value) {
            Some(v) => is_strong_password(&v.as_text()),
            None => true,
        },
    }
}

fn present(value: Option<&FieldValue>) -> Option<&FieldValue> {
    value.filter(|v| !v.is_falsy())
}

fn char_len(value: &FieldValue) -> usize {
    value.as_text().chars().count()
}

fn is_email(s: &str) -> bool {
    email_regex().is_some_and(|re| re.is_match(s))
}

fn is_strong_password(s: &str) -> bool {
    s.chars().count() >= PASSWORD_MIN_CHARS && s.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use formkit_core::{FieldId, FieldKind, ValidationRule};

    fn field_with(rules: Vec<ValidationRule>) -> Field {
        let mut field = Field::new(FieldId::new("f1").unwrap(), FieldKind::Text);
        field.rules = rules;
        field
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::text(s)
    }

    #[test]
    fn no_rules_never_fails() {
        let field = field_with(vec![]);
        assert_eq!(validate(&field, None), None);
        assert_eq!(validate(&field, Some(&text(""))), None);
    }

    #[test]
    fn required() {
        let field = field_with(vec![ValidationRule::required("req")]);
        assert_eq!(validate(&field, None), Some("req"));
        assert_eq!(validate(&field, Some(&text(""))), Some("req"));
        assert_eq!(
            validate(&field, Some(&FieldValue::Set(BTreeSet::new()))),
            Some("req")
        );
        assert_eq!(validate(&field, Some(&text(" "))), None);
        assert_eq!(validate(&field, Some(&FieldValue::Number(0.0))), None);
    }

    #[test]
    fn not_empty_trims() {
        let field = field_with(vec![ValidationRule::not_empty("blank")]);
        assert_eq!(validate(&field, Some(&text("   "))), Some("blank"));
        assert_eq!(validate(&field, None), Some("blank"));
        assert_eq!(validate(&field, Some(&text(" x "))), None);
    }

    #[test]
    fn length_bounds_inclusive() {
        let field = field_with(vec![
            ValidationRule::min_length(3, "short"),
            ValidationRule::max_length(5, "long"),
        ]);
        assert_eq!(validate(&field, Some(&text("ab"))), Some("short"));
        assert_eq!(validate(&field, Some(&text("abc"))), None);
        assert_eq!(validate(&field, Some(&text("abcde"))), None);
        assert_eq!(validate(&field, Some(&text("abcdef"))), Some("long"));
    }

    #[test]
    fn length_skips_missing_values() {
        let field = field_with(vec![ValidationRule::min_length(3, "short")]);
        assert_eq!(validate(&field, None), None);
        assert_eq!(validate(&field, Some(&text(""))), None);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let field = field_with(vec![ValidationRule::max_length(3, "long")]);
        assert_eq!(validate(&field, Some(&text("äöü"))), None);
    }

    #[test]
    fn email_format() {
        let field = field_with(vec![ValidationRule::email("bad")]);
        assert_eq!(validate(&field, Some(&text("a@b.co"))), None);
        assert_eq!(validate(&field, Some(&text("first.last@mail.example.org"))), None);
        assert_eq!(validate(&field, Some(&text("a@b"))), Some("bad"));
        assert_eq!(validate(&field, Some(&text("a@@b.co"))), Some("bad"));
        assert_eq!(validate(&field, Some(&text("a b@c.de"))), Some("bad"));
        assert_eq!(validate(&field, Some(&text("@b.co"))), Some("bad"));
        assert_eq!(validate(&field, Some(&text(""))), None);
    }

    #[test]
    fn password_strength() {
        let field = field_with(vec![ValidationRule::password("weak")]);
        assert_eq!(validate(&field, Some(&text("abcdefg1"))), None);
        assert_eq!(validate(&field, Some(&text("abcdefgh"))), Some("weak"));
        assert_eq!(validate(&field, Some(&text("abc1"))), Some("weak"));
        assert_eq!(validate(&field, None), None);
    }

    #[test]
    fn first_failure_wins() {
        let field = field_with(vec![
            ValidationRule::required("req"),
            ValidationRule::min_length(4, "short"),
            ValidationRule::email("email"),
        ]);
        assert_eq!(validate(&field, None), Some("req"));
        assert_eq!(validate(&field, Some(&text("a@b"))), Some("short"));
        assert_eq!(validate(&field, Some(&text("abcd"))), Some("email"));
        assert_eq!(validate(&field, Some(&text("ab@c.de"))), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_value() -> impl Strategy<Value = FieldValue> {
            prop_oneof![
                any::<bool>().prop_map(FieldValue::Bool),
                (-1e6f64..1e6).prop_map(FieldValue::Number),
                ".{0,20}".prop_map(FieldValue::Text),
                prop::collection::btree_set("[a-z]{1,5}", 0..4).prop_map(FieldValue::Set),
            ]
        }

        proptest! {
            #[test]
            fn empty_rules_always_pass(value in prop::option::of(any_value())) {
                let field = field_with(vec![]);
                prop_assert_eq!(validate(&field, value.as_ref()), None);
            }

            #[test]
            fn length_equal_to_bound_passes(s in "[a-zA-Z0-9 ]{1,40}") {
                let bound = s.chars().count();
                let field = field_with(vec![
                    ValidationRule::min_length(bound, "short"),
                    ValidationRule::max_length(bound, "long"),
                ]);
                prop_assert_eq!(validate(&field, Some(&FieldValue::Text(s))), None);
            }
        }
    }
}
