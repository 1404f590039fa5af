//! Parsing of command-line values into model types.

use std::collections::BTreeSet;

use anyhow::{anyhow, bail, Context, Result};

use formkit_core::{FieldKind, FieldValue, RuleKind, ValidationRule};

/// Parse a field kind name for clap.
pub fn parse_kind(raw: &str) -> Result<FieldKind, String> {
    raw.parse::<FieldKind>().map_err(|e| {
        let known: Vec<&str> = FieldKind::ALL.iter().map(FieldKind::as_str).collect();
        format!("{e} (expected one of: {})", known.join(", "))
    })
}

/// Parse an `ID=VALUE` assignment for clap.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got {raw:?}"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing field id in {raw:?}"));
    }
    Ok((id.to_string(), value.to_string()))
}

/// Interpret raw input as a value for a field of `kind`.
///
/// - checkbox: `true/yes/on/1` and `false/no/off/0/""` are booleans; any
///   other input is a comma-separated set of selected labels.
/// - number: a finite number parses to a number; anything else is kept as
///   typed text.
/// - all other kinds: the text as given.
pub fn parse_value(kind: FieldKind, raw: &str) -> FieldValue {
    match kind {
        FieldKind::Checkbox => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => FieldValue::Bool(true),
            "false" | "no" | "off" | "0" | "" => FieldValue::Bool(false),
            _ => FieldValue::Set(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<BTreeSet<_>>(),
            ),
        },
        FieldKind::Number => match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => FieldValue::Number(n),
            _ => FieldValue::text(raw),
        },
        _ => FieldValue::text(raw),
    }
}

/// Parse a rule spec of the form `kind[:bound]=message`.
///
/// ```text
/// required=Name is required
/// minLength:3=At least 3 characters
/// ```
pub fn parse_rule(spec: &str) -> Result<ValidationRule> {
    let (head, message) = spec
        .split_once('=')
        .ok_or_else(|| anyhow!("rule {spec:?} is missing '=message'"))?;
    let (name, bound) = match head.split_once(':') {
        Some((name, bound)) => {
            let bound = bound
                .trim()
                .parse::<usize>()
                .with_context(|| format!("invalid bound in rule {spec:?}"))?;
            (name.trim(), Some(bound))
        }
        None => (head.trim(), None),
    };
    let kind = RuleKind::from_parts(name, bound)?;
    if message.trim().is_empty() {
        bail!("rule {spec:?} has an empty message");
    }
    Ok(ValidationRule::new(kind, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!(parse_kind("Select"), Ok(FieldKind::Select));
        let err = parse_kind("email").unwrap_err();
        assert!(err.contains("expected one of"));
    }

    #[test]
    fn assignments_split_on_first_equals() {
        assert_eq!(
            parse_assignment("note=a=b"),
            Ok(("note".to_string(), "a=b".to_string()))
        );
        assert_eq!(
            parse_assignment("empty="),
            Ok(("empty".to_string(), String::new()))
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn values_follow_field_kind() {
        assert_eq!(parse_value(FieldKind::Number, " 4.5 "), FieldValue::Number(4.5));
        assert_eq!(parse_value(FieldKind::Number, "abc"), FieldValue::text("abc"));
        assert_eq!(parse_value(FieldKind::Text, "42"), FieldValue::text("42"));
        assert_eq!(parse_value(FieldKind::Checkbox, "Yes"), FieldValue::Bool(true));
        assert_eq!(parse_value(FieldKind::Checkbox, ""), FieldValue::Bool(false));
        assert_eq!(
            parse_value(FieldKind::Checkbox, "red, blue,"),
            FieldValue::Set(BTreeSet::from(["blue".to_string(), "red".to_string()]))
        );
    }

    #[test]
    fn rule_specs() {
        let rule = parse_rule("minLength:3=Too short").unwrap();
        assert_eq!(rule.kind, RuleKind::MinLength { bound: 3 });
        assert_eq!(rule.message, "Too short");

        let rule = parse_rule("email=Bad email").unwrap();
        assert_eq!(rule.kind, RuleKind::Email);

        assert!(parse_rule("required").is_err());
        assert!(parse_rule("minLength=x").is_err());
        assert!(parse_rule("minLength:-1=x").is_err());
        assert!(parse_rule("email:3=x").is_err());
        assert!(parse_rule("phone=x").is_err());
        assert!(parse_rule("required= ").is_err());
    }
}
