//! # Fields and Validation Rules
//!
//! A `Field` is one input definition within a form schema. It carries its
//! kind, label, default value, ordered validation rules, choice list (for
//! select and radio), and optional derivation (formula over parent fields).
//!
//! Edits to a field go through a [`FieldPatch`] so that the schema can
//! check the patched result before committing it.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormkitError;
use crate::identity::FieldId;
use crate::value::FieldValue;

// ─── Field Kind ──────────────────────────────────────────────────────

/// The input control a field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Numeric input.
    Number,
    /// Multi-line text.
    Textarea,
    /// Drop-down with one selected choice.
    Select,
    /// Radio group with one selected choice.
    Radio,
    /// Boolean checkbox.
    Checkbox,
    /// Calendar date (`YYYY-MM-DD`).
    Date,
}

impl FieldKind {
    /// Every field kind, in builder palette order.
    pub const ALL: [FieldKind; 7] = [
        Self::Text,
        Self::Number,
        Self::Textarea,
        Self::Select,
        Self::Radio,
        Self::Checkbox,
        Self::Date,
    ];

    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Date => "date",
        }
    }

    /// Human-readable name, used for generated labels.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Number => "Number",
            Self::Textarea => "Textarea",
            Self::Select => "Select",
            Self::Radio => "Radio",
            Self::Checkbox => "Checkbox",
            Self::Date => "Date",
        }
    }

    /// Whether fields of this kind require a non-empty choice list.
    pub fn has_choices(&self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }

    /// The value an untouched field of this kind holds.
    pub fn blank_value(&self) -> FieldValue {
        match self {
            Self::Checkbox => FieldValue::Bool(false),
            _ => FieldValue::Text(String::new()),
        }
    }

    /// Whether a value of this variant may be stored in a field of this kind.
    ///
    /// Number fields take raw text as typed; its numeric reading is checked
    /// by the derivation engine, not here.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Self::Number, FieldValue::Number(_) | FieldValue::Text(_)) => true,
            (Self::Checkbox, FieldValue::Bool(_) | FieldValue::Set(_)) => true,
            (
                Self::Text | Self::Textarea | Self::Select | Self::Radio | Self::Date,
                FieldValue::Text(_),
            ) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = FormkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FormkitError::UnknownFieldKind(s.to_string()))
    }
}

// ─── Validation Rules ────────────────────────────────────────────────

/// The check a validation rule performs.
///
/// Length rules carry their bound inline, which serializes as a sibling
/// `bound` key next to `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RuleKind {
    /// Value must be present and not empty.
    Required,
    /// String form, trimmed, must not be empty.
    NotEmpty,
    /// String form must have at least `bound` characters.
    MinLength {
        /// Minimum character count.
        bound: usize,
    },
    /// String form must have at most `bound` characters.
    MaxLength {
        /// Maximum character count.
        bound: usize,
    },
    /// Value must look like `local@domain.tld`.
    Email,
    /// Value must have at least 8 characters and a digit.
    Password,
}

impl RuleKind {
    /// Wire name of the rule kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::NotEmpty => "notEmpty",
            Self::MinLength { .. } => "minLength",
            Self::MaxLength { .. } => "maxLength",
            Self::Email => "email",
            Self::Password => "password",
        }
    }

    /// The length bound, for `minLength`/`maxLength`.
    pub fn bound(&self) -> Option<usize> {
        match self {
            Self::MinLength { bound } | Self::MaxLength { bound } => Some(*bound),
            _ => None,
        }
    }

    /// Build a rule kind from its wire name and optional bound.
    ///
    /// # Errors
    ///
    /// Returns [`FormkitError::UnknownRuleKind`] for an unknown name, a length
    /// rule without a bound, or a bound on a rule that takes none.
    pub fn from_parts(name: &str, bound: Option<usize>) -> Result<Self, FormkitError> {
        let kind = match (name, bound) {
            ("required", None) => Self::Required,
            ("notEmpty", None) => Self::NotEmpty,
            ("email", None) => Self::Email,
            ("password", None) => Self::Password,
            ("minLength", Some(bound)) => Self::MinLength { bound },
            ("maxLength", Some(bound)) => Self::MaxLength { bound },
            _ => {
                let shown = match bound {
                    Some(b) => format!("{name}:{b}"),
                    None => name.to_string(),
                };
                return Err(FormkitError::UnknownRuleKind(shown));
            }
        };
        Ok(kind)
    }
}

/// A named check with a user-facing failure message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationRule {
    /// What the rule checks.
    #[serde(flatten)]
    pub kind: RuleKind,
    /// Message shown when the check fails.
    pub message: String,
}

impl ValidationRule {
    /// Create a rule.
    pub fn new(kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A `required` rule.
    pub fn required(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Required, message)
    }

    /// A `notEmpty` rule.
    pub fn not_empty(message: impl Into<String>) -> Self {
        Self::new(RuleKind::NotEmpty, message)
    }

    /// A `minLength` rule.
    pub fn min_length(bound: usize, message: impl Into<String>) -> Self {
        Self::new(RuleKind::MinLength { bound }, message)
    }

    /// A `maxLength` rule.
    pub fn max_length(bound: usize, message: impl Into<String>) -> Self {
        Self::new(RuleKind::MaxLength { bound }, message)
    }

    /// An `email` rule.
    pub fn email(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Email, message)
    }

    /// A `password` rule.
    pub fn password(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Password, message)
    }
}

// ─── Field ───────────────────────────────────────────────────────────

/// One input definition within a form schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Unique within the owning schema.
    pub id: FieldId,
    /// Input control.
    pub kind: FieldKind,
    /// Label shown next to the control.
    pub label: String,
    /// Whether the control is marked as required.
    pub required: bool,
    /// Initial value, and the fallback for a failing formula.
    pub default_value: FieldValue,
    /// Checked in declared order; the first failure wins.
    #[serde(default)]
    pub rules: Vec<ValidationRule>,
    /// Options for select and radio fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    /// Whether the value is computed from other fields.
    #[serde(default)]
    pub is_derived: bool,
    /// Arithmetic expression over parent field ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// Fields the formula reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_field_ids: Option<BTreeSet<FieldId>>,
}

impl Field {
    /// A fresh field of the given kind with builder defaults: a generated
    /// label, a blank default, no rules, and two placeholder choices for
    /// select and radio.
    pub fn new(id: FieldId, kind: FieldKind) -> Self {
        let choices = kind
            .has_choices()
            .then(|| vec!["Option 1".to_string(), "Option 2".to_string()]);
        Self {
            id,
            kind,
            label: format!("{} Field", kind.title()),
            required: false,
            default_value: kind.blank_value(),
            rules: Vec::new(),
            choices,
            is_derived: false,
            formula: None,
            parent_field_ids: None,
        }
    }

    /// Whether this derived field reads `parent`.
    pub fn depends_on(&self, parent: &str) -> bool {
        self.is_derived
            && self
                .parent_field_ids
                .as_ref()
                .is_some_and(|parents| parents.contains(parent))
    }
}

// ─── Field Patch ─────────────────────────────────────────────────────

/// How a patch changes a field's derivation.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivationPatch {
    /// Make the field derived from `parents` via `formula`.
    Derived {
        /// Arithmetic expression over parent ids.
        formula: String,
        /// Fields the formula reads.
        parents: BTreeSet<FieldId>,
    },
    /// Make the field user-entered again, dropping formula and parents.
    Plain,
}

/// A partial update to a field. `None` leaves an attribute unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    /// New kind.
    pub kind: Option<FieldKind>,
    /// New label.
    pub label: Option<String>,
    /// New required flag.
    pub required: Option<bool>,
    /// New default value.
    pub default_value: Option<FieldValue>,
    /// Replacement rule list.
    pub rules: Option<Vec<ValidationRule>>,
    /// Replacement choice list. Blank entries are dropped.
    pub choices: Option<Vec<String>>,
    /// Derivation change.
    pub derivation: Option<DerivationPatch>,
}

impl FieldPatch {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the kind.
    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Change the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Change the required flag.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Change the default value.
    pub fn with_default(mut self, value: FieldValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Replace the rules.
    pub fn with_rules(mut self, rules: Vec<ValidationRule>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Replace the choices.
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Make the field derived.
    pub fn derived<I>(mut self, formula: impl Into<String>, parents: I) -> Self
    where
        I: IntoIterator<Item = FieldId>,
    {
        self.derivation = Some(DerivationPatch::Derived {
            formula: formula.into(),
            parents: parents.into_iter().collect(),
        });
        self
    }

    /// Make the field user-entered.
    pub fn plain(mut self) -> Self {
        self.derivation = Some(DerivationPatch::Plain);
        self
    }

    /// Apply the patch to `field` without checking invariants.
    ///
    /// Changing to a kind without choices drops the choice list. Changing to
    /// a kind that does not accept the current default resets the default to
    /// the kind's blank value unless the patch supplies one.
    pub fn apply_to(&self, field: &mut Field) {
        if let Some(kind) = self.kind {
            field.kind = kind;
            if !kind.has_choices() {
                field.choices = None;
            }
            if self.default_value.is_none() && !kind.accepts(&field.default_value) {
                field.default_value = kind.blank_value();
            }
        }
        if let Some(label) = &self.label {
            field.label = label.clone();
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(value) = &self.default_value {
            field.default_value = value.clone();
        }
        if let Some(rules) = &self.rules {
            field.rules = rules.clone();
        }
        if let Some(choices) = &self.choices {
            let cleaned: Vec<String> = choices
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            field.choices = Some(cleaned);
        }
        match &self.derivation {
            Some(DerivationPatch::Derived { formula, parents }) => {
                field.is_derived = true;
                field.formula = Some(formula.clone());
                field.parent_field_ids = Some(parents.clone());
            }
            Some(DerivationPatch::Plain) => {
                field.is_derived = false;
                field.formula = None;
                field.parent_field_ids = None;
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fid(s: &str) -> FieldId {
        FieldId::new(s).unwrap()
    }

    #[test]
    fn rule_json_mirrors_wire_shape() {
        let rule = ValidationRule::min_length(3, "too short");
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "minLength", "bound": 3, "message": "too short"})
        );

        let rule = ValidationRule::required("req");
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "required", "message": "req"}));
    }

    #[test]
    fn length_rule_without_bound_is_rejected_on_load() {
        let result: Result<ValidationRule, _> =
            serde_json::from_str(r#"{"kind":"maxLength","message":"m"}"#);
        assert!(result.is_err());
        let result: Result<ValidationRule, _> =
            serde_json::from_str(r#"{"kind":"maxLength","bound":-1,"message":"m"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn rule_kind_from_parts() {
        assert_eq!(
            RuleKind::from_parts("minLength", Some(2)).unwrap(),
            RuleKind::MinLength { bound: 2 }
        );
        assert!(RuleKind::from_parts("minLength", None).is_err());
        assert!(RuleKind::from_parts("email", Some(1)).is_err());
        assert!(RuleKind::from_parts("phone", None).is_err());
    }

    #[test]
    fn new_field_defaults() {
        let f = Field::new(fid("select_1"), FieldKind::Select);
        assert_eq!(f.label, "Select Field");
        assert_eq!(f.choices.as_deref().map(<[String]>::len), Some(2));
        assert_eq!(f.default_value, FieldValue::text(""));

        let f = Field::new(fid("checkbox_1"), FieldKind::Checkbox);
        assert!(f.choices.is_none());
        assert_eq!(f.default_value, FieldValue::Bool(false));
    }

    #[test]
    fn field_json_omits_absent_optionals() {
        let f = Field::new(fid("text_1"), FieldKind::Text);
        let json = serde_json::to_value(&f).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("choices"));
        assert!(!obj.contains_key("formula"));
        assert!(!obj.contains_key("parentFieldIds"));
        assert_eq!(obj["defaultValue"], serde_json::json!(""));
        assert_eq!(obj["isDerived"], serde_json::json!(false));
    }

    #[test]
    fn patch_kind_change_drops_choices_and_resets_default() {
        let mut f = Field::new(fid("f"), FieldKind::Radio);
        FieldPatch::new().with_kind(FieldKind::Checkbox).apply_to(&mut f);
        assert!(f.choices.is_none());
        assert_eq!(f.default_value, FieldValue::Bool(false));
    }

    #[test]
    fn patch_choices_are_trimmed() {
        let mut f = Field::new(fid("f"), FieldKind::Select);
        FieldPatch::new()
            .with_choices([" Red ", "", "Blue"])
            .apply_to(&mut f);
        assert_eq!(f.choices, Some(vec!["Red".to_string(), "Blue".to_string()]));
    }

    #[test]
    fn patch_plain_clears_derivation() {
        let mut f = Field::new(fid("total"), FieldKind::Number);
        FieldPatch::new()
            .derived("a + b", [fid("a"), fid("b")])
            .apply_to(&mut f);
        assert!(f.depends_on("a"));
        FieldPatch::new().plain().apply_to(&mut f);
        assert!(!f.is_derived);
        assert!(f.formula.is_none());
        assert!(f.parent_field_ids.is_none());
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("Textarea".parse::<FieldKind>().unwrap(), FieldKind::Textarea);
        assert!("slider".parse::<FieldKind>().is_err());
    }

    #[test]
    fn kind_accepts() {
        assert!(FieldKind::Number.accepts(&FieldValue::Number(1.0)));
        assert!(FieldKind::Number.accepts(&FieldValue::text("12")));
        assert!(!FieldKind::Text.accepts(&FieldValue::Bool(true)));
        assert!(FieldKind::Checkbox.accepts(&FieldValue::Bool(true)));
        assert!(!FieldKind::Checkbox.accepts(&FieldValue::text("yes")));
    }
}
