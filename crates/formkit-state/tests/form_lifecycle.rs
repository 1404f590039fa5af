//! # Form Lifecycle
//!
//! End-to-end flows through `FormStudio` and `FormSession`: building a
//! schema, previewing it, deriving values, submitting, and persisting.

use formkit_core::{
    Field, FieldId, FieldKind, FieldPatch, FieldValue, FormSchema, IntegrityError, SchemaError,
    ValidationRule,
};
use formkit_state::{FormSession, FormStudio, SessionState, StudioError, SubmitOutcome};
use formkit_store::{FormStore, JsonFileStore, MemoryStore};

fn id(s: &str) -> FieldId {
    FieldId::new(s).unwrap()
}

/// Non-derived `A` and `B`, and `D` derived from both via `formula`.
fn sum_schema(formula: &str) -> FormSchema {
    let mut schema = FormSchema::new("Sum");
    for name in ["A", "B", "D"] {
        schema
            .insert_field(Field::new(id(name), FieldKind::Number))
            .unwrap();
    }
    schema
        .update_field(
            "D",
            &FieldPatch::new()
                .with_default(FieldValue::Number(-1.0))
                .derived(formula, [id("A"), id("B")]),
        )
        .unwrap();
    schema
}

#[test]
fn derived_sum_follows_parent_edits() {
    let mut session = FormSession::start(sum_schema("A + B"));
    session.set_value("A", FieldValue::Number(3.0)).unwrap();
    session.set_value("B", FieldValue::Number(4.0)).unwrap();
    assert_eq!(session.value("D"), Some(&FieldValue::Number(7.0)));

    session.set_value("A", FieldValue::text("10")).unwrap();
    assert_eq!(session.value("D"), Some(&FieldValue::Number(14.0)));
}

#[test]
fn malformed_formula_falls_back_to_default() {
    let schema = sum_schema("A / ");
    let default = schema.field("D").unwrap().default_value.clone();
    let mut session = FormSession::start(schema);
    assert_eq!(session.value("D"), Some(&default));

    session.set_value("A", FieldValue::Number(3.0)).unwrap();
    assert_eq!(session.value("D"), Some(&default));
}

#[test]
fn division_by_zero_falls_back_to_default() {
    let mut session = FormSession::start(sum_schema("A / B"));
    session.set_value("A", FieldValue::Number(1.0)).unwrap();
    assert_eq!(session.value("D"), Some(&FieldValue::Number(-1.0)));

    session.set_value("B", FieldValue::Number(4.0)).unwrap();
    assert_eq!(session.value("D"), Some(&FieldValue::Number(0.25)));
}

#[test]
fn substring_ids_are_substituted_whole() {
    let mut schema = FormSchema::new("Prices");
    for name in ["price", "unit_price", "total"] {
        schema
            .insert_field(Field::new(id(name), FieldKind::Number))
            .unwrap();
    }
    schema
        .update_field(
            "total",
            &FieldPatch::new().derived("unit_price - price", [id("price"), id("unit_price")]),
        )
        .unwrap();

    let mut session = FormSession::start(schema);
    session.set_value("price", FieldValue::Number(2.0)).unwrap();
    session.set_value("unit_price", FieldValue::Number(5.0)).unwrap();
    assert_eq!(session.value("total"), Some(&FieldValue::Number(3.0)));
}

#[test]
fn self_reference_is_rejected_and_schema_unchanged() {
    let mut schema = sum_schema("A + B");
    let before = schema.clone();
    let err = schema
        .update_field("A", &FieldPatch::new().derived("A * 2", [id("A")]))
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::Integrity(IntegrityError::SelfReference { field: "A".into() })
    );
    assert_eq!(schema, before);
}

#[test]
fn chained_derivation_is_rejected_and_schema_unchanged() {
    let mut schema = sum_schema("A + B");
    schema
        .insert_field(Field::new(id("E"), FieldKind::Number))
        .unwrap();
    let before = schema.clone();

    let err = schema
        .update_field("E", &FieldPatch::new().derived("D * 2", [id("D")]))
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::Integrity(IntegrityError::ChainedDerivation {
            field: "E".into(),
            parent: "D".into(),
        })
    );
    assert_eq!(schema, before);

    let err = schema
        .update_field("A", &FieldPatch::new().derived("E", [id("E")]))
        .unwrap_err();
    assert!(matches!(
        err,
        SchemaError::Integrity(IntegrityError::ParentOfDerived { .. })
    ));
    assert_eq!(schema, before);
}

#[test]
fn submission_round_trip() {
    let mut schema = FormSchema::new("Required");
    let mut f1 = Field::new(id("f1"), FieldKind::Text);
    f1.required = true;
    f1.rules = vec![ValidationRule::required("req")];
    schema.insert_field(f1).unwrap();

    let mut session = FormSession::new(schema);
    session.initialize().unwrap();
    session.set_value("f1", FieldValue::text("")).unwrap();

    match session.submit().unwrap() {
        SubmitOutcome::Rejected(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.get("f1"), Some("req"));
        }
        SubmitOutcome::Accepted(data) => panic!("unexpected submission {data:?}"),
    }
    assert_eq!(session.state(), SessionState::Ready);

    session.set_value("f1", FieldValue::text("x")).unwrap();
    match session.submit().unwrap() {
        SubmitOutcome::Accepted(data) => {
            assert_eq!(data.values.get("f1"), Some(&FieldValue::text("x")));
            assert_eq!(data.form_name, "Required");
        }
        SubmitOutcome::Rejected(errors) => panic!("unexpected rejection {errors:?}"),
    }
    assert_eq!(session.state(), SessionState::Submitted);
}

#[test]
fn length_bound_equality_passes_on_submit() {
    let mut schema = FormSchema::new("Code");
    let mut code = Field::new(id("code"), FieldKind::Text);
    code.rules = vec![
        ValidationRule::min_length(4, "too short"),
        ValidationRule::max_length(4, "too long"),
    ];
    schema.insert_field(code).unwrap();

    let mut session = FormSession::start(schema);
    session.set_value("code", FieldValue::text("abcd")).unwrap();
    assert!(session.submit().unwrap().is_accepted());
}

#[test]
fn reorder_then_inverse_restores_order() {
    let mut studio = FormStudio::open(MemoryStore::new());
    for kind in [FieldKind::Text, FieldKind::Number, FieldKind::Date, FieldKind::Radio] {
        studio.add_field(kind);
    }
    let original = studio.draft().field_ids();

    let perm = [2usize, 0, 3, 1];
    let permuted: Vec<FieldId> = perm.iter().map(|&i| original[i].clone()).collect();
    studio.reorder_fields(&permuted).unwrap();
    assert_eq!(studio.draft().field_ids(), permuted);

    let mut inverse = vec![0usize; perm.len()];
    for (position, &source) in perm.iter().enumerate() {
        inverse[source] = position;
    }
    let restored: Vec<FieldId> = inverse.iter().map(|&i| permuted[i].clone()).collect();
    studio.reorder_fields(&restored).unwrap();
    assert_eq!(studio.draft().field_ids(), original);
}

#[test]
fn invalid_reorder_is_rejected() {
    let mut studio = FormStudio::open(MemoryStore::new());
    let a = studio.add_field(FieldKind::Text);
    studio.add_field(FieldKind::Text);
    assert!(matches!(
        studio.reorder_fields(&[a.clone(), a]),
        Err(StudioError::Schema(SchemaError::InvalidOrder { .. }))
    ));
}

#[test]
fn save_then_load_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forms.json");

    let mut studio = FormStudio::open(JsonFileStore::new(&path));
    studio.add_field(FieldKind::Text);
    let qty = studio.add_field(FieldKind::Number);
    let price = studio.add_field(FieldKind::Number);
    let total = studio.add_field(FieldKind::Number);
    studio.add_field(FieldKind::Select);
    studio
        .update_field(
            total.as_str(),
            &FieldPatch::new().derived(format!("{qty} * {price}"), [qty, price]),
        )
        .unwrap();
    let first = studio.save_schema("Order").unwrap();

    studio.new_draft();
    studio.add_field(FieldKind::Checkbox);
    studio.save_schema("Consent").unwrap();

    let saved = studio.collection().clone();
    let reopened = FormStudio::open(JsonFileStore::new(&path));
    assert_eq!(*reopened.collection(), saved);

    let names: Vec<&str> = reopened.collection().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Order", "Consent"]);
    assert_eq!(
        reopened.collection().get(&first).unwrap().field_ids(),
        saved.get(&first).unwrap().field_ids()
    );
}

#[test]
fn resave_replaces_in_place() {
    let mut studio = FormStudio::open(MemoryStore::new());
    let first = studio.save_schema("First").unwrap();
    studio.new_draft();
    studio.save_schema("Second").unwrap();

    studio.select_schema_for_edit(&first).unwrap();
    studio.add_field(FieldKind::Textarea);
    assert_eq!(studio.save_schema("First, revised").unwrap(), first);

    let collection = studio.store().load();
    assert_eq!(collection.len(), 2);
    let head = collection.iter().next().unwrap();
    assert_eq!(head.id, first);
    assert_eq!(head.name, "First, revised");
    assert_eq!(head.fields.len(), 1);
}

#[test]
fn preview_of_saved_form_submits() {
    let mut studio = FormStudio::open(MemoryStore::new());
    let email = studio.add_field(FieldKind::Text);
    studio
        .update_field(
            email.as_str(),
            &FieldPatch::new().with_rules(vec![
                ValidationRule::required("Email is required"),
                ValidationRule::email("Enter a valid email"),
            ]),
        )
        .unwrap();
    let form = studio.save_schema("Newsletter").unwrap();

    studio.select_schema_for_preview(&form).unwrap();
    studio.set_value(email.as_str(), FieldValue::text("nope")).unwrap();
    match studio.submit().unwrap() {
        SubmitOutcome::Rejected(errors) => {
            assert_eq!(errors.get(email.as_str()), Some("Enter a valid email"))
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(
        studio.errors().unwrap().get(email.as_str()),
        Some("Enter a valid email")
    );

    studio
        .set_value(email.as_str(), FieldValue::text("reader@example.com"))
        .unwrap();
    assert!(studio.errors().unwrap().is_valid());
    match studio.submit().unwrap() {
        SubmitOutcome::Accepted(data) => {
            assert_eq!(data.form_id, form);
            let json = serde_json::to_value(&data).unwrap();
            assert_eq!(json["formName"], "Newsletter");
            assert_eq!(json["values"]["text_1"], "reader@example.com");
            assert!(json["submittedAt"].is_string());
        }
        other => panic!("expected submission, got {other:?}"),
    }
    assert_eq!(studio.preview().unwrap().state(), SessionState::Submitted);
}

#[test]
fn corrupt_store_opens_empty() {
    let studio = FormStudio::open(MemoryStore::with_record("not json at all"));
    assert!(studio.collection().is_empty());
}
