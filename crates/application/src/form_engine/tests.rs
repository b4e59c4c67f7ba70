use gatehouse_domain::{FieldDescriptor, FieldMatrix, FieldValue};

use super::{FormEngine, Validity};

fn signup_form() -> FormEngine {
    let name = FieldDescriptor::text("name", "Name")
        .unwrap_or_else(|_| unreachable!())
        .required();
    let email = FieldDescriptor::text("email", "Email")
        .unwrap_or_else(|_| unreachable!())
        .required()
        .with_pattern(r"^[^@\s]+@[^@\s]+\.[a-z]+$", Some("enter a valid email".to_owned()))
        .unwrap_or_else(|_| unreachable!());
    let team = FieldDescriptor::text("team", "Team").unwrap_or_else(|_| unreachable!());

    let matrix = FieldMatrix::new(vec![vec![name, email], vec![team]])
        .unwrap_or_else(|_| unreachable!());
    FormEngine::new(matrix)
}

#[test]
fn untouched_required_field_blocks_submit_until_blurred() {
    let name = FieldDescriptor::text("name", "Name")
        .unwrap_or_else(|_| unreachable!())
        .required();
    let matrix = FieldMatrix::new(vec![vec![name]]).unwrap_or_else(|_| unreachable!());
    let mut form = FormEngine::new(matrix);

    assert!(!form.is_submit_ready());
    assert_eq!(
        form.field_state("name").map(|state| state.validity()),
        Some(Validity::Default)
    );

    assert!(form.on_blur("name", FieldValue::from("Amy")).is_ok());
    assert!(form.is_submit_ready());
}

#[test]
fn input_does_not_change_validity() {
    let mut form = signup_form();
    assert!(form.on_blur("name", FieldValue::from("")).is_ok());
    assert!(form.on_input("name", FieldValue::from("Amy")).is_ok());

    let state = form.field_state("name");
    assert_eq!(state.map(|state| state.validity()), Some(Validity::Error));
    assert_eq!(state.map(|state| state.value().clone()), Some(FieldValue::from("Amy")));
}

#[test]
fn blur_reports_required_then_pattern_messages() {
    let mut form = signup_form();

    assert!(form.on_blur("email", FieldValue::from("   ")).is_ok());
    assert_eq!(
        form.field_state("email").and_then(|state| state.message()),
        Some("this field is required")
    );

    assert!(form.on_blur("email", FieldValue::from("amy")).is_ok());
    assert_eq!(
        form.field_state("email").and_then(|state| state.message()),
        Some("enter a valid email")
    );

    assert!(form.on_blur("email", FieldValue::from(" amy@example.com ")).is_ok());
    assert_eq!(
        form.field_state("email").map(|state| state.validity()),
        Some(Validity::Success)
    );
}

#[test]
fn focus_resets_validity_and_marks_touched() {
    let mut form = signup_form();
    assert!(form.on_blur("name", FieldValue::from("")).is_ok());
    assert!(form.on_focus("name").is_ok());

    let state = form.field_state("name");
    assert_eq!(state.map(|state| state.validity()), Some(Validity::Default));
    assert_eq!(state.map(|state| state.is_touched()), Some(true));
    assert_eq!(state.and_then(|state| state.message()), None);
}

#[test]
fn submit_rejects_without_calling_the_handler() {
    let mut form = signup_form();
    assert!(form.on_blur("name", FieldValue::from("Amy")).is_ok());

    let mut called = false;
    let outcome = form.submit(|_| called = true);
    assert!(outcome.is_none());
    assert!(!called);
}

#[test]
fn submit_hands_flattened_values_and_keeps_state() {
    let mut form = signup_form();
    assert!(form.on_blur("name", FieldValue::from("Amy")).is_ok());
    assert!(form.on_blur("email", FieldValue::from("amy@example.com")).is_ok());

    let submitted = form.submit(|values| values);
    let values = submitted.unwrap_or_else(|| unreachable!());
    assert_eq!(values.get("name"), Some(&FieldValue::from("Amy")));
    assert_eq!(values.get("team"), Some(&FieldValue::from("")));

    assert_eq!(
        form.field_state("name").map(|state| state.value().clone()),
        Some(FieldValue::from("Amy"))
    );
}

#[test]
fn submit_refreshes_errors_on_touched_fields() {
    let mut form = signup_form();
    assert!(form.on_blur("name", FieldValue::from("Amy")).is_ok());
    assert!(form.on_input("name", FieldValue::from(" ")).is_ok());

    assert!(form.submit(|values| values).is_none());
    assert_eq!(
        form.field_state("name").map(|state| state.validity()),
        Some(Validity::Error)
    );
    assert_eq!(
        form.field_state("email").map(|state| state.validity()),
        Some(Validity::Default)
    );
}

#[test]
fn unknown_keys_are_rejected() {
    let mut form = signup_form();
    assert!(form.on_input("phone", FieldValue::from("1")).is_err());
    assert!(form.on_blur("phone", FieldValue::from("1")).is_err());
    assert!(form.on_focus("phone").is_err());
}
