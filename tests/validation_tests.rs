
use portfolio_schema::{
    entities::{
        experience::{ExperienceKind, NewExperience, NewExperienceDetail},
        message::NewMessage,
        project::NewProject,
        project_tag::NewProjectTag,
        skill::NewSkill,
        tag::NewTag,
        user::NewUser,
    },
    errors::AppError,
    schema::{validate::SHAPE_FIELD, Insertable},
};
use serde::Serialize;
use serde_json::{json, Value};
use test_utils::*;
use validator::ValidationErrors;

fn codes(errors: &ValidationErrors, field: &str) -> Vec<String> {
    errors
        .field_errors()
        .get(field)
        .map(|errs| errs.iter().map(|e| e.code.to_string()).collect())
        .unwrap_or_default()
}

/// A candidate carrying exactly the required fields validates and serializes
/// back to itself; dropping any single required field names that field.
fn assert_required_shape<T: Insertable + Serialize + std::fmt::Debug>(candidate: Value) {
    let accepted = T::validate(&candidate).expect("required fields should be enough");
    assert_eq!(serde_json::to_value(&accepted).unwrap(), candidate);

    let required = T::TABLE.required_fields();
    assert_eq!(
        required.len(),
        candidate.as_object().unwrap().len(),
        "candidate for {} should carry exactly the required fields",
        T::TABLE.name
    );

    for field in required {
        let mut partial = candidate.clone();
        partial.as_object_mut().unwrap().remove(field);

        let errors = T::validate(&partial).expect_err("missing field must be rejected");
        assert_eq!(codes(&errors, field), vec!["required"], "{}.{field}", T::TABLE.name);
        assert_eq!(errors.field_errors().len(), 1);
    }
}

#[test]
fn test_required_fields_round_trip_for_every_table() {
    assert_required_shape::<NewMessage>(message_candidate());
    assert_required_shape::<NewUser>(user_candidate("admin"));
    assert_required_shape::<NewProject>(project_candidate());
    assert_required_shape::<NewTag>(tag_candidate("Rust"));
    assert_required_shape::<NewProjectTag>(json!({"projectId": 1, "tagId": 2}));
    assert_required_shape::<NewSkill>(skill_candidate("Rust"));
    assert_required_shape::<NewExperience>(experience_candidate());
    assert_required_shape::<NewExperienceDetail>(detail_candidate(1, "Led migration"));
}

#[test]
fn test_message_missing_email_is_reported() {
    let result = NewMessage::validate(&json!({"name": "A", "message": "hi"}));

    let err = AppError::from(result.unwrap_err());
    assert_eq!(err.invalid_fields(), vec!["email"]);
}

#[test]
fn test_all_missing_fields_reported_together() {
    let err = AppError::from(NewProject::validate(&json!({})).unwrap_err());
    assert_eq!(err.invalid_fields(), vec!["description", "github", "title"]);

    match err {
        AppError::ValidationError(errors) => {
            assert!(errors.iter().all(|e| e.code == "required"));
            assert!(errors.iter().all(|e| e.message.ends_with("is required")));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_wrong_types_are_rejected() {
    let mut candidate = project_candidate();
    candidate["featured"] = json!("yes");
    candidate["title"] = json!(42);

    let errors = NewProject::validate(&candidate).unwrap_err();
    assert_eq!(codes(&errors, "featured"), vec!["invalid_type"]);
    assert_eq!(codes(&errors, "title"), vec!["invalid_type"]);

    let errors = NewProjectTag::validate(&json!({"projectId": "1", "tagId": 2})).unwrap_err();
    assert_eq!(codes(&errors, "projectId"), vec!["invalid_type"]);
}

#[test]
fn test_non_object_candidate_is_rejected() {
    for candidate in [json!(null), json!([1, 2]), json!("title")] {
        let errors = NewTag::validate(&candidate).unwrap_err();
        assert_eq!(codes(&errors, SHAPE_FIELD), vec!["invalid_shape"]);
    }
}

#[test]
fn test_generated_and_unknown_keys_are_dropped() {
    let mut candidate = project_candidate();
    candidate["id"] = json!(99);
    candidate["createdAt"] = json!("2024-01-01T00:00:00Z");
    candidate["stars"] = json!(5);

    let project = NewProject::validate(&candidate).unwrap();
    assert_eq!(serde_json::to_value(&project).unwrap(), project_candidate());
}

#[test]
fn test_optional_fields_accept_null() {
    let mut candidate = message_candidate();
    candidate["subject"] = Value::Null;
    let message = NewMessage::validate(&candidate).unwrap();
    assert_eq!(message.subject, None);

    let mut candidate = skill_candidate("Rust");
    candidate["order"] = Value::Null;
    let skill = NewSkill::validate(&candidate).unwrap().prepare_for_insert();
    assert_eq!(skill.order, 0);
}

#[test]
fn test_required_field_rejects_null() {
    let mut candidate = user_candidate("admin");
    candidate["password"] = Value::Null;

    let errors = NewUser::validate(&candidate).unwrap_err();
    assert_eq!(codes(&errors, "password"), vec!["required"]);
}

#[test]
fn test_experience_type_is_restricted() {
    let mut candidate = experience_candidate();
    candidate["type"] = json!("education");
    let experience = NewExperience::validate(&candidate).unwrap();
    assert_eq!(experience.kind, ExperienceKind::Education);

    candidate["type"] = json!("volunteering");
    let errors = NewExperience::validate(&candidate).unwrap_err();
    assert_eq!(codes(&errors, "type"), vec!["invalid_choice"]);
}

#[test]
fn test_prepare_for_insert_applies_defaults() {
    let tag = NewTag::validate(&tag_candidate("Rust")).unwrap().prepare_for_insert();
    assert_eq!(tag.color, "gray");

    let project = NewProject::validate(&project_candidate()).unwrap().prepare_for_insert();
    assert!(!project.featured);
    assert_eq!(project.live_url, None);

    let detail = NewExperienceDetail::validate(&detail_candidate(3, "x"))
        .unwrap()
        .prepare_for_insert();
    assert_eq!(detail.order, 0);
    assert_eq!(detail.experience_id, 3);
}
