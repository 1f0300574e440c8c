use super::*;
use serde_json::json;

#[test]
fn display_name_prefers_metadata_name() {
    let mut user = AuthUser::new("u1", "ana@example.com");
    user.metadata.insert("name".into(), json!("Ana"));
    assert_eq!(user.display_name(), "Ana");
}

#[test]
fn display_name_falls_back_to_email_local_part() {
    let user = AuthUser::new("u1", "ana@example.com");
    assert_eq!(user.display_name(), "ana");

    let mut blank = AuthUser::new("u1", "bo@example.com");
    blank.metadata.insert("name".into(), json!("  "));
    assert_eq!(blank.display_name(), "bo");
}

#[test]
fn display_name_handles_empty_email() {
    let user = AuthUser::new("u1", "");
    assert_eq!(user.display_name(), "user");
}

#[test]
fn avatar_url_ignores_non_string_values() {
    let mut user = AuthUser::new("u1", "a@b.c");
    user.metadata.insert("avatar_url".into(), json!(42));
    assert_eq!(user.avatar_url(), None);
    user.metadata.insert("avatar_url".into(), json!("https://img.test/a.png"));
    assert_eq!(user.avatar_url(), Some("https://img.test/a.png"));
}

#[test]
fn deserialize_accepts_backend_metadata_key() {
    let user: AuthUser = serde_json::from_value(json!({
        "id": "u1",
        "email": "a@b.c",
        "user_metadata": { "name": "Ana" }
    }))
    .unwrap();
    assert_eq!(user.display_name(), "Ana");
    assert!(user.email_confirmed);
}
