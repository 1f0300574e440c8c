use super::*;

#[test]
fn validate_credentials_input_trims_email_only() {
    assert_eq!(
        validate_credentials_input("  user@example.com ", " pw "),
        Ok(("user@example.com".to_owned(), " pw ".to_owned()))
    );
}

#[test]
fn validate_credentials_input_requires_both_fields() {
    assert_eq!(validate_credentials_input("", "pw"), Err("Enter both email and password."));
    assert_eq!(validate_credentials_input("a@b.c", "   "), Err("Enter both email and password."));
}
