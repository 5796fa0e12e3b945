//! Tests for the user account model.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn ada() -> User {
    User::try_from_strings("Ada Lovelace", "ada@example.com", "$argon2id$v=19$abc")
        .expect("valid user")
}

#[rstest]
#[case("", AccountValidationError::Empty { field: "email" })]
#[case("   ", AccountValidationError::Empty { field: "email" })]
#[case(" ada@example.com", AccountValidationError::SurroundingWhitespace { field: "email" })]
#[case("ada@example.com\n", AccountValidationError::SurroundingWhitespace { field: "email" })]
#[case("x\u{0}y@example.com", AccountValidationError::NulCharacter { field: "email" })]
fn email_rejects_unusable_keys(#[case] raw: &str, #[case] expected: AccountValidationError) {
    assert_eq!(Email::new(raw), Err(expected));
}

#[rstest]
fn email_is_not_format_checked() {
    // Address syntax is the caller's concern.
    let email = Email::new("not-an-address").expect("opaque key accepted");
    assert_eq!(email.as_ref(), "not-an-address");
}

#[rstest]
fn name_reports_its_own_field() {
    let err = UserName::new("").expect_err("empty name rejected");
    assert_eq!(err.to_string(), "name must not be empty");
}

#[rstest]
fn email_deserialisation_runs_validation() {
    let ok: Result<Email, _> = serde_json::from_value(json!("ada@example.com"));
    let bad: Result<Email, _> = serde_json::from_value(json!(""));

    assert!(ok.is_ok());
    assert!(bad.is_err());
}

#[rstest]
fn password_hash_is_redacted_from_debug(ada: User) {
    let rendered = format!("{ada:?}");

    assert!(!rendered.contains("argon2id"));
    assert!(rendered.contains("<redacted>"));
    assert_eq!(ada.password_hash().expose(), "$argon2id$v=19$abc");
}

#[rstest]
fn new_users_start_without_preferences(ada: User) {
    assert!(ada.preferences().is_empty());
}

#[rstest]
fn document_shape_uses_stored_field_names(ada: User) {
    let user = ada.with_preferences(Preferences::new().with("theme", json!("dark")));
    let value = serde_json::to_value(&user).expect("serialise user");

    assert_eq!(
        value,
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "hashedpw": "$argon2id$v=19$abc",
            "preferences": { "theme": "dark" },
        })
    );
}

#[rstest]
fn name_rejects_nul_characters() {
    let err = UserName::new("Ada\0").expect_err("NUL rejected");
    assert_eq!(err, AccountValidationError::NulCharacter { field: "name" });
}

#[rstest]
fn clean_user_has_no_nul_field(ada: User) {
    assert_eq!(ada.field_with_nul(), None);
}

#[rstest]
fn nul_in_hash_or_preferences_is_reported(ada: User) {
    let bad_prefs = ada
        .clone()
        .with_preferences(Preferences::new().with("k", json!("a\u{0000}b")));
    let bad_hash = User::new(
        ada.name().clone(),
        ada.email().clone(),
        PasswordHash::new("hash\0"),
    );

    assert_eq!(bad_prefs.field_with_nul(), Some("preferences"));
    assert_eq!(bad_hash.field_with_nul(), Some("hashedpw"));
}
