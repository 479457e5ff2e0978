// SPDX-License-Identifier: Apache-2.0

use serde_json::{json, Value};
use soldium_model::{
    CountdownSettings, EntryStatus, EntryTransition, InquiryForm, PartnershipPackage,
    UserAccount,
};

#[test]
fn statuses_serialize_as_lowercase_labels() {
    assert_eq!(
        serde_json::to_value(EntryStatus::Verified).expect("encode"),
        json!("verified")
    );
}

#[test]
fn transitions_use_an_action_tag() {
    let t: EntryTransition =
        serde_json::from_value(json!({"action": "reject"})).expect("reject without reason");
    assert_eq!(t, EntryTransition::Reject { reason: None });
    let t: EntryTransition =
        serde_json::from_value(json!({"action": "verify"})).expect("verify");
    assert_eq!(t, EntryTransition::Verify);
}

#[test]
fn user_accounts_reject_unknown_fields() {
    let raw = json!({
        "email": "a@b.io",
        "is_admin": false,
        "created_at": "2026-01-01T00:00:00Z",
        "role": "owner"
    });
    assert!(serde_json::from_value::<UserAccount>(raw).is_err());
}

#[test]
fn default_countdown_matches_first_schedule() {
    let settings = CountdownSettings::default();
    let doc: Value = settings.to_document();
    assert_eq!(doc["burn_amount"], "25,000,000 SODM");
    assert_eq!(doc["burn_interval"], "15 days");
    assert_eq!(doc["next_burn_date"], "2026-02-23T00:00:00.000Z");
}

#[test]
fn inquiry_form_requires_contact_fields_and_known_package() {
    let mut form = InquiryForm {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        telegram: "@ada".to_string(),
        project_name: "Engine".to_string(),
        description: "Analytical".to_string(),
        package: "Professional".to_string(),
    };
    let draft = form.validate().expect("valid inquiry");
    assert_eq!(draft.package, Some(PartnershipPackage::Professional));

    form.email = "not-an-email".to_string();
    assert_eq!(form.validate().expect_err("bad email").field, "email");

    form.email = "ada@example.com".to_string();
    form.package = "Platinum".to_string();
    assert_eq!(form.validate().expect_err("bad package").field, "package");

    form.package = String::new();
    form.telegram = " ".to_string();
    assert_eq!(form.validate().expect_err("telegram").field, "telegram");
}
