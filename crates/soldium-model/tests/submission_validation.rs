// SPDX-License-Identifier: Apache-2.0

use proptest::prelude::*;
use soldium_core::UserId;
use soldium_model::{PresaleTerms, SubmissionForm, WALLET_MAX_LEN, WALLET_MIN_LEN};

fn wallet_of(len: usize) -> String {
    "A".repeat(len)
}

#[test]
fn validation_order_is_reference_then_wallet_then_amount() {
    let err = SubmissionForm::new("  ", "", "abc")
        .validate()
        .expect_err("all invalid");
    assert_eq!(err.field, "payment_reference");
    assert_eq!(err.message, "Payment reference is required");

    let err = SubmissionForm::new("ref", "   ", "abc")
        .validate()
        .expect_err("wallet missing");
    assert_eq!(err.field, "solana_wallet");
    assert_eq!(err.message, "Solana wallet address is required");

    let err = SubmissionForm::new("ref", &wallet_of(31), "abc")
        .validate()
        .expect_err("wallet short");
    assert_eq!(err.message, "Invalid Solana wallet address");

    let err = SubmissionForm::new("ref", &wallet_of(32), "abc")
        .validate()
        .expect_err("amount invalid");
    assert_eq!(err.field, "sol_amount");
    assert_eq!(err.message, "Please enter a valid SOL amount");
}

#[test]
fn wallet_bounds_are_inclusive() {
    for len in [WALLET_MIN_LEN, WALLET_MAX_LEN] {
        assert!(SubmissionForm::new("ref", &wallet_of(len), "1").validate().is_ok());
    }
    for len in [WALLET_MIN_LEN - 1, WALLET_MAX_LEN + 1] {
        assert!(SubmissionForm::new("ref", &wallet_of(len), "1").validate().is_err());
    }
}

#[test]
fn inputs_are_trimmed_before_storage() {
    let ok = SubmissionForm::new("  sig  ", &format!(" {} ", wallet_of(40)), " 0.25 ")
        .validate()
        .expect("valid");
    assert_eq!(ok.payment_reference, "sig");
    assert_eq!(ok.solana_wallet, wallet_of(40));
    assert_eq!(ok.sol_amount, 0.25);
}

proptest! {
    #[test]
    fn valid_inputs_always_yield_pending_drafts_at_the_fixed_rate(
        reference in "[A-Za-z0-9]{1,88}",
        wallet_len in WALLET_MIN_LEN..=WALLET_MAX_LEN,
        amount in 0.000_001f64..10_000.0,
    ) {
        let form = SubmissionForm::new(&reference, &wallet_of(wallet_len), &amount.to_string());
        let draft = form
            .validate()
            .expect("valid submission")
            .into_draft(UserId::new("u").expect("user"), "u@x.io", &PresaleTerms::default())
            .expect("finite allocation");
        prop_assert_eq!(draft.sodm_amount, draft.sol_amount * 200_000.0);
        prop_assert_eq!(draft.sol_amount, amount);
    }

    #[test]
    fn out_of_range_wallets_are_always_rejected(
        wallet_len in prop_oneof![1usize..WALLET_MIN_LEN, (WALLET_MAX_LEN + 1)..120usize],
    ) {
        let form = SubmissionForm::new("ref", &wallet_of(wallet_len), "1");
        prop_assert!(form.validate().is_err());
    }

    #[test]
    fn amounts_whose_allocation_overflows_are_rejected(exponent in 304i32..=308) {
        let amount = format!("1e{exponent}");
        let validated = SubmissionForm::new("ref", &wallet_of(40), &amount)
            .validate()
            .expect("finite amount parses");
        let err = validated
            .into_draft(UserId::new("u").expect("user"), "u@x.io", &PresaleTerms::default())
            .expect_err("allocation is not finite");
        prop_assert_eq!(err.message, "Please enter a valid SOL amount");
    }

    #[test]
    fn non_positive_amounts_are_always_rejected(amount in -1.0e9f64..=0.0) {
        let form = SubmissionForm::new("ref", &wallet_of(40), &amount.to_string());
        prop_assert!(form.validate().is_err());
    }
}
