// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use soldium_core::UserId;

use crate::entry::EntryDraft;
use crate::terms::PresaleTerms;
use crate::validation::ValidationError;

pub const WALLET_MIN_LEN: usize = 32;
pub const WALLET_MAX_LEN: usize = 44;

/// Raw contribution form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmissionForm {
    #[serde(default)]
    pub payment_reference: String,
    #[serde(default)]
    pub solana_wallet: String,
    #[serde(default)]
    pub sol_amount: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    pub payment_reference: String,
    pub solana_wallet: String,
    pub sol_amount: f64,
}

impl SubmissionForm {
    #[must_use]
    pub fn new(reference: &str, wallet: &str, amount: &str) -> Self {
        Self {
            payment_reference: reference.to_string(),
            solana_wallet: wallet.to_string(),
            sol_amount: amount.to_string(),
        }
    }

    /// Runs reference, wallet and amount checks in that order; the first
    /// failure wins.
    pub fn validate(&self) -> Result<ValidatedSubmission, ValidationError> {
        let payment_reference = self.payment_reference.trim();
        if payment_reference.is_empty() {
            return Err(ValidationError::new(
                "payment_reference",
                "Payment reference is required",
            ));
        }

        let solana_wallet = self.solana_wallet.trim();
        if solana_wallet.is_empty() {
            return Err(ValidationError::new(
                "solana_wallet",
                "Solana wallet address is required",
            ));
        }
        let wallet_len = solana_wallet.chars().count();
        if !(WALLET_MIN_LEN..=WALLET_MAX_LEN).contains(&wallet_len) {
            return Err(ValidationError::new(
                "solana_wallet",
                "Invalid Solana wallet address",
            ));
        }

        let sol_amount = parse_positive_amount(&self.sol_amount).ok_or_else(|| {
            ValidationError::new("sol_amount", "Please enter a valid SOL amount")
        })?;

        Ok(ValidatedSubmission {
            payment_reference: payment_reference.to_string(),
            solana_wallet: solana_wallet.to_string(),
            sol_amount,
        })
    }
}

impl ValidatedSubmission {
    /// Binds the submission to its owner and freezes the allocation at the
    /// rate currently in force. An amount whose allocation does not fit a
    /// finite `f64` is rejected like any other invalid amount.
    pub fn into_draft(
        self,
        user_id: UserId,
        user_email: &str,
        terms: &PresaleTerms,
    ) -> Result<EntryDraft, ValidationError> {
        let sodm_amount = terms.checked_allocation(self.sol_amount).ok_or_else(|| {
            ValidationError::new("sol_amount", "Please enter a valid SOL amount")
        })?;
        Ok(EntryDraft {
            user_id,
            user_email: user_email.to_string(),
            sodm_amount,
            payment_reference: self.payment_reference,
            solana_wallet: self.solana_wallet,
            sol_amount: self.sol_amount,
        })
    }
}

pub(crate) fn parse_positive_amount(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}
