use serde::{Deserialize, Serialize};

use crate::entry::PresaleEntry;

pub const EXPLORER_BASE_URL: &str = "https://solscan.io";

/// Block-explorer link-outs for an entry. Purely presentational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplorerLinks {
    pub transaction: String,
    pub wallet: String,
}

impl ExplorerLinks {
    #[must_use]
    pub fn for_entry(entry: &PresaleEntry) -> Self {
        Self {
            transaction: transaction_url(&entry.payment_reference),
            wallet: account_url(&entry.solana_wallet),
        }
    }
}

#[must_use]
pub fn transaction_url(reference: &str) -> String {
    format!("{EXPLORER_BASE_URL}/tx/{}", encode_segment(reference.trim()))
}

#[must_use]
pub fn account_url(wallet: &str) -> String {
    format!("{EXPLORER_BASE_URL}/account/{}", encode_segment(wallet.trim()))
}

fn encode_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base58_values_pass_through_unchanged() {
        assert_eq!(
            account_url("FqNj9NhbA6LAcYhrSeaY5HeNsBtUKM9u6pi51qHZ9c1g"),
            "https://solscan.io/account/FqNj9NhbA6LAcYhrSeaY5HeNsBtUKM9u6pi51qHZ9c1g"
        );
    }

    #[test]
    fn free_text_references_are_escaped() {
        assert_eq!(transaction_url("tx 1/2"), "https://solscan.io/tx/tx%201%2F2");
    }
}
