// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::submission::parse_positive_amount;
use crate::validation::ValidationError;

pub const DEFAULT_PRESALE_RATE: f64 = 200_000.0;
pub const DEFAULT_PRESALE_PRICE_USD: f64 = 0.000_05;
pub const DEFAULT_PRESALE_WALLET: &str = "FqNj9NhbA6LAcYhrSeaY5HeNsBtUKM9u6pi51qHZ9c1g";

/// Business parameters of the current presale round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresaleTerms {
    /// SODM allocated per SOL contributed.
    pub rate: f64,
    pub price_usd: f64,
    pub presale_wallet: String,
}

impl Default for PresaleTerms {
    fn default() -> Self {
        Self {
            rate: DEFAULT_PRESALE_RATE,
            price_usd: DEFAULT_PRESALE_PRICE_USD,
            presale_wallet: DEFAULT_PRESALE_WALLET.to_string(),
        }
    }
}

/// Currency a quote is priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteCurrency {
    Sol,
    Usd,
}

impl QuoteCurrency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sol => "sol",
            Self::Usd => "usd",
        }
    }

    const fn invalid_amount_message(self) -> &'static str {
        match self {
            Self::Sol => "Please enter a valid SOL amount",
            Self::Usd => "Please enter a valid USD amount",
        }
    }
}

/// SODM a given contribution would receive under the current terms. Nothing
/// is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Quote {
    pub currency: QuoteCurrency,
    pub amount: f64,
    pub sodm_amount: f64,
}

impl PresaleTerms {
    #[must_use]
    pub fn allocation_for(&self, sol_amount: f64) -> f64 {
        sol_amount * self.rate
    }

    /// `allocation_for`, or `None` when the product is not a finite positive
    /// number.
    #[must_use]
    pub fn checked_allocation(&self, sol_amount: f64) -> Option<f64> {
        let sodm = self.allocation_for(sol_amount);
        (sodm.is_finite() && sodm > 0.0).then_some(sodm)
    }

    /// SODM for a SOL contribution at the presale rate.
    pub fn quote_sol(&self, raw: &str) -> Result<Quote, ValidationError> {
        self.quote(QuoteCurrency::Sol, raw)
    }

    /// SODM bought with a USD amount at the presale price.
    pub fn quote_usd(&self, raw: &str) -> Result<Quote, ValidationError> {
        self.quote(QuoteCurrency::Usd, raw)
    }

    pub fn quote(&self, currency: QuoteCurrency, raw: &str) -> Result<Quote, ValidationError> {
        let invalid = || ValidationError::new(currency.as_str(), currency.invalid_amount_message());
        let amount = parse_positive_amount(raw).ok_or_else(invalid)?;
        let sodm_amount = match currency {
            QuoteCurrency::Sol => self.checked_allocation(amount),
            QuoteCurrency::Usd => {
                let sodm = amount / self.price_usd;
                (sodm.is_finite() && sodm > 0.0).then_some(sodm)
            }
        }
        .ok_or_else(invalid)?;
        Ok(Quote {
            currency,
            amount,
            sodm_amount,
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(format!("presale rate must be positive, got {}", self.rate));
        }
        if !self.price_usd.is_finite() || self.price_usd <= 0.0 {
            return Err(format!(
                "presale price must be positive, got {}",
                self.price_usd
            ));
        }
        if self.presale_wallet.trim().is_empty() {
            return Err("presale wallet must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_terms_follow_first_round() {
        let terms = PresaleTerms::default();
        assert!(terms.validate().is_ok());
        assert_eq!(terms.allocation_for(2.0), 400_000.0);
    }

    #[test]
    fn quotes_follow_rate_and_price() {
        let terms = PresaleTerms::default();
        let sol = terms.quote_sol("1.5").expect("sol quote");
        assert_eq!(sol.sodm_amount, 300_000.0);
        assert_eq!(sol.currency, QuoteCurrency::Sol);
        let usd = terms.quote_usd("10").expect("usd quote");
        assert!((usd.sodm_amount - 200_000.0).abs() < 1e-6);
    }

    #[test]
    fn quotes_reject_unusable_amounts() {
        let terms = PresaleTerms::default();
        for raw in ["", "abc", "0", "-2", "1e304"] {
            let err = terms.quote_sol(raw).expect_err(raw);
            assert_eq!(err.message, "Please enter a valid SOL amount");
        }
        let err = terms.quote_usd("1e305").expect_err("overflow");
        assert_eq!(err.field, "usd");
        assert_eq!(err.message, "Please enter a valid USD amount");
    }

    #[test]
    fn non_positive_rate_is_rejected() {
        let terms = PresaleTerms {
            rate: 0.0,
            ..PresaleTerms::default()
        };
        assert!(terms.validate().is_err());
    }
}
