//! Error types for price resolution.

use thiserror::Error;

/// Failure to resolve a monetary constant from the price catalog.
///
/// Mis-pricing a quote is worse than refusing it, so every lookup that
/// falls outside the catalog surfaces here instead of defaulting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("no installation kit priced for {power_kwc} kWc")]
    PowerNotFound { power_kwc: f64 },

    #[error("no subscription fee for {power_kwc} kWc over {years} years")]
    SubscriptionNotFound { power_kwc: f64, years: u32 },

    #[error("no feed-in tariff tier covers {power_kwc} kWc")]
    FeedInTierNotFound { power_kwc: f64 },

    #[error("no self-consumption bonus tier covers {power_kwc} kWc")]
    SubsidyTierNotFound { power_kwc: f64 },

    #[error("custom price for {power_kwc} kWc must be a positive amount, got {price}")]
    InvalidCustomPrice { power_kwc: f64, price: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_power() {
        let err = PricingError::PowerNotFound { power_kwc: 6.2 };
        assert_eq!(err.to_string(), "no installation kit priced for 6.2 kWc");

        let err = PricingError::SubscriptionNotFound {
            power_kwc: 6.0,
            years: 12,
        };
        assert!(err.to_string().contains("12 years"));
    }
}
