//! Power-banded rates: surplus feed-in tariff and self-consumption bonus.

use serde::Serialize;

/// One power band, inclusive upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerTier {
    /// Upper bound of the band (kWc, inclusive).
    pub up_to_kwc: f64,
    /// Rate applying within the band.
    pub value: f64,
}

const fn tier(up_to_kwc: f64, value: f64) -> PowerTier {
    PowerTier { up_to_kwc, value }
}

/// Surplus feed-in tariff (€/kWh): ≤ 9 kWc, 9 to 36 kWc, 36 to 100 kWc.
pub const FEED_IN_TIERS: &[PowerTier] = &[tier(9.0, 0.1269), tier(36.0, 0.0761), tier(100.0, 0.0761)];

/// Self-consumption bonus (€/kWc): ≤ 3, 3 to 9, 9 to 36, 36 to 100 kWc.
pub const SUBSIDY_TIERS: &[PowerTier] = &[
    tier(3.0, 220.0),
    tier(9.0, 160.0),
    tier(36.0, 190.0),
    tier(100.0, 100.0),
];

/// Value of the first band containing `power_kwc`.
///
/// Tiers must be sorted by ascending upper bound.
pub fn tier_value(tiers: &[PowerTier], power_kwc: f64) -> Option<f64> {
    if !power_kwc.is_finite() || power_kwc <= 0.0 {
        return None;
    }
    tiers
        .iter()
        .find(|t| power_kwc <= t.up_to_kwc)
        .map(|t| t.value)
}
