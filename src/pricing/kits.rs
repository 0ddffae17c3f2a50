//! Installation kit prices and the monthly subscription grid.

use serde::{Deserialize, Serialize};

/// Two powers closer than this designate the same kit (kWc).
pub const POWER_TOLERANCE_KWC: f64 = 0.01;

/// Subscription durations offered, in years. Column order of [`SubscriptionRow::monthly`].
pub const SUBSCRIPTION_DURATIONS: [u32; 4] = [10, 15, 20, 25];

/// Returns true when both powers designate the same kit.
pub fn same_power(a: f64, b: f64) -> bool {
    (a - b).abs() < POWER_TOLERANCE_KWC
}

/// Turnkey price of one installation kit (VAT included).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KitPrice {
    /// Peak power of the kit (kWc).
    pub power_kwc: f64,
    /// Installed price (€).
    pub price: f64,
}

const fn kit(power_kwc: f64, price: f64) -> KitPrice {
    KitPrice { power_kwc, price }
}

/// Residential kits up to 9 kWc, then professional kits.
pub const DEFAULT_KITS: &[KitPrice] = &[
    kit(3.0, 8990.0),
    kit(3.5, 9990.0),
    kit(4.0, 10990.0),
    kit(4.5, 11990.0),
    kit(5.0, 12790.0),
    kit(5.5, 13590.0),
    kit(6.0, 14390.0),
    kit(6.5, 15190.0),
    kit(7.0, 15990.0),
    kit(7.5, 16790.0),
    kit(8.0, 17590.0),
    kit(8.5, 18390.0),
    kit(9.0, 19190.0),
    kit(12.0, 24900.0),
    kit(15.0, 29900.0),
    kit(18.0, 34900.0),
    kit(24.0, 44900.0),
    kit(36.0, 62900.0),
];

/// Kit price table: built-in kits plus custom overrides.
///
/// A custom price for a power already in the built-in table replaces it;
/// a custom price for a new power adds a kit.
#[derive(Debug, Clone, Serialize)]
pub struct KitPrices {
    builtin: Vec<KitPrice>,
    custom: Vec<KitPrice>,
}

impl KitPrices {
    /// Returns the built-in table with no overrides.
    pub fn builtin() -> Self {
        Self {
            builtin: DEFAULT_KITS.to_vec(),
            custom: Vec::new(),
        }
    }

    /// Price of the kit matching `power_kwc`, custom prices first.
    pub fn lookup(&self, power_kwc: f64) -> Option<f64> {
        self.custom
            .iter()
            .chain(self.builtin.iter())
            .find(|k| same_power(k.power_kwc, power_kwc))
            .map(|k| k.price)
    }

    /// Inserts or replaces the custom price for `power_kwc`.
    pub fn set_custom(&mut self, power_kwc: f64, price: f64) {
        self.custom.retain(|k| !same_power(k.power_kwc, power_kwc));
        self.custom.push(kit(power_kwc, price));
        self.custom.sort_by(|a, b| a.power_kwc.total_cmp(&b.power_kwc));
    }

    /// Removes the custom price for `power_kwc`. Returns whether one existed.
    pub fn remove_custom(&mut self, power_kwc: f64) -> bool {
        let before = self.custom.len();
        self.custom.retain(|k| !same_power(k.power_kwc, power_kwc));
        self.custom.len() != before
    }

    /// Effective table sorted by power, overrides applied.
    pub fn effective(&self) -> Vec<KitPrice> {
        let mut kits: Vec<KitPrice> = self
            .builtin
            .iter()
            .filter(|b| !self.custom.iter().any(|c| same_power(c.power_kwc, b.power_kwc)))
            .chain(self.custom.iter())
            .copied()
            .collect();
        kits.sort_by(|a, b| a.power_kwc.total_cmp(&b.power_kwc));
        kits
    }
}

/// Monthly subscription fees of one kit, one column per entry of
/// [`SUBSCRIPTION_DURATIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubscriptionRow {
    /// Peak power of the kit (kWc).
    pub power_kwc: f64,
    /// Monthly fee (€/month) for 10, 15, 20 and 25 years.
    pub monthly: [f64; 4],
}

const fn row(power_kwc: f64, monthly: [f64; 4]) -> SubscriptionRow {
    SubscriptionRow { power_kwc, monthly }
}

/// Subscription is offered on residential kits only.
pub const DEFAULT_SUBSCRIPTIONS: &[SubscriptionRow] = &[
    row(3.0, [83.91, 58.93, 46.82, 40.45]),
    row(3.5, [93.24, 65.49, 52.03, 44.95]),
    row(4.0, [102.57, 72.05, 57.24, 49.46]),
    row(4.5, [111.91, 78.60, 62.45, 53.96]),
    row(5.0, [119.37, 83.85, 66.61, 57.55]),
    row(5.5, [126.84, 89.09, 70.78, 61.16]),
    row(6.0, [134.31, 94.33, 74.95, 64.75]),
    row(6.5, [141.77, 99.58, 79.11, 68.36]),
    row(7.0, [149.24, 104.82, 83.28, 71.95]),
    row(7.5, [156.71, 110.07, 87.45, 75.56]),
    row(8.0, [164.17, 115.31, 91.61, 79.16]),
    row(8.5, [171.64, 120.56, 95.78, 82.75]),
    row(9.0, [179.11, 125.80, 99.95, 86.36]),
];

/// Looks up the monthly fee for a kit and duration.
pub fn subscription_lookup(rows: &[SubscriptionRow], power_kwc: f64, years: u32) -> Option<f64> {
    let column = SUBSCRIPTION_DURATIONS.iter().position(|&d| d == years)?;
    rows.iter()
        .find(|r| same_power(r.power_kwc, power_kwc))
        .map(|r| r.monthly[column])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_tolerates_rounding() {
        let kits = KitPrices::builtin();
        assert_eq!(kits.lookup(6.0), Some(14390.0));
        assert_eq!(kits.lookup(6.004), Some(14390.0));
        assert_eq!(kits.lookup(6.2), None);
    }

    #[test]
    fn custom_price_overrides_builtin() {
        let mut kits = KitPrices::builtin();
        kits.set_custom(6.0, 13990.0);
        assert_eq!(kits.lookup(6.0), Some(13990.0));

        kits.set_custom(6.0, 13490.0);
        assert_eq!(kits.lookup(6.0), Some(13490.0));
        assert_eq!(kits.effective().len(), DEFAULT_KITS.len());
    }

    #[test]
    fn custom_price_adds_pro_kit() {
        let mut kits = KitPrices::builtin();
        kits.set_custom(9.5, 20500.0);
        assert_eq!(kits.lookup(9.5), Some(20500.0));

        let effective = kits.effective();
        assert_eq!(effective.len(), DEFAULT_KITS.len() + 1);
        assert!(
            effective
                .windows(2)
                .all(|w| w[0].power_kwc < w[1].power_kwc)
        );
    }

    #[test]
    fn removing_custom_price_restores_builtin() {
        let mut kits = KitPrices::builtin();
        kits.set_custom(6.0, 13990.0);
        assert!(kits.remove_custom(6.0));
        assert!(!kits.remove_custom(6.0));
        assert_eq!(kits.lookup(6.0), Some(14390.0));
    }

    #[test]
    fn subscription_needs_listed_duration() {
        assert_eq!(
            subscription_lookup(DEFAULT_SUBSCRIPTIONS, 6.0, 20),
            Some(74.95)
        );
        assert_eq!(subscription_lookup(DEFAULT_SUBSCRIPTIONS, 6.0, 12), None);
        assert_eq!(subscription_lookup(DEFAULT_SUBSCRIPTIONS, 12.0, 20), None);
    }

    #[test]
    fn every_residential_kit_has_a_subscription_row() {
        for k in DEFAULT_KITS.iter().filter(|k| k.power_kwc <= 9.0) {
            assert!(
                DEFAULT_SUBSCRIPTIONS
                    .iter()
                    .any(|r| same_power(r.power_kwc, k.power_kwc)),
                "missing subscription row for {} kWc",
                k.power_kwc
            );
        }
    }
}
