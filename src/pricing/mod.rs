//! Price catalog and tariff resolution.
//!
//! [`PriceCatalog`] is the single source of monetary constants for a quote:
//! kit prices, the subscription grid, feed-in and bonus tiers, and the
//! battery catalog. It is built once by the caller and passed by reference
//! to the projection engine.

pub mod batteries;
pub mod kits;
pub mod tiers;

use serde::Serialize;

use crate::error::PricingError;

pub use batteries::{PhysicalBattery, VirtualBattery};
pub use kits::{KitPrice, SUBSCRIPTION_DURATIONS};
pub use tiers::PowerTier;

/// Micro-inverter cost per installed kWc (€0.50/Wc).
pub const MICRO_INVERTER_COST_PER_KWC: f64 = 500.0;

/// Micro-inverter surcharges are rounded up to this step (€).
const SURCHARGE_STEP: f64 = 100.0;

/// Every price the projection engine may need to resolve.
///
/// # Examples
///
/// ```
/// use solar_quote::pricing::PriceCatalog;
///
/// let catalog = PriceCatalog::default();
/// assert_eq!(catalog.price_from_power(6.0), Ok(14390.0));
/// assert!(catalog.price_from_power(6.2).is_err());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct PriceCatalog {
    kits: kits::KitPrices,
    subscriptions: Vec<kits::SubscriptionRow>,
    feed_in_tiers: Vec<PowerTier>,
    subsidy_tiers: Vec<PowerTier>,
    virtual_batteries: Vec<VirtualBattery>,
    physical_batteries: Vec<PhysicalBattery>,
}

impl Default for PriceCatalog {
    fn default() -> Self {
        Self {
            kits: kits::KitPrices::builtin(),
            subscriptions: kits::DEFAULT_SUBSCRIPTIONS.to_vec(),
            feed_in_tiers: tiers::FEED_IN_TIERS.to_vec(),
            subsidy_tiers: tiers::SUBSIDY_TIERS.to_vec(),
            virtual_batteries: batteries::VIRTUAL_BATTERIES.to_vec(),
            physical_batteries: batteries::physical_batteries(),
        }
    }
}

impl PriceCatalog {
    /// Installed price of the kit matching `power_kwc`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::PowerNotFound`] if no kit (built-in or custom)
    /// matches the power within 0.01 kWc.
    pub fn price_from_power(&self, power_kwc: f64) -> Result<f64, PricingError> {
        self.kits
            .lookup(power_kwc)
            .ok_or(PricingError::PowerNotFound { power_kwc })
    }

    /// Monthly subscription fee for a kit over `years`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::SubscriptionNotFound`] if the kit is not
    /// offered by subscription or the duration is not one of
    /// [`SUBSCRIPTION_DURATIONS`].
    pub fn subscription_price(&self, power_kwc: f64, years: u32) -> Result<f64, PricingError> {
        kits::subscription_lookup(&self.subscriptions, power_kwc, years)
            .ok_or(PricingError::SubscriptionNotFound { power_kwc, years })
    }

    /// Price left to pay once the bonus and discount are deducted.
    ///
    /// The micro-inverter surcharge is added whenever `micro_inverters` is
    /// set, whatever the financing mode.
    ///
    /// # Errors
    ///
    /// Propagates [`PriceCatalog::price_from_power`] failures.
    pub fn final_price(
        &self,
        power_kwc: f64,
        bonus: f64,
        discount: f64,
        micro_inverters: bool,
    ) -> Result<f64, PricingError> {
        let mut price = self.price_from_power(power_kwc)? - bonus - discount;
        if micro_inverters {
            price += micro_inverter_surcharge(power_kwc);
        }
        Ok(price)
    }

    /// Surplus feed-in tariff (€/kWh) of the power band.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::FeedInTierNotFound`] above 100 kWc or for a
    /// non-positive power.
    pub fn feed_in_tariff(&self, power_kwc: f64) -> Result<f64, PricingError> {
        tiers::tier_value(&self.feed_in_tiers, power_kwc)
            .ok_or(PricingError::FeedInTierNotFound { power_kwc })
    }

    /// Self-consumption bonus (€) for an installation of `power_kwc`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::SubsidyTierNotFound`] above 100 kWc or for a
    /// non-positive power.
    pub fn self_consumption_bonus(&self, power_kwc: f64) -> Result<f64, PricingError> {
        tiers::tier_value(&self.subsidy_tiers, power_kwc)
            .map(|rate| rate * power_kwc)
            .ok_or(PricingError::SubsidyTierNotFound { power_kwc })
    }

    /// Smart Battery offer of exactly `capacity_kwh`.
    pub fn virtual_battery(&self, capacity_kwh: u32) -> Option<&VirtualBattery> {
        self.virtual_batteries
            .iter()
            .find(|b| b.capacity_kwh == capacity_kwh)
    }

    /// Physical battery model by catalog name (case-insensitive).
    pub fn physical_battery(&self, name: &str) -> Option<&PhysicalBattery> {
        self.physical_batteries
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }

    /// Sets a custom kit price, replacing any previous one for that power.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidCustomPrice`] if the power or price is
    /// not a finite positive number.
    pub fn set_custom_price(&mut self, power_kwc: f64, price: f64) -> Result<(), PricingError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(power_kwc) || !valid(price) {
            return Err(PricingError::InvalidCustomPrice { power_kwc, price });
        }
        self.kits.set_custom(power_kwc, price);
        Ok(())
    }

    /// Builder form of [`PriceCatalog::set_custom_price`].
    ///
    /// # Errors
    ///
    /// Same as [`PriceCatalog::set_custom_price`].
    pub fn with_custom_price(mut self, power_kwc: f64, price: f64) -> Result<Self, PricingError> {
        self.set_custom_price(power_kwc, price)?;
        Ok(self)
    }

    /// Drops the custom price for `power_kwc`. Returns whether one existed.
    pub fn remove_custom_price(&mut self, power_kwc: f64) -> bool {
        self.kits.remove_custom(power_kwc)
    }

    /// Effective kit table, custom prices applied, sorted by power.
    pub fn kits(&self) -> Vec<KitPrice> {
        self.kits.effective()
    }

    pub fn virtual_batteries(&self) -> &[VirtualBattery] {
        &self.virtual_batteries
    }

    pub fn physical_batteries(&self) -> &[PhysicalBattery] {
        &self.physical_batteries
    }
}

/// Micro-inverter surcharge, rounded up to the next €100.
///
/// ```
/// use solar_quote::pricing::micro_inverter_surcharge;
///
/// assert_eq!(micro_inverter_surcharge(6.0), 3000.0);
/// assert_eq!(micro_inverter_surcharge(3.5), 1800.0);
/// ```
pub fn micro_inverter_surcharge(power_kwc: f64) -> f64 {
    (power_kwc * MICRO_INVERTER_COST_PER_KWC / SURCHARGE_STEP).ceil() * SURCHARGE_STEP
}
